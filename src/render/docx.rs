//! DOCX rendering: serializes a [`Document`] into a WordprocessingML package.

use crate::detect::{CORE_PART, DOCUMENT_PART, DOCUMENT_RELS_PART};
use crate::error::{Error, Result};
use crate::model::{
    Block, Document, InlineContent, Metadata, Paragraph, Table, TableCell, TextStyle,
};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::options::{half_points, twips, POINTS_PER_INCH};
use super::{StyleSheet, LIST_STYLE, NAME_STYLE, SECTION_STYLE, TABLE_STYLE};

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";

const STYLES_PART: &str = "word/styles.xml";
const NUMBERING_PART: &str = "word/numbering.xml";

/// Numbering instance used by bulleted paragraphs.
const BULLET_NUM_ID: &str = "1";

/// Bullet levels defined in the numbering part.
const BULLET_LEVELS: u8 = 3;

/// Letter page size in twips.
const PAGE_WIDTH_TWIPS: i64 = 12240;
const PAGE_HEIGHT_TWIPS: i64 = 15840;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

/// Convert a document to DOCX bytes.
pub fn to_docx(doc: &Document, styles: &StyleSheet) -> Result<Vec<u8>> {
    DocxWriter::new(styles).write(doc)
}

/// Thin wrapper over the quick-xml writer for element-at-a-time output.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { writer })
    }

    fn start<'n>(name: &'n str, attrs: &[(&str, &str)]) -> BytesStart<'n> {
        let mut start = BytesStart::new(name);
        for (key, value) in attrs {
            start.push_attribute((*key, xml_safe(value).as_ref()));
        }
        start
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer.write_event(Event::Start(Self::start(name, attrs)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer.write_event(Event::Empty(Self::start(name, attrs)))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let text = xml_safe(text);
        self.writer.write_event(Event::Text(BytesText::new(&text)))?;
        Ok(())
    }

    /// `<name w:val="value"/>`
    fn val(&mut self, name: &str, value: &str) -> Result<()> {
        self.empty(name, &[("w:val", value)])
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| Error::Render(format!("XML output is not UTF-8: {}", e)))
    }
}

/// Characters allowed in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// `text` without the characters XML 1.0 cannot carry, even escaped.
///
/// Form feeds, vertical tabs and other C0 controls show up in text pasted
/// from PDFs; Word refuses to open a part that contains them.
fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// Hyperlink targets collected while writing the body.
#[derive(Debug, Default)]
struct Relationships {
    links: Vec<String>,
}

impl Relationships {
    /// Styles and numbering take rId1 and rId2.
    const FIRST_LINK_ID: usize = 3;

    fn add_link(&mut self, url: &str) -> String {
        let index = match self.links.iter().position(|u| u == url) {
            Some(i) => i,
            None => {
                self.links.push(url.to_string());
                self.links.len() - 1
            }
        };
        format!("rId{}", index + Self::FIRST_LINK_ID)
    }

    fn to_xml(&self) -> Result<String> {
        let mut xml = XmlOut::new()?;
        xml.open("Relationships", &[("xmlns", NS_RELS)])?;
        xml.empty(
            "Relationship",
            &[("Id", "rId1"), ("Type", REL_STYLES), ("Target", "styles.xml")],
        )?;
        xml.empty(
            "Relationship",
            &[
                ("Id", "rId2"),
                ("Type", REL_NUMBERING),
                ("Target", "numbering.xml"),
            ],
        )?;
        for (i, url) in self.links.iter().enumerate() {
            let id = format!("rId{}", i + Self::FIRST_LINK_ID);
            xml.empty(
                "Relationship",
                &[
                    ("Id", id.as_str()),
                    ("Type", REL_HYPERLINK),
                    ("Target", url.as_str()),
                    ("TargetMode", "External"),
                ],
            )?;
        }
        xml.close("Relationships")?;
        xml.finish()
    }
}

/// DOCX package writer.
pub struct DocxWriter<'a> {
    styles: &'a StyleSheet,
}

impl<'a> DocxWriter<'a> {
    /// Create a writer using the given style sheet.
    pub fn new(styles: &'a StyleSheet) -> Self {
        Self { styles }
    }

    /// Serialize the document into a complete DOCX package.
    pub fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        self.styles.validate()?;
        let mut rels = Relationships::default();
        let document_xml = self.document_xml(doc, &mut rels)?;

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", ROOT_RELS.to_string()),
            (CORE_PART, self.core_xml(&doc.metadata)?),
            (DOCUMENT_PART, document_xml),
            (STYLES_PART, self.styles_xml()?),
            (NUMBERING_PART, numbering_xml()?),
            (DOCUMENT_RELS_PART, rels.to_xml()?),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in &parts {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(*name, options)?;
            zip.write_all(content.as_bytes())?;
        }
        let cursor = zip.finish()?;

        log::debug!(
            "Wrote DOCX package: {} blocks, {} hyperlinks",
            doc.blocks.len(),
            rels.links.len()
        );
        Ok(cursor.into_inner())
    }

    fn document_xml(&self, doc: &Document, rels: &mut Relationships) -> Result<String> {
        let mut xml = XmlOut::new()?;
        xml.open("w:document", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?;
        xml.open("w:body", &[])?;

        for block in &doc.blocks {
            match block {
                Block::Paragraph(p) => self.write_paragraph(&mut xml, p, rels)?,
                Block::Table(t) => self.write_table(&mut xml, t, rels)?,
            }
        }

        let margin = twips(self.styles.margin_inches * POINTS_PER_INCH).to_string();
        let width = PAGE_WIDTH_TWIPS.to_string();
        let height = PAGE_HEIGHT_TWIPS.to_string();
        xml.open("w:sectPr", &[])?;
        xml.empty("w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;
        xml.empty(
            "w:pgMar",
            &[
                ("w:top", margin.as_str()),
                ("w:right", margin.as_str()),
                ("w:bottom", margin.as_str()),
                ("w:left", margin.as_str()),
                ("w:header", "720"),
                ("w:footer", "720"),
                ("w:gutter", "0"),
            ],
        )?;
        xml.close("w:sectPr")?;

        xml.close("w:body")?;
        xml.close("w:document")?;
        xml.finish()
    }

    fn write_paragraph(
        &self,
        xml: &mut XmlOut,
        paragraph: &Paragraph,
        rels: &mut Relationships,
    ) -> Result<()> {
        xml.open("w:p", &[])?;

        let style = &paragraph.style;
        let has_props = style.style_id.is_some()
            || style.list_info.is_some()
            || style.line_spacing.is_some()
            || style.indent_left.is_some()
            || style.alignment != Default::default();
        if has_props {
            xml.open("w:pPr", &[])?;
            if let Some(ref id) = style.style_id {
                xml.val("w:pStyle", id)?;
            }
            if let Some(list) = style.list_info {
                let level = list.level.min(BULLET_LEVELS - 1).to_string();
                xml.open("w:numPr", &[])?;
                xml.val("w:ilvl", level.as_str())?;
                xml.val("w:numId", BULLET_NUM_ID)?;
                xml.close("w:numPr")?;
            }
            if let Some(spacing) = style.line_spacing {
                // Auto line rule: 240 = single spacing
                let line = ((spacing * 240.0).round() as i64).max(1).to_string();
                xml.empty(
                    "w:spacing",
                    &[("w:line", line.as_str()), ("w:lineRule", "auto")],
                )?;
            }
            if let Some(indent) = style.indent_left {
                let left = twips(indent).to_string();
                xml.empty("w:ind", &[("w:left", left.as_str())])?;
            }
            if style.alignment != Default::default() {
                xml.val("w:jc", style.alignment.as_ooxml())?;
            }
            xml.close("w:pPr")?;
        }

        for inline in &paragraph.content {
            match inline {
                InlineContent::Text(run) => self.write_run(xml, &run.text, &run.style)?,
                InlineContent::LineBreak => {
                    xml.open("w:r", &[])?;
                    xml.empty("w:br", &[])?;
                    xml.close("w:r")?;
                }
                InlineContent::Tab => {
                    xml.open("w:r", &[])?;
                    xml.empty("w:tab", &[])?;
                    xml.close("w:r")?;
                }
                InlineContent::Link { text, url } => {
                    let id = rels.add_link(url);
                    let link_style = TextStyle {
                        underline: true,
                        color: Some(self.styles.link_color.clone()),
                        ..Default::default()
                    };
                    xml.open("w:hyperlink", &[("r:id", id.as_str())])?;
                    self.write_run(xml, text, &link_style)?;
                    xml.close("w:hyperlink")?;
                }
            }
        }

        xml.close("w:p")
    }

    /// Write one run; embedded newlines become `w:br` inside the run.
    fn write_run(&self, xml: &mut XmlOut, text: &str, style: &TextStyle) -> Result<()> {
        xml.open("w:r", &[])?;
        if style.has_styling() {
            xml.open("w:rPr", &[])?;
            if let Some(ref font) = style.font_name {
                xml.empty(
                    "w:rFonts",
                    &[("w:ascii", font.as_str()), ("w:hAnsi", font.as_str())],
                )?;
            }
            if style.bold {
                xml.empty("w:b", &[])?;
            }
            if style.italic {
                xml.empty("w:i", &[])?;
            }
            if let Some(ref color) = style.color {
                xml.val("w:color", color)?;
            }
            if let Some(size) = style.font_size {
                xml.val("w:sz", &half_points(size).to_string())?;
            }
            if style.underline {
                xml.val("w:u", "single")?;
            }
            xml.close("w:rPr")?;
        }
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                xml.empty("w:br", &[])?;
            }
            if !line.is_empty() {
                xml.open("w:t", &[("xml:space", "preserve")])?;
                xml.text(line)?;
                xml.close("w:t")?;
            }
        }
        xml.close("w:r")
    }

    fn write_table(&self, xml: &mut XmlOut, table: &Table, rels: &mut Relationships) -> Result<()> {
        let cols = table.column_count().max(1) as i64;
        let margin = twips(self.styles.margin_inches * POINTS_PER_INCH);
        let col_width = ((PAGE_WIDTH_TWIPS - 2 * margin) / cols).to_string();

        xml.open("w:tbl", &[])?;
        xml.open("w:tblPr", &[])?;
        if let Some(ref id) = table.style_id {
            xml.val("w:tblStyle", id)?;
        }
        xml.empty("w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
        xml.empty("w:tblLayout", &[("w:type", "autofit")])?;
        xml.val("w:tblLook", "04A0")?;
        xml.close("w:tblPr")?;

        xml.open("w:tblGrid", &[])?;
        for _ in 0..cols {
            xml.empty("w:gridCol", &[("w:w", col_width.as_str())])?;
        }
        xml.close("w:tblGrid")?;

        for row in &table.rows {
            xml.open("w:tr", &[])?;
            for cell in &row.cells {
                self.write_cell(xml, cell, &col_width, rels)?;
            }
            xml.close("w:tr")?;
        }

        xml.close("w:tbl")
    }

    fn write_cell(
        &self,
        xml: &mut XmlOut,
        cell: &TableCell,
        width: &str,
        rels: &mut Relationships,
    ) -> Result<()> {
        xml.open("w:tc", &[])?;
        xml.open("w:tcPr", &[])?;
        xml.empty("w:tcW", &[("w:w", width), ("w:type", "dxa")])?;
        if let Some(borders) = cell.borders {
            xml.open("w:tcBorders", &[])?;
            for (edge, style) in borders.edges() {
                xml.empty(
                    edge,
                    &[
                        ("w:val", style.as_ooxml()),
                        ("w:sz", "4"),
                        ("w:space", "0"),
                        ("w:color", "auto"),
                    ],
                )?;
            }
            xml.close("w:tcBorders")?;
        }
        xml.close("w:tcPr")?;

        // A cell must contain at least one paragraph
        if cell.content.is_empty() {
            xml.empty("w:p", &[])?;
        }
        for paragraph in &cell.content {
            self.write_paragraph(xml, paragraph, rels)?;
        }
        xml.close("w:tc")
    }

    fn core_xml(&self, metadata: &Metadata) -> Result<String> {
        let now = Utc::now();
        let created = w3cdtf(metadata.created.unwrap_or(now));
        let modified = w3cdtf(metadata.modified.unwrap_or(now));
        let author = metadata.author.as_deref().unwrap_or(&self.styles.author);

        let mut xml = XmlOut::new()?;
        xml.open(
            "cp:coreProperties",
            &[
                (
                    "xmlns:cp",
                    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
                ),
                ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
                ("xmlns:dcterms", "http://purl.org/dc/terms/"),
                ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ],
        )?;
        if let Some(ref title) = metadata.title {
            xml.open("dc:title", &[])?;
            xml.text(title)?;
            xml.close("dc:title")?;
        }
        xml.open("dc:creator", &[])?;
        xml.text(author)?;
        xml.close("dc:creator")?;
        xml.open("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")])?;
        xml.text(&created)?;
        xml.close("dcterms:created")?;
        xml.open("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")])?;
        xml.text(&modified)?;
        xml.close("dcterms:modified")?;
        xml.close("cp:coreProperties")?;
        xml.finish()
    }

    fn styles_xml(&self) -> Result<String> {
        let s = self.styles;
        let font = s.font.as_str();
        let body_size = half_points(s.body_size).to_string();

        let mut xml = XmlOut::new()?;
        xml.open("w:styles", &[("xmlns:w", NS_W)])?;

        xml.open("w:docDefaults", &[])?;
        xml.open("w:rPrDefault", &[])?;
        xml.open("w:rPr", &[])?;
        fonts(&mut xml, font)?;
        xml.val("w:sz", body_size.as_str())?;
        xml.val("w:szCs", body_size.as_str())?;
        xml.close("w:rPr")?;
        xml.close("w:rPrDefault")?;
        xml.open("w:pPrDefault", &[])?;
        xml.open("w:pPr", &[])?;
        xml.empty(
            "w:spacing",
            &[("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")],
        )?;
        xml.close("w:pPr")?;
        xml.close("w:pPrDefault")?;
        xml.close("w:docDefaults")?;

        // Normal
        xml.open(
            "w:style",
            &[
                ("w:type", "paragraph"),
                ("w:default", "1"),
                ("w:styleId", "Normal"),
            ],
        )?;
        xml.val("w:name", "Normal")?;
        xml.empty("w:qFormat", &[])?;
        xml.open("w:rPr", &[])?;
        fonts(&mut xml, font)?;
        xml.val("w:sz", body_size.as_str())?;
        xml.close("w:rPr")?;
        xml.close("w:style")?;

        heading_style(
            &mut xml,
            NAME_STYLE,
            "CV Name",
            "0",
            font,
            &s.name_color,
            s.name_size,
        )?;
        heading_style(
            &mut xml,
            SECTION_STYLE,
            "CV Section",
            "1",
            font,
            &s.section_color,
            s.section_size,
        )?;

        // List Bullet
        xml.open(
            "w:style",
            &[("w:type", "paragraph"), ("w:styleId", LIST_STYLE)],
        )?;
        xml.val("w:name", "List Bullet")?;
        xml.val("w:basedOn", "Normal")?;
        xml.empty("w:qFormat", &[])?;
        xml.open("w:pPr", &[])?;
        xml.open("w:numPr", &[])?;
        xml.val("w:numId", BULLET_NUM_ID)?;
        xml.close("w:numPr")?;
        xml.empty("w:ind", &[("w:left", "360"), ("w:hanging", "360")])?;
        xml.close("w:pPr")?;
        xml.close("w:style")?;

        // Normal Table
        xml.open(
            "w:style",
            &[
                ("w:type", "table"),
                ("w:default", "1"),
                ("w:styleId", "TableNormal"),
            ],
        )?;
        xml.val("w:name", "Normal Table")?;
        xml.open("w:tblPr", &[])?;
        xml.empty("w:tblInd", &[("w:w", "0"), ("w:type", "dxa")])?;
        xml.open("w:tblCellMar", &[])?;
        xml.empty("w:top", &[("w:w", "0"), ("w:type", "dxa")])?;
        xml.empty("w:left", &[("w:w", "108"), ("w:type", "dxa")])?;
        xml.empty("w:bottom", &[("w:w", "0"), ("w:type", "dxa")])?;
        xml.empty("w:right", &[("w:w", "108"), ("w:type", "dxa")])?;
        xml.close("w:tblCellMar")?;
        xml.close("w:tblPr")?;
        xml.close("w:style")?;

        // Table Grid
        xml.open(
            "w:style",
            &[("w:type", "table"), ("w:styleId", TABLE_STYLE)],
        )?;
        xml.val("w:name", "Table Grid")?;
        xml.val("w:basedOn", "TableNormal")?;
        xml.open("w:tblPr", &[])?;
        xml.open("w:tblBorders", &[])?;
        for edge in [
            "w:top",
            "w:left",
            "w:bottom",
            "w:right",
            "w:insideH",
            "w:insideV",
        ] {
            xml.empty(
                edge,
                &[
                    ("w:val", "single"),
                    ("w:sz", "4"),
                    ("w:space", "0"),
                    ("w:color", "auto"),
                ],
            )?;
        }
        xml.close("w:tblBorders")?;
        xml.close("w:tblPr")?;
        xml.close("w:style")?;

        xml.close("w:styles")?;
        xml.finish()
    }
}

fn fonts(xml: &mut XmlOut, font: &str) -> Result<()> {
    xml.empty(
        "w:rFonts",
        &[
            ("w:ascii", font),
            ("w:hAnsi", font),
            ("w:eastAsia", font),
            ("w:cs", font),
        ],
    )
}

fn heading_style(
    xml: &mut XmlOut,
    id: &str,
    name: &str,
    outline_level: &str,
    font: &str,
    color: &str,
    size: f32,
) -> Result<()> {
    let size = half_points(size).to_string();
    xml.open("w:style", &[("w:type", "paragraph"), ("w:styleId", id)])?;
    xml.val("w:name", name)?;
    xml.val("w:basedOn", "Normal")?;
    xml.val("w:next", "Normal")?;
    xml.empty("w:qFormat", &[])?;
    xml.open("w:pPr", &[])?;
    xml.empty("w:keepNext", &[])?;
    xml.empty("w:spacing", &[("w:before", "240"), ("w:after", "60")])?;
    xml.val("w:outlineLvl", outline_level)?;
    xml.close("w:pPr")?;
    xml.open("w:rPr", &[])?;
    fonts(xml, font)?;
    xml.empty("w:b", &[])?;
    xml.val("w:color", color)?;
    xml.val("w:sz", size.as_str())?;
    xml.val("w:szCs", size.as_str())?;
    xml.close("w:rPr")?;
    xml.close("w:style")
}

fn numbering_xml() -> Result<String> {
    let mut xml = XmlOut::new()?;
    xml.open("w:numbering", &[("xmlns:w", NS_W)])?;
    xml.open("w:abstractNum", &[("w:abstractNumId", "0")])?;
    xml.val("w:multiLevelType", "hybridMultilevel")?;
    for level in 0..BULLET_LEVELS {
        let ilvl = level.to_string();
        let left = (360 * (i64::from(level) + 1)).to_string();
        xml.open("w:lvl", &[("w:ilvl", ilvl.as_str())])?;
        xml.val("w:start", "1")?;
        xml.val("w:numFmt", "bullet")?;
        xml.val("w:lvlText", "•")?;
        xml.val("w:lvlJc", "left")?;
        xml.open("w:pPr", &[])?;
        xml.empty("w:ind", &[("w:left", left.as_str()), ("w:hanging", "360")])?;
        xml.close("w:pPr")?;
        xml.close("w:lvl")?;
    }
    xml.close("w:abstractNum")?;
    xml.open("w:num", &[("w:numId", BULLET_NUM_ID)])?;
    xml.val("w:abstractNumId", "0")?;
    xml.close("w:num")?;
    xml.close("w:numbering")?;
    xml.finish()
}

fn w3cdtf(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
