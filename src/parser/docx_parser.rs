//! DOCX document parser using zip and quick-xml.

use crate::detect::{self, CORE_PART, DOCUMENT_PART, DOCUMENT_RELS_PART};
use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, Document, InlineContent, ListInfo, Metadata, Paragraph, Table, TableCell,
    TableRow, TextRun, TextStyle,
};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// Twentieths of a point per point.
const TWIPS_PER_POINT: f32 = 20.0;

/// DOCX document parser.
pub struct DocxParser {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl DocxParser {
    /// Open a DOCX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_vec(data)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_vec(data.to_vec())
    }

    /// Create a parser from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_vec(data)
    }

    fn from_vec(data: Vec<u8>) -> Result<Self> {
        if !detect::is_zip_bytes(&data) {
            return Err(Error::UnknownFormat);
        }
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(Self { archive })
    }

    /// Parse the package into a [`Document`].
    pub fn parse(mut self) -> Result<Document> {
        let body = self
            .read_part(DOCUMENT_PART)?
            .ok_or_else(|| Error::MissingPart(DOCUMENT_PART.to_string()))?;

        let relationships = match self.read_part(DOCUMENT_RELS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let metadata = match self.read_part(CORE_PART)? {
            Some(xml) => parse_core_properties(&xml),
            None => Metadata::default(),
        };

        let blocks = walk_body(&body, &relationships)?;
        log::debug!(
            "Parsed {} blocks, {} relationships",
            blocks.len(),
            relationships.len()
        );

        Ok(Document { metadata, blocks })
    }

    /// Read a package part as UTF-8 text; `None` if the part does not exist.
    fn read_part(&mut self, name: &str) -> Result<Option<String>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(Some(content))
    }
}

/// Extract an attribute value by qualified name.
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Toggle properties (`w:b`, `w:i`) are on unless `w:val` says otherwise.
fn toggle_on(e: &BytesStart) -> bool {
    !matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}

/// Parse `word/_rels/document.xml.rels` into an id → target map.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut relationships = HashMap::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (get_attr(&e, b"Id"), get_attr(&e, b"Target")) {
                    relationships.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// Parse `docProps/core.xml`. Malformed properties are ignored.
fn parse_core_properties(xml: &str) -> Metadata {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut metadata = Metadata::default();
    let mut current: Option<Vec<u8>> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => current = Some(e.name().as_ref().to_vec()),
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default();
                let text = text.trim();
                match current.as_deref() {
                    _ if text.is_empty() => {}
                    Some(b"dc:title") => metadata.title = Some(text.to_string()),
                    Some(b"dc:creator") => metadata.author = Some(text.to_string()),
                    Some(b"dcterms:created") => metadata.created = parse_datetime(text),
                    Some(b"dcterms:modified") => metadata.modified = parse_datetime(text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    metadata
}

/// Parse a W3CDTF (RFC 3339) timestamp.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Walk `word/document.xml` and collect body blocks.
fn walk_body(xml: &str, relationships: &HashMap<String, String>) -> Result<Vec<Block>> {
    let mut reader = Reader::from_str(xml);
    // xml:space="preserve" runs carry meaningful leading/trailing spaces
    reader.trim_text(false);

    let mut state = BodyWalker::new(relationships);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => state.start(&e),
            Event::Empty(e) => {
                state.start(&e);
                state.end(e.name().as_ref());
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                state.text(&text);
            }
            Event::End(e) => state.end(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(state.blocks)
}

/// Event-driven state for the body walk.
struct BodyWalker<'a> {
    relationships: &'a HashMap<String, String>,
    blocks: Vec<Block>,

    table_depth: usize,
    table: Option<Table>,
    row: Option<TableRow>,
    cell: Option<TableCell>,

    paragraph_depth: usize,
    paragraph: Option<Paragraph>,
    in_ppr: bool,

    in_run: bool,
    in_rpr: bool,
    in_text: bool,
    run_style: TextStyle,

    link: Option<(String, String)>,
}

impl<'a> BodyWalker<'a> {
    fn new(relationships: &'a HashMap<String, String>) -> Self {
        Self {
            relationships,
            blocks: Vec::new(),
            table_depth: 0,
            table: None,
            row: None,
            cell: None,
            paragraph_depth: 0,
            paragraph: None,
            in_ppr: false,
            in_run: false,
            in_rpr: false,
            in_text: false,
            run_style: TextStyle::default(),
            link: None,
        }
    }

    /// Only the outermost paragraph collects content; nested ones are text boxes.
    fn collecting(&self) -> bool {
        self.paragraph_depth == 1 && self.paragraph.is_some()
    }

    fn start(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 && self.paragraph_depth == 0 {
                    self.table = Some(Table::new());
                }
            }
            b"w:tblStyle" if self.table_depth == 1 && self.cell.is_none() => {
                if let Some(table) = self.table.as_mut() {
                    table.style_id = get_attr(e, b"w:val");
                }
            }
            b"w:tr" if self.table_depth == 1 => self.row = Some(TableRow::default()),
            b"w:tc" if self.table_depth == 1 => self.cell = Some(TableCell::empty()),
            b"w:p" => {
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 {
                    self.paragraph = Some(Paragraph::new());
                }
            }
            b"w:pPr" if self.paragraph_depth == 1 => self.in_ppr = true,
            b"w:pStyle" if self.in_ppr && !self.in_rpr => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.style.style_id = get_attr(e, b"w:val");
                }
            }
            b"w:jc" if self.in_ppr && !self.in_rpr => {
                if let (Some(p), Some(val)) = (self.paragraph.as_mut(), get_attr(e, b"w:val")) {
                    p.style.alignment = Alignment::from_ooxml(&val);
                }
            }
            b"w:ind" if self.in_ppr && !self.in_rpr => {
                let left = get_attr(e, b"w:left").or_else(|| get_attr(e, b"w:start"));
                if let (Some(p), Some(twips)) = (
                    self.paragraph.as_mut(),
                    left.and_then(|v| v.parse::<f32>().ok()),
                ) {
                    p.style.indent_left = Some(twips / TWIPS_PER_POINT);
                }
            }
            b"w:ilvl" if self.in_ppr => {
                if let Some(p) = self.paragraph.as_mut() {
                    let level = get_attr(e, b"w:val")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0);
                    p.style.list_info = Some(ListInfo::bullet(level));
                }
            }
            b"w:numPr" if self.in_ppr => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.style.list_info.get_or_insert(ListInfo::bullet(0));
                }
            }
            b"w:r" if self.collecting() => {
                self.in_run = true;
                self.run_style = TextStyle::default();
            }
            b"w:rPr" => self.in_rpr = true,
            b"w:b" if self.in_run && self.in_rpr => self.run_style.bold = toggle_on(e),
            b"w:i" if self.in_run && self.in_rpr => self.run_style.italic = toggle_on(e),
            b"w:u" if self.in_run && self.in_rpr => {
                self.run_style.underline = get_attr(e, b"w:val").as_deref() != Some("none");
            }
            b"w:color" if self.in_run && self.in_rpr => {
                self.run_style.color = get_attr(e, b"w:val");
            }
            b"w:t" if self.in_run => self.in_text = true,
            b"w:tab" if self.in_run && !self.in_rpr => self.push_inline(InlineContent::Tab),
            b"w:br" | b"w:cr" if self.in_run => self.push_inline(InlineContent::LineBreak),
            b"w:hyperlink" if self.collecting() => {
                let url = get_attr(e, b"r:id")
                    .and_then(|id| self.relationships.get(&id).cloned())
                    .or_else(|| get_attr(e, b"w:anchor").map(|a| format!("#{}", a)))
                    .unwrap_or_default();
                self.link = Some((url, String::new()));
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"w:t" => self.in_text = false,
            b"w:rPr" => self.in_rpr = false,
            b"w:r" if self.in_run => self.in_run = false,
            b"w:pPr" if self.paragraph_depth == 1 => self.in_ppr = false,
            b"w:hyperlink" => {
                if let (Some((url, text)), Some(p)) = (self.link.take(), self.paragraph.as_mut()) {
                    p.add_link(text, url);
                }
            }
            b"w:p" => {
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
                if self.paragraph_depth == 0 {
                    if let Some(p) = self.paragraph.take() {
                        self.finish_paragraph(p);
                    }
                }
            }
            b"w:tc" if self.table_depth == 1 => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.cells.push(cell);
                }
            }
            b"w:tr" if self.table_depth == 1 => {
                if let (Some(row), Some(table)) = (self.row.take(), self.table.as_mut()) {
                    table.add_row(row);
                }
            }
            b"w:tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    if let Some(table) = self.table.take() {
                        self.blocks.push(Block::Table(table));
                    }
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if !self.in_text || !self.collecting() {
            return;
        }
        if let Some((_, link_text)) = self.link.as_mut() {
            link_text.push_str(text);
        } else if let Some(p) = self.paragraph.as_mut() {
            p.add_run(TextRun {
                text: text.to_string(),
                style: self.run_style.clone(),
            });
        }
    }

    fn push_inline(&mut self, inline: InlineContent) {
        if !self.collecting() {
            return;
        }
        if let Some((_, link_text)) = self.link.as_mut() {
            match inline {
                InlineContent::Tab => link_text.push('\t'),
                _ => link_text.push('\n'),
            }
        } else if let Some(p) = self.paragraph.as_mut() {
            p.content.push(inline);
        }
    }

    /// Body paragraphs become blocks; paragraphs inside tables belong to the current cell.
    fn finish_paragraph(&mut self, paragraph: Paragraph) {
        if self.table_depth == 0 {
            self.blocks.push(Block::Paragraph(paragraph));
        } else if let Some(cell) = self.cell.as_mut() {
            cell.content.push(paragraph);
        }
    }
}
