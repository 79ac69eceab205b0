//! Layout of a parsed résumé as a styled document.

use super::{MarkdownCv, Section, SectionKind};
use crate::model::{
    Alignment, BorderStyle, CellBorders, Document, DocumentBuilder, Metadata, Paragraph, Table,
    TableCell, TableRow, TextRun,
};
use crate::render::{StyleSheet, LIST_STYLE, NAME_STYLE, SECTION_STYLE, TABLE_STYLE};

const ENTRY_PREFIX: &str = "### ";
const BULLET_PREFIX: &str = "- ";
const ACHIEVEMENT_MARKER: &str = "**Achievement:**";
const EMPHASIS: &str = "**";
const COMPETENCY_COLUMNS: usize = 3;

/// Renders a [`MarkdownCv`] into a [`Document`].
#[derive(Debug, Clone, Default)]
pub struct CvRenderer {
    styles: StyleSheet,
}

impl CvRenderer {
    /// Create a renderer with the given style sheet.
    pub fn new(styles: StyleSheet) -> Self {
        Self { styles }
    }

    /// The style sheet in use.
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Lay out the résumé: name, contact table, spacer, then each section.
    pub fn render(&self, cv: &MarkdownCv) -> Document {
        let mut builder = DocumentBuilder::new();
        builder.metadata(Metadata::with_title(cv.name.as_str()));

        builder
            .paragraph(
                Paragraph::with_text(&cv.name)
                    .styled(NAME_STYLE)
                    .align(Alignment::Center),
            )
            .table(contact_table(cv))
            .blank();

        for section in &cv.sections {
            self.section_header(&mut builder, section);
            match section.kind() {
                SectionKind::ProfessionalExperience => experience(&mut builder, section),
                SectionKind::CoreCompetencies => competencies(&mut builder, section),
                kind if kind.is_detail_list() => self.detail_list(&mut builder, section),
                _ => other(&mut builder, section),
            }
        }

        builder.build()
    }

    fn section_header(&self, builder: &mut DocumentBuilder, section: &Section) {
        builder
            .paragraph(Paragraph::with_text(section.display_title()).styled(SECTION_STYLE))
            .paragraph(
                Paragraph::with_text(self.styles.rule())
                    .line_spacing(self.styles.rule_line_spacing),
            );
    }

    fn detail_list(&self, builder: &mut DocumentBuilder, section: &Section) {
        for line in section.lines() {
            if let Some(heading) = line.strip_prefix(ENTRY_PREFIX) {
                builder.bold(heading.trim());
            } else if line.starts_with(EMPHASIS) {
                builder.paragraph(
                    Paragraph::with_text(line.replace(EMPHASIS, ""))
                        .indent(self.styles.detail_indent_points()),
                );
            } else if let Some(item) = line.strip_prefix(BULLET_PREFIX) {
                builder.paragraph(Paragraph::bullet(item, LIST_STYLE));
            } else if !line.is_empty() {
                builder.text(line);
            }
        }
    }
}

fn contact_table(cv: &MarkdownCv) -> Table {
    let cells = cv.contact_cells();
    let centered = |p: Paragraph| {
        TableCell::with_content(vec![p.align(Alignment::Center)])
            .with_borders(CellBorders::all(BorderStyle::Single))
    };

    let linkedin = match cells.linkedin_url() {
        Some(url) => {
            let mut p = Paragraph::new();
            p.add_link(cells.second.as_str(), url);
            p
        }
        None => Paragraph::with_text(&cells.second),
    };

    let mut table = Table::new().styled(TABLE_STYLE);
    table.add_row(TableRow::new(vec![
        centered(Paragraph::with_text(&cells.first)),
        centered(linkedin),
        centered(Paragraph::with_text(&cells.third)),
    ]));
    table
}

/// Entries start at `### ` lines, which become bold company lines.
///
/// Lines before the first entry are not dropped: they follow the same
/// bullet, achievement and plain-text rules as lines inside an entry.
fn experience(builder: &mut DocumentBuilder, section: &Section) {
    for line in section.lines() {
        if let Some(heading) = line.strip_prefix(ENTRY_PREFIX) {
            builder.bold(heading.trim());
        } else if let Some(item) = line.strip_prefix(BULLET_PREFIX) {
            builder.paragraph(Paragraph::bullet(item, LIST_STYLE));
        } else if let Some(rest) = line.strip_prefix(ACHIEVEMENT_MARKER) {
            builder.paragraph(Paragraph::with_run(TextRun::bold_italic(format!(
                "Achievement: {}",
                rest.trim()
            ))));
        } else if !line.is_empty() {
            builder.text(line);
        }
    }
}

fn competencies(builder: &mut DocumentBuilder, section: &Section) {
    let items: Vec<&str> = section
        .lines()
        .filter_map(|line| line.strip_prefix(BULLET_PREFIX))
        .collect();
    if items.is_empty() {
        return;
    }

    let rows = items.len().div_ceil(COMPETENCY_COLUMNS);
    let mut table = Table::grid(rows, COMPETENCY_COLUMNS).styled(TABLE_STYLE);
    let borderless = CellBorders::all(BorderStyle::Nil);

    for row in &mut table.rows {
        for cell in &mut row.cells {
            cell.borders = Some(borderless);
        }
    }
    for (i, item) in items.iter().enumerate() {
        if let Some(cell) = table.cell_mut(i / COMPETENCY_COLUMNS, i % COMPETENCY_COLUMNS) {
            *cell = TableCell::text(format!("• {}", item)).with_borders(borderless);
        }
    }

    builder.table(table);
}

fn other(builder: &mut DocumentBuilder, section: &Section) {
    builder.text(&section.body);
}
