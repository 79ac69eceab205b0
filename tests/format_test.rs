//! Integration tests for the formatting pipeline.
//!
//! Generated documents are read back with the DOCX parser so the checks
//! cover the written package, not just the in-memory layout.

use std::fs;

use cvdoc::model::{Block, Document, Paragraph, Table};
use cvdoc::render::{LIST_STYLE, NAME_STYLE, SECTION_STYLE, TABLE_STYLE};
use cvdoc::{format_directory, format_markdown, parse_bytes, FormatOptions, Formatter, StyleSheet};
use tempfile::tempdir;

const JANE: &str = "# Jane Doe\n555-1234\njane@example.com\nlinkedin.com/in/janedoe\nCity, Country\n## EDUCATION\n### MIT\n**BSc Computer Science**\n- Graduated 2020\n";

fn round_trip(markdown: &str) -> Document {
    parse_bytes(&format_markdown(markdown).unwrap()).unwrap()
}

fn paragraphs(doc: &Document) -> Vec<&Paragraph> {
    doc.paragraphs().collect()
}

/// Body paragraphs after the section header titled `title`, up to the next header.
fn section_paragraphs<'a>(doc: &'a Document, title: &str) -> Vec<&'a Paragraph> {
    let mut in_section = false;
    let mut out = Vec::new();
    for p in doc.paragraphs() {
        if p.style.style_id.as_deref() == Some(SECTION_STYLE) {
            in_section = p.plain_text() == title;
            continue;
        }
        if in_section && !p.plain_text().starts_with('_') {
            out.push(p);
        }
    }
    out
}

fn tables(doc: &Document) -> Vec<&Table> {
    doc.tables().collect()
}

#[test]
fn test_jane_doe_document() {
    let doc = round_trip(JANE);

    assert_eq!(doc.metadata.title.as_deref(), Some("Jane Doe"));
    let title = paragraphs(&doc)[0];
    assert_eq!(title.plain_text(), "Jane Doe");
    assert_eq!(title.style.style_id.as_deref(), Some(NAME_STYLE));

    let contact = tables(&doc)[0];
    assert_eq!(contact.column_count(), 3);
    let links: Vec<_> = contact.cell(0, 1).unwrap().content[0].links().collect();
    assert_eq!(
        links,
        vec![("linkedin.com/in/janedoe", "https://www.linkedin.com/in/janedoe")]
    );
    assert_eq!(contact.cell(0, 0).unwrap().plain_text(), "555-1234\njane@example.com");
    assert_eq!(contact.cell(0, 2).unwrap().plain_text(), "City, Country");

    let education = section_paragraphs(&doc, "EDUCATION");
    assert_eq!(education.len(), 3);

    assert_eq!(education[0].plain_text(), "MIT");
    assert!(education[0].is_bold());

    assert_eq!(education[1].plain_text(), "BSc Computer Science");
    let indent = education[1].style.indent_left.unwrap();
    assert!((indent - 14.4).abs() < 0.1);

    assert_eq!(education[2].plain_text(), "Graduated 2020");
    assert!(education[2].is_list_item());
    assert_eq!(education[2].style.style_id.as_deref(), Some(LIST_STYLE));
}

#[test]
fn test_competencies_grid() {
    let items: String = (1..=7).map(|i| format!("- Skill {}\n", i)).collect();
    let doc = round_trip(&format!("# A\n## CORE COMPETENCIES\n{}", items));

    let tables = tables(&doc);
    assert_eq!(tables.len(), 2);
    let grid = tables[1];
    assert_eq!(grid.style_id.as_deref(), Some(TABLE_STYLE));
    assert_eq!(tables[0].style_id, grid.style_id);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.column_count(), 3);
    assert_eq!(grid.cell(1, 1).unwrap().plain_text(), "• Skill 5");
    assert!(grid.cell(2, 2).unwrap().is_empty());
}

#[test]
fn test_achievement_line() {
    let doc = round_trip(
        "# A\n## PROFESSIONAL EXPERIENCE\n### Engineer\n- Built services\n**Achievement:** Reduced latency 30%\n",
    );

    let experience = section_paragraphs(&doc, "PROFESSIONAL EXPERIENCE");
    assert_eq!(experience.len(), 3);
    assert!(experience[0].is_bold());
    assert!(experience[1].is_list_item());

    let achievement = experience[2];
    assert_eq!(achievement.plain_text(), "Achievement: Reduced latency 30%");
    assert!(achievement.is_bold());
    assert!(achievement.is_italic());
}

#[test]
fn test_unknown_section_keeps_text() {
    let body = "Chess, climbing\n- not styled\n**bold markers stay**\n\nAfter a gap";
    let doc = round_trip(&format!("# A\n## Interests\n{}\n", body));

    let section = section_paragraphs(&doc, "INTERESTS");
    assert_eq!(section.len(), 1);
    assert_eq!(section[0].plain_text(), body);
    assert!(!section[0].is_list_item());
    assert!(!section[0].is_bold());
}

#[test]
fn test_document_order() {
    let doc = round_trip("# A\nphone\n## Summary\nHello\n## EDUCATION\n### School\n");
    let kinds: Vec<&str> = doc
        .blocks
        .iter()
        .map(|b| match b {
            Block::Paragraph(_) => "p",
            Block::Table(_) => "t",
        })
        .collect();

    // name, contact, spacer, (header, rule, body) x 2
    assert_eq!(kinds, vec!["p", "t", "p", "p", "p", "p", "p", "p", "p"]);
}

#[test]
fn test_format_directory() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    fs::write(input.path().join("jane.md"), JANE).unwrap();
    fs::write(input.path().join("john.MD"), "# John\n").unwrap();
    fs::write(input.path().join("notes.txt"), "skip").unwrap();

    let out_dir = output.path().join("final_cvs").join("docx");
    let report = format_directory(input.path(), &out_dir).unwrap();
    assert_eq!(report.len(), 2);

    let jane = fs::read(out_dir.join("jane.docx")).unwrap();
    let doc = parse_bytes(&jane).unwrap();
    assert_eq!(paragraphs(&doc)[0].plain_text(), "Jane Doe");
    assert!(out_dir.join("john.docx").exists());
    assert!(!out_dir.join("notes.docx").exists());
}

#[test]
fn test_custom_style_sheet() {
    let styles = StyleSheet::new().with_font("Georgia").with_rule_length(10);
    let formatter = Formatter::new(FormatOptions::new().with_styles(styles));

    let doc = parse_bytes(&formatter.format_markdown("# A\n## Summary\nHi").unwrap()).unwrap();
    let rule = section_rule(&doc);
    assert_eq!(rule, "_".repeat(10));
}

fn section_rule(doc: &Document) -> String {
    doc.paragraphs()
        .map(|p| p.plain_text())
        .find(|t| t.starts_with('_'))
        .unwrap_or_default()
}
