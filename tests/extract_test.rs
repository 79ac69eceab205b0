//! Integration tests for the extraction pipeline.

use std::fs;
use std::io::Write;
use std::path::Path;

use cvdoc::model::{Document, Paragraph, Table, TableRow};
use cvdoc::render::{to_docx, StyleSheet};
use cvdoc::{extract_directory, ExtractOptions, Extractor, JsonFormat};
use serde_json::Value;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_docx(path: &Path, doc: &Document) {
    fs::write(path, to_docx(doc, &StyleSheet::default()).unwrap()).unwrap();
}

fn simple_doc(lines: &[&str]) -> Document {
    let mut doc = Document::new();
    for line in lines {
        doc.add_paragraph(Paragraph::with_text(line));
    }
    doc
}

/// A zip container without `word/document.xml`.
fn write_hollow_package(path: &Path) {
    let mut zip = ZipWriter::new(fs::File::create(path).unwrap());
    zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"<Types/>").unwrap();
    zip.finish().unwrap();
}

#[test]
fn test_one_output_per_input() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_docx(&input.path().join("alice.docx"), &simple_doc(&["Alice", "Rust"]));
    write_docx(&input.path().join("bob.docx"), &simple_doc(&["Bob"]));
    write_docx(&input.path().join("carol.docx"), &simple_doc(&[]));

    let report = extract_directory(input.path(), output.path()).unwrap();
    assert_eq!(report.result.len(), 3);
    assert_eq!(report.failures(), 0);

    let json = fs::read_to_string(output.path().join("all_documents.json")).unwrap();
    let record: Value = serde_json::from_str(&json).unwrap();
    let record = record.as_object().unwrap();
    assert_eq!(record.len(), 3);

    for stem in ["alice", "bob", "carol"] {
        let txt = fs::read_to_string(output.path().join(format!("{}.txt", stem))).unwrap();
        let key = format!("{}.docx", stem);
        assert_eq!(record[&key].as_str().unwrap(), txt);
    }
    assert_eq!(record["alice.docx"], "Alice\nRust");
    assert_eq!(record["carol.docx"], "");
}

#[test]
fn test_failures_are_substituted() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_docx(&input.path().join("good.docx"), &simple_doc(&["Fine"]));
    fs::write(input.path().join("plain.docx"), "just text").unwrap();
    write_hollow_package(&input.path().join("hollow.docx"));

    let report = extract_directory(input.path(), output.path()).unwrap();
    assert_eq!(report.result.len(), 3);
    assert_eq!(report.failures(), 2);

    for name in ["plain.docx", "hollow.docx"] {
        let text = report.result.get(name).unwrap();
        assert!(text.starts_with("Error extracting text from "));
        assert!(text.contains(name));

        let stem = name.trim_end_matches(".docx");
        let txt = fs::read_to_string(output.path().join(format!("{}.txt", stem))).unwrap();
        assert_eq!(txt, text);
    }

    let hollow = report.result.get("hollow.docx").unwrap();
    assert!(hollow.contains("word/document.xml"));
    assert_eq!(report.result.get("good.docx"), Some("Fine"));
}

#[test]
fn test_failed_list_ignores_lookalike_text() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_docx(
        &input.path().join("notes.docx"),
        &simple_doc(&["Error extracting text from a template: keep this line"]),
    );
    fs::write(input.path().join("plain.docx"), "just text").unwrap();

    let report = extract_directory(input.path(), output.path()).unwrap();
    assert_eq!(report.failures(), 1);
    assert_eq!(report.failed, vec!["plain.docx"]);
    assert!(!report.is_failed("notes.docx"));
    assert_eq!(report.succeeded(), 1);
}

#[test]
fn test_outputs_distinct_when_names_differ_by_case() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_docx(&input.path().join("cv.docx"), &simple_doc(&["lower"]));
    write_docx(&input.path().join("cv.DOCX"), &simple_doc(&["UPPER"]));

    let report = extract_directory(input.path(), output.path()).unwrap();
    assert_eq!(report.result.len(), 2);
    assert_eq!(report.result.get("cv.docx"), Some("lower"));
    assert_eq!(report.result.get("cv.DOCX"), Some("UPPER"));

    // Every text file is written once and holds its own document's text.
    let texts = &report.written[..report.written.len() - 1];
    assert_eq!(texts.len(), 2);
    assert_ne!(texts[0], texts[1]);
    let mut contents: Vec<String> = texts
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, vec!["UPPER", "lower"]);

    let txt_files = fs::read_dir(output.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "txt"))
        .count();
    assert_eq!(txt_files, 2);
}

#[test]
fn test_table_text_not_extracted() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();

    let mut doc = simple_doc(&["Before"]);
    let mut table = Table::new();
    table.add_row(TableRow::from_strings(["cell one", "cell two"]));
    doc.add_table(table);
    doc.add_paragraph(Paragraph::with_text("After"));
    write_docx(&input.path().join("mixed.docx"), &doc);

    let report = extract_directory(input.path(), output.path()).unwrap();
    assert_eq!(report.result.get("mixed.docx"), Some("Before\nAfter"));
}

#[test]
fn test_line_breaks_and_unicode() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_docx(
        &input.path().join("zoë.docx"),
        &simple_doc(&["Zoë Ångström\nSão Paulo", "– résumé –"]),
    );

    let report = extract_directory(input.path(), output.path()).unwrap();
    let text = report.result.get("zoë.docx").unwrap();
    assert_eq!(text, "Zoë Ångström\nSão Paulo\n– résumé –");

    let json = fs::read_to_string(output.path().join("all_documents.json")).unwrap();
    assert!(json.contains("Zoë Ångström"));
    assert!(json.starts_with("{\n  \""));
}

#[test]
fn test_custom_options() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_docx(&input.path().join("a.docx"), &simple_doc(&["A"]));

    let options = ExtractOptions::new()
        .with_aggregate_name("texts.json")
        .with_json_format(JsonFormat::Compact);
    let report = Extractor::new(options)
        .run(input.path(), output.path())
        .unwrap();

    assert_eq!(report.written.len(), 2);
    let json = fs::read_to_string(output.path().join("texts.json")).unwrap();
    assert_eq!(json, r#"{"a.docx":"A"}"#);
}

#[test]
fn test_missing_input_dir_is_error() {
    let dir = tempdir().unwrap();
    let result = extract_directory(dir.path().join("upload"), dir.path().join("out"));
    assert!(matches!(result, Err(cvdoc::Error::Io(_))));
}
