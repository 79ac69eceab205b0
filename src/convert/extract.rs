//! Text extraction from a directory of `.docx` files.

use super::{collect_inputs, file_name, OutputNames};
use crate::error::Result;
use crate::model::ExtractionResult;
use crate::parser::DocxParser;
use crate::render::{to_json, to_text, JsonFormat};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Input file extension, matched case-insensitively
    pub extension: String,

    /// File name of the aggregate JSON record
    pub aggregate_name: String,

    /// Formatting of the aggregate JSON record
    pub json_format: JsonFormat,
}

impl ExtractOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input file extension.
    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = ext.into();
        self
    }

    /// Set the aggregate record file name.
    pub fn with_aggregate_name(mut self, name: impl Into<String>) -> Self {
        self.aggregate_name = name.into();
        self
    }

    /// Set the aggregate JSON format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            extension: "docx".to_string(),
            aggregate_name: "all_documents.json".to_string(),
            json_format: JsonFormat::Pretty,
        }
    }
}

/// Outcome of an extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Filename → text for every input
    pub result: ExtractionResult,

    /// Filenames whose text was replaced by a failure message, in input order
    pub failed: Vec<String>,

    /// Files written, per-document outputs first, aggregate last
    pub written: Vec<PathBuf>,
}

impl ExtractionReport {
    /// Number of inputs extracted without error.
    pub fn succeeded(&self) -> usize {
        self.result.len() - self.failures()
    }

    /// Number of inputs whose extraction failed.
    pub fn failures(&self) -> usize {
        self.failed.len()
    }

    /// Whether extraction of `name` failed.
    pub fn is_failed(&self, name: &str) -> bool {
        self.failed.iter().any(|f| f == name)
    }

    /// Path of the aggregate record.
    pub fn aggregate_path(&self) -> Option<&Path> {
        self.written.last().map(PathBuf::as_path)
    }
}

/// Batch text extractor.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Input files the extractor would process, sorted by name.
    pub fn inputs(&self, input_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        collect_inputs(input_dir.as_ref(), &self.options.extension)
    }

    /// Extract the body text of one document.
    pub fn extract_text(&self, path: impl AsRef<Path>) -> Result<String> {
        let doc = DocxParser::open(path)?.parse()?;
        Ok(to_text(&doc))
    }

    /// Extract the text of one document, substituting a failure message.
    ///
    /// Returns the text and whether extraction failed.
    pub fn extract_or_message(&self, path: &Path) -> (String, bool) {
        match self.extract_text(path) {
            Ok(text) => (text, false),
            Err(e) => {
                log::warn!("Failed to extract {}: {}", path.display(), e);
                (
                    format!("Error extracting text from {}: {}", path.display(), e),
                    true,
                )
            }
        }
    }

    /// Extract every matching file in `input_dir` into `output_dir`.
    pub fn run(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<ExtractionReport> {
        self.run_with_progress(input_dir, output_dir, |_| {})
    }

    /// Like [`Extractor::run`], calling `progress` after each input.
    pub fn run_with_progress<F>(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        mut progress: F,
    ) -> Result<ExtractionReport>
    where
        F: FnMut(&Path),
    {
        let output_dir = output_dir.as_ref();
        let inputs = self.inputs(input_dir)?;
        fs::create_dir_all(output_dir)?;
        log::info!(
            "Extracting {} documents into {}",
            inputs.len(),
            output_dir.display()
        );

        let mut report = ExtractionReport::default();
        let mut entries = Vec::with_capacity(inputs.len());
        let mut names = OutputNames::new();

        for input in &inputs {
            let name = file_name(input);
            let (text, failed) = self.extract_or_message(input);
            if failed {
                report.failed.push(name.clone());
            }

            let txt_path = names.allocate(output_dir, input, "txt");
            fs::write(&txt_path, &text)?;
            log::debug!("Wrote {}", txt_path.display());
            report.written.push(txt_path);

            entries.push((name, text));
            progress(input);
        }

        report.result = entries.into_iter().collect();

        let json = to_json(&report.result, self.options.json_format)?;
        let json_path = output_dir.join(&self.options.aggregate_name);
        fs::write(&json_path, json)?;
        report.written.push(json_path);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, Paragraph};
    use crate::render::{to_docx, StyleSheet};
    use tempfile::tempdir;

    fn write_docx(path: &Path, lines: &[&str]) {
        let mut doc = Document::new();
        for line in lines {
            doc.add_paragraph(Paragraph::with_text(line));
        }
        fs::write(path, to_docx(&doc, &StyleSheet::default()).unwrap()).unwrap();
    }

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new()
            .with_extension("DOCX")
            .with_aggregate_name("texts.json")
            .with_json_format(JsonFormat::Compact);

        assert_eq!(options.extension, "DOCX");
        assert_eq!(options.aggregate_name, "texts.json");
        assert_eq!(options.json_format, JsonFormat::Compact);
    }

    #[test]
    fn test_extract_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cv.docx");
        write_docx(&path, &["Jane Doe", "Engineer"]);

        let text = Extractor::default().extract_text(&path).unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");
    }

    #[test]
    fn test_extract_or_message_on_bad_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        fs::write(&path, b"not a zip").unwrap();

        let (text, failed) = Extractor::default().extract_or_message(&path);
        assert!(failed);
        assert!(text.starts_with("Error extracting text from "));
        assert!(text.contains("broken.docx"));
    }

    #[test]
    fn test_run() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_docx(&input.path().join("b.docx"), &["Second"]);
        write_docx(&input.path().join("A.DOCX"), &["First", "Line"]);
        fs::write(input.path().join("bad.docx"), b"garbage").unwrap();
        fs::write(input.path().join("notes.txt"), b"ignored").unwrap();

        let out_dir = output.path().join("analysis");
        let report = Extractor::default().run(input.path(), &out_dir).unwrap();

        assert_eq!(report.result.len(), 3);
        assert_eq!(report.failures(), 1);
        assert_eq!(report.failed, vec!["bad.docx"]);
        assert!(report.is_failed("bad.docx"));
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.written.len(), 4);
        assert_eq!(report.result.get("A.DOCX"), Some("First\nLine"));
        assert_eq!(
            report.aggregate_path(),
            Some(out_dir.join("all_documents.json").as_path())
        );

        for (name, text) in report.result.iter() {
            let stem = Path::new(name).file_stem().unwrap();
            let txt = out_dir.join(stem).with_extension("txt");
            assert_eq!(fs::read_to_string(txt).unwrap(), text);
        }
        assert!(!out_dir.join("notes.txt").exists());
    }

    #[test]
    fn test_run_empty_dir() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();

        let report = Extractor::default().run(input.path(), output.path()).unwrap();
        assert!(report.result.is_empty());

        let json = fs::read_to_string(output.path().join("all_documents.json")).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_run_reports_progress() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_docx(&input.path().join("a.docx"), &["x"]);
        write_docx(&input.path().join("b.docx"), &["y"]);

        let mut seen = Vec::new();
        Extractor::default()
            .run_with_progress(input.path(), output.path(), |p| seen.push(file_name(p)))
            .unwrap();
        assert_eq!(seen, vec!["a.docx", "b.docx"]);
    }
}
