//! Markdown résumés to styled `.docx` files.

use super::{collect_inputs, OutputNames};
use crate::cv::{CvRenderer, MarkdownCv};
use crate::error::Result;
use crate::model::Document;
use crate::render::{to_docx, StyleSheet};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for the formatting pipeline.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Input file extension, matched case-insensitively
    pub input_extension: String,

    /// Extension of the generated documents
    pub output_extension: String,

    /// Fonts, colors and geometry of the generated documents
    pub styles: StyleSheet,
}

impl FormatOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input file extension.
    pub fn with_input_extension(mut self, ext: impl Into<String>) -> Self {
        self.input_extension = ext.into();
        self
    }

    /// Set the output file extension.
    pub fn with_output_extension(mut self, ext: impl Into<String>) -> Self {
        self.output_extension = ext.into();
        self
    }

    /// Set the style sheet.
    pub fn with_styles(mut self, styles: StyleSheet) -> Self {
        self.styles = styles;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            input_extension: "md".to_string(),
            output_extension: "docx".to_string(),
            styles: StyleSheet::default(),
        }
    }
}

/// Outcome of a formatting run.
#[derive(Debug, Clone, Default)]
pub struct FormatReport {
    /// `(input, output)` pairs in processing order
    pub converted: Vec<(PathBuf, PathBuf)>,
}

impl FormatReport {
    /// Number of documents written.
    pub fn len(&self) -> usize {
        self.converted.len()
    }

    /// Check whether nothing was converted.
    pub fn is_empty(&self) -> bool {
        self.converted.is_empty()
    }

    /// Paths of the generated documents.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.converted.iter().map(|(_, out)| out.as_path())
    }
}

/// Batch résumé formatter.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    /// Create a formatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Parse and lay out markdown without serializing it.
    pub fn render(&self, markdown: &str) -> Document {
        let cv = MarkdownCv::parse(markdown);
        CvRenderer::new(self.options.styles.clone()).render(&cv)
    }

    /// Convert markdown text to `.docx` bytes.
    pub fn format_markdown(&self, markdown: &str) -> Result<Vec<u8>> {
        to_docx(&self.render(markdown), &self.options.styles)
    }

    /// Convert one markdown file, writing the output once it is complete.
    pub fn format_file(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let markdown = fs::read_to_string(input)?;
        let bytes = self.format_markdown(&markdown)?;
        fs::write(output, bytes)?;
        log::info!("Formatted {} -> {}", input.display(), output.display());
        Ok(())
    }

    /// Input files the formatter would process, sorted by name.
    pub fn inputs(&self, input_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        collect_inputs(input_dir.as_ref(), &self.options.input_extension)
    }

    /// Convert every matching file in `input_dir` into `output_dir`.
    pub fn run(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<FormatReport> {
        self.run_with_progress(input_dir, output_dir, |_| {})
    }

    /// Like [`Formatter::run`], calling `progress` after each input.
    pub fn run_with_progress<F>(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        mut progress: F,
    ) -> Result<FormatReport>
    where
        F: FnMut(&Path),
    {
        self.options.styles.validate()?;
        let output_dir = output_dir.as_ref();
        let inputs = self.inputs(input_dir)?;
        fs::create_dir_all(output_dir)?;

        let mut report = FormatReport::default();
        let mut names = OutputNames::new();
        for input in inputs {
            let output = names.allocate(output_dir, &input, &self.options.output_extension);
            self.format_file(&input, &output)?;
            progress(&input);
            report.converted.push((input, output));
        }

        Ok(report)
    }
}
