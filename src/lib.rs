//! # cvdoc
//!
//! Word document tooling for résumé pipelines.
//!
//! The crate reads and writes `.docx` packages and runs two batch
//! pipelines on top of them:
//!
//! - **Extraction**: a directory of `.docx` files becomes one `.txt` per
//!   document plus a JSON record mapping each filename to its text.
//! - **Formatting**: markdown résumés become consistently styled `.docx`
//!   files with a name line, a contact table and typed sections.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> cvdoc::Result<()> {
//!     // Plain text of one document
//!     let text = cvdoc::extract_text("upload/jane.docx")?;
//!     println!("{}", text);
//!
//!     // Markdown résumé to a styled document
//!     cvdoc::format_file("final_cvs/jane.md", "final_cvs/docx/jane.docx")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **DOCX reading**: paragraphs, run styles, tables, hyperlinks, core properties
//! - **DOCX writing**: styles, bullet numbering, bordered tables, external links
//! - **Batch pipelines**: per-file failures in extraction never stop a run

pub mod convert;
pub mod cv;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    ExtractOptions, ExtractionReport, Extractor, FormatOptions, FormatReport, Formatter,
};
pub use cv::{CvRenderer, MarkdownCv, Section, SectionKind};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat};
pub use error::{Error, Result};
pub use model::{
    Alignment, Block, Document, DocumentBuilder, ExtractionResult, InlineContent, ListInfo,
    Metadata, Paragraph, ParagraphStyle, Table, TableCell, TableRow, TextRun, TextStyle,
};
pub use parser::DocxParser;
pub use render::{JsonFormat, StyleSheet};

use std::io::Read;
use std::path::Path;

/// Parse a DOCX file and return a structured document.
///
/// # Example
///
/// ```no_run
/// use cvdoc::parse_file;
///
/// let doc = parse_file("cv.docx").unwrap();
/// println!("Paragraphs: {}", doc.paragraphs().count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    DocxParser::open(path)?.parse()
}

/// Parse a DOCX package from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    DocxParser::from_bytes(data)?.parse()
}

/// Parse a DOCX package from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    DocxParser::from_reader(reader)?.parse()
}

/// Extract the body text of a DOCX file.
///
/// Body paragraphs are joined with `\n`; table and text box content is not
/// included.
///
/// # Example
///
/// ```no_run
/// use cvdoc::extract_text;
///
/// let text = extract_text("cv.docx").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(render::to_text(&doc))
}

/// Extract every `.docx` file in `input_dir` into `output_dir` with default
/// options.
pub fn extract_directory<P, Q>(input_dir: P, output_dir: Q) -> Result<ExtractionReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Extractor::default().run(input_dir, output_dir)
}

/// Convert a markdown résumé to `.docx` bytes with the default style sheet.
///
/// # Example
///
/// ```no_run
/// let bytes = cvdoc::format_markdown("# Jane Doe\n555-1234\n## EDUCATION\n### MIT\n").unwrap();
/// std::fs::write("jane.docx", bytes).unwrap();
/// ```
pub fn format_markdown(markdown: &str) -> Result<Vec<u8>> {
    Formatter::default().format_markdown(markdown)
}

/// Convert one markdown résumé file to a `.docx` file.
pub fn format_file<P, Q>(input: P, output: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Formatter::default().format_file(input, output)
}

/// Convert every `.md` file in `input_dir` into `output_dir` with default
/// options.
pub fn format_directory<P, Q>(input_dir: P, output_dir: Q) -> Result<FormatReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Formatter::default().run(input_dir, output_dir)
}
