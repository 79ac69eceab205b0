//! DOCX format detection and validation.

use crate::error::{Error, Result};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use zip::ZipArchive;

/// Name of the main document part inside a DOCX package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Name of the core properties part.
pub const CORE_PART: &str = "docProps/core.xml";

/// Name of the main document relationships part.
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Zip local file header magic bytes: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// DOCX package information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Number of parts (files) in the package
    pub part_count: usize,
    /// Whether `docProps/core.xml` is present
    pub has_core_properties: bool,
    /// Whether the main document has a relationships part
    pub has_relationships: bool,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DOCX ({} parts)", self.part_count)
    }
}

/// Check whether bytes start with a zip local file header.
pub fn is_zip_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

/// Detect DOCX format from a file path.
///
/// # Example
/// ```no_run
/// use cvdoc::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("resume.docx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let data = fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect DOCX format from bytes.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data is a zip container holding `word/document.xml`
/// * `Err(Error::UnknownFormat)` if the data is not a zip container
/// * `Err(Error::MissingPart)` if the container has no main document part
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !is_zip_bytes(data) {
        return Err(Error::UnknownFormat);
    }

    let archive = ZipArchive::new(Cursor::new(data))?;
    let names: Vec<&str> = archive.file_names().collect();

    if !names.contains(&DOCUMENT_PART) {
        return Err(Error::MissingPart(DOCUMENT_PART.to_string()));
    }

    Ok(DocxFormat {
        part_count: names.len(),
        has_core_properties: names.contains(&CORE_PART),
        has_relationships: names.contains(&DOCUMENT_RELS_PART),
    })
}

/// Check if a file is a readable DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes represent a readable DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
