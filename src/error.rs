//! Error types for cvdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for cvdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading or writing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The zip container could not be read or written.
    #[error("Zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed XML inside a package part.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file format is not recognized as a DOCX (zip) container.
    #[error("Unknown file format: not a valid DOCX container")]
    UnknownFormat,

    /// A required package part is missing from the container.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// Error while producing output.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
