//! Rendering module for converting documents to output formats.

pub mod docx;
mod json;
mod options;
mod text;

pub use docx::{to_docx, DocxWriter};
pub use json::{to_json, JsonFormat};
pub use options::{
    StyleSheet, LIST_STYLE, NAME_STYLE, PAGE_WIDTH_INCHES, POINTS_PER_INCH, SECTION_STYLE,
    TABLE_STYLE,
};
pub use text::to_text;
