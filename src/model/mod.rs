//! Document model types.
//!
//! This module defines the intermediate representation shared by the DOCX
//! reader, the DOCX writer and the résumé renderer. It mirrors the parts of
//! WordprocessingML the crate reads and writes: paragraphs with styled runs,
//! line breaks and hyperlinks, and tables of paragraphs.

mod builder;
mod document;
mod extraction;
mod paragraph;
mod table;

pub use builder::DocumentBuilder;
pub use document::{Block, Document, Metadata};
pub use extraction::ExtractionResult;
pub use paragraph::{
    Alignment, InlineContent, ListInfo, Paragraph, ParagraphStyle, TextRun, TextStyle,
};
pub use table::{BorderStyle, CellBorders, Table, TableCell, TableRow};
