//! Markdown résumé model, parser and renderer.
//!
//! A résumé is written in a small markdown subset:
//!
//! ```text
//! # Jane Doe
//! 555-1234
//! jane@example.com
//! linkedin.com/in/janedoe
//! City, Country
//! ## EDUCATION
//! ### MIT
//! **BSc Computer Science**
//! - Graduated 2020
//! ```
//!
//! [`MarkdownCv::parse`] splits the text into the name, the contact block and
//! the `## ` sections. [`CvRenderer`] lays them out as a styled [`Document`]
//! that [`crate::render::to_docx`] turns into a `.docx` package.
//!
//! [`Document`]: crate::model::Document

mod parser;
mod render;

pub use parser::{ContactCells, MarkdownCv, Section, SectionKind};
pub use render::CvRenderer;
