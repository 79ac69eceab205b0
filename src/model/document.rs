//! Document-level types.

use super::{Paragraph, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A word-processing document: metadata plus an ordered list of blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Content blocks in document order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the document.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Add a paragraph to the document.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Add a table to the document.
    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over the top-level paragraphs, skipping tables.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Iterate over the top-level tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Get the plain text of the document body.
    ///
    /// Top-level paragraphs are joined with `\n`, in document order. Table
    /// contents are not part of the body text.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A content block in the document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),
}

/// Document metadata, stored in the package's core properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableRow;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_plain_text_joins_paragraphs() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("First"));
        doc.add_paragraph(Paragraph::new());
        doc.add_paragraph(Paragraph::with_text("Third"));

        assert_eq!(doc.plain_text(), "First\n\nThird");
    }

    #[test]
    fn test_plain_text_skips_tables() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("Body"));
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["cell"]));
        doc.add_table(table);

        assert_eq!(doc.plain_text(), "Body");
        assert_eq!(doc.tables().count(), 1);
        assert_eq!(doc.paragraphs().count(), 1);
    }

    #[test]
    fn test_metadata_with_title() {
        let metadata = Metadata::with_title("Jane Doe");
        assert_eq!(metadata.title.as_deref(), Some("Jane Doe"));
        assert!(metadata.author.is_none());
    }
}
