//! Incremental document construction.

use super::{Block, Document, Metadata, Paragraph, Table, TextRun};

/// Accumulates blocks in order and hands over the finished [`Document`].
///
/// Nothing is written anywhere until [`DocumentBuilder::build`] returns, so
/// a document is either complete or absent.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    metadata: Metadata,
    blocks: Vec<Block>,
}

impl DocumentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document metadata.
    pub fn metadata(&mut self, metadata: Metadata) -> &mut Self {
        self.metadata = metadata;
        self
    }

    /// Append a paragraph.
    pub fn paragraph(&mut self, paragraph: Paragraph) -> &mut Self {
        self.blocks.push(Block::Paragraph(paragraph));
        self
    }

    /// Append a plain text paragraph.
    pub fn text(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.paragraph(Paragraph::with_text(text))
    }

    /// Append a paragraph holding one bold run.
    pub fn bold(&mut self, text: impl Into<String>) -> &mut Self {
        self.paragraph(Paragraph::with_run(TextRun::bold(text)))
    }

    /// Append an empty paragraph.
    pub fn blank(&mut self) -> &mut Self {
        self.paragraph(Paragraph::new())
    }

    /// Append a table.
    pub fn table(&mut self, table: Table) -> &mut Self {
        self.blocks.push(Block::Table(table));
        self
    }

    /// Number of blocks added so far.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check whether no blocks were added.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Finish and return the document.
    pub fn build(self) -> Document {
        Document {
            metadata: self.metadata,
            blocks: self.blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let mut builder = DocumentBuilder::new();
        builder
            .metadata(Metadata::with_title("Jane Doe"))
            .bold("MIT")
            .text("plain")
            .table(Table::grid(1, 3))
            .blank();

        assert_eq!(builder.len(), 4);
        let doc = builder.build();
        assert_eq!(doc.metadata.title.as_deref(), Some("Jane Doe"));
        assert!(matches!(doc.blocks[0], Block::Paragraph(ref p) if p.is_bold()));
        assert!(matches!(doc.blocks[2], Block::Table(_)));
        assert_eq!(doc.plain_text(), "MIT\nplain\n");
    }

    #[test]
    fn test_empty_builder() {
        let builder = DocumentBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.build().is_empty());
    }
}
