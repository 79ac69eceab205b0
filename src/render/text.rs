//! Plain text rendering.

use crate::model::Document;

/// Convert a document to plain text: body paragraphs joined with `\n`.
pub fn to_text(doc: &Document) -> String {
    doc.plain_text()
}
