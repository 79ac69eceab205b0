//! Aggregate record of an extraction batch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filename → extracted text (or the failure message that replaced it).
///
/// Keys are kept sorted so serialized output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    entries: BTreeMap<String, String>,
}

impl ExtractionResult {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the text for a filename, replacing any earlier entry.
    pub fn insert(&mut self, filename: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(filename.into(), text.into());
    }

    /// Text recorded for a filename.
    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries.get(filename).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the record is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(filename, text)` in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_sorted() {
        let mut result = ExtractionResult::new();
        result.insert("b.docx", "second");
        result.insert("a.docx", "first");

        let names: Vec<_> = result.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a.docx", "b.docx"]);
        assert_eq!(result.get("a.docx"), Some("first"));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let result: ExtractionResult = vec![("cv.docx".to_string(), "Jane".to_string())]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"cv.docx":"Jane"}"#);

        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
