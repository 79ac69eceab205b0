//! Table types.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// A table structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Named table style id (e.g. "TableGrid")
    pub style_id: Option<String>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table of `rows` x `cols` empty cells.
    pub fn grid(rows: usize, cols: usize) -> Self {
        Self {
            rows: (0..rows)
                .map(|_| TableRow::new((0..cols).map(|_| TableCell::empty()).collect()))
                .collect(),
            style_id: None,
        }
    }

    /// Set the named table style and return self.
    pub fn styled(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell by row and column.
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Get a mutable cell by row and column.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row).and_then(|r| r.cells.get_mut(col))
    }

    /// Iterate over all cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.rows.iter().flat_map(|r| &r.cells)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content (paragraphs)
    pub content: Vec<Paragraph>,

    /// Per-cell border overrides
    pub borders: Option<CellBorders>,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl AsRef<str>) -> Self {
        Self::with_content(vec![Paragraph::with_text(text)])
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a cell with multiple paragraphs.
    pub fn with_content(content: Vec<Paragraph>) -> Self {
        Self {
            content,
            borders: None,
        }
    }

    /// Set borders and return self.
    pub fn with_borders(mut self, borders: CellBorders) -> Self {
        self.borders = Some(borders);
        self
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() || self.plain_text().trim().is_empty()
    }
}

/// Border line style for a cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// A single solid line
    Single,
    /// No border
    Nil,
}

impl BorderStyle {
    /// WordprocessingML `w:val` value.
    pub fn as_ooxml(self) -> &'static str {
        match self {
            BorderStyle::Single => "single",
            BorderStyle::Nil => "nil",
        }
    }
}

/// Borders on the four edges of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBorders {
    pub top: BorderStyle,
    pub bottom: BorderStyle,
    pub left: BorderStyle,
    pub right: BorderStyle,
}

impl CellBorders {
    /// The same style on every edge.
    pub fn all(style: BorderStyle) -> Self {
        Self {
            top: style,
            bottom: style,
            left: style,
            right: style,
        }
    }

    /// Iterate over `(edge element name, style)` in schema order.
    pub fn edges(&self) -> [(&'static str, BorderStyle); 4] {
        [
            ("w:top", self.top),
            ("w:left", self.left),
            ("w:bottom", self.bottom),
            ("w:right", self.right),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_new() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_table_grid() {
        let mut table = Table::grid(3, 3).styled("TableGrid");
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert!(table.cells().all(TableCell::is_empty));

        table.cell_mut(2, 0).unwrap().content = vec![Paragraph::with_text("• Rust")];
        assert_eq!(table.cell(2, 0).unwrap().plain_text(), "• Rust");
        assert!(table.cell(3, 0).is_none());
    }

    #[test]
    fn test_table_with_data() {
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["Alice", "30"]));
        table.add_row(TableRow::from_strings(["Bob", "25"]));

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.plain_text(), "Alice\t30\nBob\t25");
    }

    #[test]
    fn test_cell_borders() {
        let cell = TableCell::text("x").with_borders(CellBorders::all(BorderStyle::Nil));
        let borders = cell.borders.unwrap();
        assert!(borders.edges().iter().all(|(_, s)| *s == BorderStyle::Nil));
        assert_eq!(BorderStyle::Single.as_ooxml(), "single");
    }
}
