//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

/// A paragraph of text content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content in document order
    pub content: Vec<InlineContent>,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    ///
    /// Embedded `\n` characters become line breaks.
    pub fn with_text(text: impl AsRef<str>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a paragraph holding a single styled run.
    pub fn with_run(run: TextRun) -> Self {
        let mut p = Self::new();
        p.add_run(run);
        p
    }

    /// Create a bulleted list item.
    pub fn bullet(text: impl AsRef<str>, style_id: impl Into<String>) -> Self {
        let mut p = Self::with_text(text);
        p.style.style_id = Some(style_id.into());
        p.style.list_info = Some(ListInfo::bullet(0));
        p
    }

    /// Set the named paragraph style and return self.
    pub fn styled(mut self, style_id: impl Into<String>) -> Self {
        self.style.style_id = Some(style_id.into());
        self
    }

    /// Set alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.style.alignment = alignment;
        self
    }

    /// Set the left indent in points and return self.
    pub fn indent(mut self, points: f32) -> Self {
        self.style.indent_left = Some(points);
        self
    }

    /// Set the line spacing multiplier and return self.
    pub fn line_spacing(mut self, multiplier: f32) -> Self {
        self.style.line_spacing = Some(multiplier);
        self
    }

    /// Add plain text to the paragraph, turning `\n` into line breaks.
    pub fn add_text(&mut self, text: impl AsRef<str>) {
        self.add_styled_text(text.as_ref(), &TextStyle::default());
    }

    /// Add text with a given style, turning `\n` into line breaks.
    pub fn add_styled_text(&mut self, text: &str, style: &TextStyle) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.add_line_break();
            }
            if !line.is_empty() {
                self.content.push(InlineContent::Text(TextRun {
                    text: line.to_string(),
                    style: style.clone(),
                }));
            }
        }
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.content.push(InlineContent::Text(run));
    }

    /// Add a line break.
    pub fn add_line_break(&mut self) {
        self.content.push(InlineContent::LineBreak);
    }

    /// Add a tab.
    pub fn add_tab(&mut self) {
        self.content.push(InlineContent::Tab);
    }

    /// Add a hyperlink.
    pub fn add_link(&mut self, text: impl Into<String>, url: impl Into<String>) {
        self.content.push(InlineContent::Link {
            text: text.into(),
            url: url.into(),
        });
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.as_str(),
                InlineContent::LineBreak => "\n",
                InlineContent::Tab => "\t",
                InlineContent::Link { text, .. } => text.as_str(),
            })
            .collect()
    }

    /// Iterate over the text runs of the paragraph.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.content.iter().filter_map(|c| match c {
            InlineContent::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Iterate over `(text, url)` pairs of the hyperlinks in the paragraph.
    pub fn links(&self) -> impl Iterator<Item = (&str, &str)> {
        self.content.iter().filter_map(|c| match c {
            InlineContent::Link { text, url } => Some((text.as_str(), url.as_str())),
            _ => None,
        })
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() || self.plain_text().trim().is_empty()
    }

    /// Check if this is a list item.
    pub fn is_list_item(&self) -> bool {
        self.style.list_info.is_some()
    }

    /// Check whether every text run is bold (false for paragraphs without runs).
    pub fn is_bold(&self) -> bool {
        let mut runs = self.runs().peekable();
        runs.peek().is_some() && runs.all(|r| r.style.bold)
    }

    /// Check whether every text run is italic (false for paragraphs without runs).
    pub fn is_italic(&self) -> bool {
        let mut runs = self.runs().peekable();
        runs.peek().is_some() && runs.all(|r| r.style.italic)
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run with styling
    Text(TextRun),

    /// A line break
    LineBreak,

    /// A tab character
    Tab,

    /// A hyperlink
    Link {
        /// Link text
        text: String,
        /// Link URL
        url: String,
    },
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                bold: true,
                ..Default::default()
            },
        }
    }

    /// Create a bold and italic text run.
    pub fn bold_italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                bold: true,
                italic: true,
                ..Default::default()
            },
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Font name
    pub font_name: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Text color (hex, e.g. "003366")
    pub color: Option<String>,
}

impl TextStyle {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold
            || self.italic
            || self.underline
            || self.font_name.is_some()
            || self.font_size.is_some()
            || self.color.is_some()
    }
}

/// Paragraph styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Named style id (e.g. "CvSection", "ListBullet")
    pub style_id: Option<String>,

    /// Text alignment
    pub alignment: Alignment,

    /// Left indent in points
    pub indent_left: Option<f32>,

    /// List information if this is a list item
    pub list_info: Option<ListInfo>,

    /// Line spacing multiplier (1.0 = single, 2.0 = double)
    pub line_spacing: Option<f32>,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// WordprocessingML `w:jc` value.
    pub fn as_ooxml(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }

    /// Parse a `w:jc` value; unknown values fall back to left.
    pub fn from_ooxml(value: &str) -> Self {
        match value {
            "center" => Alignment::Center,
            "right" | "end" => Alignment::Right,
            "both" | "distribute" => Alignment::Justify,
            _ => Alignment::Left,
        }
    }
}

/// Information about a bulleted list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Nesting level (0 = top level)
    pub level: u8,

    /// Bullet character
    pub marker: char,
}

impl ListInfo {
    /// Create a new bulleted list item.
    pub fn bullet(level: u8) -> Self {
        Self {
            level,
            marker: '•',
        }
    }
}
