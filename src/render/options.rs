//! Rendering options and configuration.

use crate::error::{Error, Result};

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Width of the letter page every document is laid out on, in inches.
pub const PAGE_WIDTH_INCHES: f32 = 8.5;

/// Style id of the résumé name paragraph.
pub const NAME_STYLE: &str = "CvName";

/// Style id of section header paragraphs.
pub const SECTION_STYLE: &str = "CvSection";

/// Style id of bulleted list paragraphs.
pub const LIST_STYLE: &str = "ListBullet";

/// Style id of the bordered table style.
pub const TABLE_STYLE: &str = "TableGrid";

/// Fonts, sizes, colors and page geometry of generated documents.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    /// Font used by every style
    pub font: String,

    /// Body text size in points
    pub body_size: f32,

    /// Name (title) size in points
    pub name_size: f32,

    /// Name (title) color, hex
    pub name_color: String,

    /// Section header size in points
    pub section_size: f32,

    /// Section header color, hex
    pub section_color: String,

    /// Hyperlink color, hex
    pub link_color: String,

    /// Page margin on every side, in inches
    pub margin_inches: f32,

    /// Number of `_` characters in the rule under section headers
    pub rule_length: usize,

    /// Line spacing multiplier of the rule paragraph
    pub rule_line_spacing: f32,

    /// Left indent of detail lines, in inches
    pub detail_indent_inches: f32,

    /// Author recorded in the document properties
    pub author: String,
}

impl StyleSheet {
    /// Create the default style sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font for every style.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Set the body text size in points.
    pub fn with_body_size(mut self, size: f32) -> Self {
        self.body_size = size;
        self
    }

    /// Set the section header color.
    pub fn with_section_color(mut self, color: impl Into<String>) -> Self {
        self.section_color = color.into();
        self
    }

    /// Set the page margin in inches.
    pub fn with_margin(mut self, inches: f32) -> Self {
        self.margin_inches = inches;
        self
    }

    /// Set the length of the section rule.
    pub fn with_rule_length(mut self, length: usize) -> Self {
        self.rule_length = length;
        self
    }

    /// Set the author recorded in document properties.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Check that the sheet describes a printable page.
    ///
    /// The margin must be finite, non-negative and leave room for text
    /// between the left and right margins. Font sizes must be positive.
    pub fn validate(&self) -> Result<()> {
        let margin = self.margin_inches;
        if !margin.is_finite() || margin < 0.0 {
            return Err(Error::Render(format!(
                "Page margin must be a non-negative number of inches, got {}",
                margin
            )));
        }
        if 2.0 * margin >= PAGE_WIDTH_INCHES {
            return Err(Error::Render(format!(
                "Page margin of {} in leaves no room on a {} in wide page",
                margin, PAGE_WIDTH_INCHES
            )));
        }
        for (label, size) in [
            ("body", self.body_size),
            ("name", self.name_size),
            ("section", self.section_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(Error::Render(format!(
                    "The {} font size must be positive, got {}",
                    label, size
                )));
            }
        }
        Ok(())
    }

    /// Detail line indent in points.
    pub fn detail_indent_points(&self) -> f32 {
        self.detail_indent_inches * POINTS_PER_INCH
    }

    /// The rule printed under each section header.
    pub fn rule(&self) -> String {
        "_".repeat(self.rule_length)
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            font: "Calibri".to_string(),
            body_size: 10.0,
            name_size: 16.0,
            name_color: "000000".to_string(),
            section_size: 12.0,
            section_color: "003366".to_string(),
            link_color: "0000FF".to_string(),
            margin_inches: 0.5,
            rule_length: 120,
            rule_line_spacing: 0.1,
            detail_indent_inches: 0.2,
            author: "cvdoc".to_string(),
        }
    }
}

/// Convert points to twentieths of a point.
pub(crate) fn twips(points: f32) -> i64 {
    (points * 20.0).round() as i64
}

/// Convert points to half-points (font sizes).
pub(crate) fn half_points(points: f32) -> i64 {
    (points * 2.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_sheet() {
        let styles = StyleSheet::default();
        assert_eq!(styles.font, "Calibri");
        assert_eq!(styles.section_color, "003366");
        assert_eq!(styles.rule().len(), 120);
        assert!((styles.detail_indent_points() - 14.4).abs() < 1e-4);
    }

    #[test]
    fn test_style_sheet_builder() {
        let styles = StyleSheet::new()
            .with_font("Arial")
            .with_body_size(11.0)
            .with_margin(1.0)
            .with_rule_length(10)
            .with_author("Jane");

        assert_eq!(styles.font, "Arial");
        assert_eq!(styles.body_size, 11.0);
        assert_eq!(styles.margin_inches, 1.0);
        assert_eq!(styles.rule(), "__________");
        assert_eq!(styles.author, "Jane");
    }

    #[test]
    fn test_validate_margins() {
        assert!(StyleSheet::default().validate().is_ok());
        assert!(StyleSheet::new().with_margin(0.0).validate().is_ok());
        assert!(StyleSheet::new().with_margin(4.0).validate().is_ok());

        for margin in [-0.5, 4.25, 10.0, f32::NAN, f32::INFINITY] {
            let result = StyleSheet::new().with_margin(margin).validate();
            assert!(matches!(result, Err(Error::Render(_))), "margin {}", margin);
        }
    }

    #[test]
    fn test_validate_font_sizes() {
        let result = StyleSheet::new().with_body_size(0.0).validate();
        assert!(matches!(result, Err(Error::Render(msg)) if msg.contains("body")));
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(twips(36.0), 720);
        assert_eq!(twips(14.4), 288);
        assert_eq!(half_points(10.0), 20);
        assert_eq!(half_points(16.0), 32);
    }
}
