//! Structural parsing of markdown résumés.

use serde::{Deserialize, Serialize};

const TITLE_PREFIX: &str = "# ";
const SECTION_PREFIX: &str = "## ";
const LINKEDIN_HOST: &str = "linkedin.com/";
const LINKEDIN_BASE: &str = "https://www.linkedin.com/";

/// A résumé split into its structural parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownCv {
    /// Candidate name from the first line
    pub name: String,

    /// Trimmed, non-blank lines between the name and the first section
    pub contact: Vec<String>,

    /// Sections in document order
    pub sections: Vec<Section>,
}

impl MarkdownCv {
    /// Parse markdown text.
    ///
    /// Never fails: missing pieces come out empty.
    pub fn parse(markdown: &str) -> Self {
        let mut chunks: Vec<Vec<&str>> = vec![Vec::new()];
        for line in markdown.lines() {
            if line.starts_with(SECTION_PREFIX) {
                chunks.push(vec![line]);
            } else if let Some(chunk) = chunks.last_mut() {
                chunk.push(line);
            }
        }

        let mut chunks = chunks.into_iter();
        let head = chunks.next().unwrap_or_default();

        let mut lines = head.into_iter();
        let name = lines
            .next()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix(TITLE_PREFIX).unwrap_or(line).trim().to_string()
            })
            .unwrap_or_default();
        let contact = lines
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        let sections = chunks.filter_map(Section::from_chunk).collect();

        Self {
            name,
            contact,
            sections,
        }
    }

    /// Distribute the contact lines over the three header cells.
    pub fn contact_cells(&self) -> ContactCells {
        let line = |i: usize| self.contact.get(i).map(String::as_str);

        let first = self
            .contact
            .iter()
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        let second = line(2).unwrap_or_default().to_string();
        let third = self
            .contact
            .iter()
            .skip(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");

        ContactCells {
            first,
            second,
            third,
        }
    }
}

/// Text of the three contact header cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactCells {
    /// First two contact lines, newline-separated
    pub first: String,

    /// Third contact line
    pub second: String,

    /// Remaining contact lines, newline-separated
    pub third: String,
}

impl ContactCells {
    /// LinkedIn URL for the second cell, if it mentions a profile path.
    ///
    /// The path after the first `linkedin.com/` is appended to the canonical
    /// host as-is.
    pub fn linkedin_url(&self) -> Option<String> {
        self.second
            .split_once(LINKEDIN_HOST)
            .map(|(_, path)| format!("{}{}", LINKEDIN_BASE, path))
    }
}

/// A `## ` section: its heading and the text below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text, case preserved
    pub title: String,

    /// Trimmed body text
    pub body: String,
}

impl Section {
    /// Create a section.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    fn from_chunk(chunk: Vec<&str>) -> Option<Self> {
        let (&heading, rest) = chunk.split_first()?;
        let title = heading
            .strip_prefix(SECTION_PREFIX)
            .unwrap_or(heading)
            .trim();
        let body = rest.join("\n");
        let body = body.trim();

        if title.is_empty() && body.is_empty() {
            return None;
        }
        Some(Self::new(title, body))
    }

    /// Rendering kind selected by the title.
    pub fn kind(&self) -> SectionKind {
        SectionKind::from_title(&self.title)
    }

    /// Title as printed in the section header.
    pub fn display_title(&self) -> String {
        self.title.to_uppercase()
    }

    /// Body lines, trimmed.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines().map(str::trim)
    }
}

/// Known résumé sections, matched exactly and case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    ProfessionalExperience,
    CoreCompetencies,
    Education,
    TechnicalSkills,
    ProfessionalDevelopment,
    /// Any other title
    Other,
}

impl SectionKind {
    /// Classify a section title.
    pub fn from_title(title: &str) -> Self {
        match title {
            "PROFESSIONAL EXPERIENCE" => SectionKind::ProfessionalExperience,
            "CORE COMPETENCIES" => SectionKind::CoreCompetencies,
            "EDUCATION" => SectionKind::Education,
            "TECHNICAL SKILLS" => SectionKind::TechnicalSkills,
            "PROFESSIONAL DEVELOPMENT" => SectionKind::ProfessionalDevelopment,
            _ => SectionKind::Other,
        }
    }

    /// Whether the section uses the heading/detail/bullet line layout.
    pub fn is_detail_list(self) -> bool {
        matches!(
            self,
            SectionKind::Education
                | SectionKind::TechnicalSkills
                | SectionKind::ProfessionalDevelopment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JANE: &str = "# Jane Doe\n555-1234\njane@example.com\nlinkedin.com/in/janedoe\nCity, Country\n## EDUCATION\n### MIT\n**BSc Computer Science**\n- Graduated 2020\n";

    #[test]
    fn test_parse_head_and_sections() {
        let cv = MarkdownCv::parse(JANE);

        assert_eq!(cv.name, "Jane Doe");
        assert_eq!(
            cv.contact,
            vec![
                "555-1234",
                "jane@example.com",
                "linkedin.com/in/janedoe",
                "City, Country"
            ]
        );
        assert_eq!(cv.sections.len(), 1);
        assert_eq!(cv.sections[0].title, "EDUCATION");
        assert_eq!(
            cv.sections[0].body,
            "### MIT\n**BSc Computer Science**\n- Graduated 2020"
        );
    }

    #[test]
    fn test_level_three_headings_stay_in_section() {
        let cv = MarkdownCv::parse("# A\n## PROFESSIONAL EXPERIENCE\n### Acme\n- Built\n### Beta\n- Led\n");
        assert_eq!(cv.sections.len(), 1);
        assert_eq!(cv.sections[0].lines().filter(|l| l.starts_with("### ")).count(), 2);
    }

    #[test]
    fn test_contact_skips_blank_lines() {
        let cv = MarkdownCv::parse("# Jane\n\n  555-1234  \n\n\n## SKILLS\nRust");
        assert_eq!(cv.contact, vec!["555-1234"]);
    }

    #[test]
    fn test_name_without_marker() {
        let cv = MarkdownCv::parse("Jane Doe\nphone");
        assert_eq!(cv.name, "Jane Doe");
        assert!(cv.sections.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let cv = MarkdownCv::parse("");
        assert_eq!(cv, MarkdownCv::default());
        assert_eq!(cv.contact_cells(), ContactCells::default());
    }

    #[test]
    fn test_blank_section_skipped() {
        let cv = MarkdownCv::parse("# A\n## \n\n## EDUCATION\nx");
        assert_eq!(cv.sections.len(), 1);
        assert_eq!(cv.sections[0].title, "EDUCATION");
    }

    #[test]
    fn test_section_title_case_preserved() {
        let cv = MarkdownCv::parse("# A\n## Education\n- x");
        let section = &cv.sections[0];
        assert_eq!(section.title, "Education");
        assert_eq!(section.kind(), SectionKind::Other);
        assert_eq!(section.display_title(), "EDUCATION");
    }

    #[test]
    fn test_contact_cells() {
        let cells = MarkdownCv::parse(JANE).contact_cells();
        assert_eq!(cells.first, "555-1234\njane@example.com");
        assert_eq!(cells.second, "linkedin.com/in/janedoe");
        assert_eq!(cells.third, "City, Country");
        assert_eq!(
            cells.linkedin_url().as_deref(),
            Some("https://www.linkedin.com/in/janedoe")
        );
    }

    #[test]
    fn test_contact_cells_short_block() {
        let cells = MarkdownCv::parse("# A\n555-1234").contact_cells();
        assert_eq!(cells.first, "555-1234");
        assert!(cells.second.is_empty());
        assert!(cells.third.is_empty());
        assert!(cells.linkedin_url().is_none());
    }

    #[test]
    fn test_linkedin_url_from_full_address() {
        let cells = ContactCells {
            second: "https://www.linkedin.com/in/jane-doe/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            cells.linkedin_url().as_deref(),
            Some("https://www.linkedin.com/in/jane-doe/")
        );
    }

    #[test]
    fn test_section_kind_exact_match() {
        assert_eq!(
            SectionKind::from_title("PROFESSIONAL EXPERIENCE"),
            SectionKind::ProfessionalExperience
        );
        assert_eq!(
            SectionKind::from_title("CORE COMPETENCIES"),
            SectionKind::CoreCompetencies
        );
        assert_eq!(SectionKind::from_title("EDUCATION "), SectionKind::Other);
        assert_eq!(SectionKind::from_title("Core Competencies"), SectionKind::Other);
        assert!(SectionKind::TechnicalSkills.is_detail_list());
        assert!(!SectionKind::CoreCompetencies.is_detail_list());
    }
}
