//! Sections, ranked sections and excerpts.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A paragraph-level chunk of section text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionParagraph {
    /// Paragraph text, single-spaced
    pub text: String,
    /// Page the paragraph starts on
    pub page: u32,
}

impl SectionParagraph {
    /// Create a paragraph.
    pub fn new(text: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            page,
        }
    }
}

/// A contiguous region of a document bounded by outline nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Document file name
    pub document: String,
    /// Position of the document in the collection
    pub document_index: usize,
    /// Position of the section within its document
    pub index: usize,
    /// Title taken from the originating outline node
    pub title: String,
    /// First page covered
    pub start_page: u32,
    /// Last page covered
    pub end_page: u32,
    /// Assembled runs covered by this section, heading run included
    pub runs: Range<usize>,
    /// Body paragraphs
    pub paragraphs: Vec<SectionParagraph>,
}

impl Section {
    /// Body text with paragraphs separated by blank lines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the section has no body text.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Individual terms of a section score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Cosine similarity between query and section vectors
    pub cosine: f32,
    /// Share of title tokens that are query terms
    pub title_overlap: f32,
    /// Position prior (negative for boilerplate sections)
    pub positional_prior: f32,
    /// Share of query weight found in the section
    pub keyword_hits: f32,
}

/// A section with its relevance score and rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSection {
    /// The ranked section
    pub section: Section,
    /// Combined score
    pub score: f32,
    /// Score terms before weighting
    pub breakdown: ScoreBreakdown,
    /// 1-based rank, contiguous
    pub rank: usize,
}

/// A trimmed paragraph quoted from a top-ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionExcerpt {
    /// Document file name
    pub document: String,
    /// Trimmed paragraph text
    pub text: String,
    /// Page the paragraph starts on
    pub page: u32,
    /// Paragraph relevance score
    pub score: f32,
    /// Rank of the section the excerpt was taken from
    pub section_rank: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_text_joins_paragraphs() {
        let section = Section {
            document: "guide.pdf".to_string(),
            document_index: 0,
            index: 0,
            title: "Intro".to_string(),
            start_page: 1,
            end_page: 2,
            runs: 0..4,
            paragraphs: vec![
                SectionParagraph::new("First paragraph.", 1),
                SectionParagraph::new("Second paragraph.", 2),
            ],
        };
        assert_eq!(section.text(), "First paragraph.\n\nSecond paragraph.");
        assert!(!section.is_empty());
    }
}
