//! Outline extraction options.

use crate::error::{Error, Result};

/// How the title is chosen when no run clears the title threshold and no
/// first-page heading was promoted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TitleFallback {
    /// First run of the first page
    #[default]
    FirstLine,
    /// File name without its extension
    FileName,
    /// A fixed caller-provided string
    Fixed(String),
    /// Empty title, no title node
    Untitled,
}

/// Heuristic constants for outline extraction.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// A run is "large" when its size exceeds body size times this ratio
    pub font_ratio: f32,

    /// The title must reach body size times this ratio
    pub title_ratio: f32,

    /// Runs smaller than body size times this ratio are never headings
    pub min_heading_ratio: f32,

    /// Headings must be preceded by median spacing times this ratio
    pub spacing_ratio: f32,

    /// Paragraph break when line distance exceeds median spacing times this ratio
    pub paragraph_gap_ratio: f32,

    /// Longest heading text in characters
    pub max_heading_chars: usize,

    /// Shortest heading text in characters
    pub min_heading_chars: usize,

    /// Runs shorter than this do not count towards the body baseline
    pub min_body_run_chars: usize,

    /// Repeated runs must appear on at least this many pages to be furniture
    pub furniture_min_pages: usize,

    /// ...and on at least this share of the document's pages
    pub furniture_page_ratio: f32,

    /// Vertical tolerance in points when matching repeated runs
    pub furniture_tolerance: f32,

    /// Promote the largest first-page heading to title when no run clears
    /// the title threshold
    pub promote_first_page_heading: bool,

    /// Title fallback policy
    pub title_fallback: TitleFallback,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the large-font ratio.
    pub fn with_font_ratio(mut self, ratio: f32) -> Self {
        self.font_ratio = ratio;
        self
    }

    /// Set the title ratio.
    pub fn with_title_ratio(mut self, ratio: f32) -> Self {
        self.title_ratio = ratio;
        self
    }

    /// Set the spacing ratio.
    pub fn with_spacing_ratio(mut self, ratio: f32) -> Self {
        self.spacing_ratio = ratio;
        self
    }

    /// Set the maximum heading length.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Enable or disable promotion of the largest first-page heading.
    pub fn with_first_page_heading_promotion(mut self, enabled: bool) -> Self {
        self.promote_first_page_heading = enabled;
        self
    }

    /// Set the title fallback policy.
    pub fn with_title_fallback(mut self, fallback: TitleFallback) -> Self {
        self.title_fallback = fallback;
        self
    }

    /// Check that ratios and limits are usable.
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("font_ratio", self.font_ratio),
            ("title_ratio", self.title_ratio),
            ("min_heading_ratio", self.min_heading_ratio),
            ("spacing_ratio", self.spacing_ratio),
            ("paragraph_gap_ratio", self.paragraph_gap_ratio),
            ("furniture_tolerance", self.furniture_tolerance),
        ];
        for (name, value) in ratios {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(0.0..=1.0).contains(&self.furniture_page_ratio) {
            return Err(Error::Config(format!(
                "furniture_page_ratio must be within 0..=1, got {}",
                self.furniture_page_ratio
            )));
        }
        if self.min_heading_chars > self.max_heading_chars {
            return Err(Error::Config(
                "min_heading_chars must not exceed max_heading_chars".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            font_ratio: 1.2,
            title_ratio: 1.3,
            min_heading_ratio: 0.85,
            spacing_ratio: 1.2,
            paragraph_gap_ratio: 1.5,
            max_heading_chars: 120,
            min_heading_chars: 3,
            min_body_run_chars: 4,
            furniture_min_pages: 3,
            furniture_page_ratio: 0.5,
            furniture_tolerance: 2.0,
            promote_first_page_heading: true,
            title_fallback: TitleFallback::FirstLine,
        }
    }
}
