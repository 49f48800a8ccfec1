//! Typed text runs handed over by the PDF-extraction collaborator.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page coordinates.
///
/// The origin is the top-left corner of the page and `y` grows downward,
/// so `y0` is the top edge of the run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A run of text sharing one font, as produced by the extraction library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Page number (1-indexed)
    pub page: u32,
    /// Position on the page
    #[serde(default)]
    pub bbox: BoundingBox,
    /// Font family name (e.g., "Helvetica-Bold")
    #[serde(default)]
    pub font_family: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the run is set in a bold face
    #[serde(default)]
    pub bold: bool,
    /// Raw text content
    pub text: String,
}

impl TextRun {
    /// Create a regular-weight run with an empty bounding box.
    pub fn new(page: u32, text: impl Into<String>, font_size: f32) -> Self {
        Self {
            page,
            bbox: BoundingBox::default(),
            font_family: String::new(),
            font_size,
            bold: false,
            text: text.into(),
        }
    }

    /// Create a run whose bold flag is inferred from the font name.
    pub fn from_font_name(
        page: u32,
        text: impl Into<String>,
        font_size: f32,
        font_family: impl Into<String>,
    ) -> Self {
        let font_family = font_family.into();
        let bold = is_bold_font_name(&font_family);
        Self {
            page,
            bbox: BoundingBox::default(),
            font_family,
            font_size,
            bold,
            text: text.into(),
        }
    }

    /// Set the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Place the run at `(x, y)` with a box sized from the text and font size.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        let width = self.text.chars().count() as f32 * self.font_size * 0.5;
        self.bbox = BoundingBox::new(x, y, x + width, y + self.font_size);
        self
    }

    /// Set the font family name.
    pub fn with_font(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    /// Number of characters in the trimmed text.
    pub fn char_count(&self) -> usize {
        self.text.trim().chars().count()
    }

    /// Top edge of the run.
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }

    /// Check if every letter in the run is uppercase.
    pub fn is_uppercase(&self) -> bool {
        let mut letters = self.text.chars().filter(|c| c.is_alphabetic()).peekable();
        letters.peek().is_some() && letters.all(|c| c.is_uppercase())
    }
}

/// Guess boldness from a PostScript-style font name.
pub fn is_bold_font_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("bold")
        || lower.contains("black")
        || lower.contains("heavy")
        || lower.contains("semibold")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_detection_from_font_name() {
        let run = TextRun::from_font_name(1, "Test", 12.0, "Helvetica-Bold");
        assert!(run.bold);

        let run = TextRun::new(1, "Test", 12.0).with_font("Times-Roman");
        assert_eq!(run.font_family, "Times-Roman");
        assert!(!run.bold);

        let run = TextRun::from_font_name(1, "Test", 12.0, "Helvetica-Oblique");
        assert!(!run.bold);

        let run = TextRun::from_font_name(1, "Test", 12.0, "Arial-BlackMT");
        assert!(run.bold);
    }

    #[test]
    fn test_uppercase() {
        assert!(TextRun::new(1, "TABLE OF CONTENTS", 12.0).is_uppercase());
        assert!(TextRun::new(1, "2.1 OVERVIEW", 12.0).is_uppercase());
        assert!(!TextRun::new(1, "Overview", 12.0).is_uppercase());
        assert!(!TextRun::new(1, "42", 12.0).is_uppercase());
    }

    #[test]
    fn test_bbox_union() {
        let a = BoundingBox::new(10.0, 20.0, 50.0, 32.0);
        let b = BoundingBox::new(55.0, 21.0, 90.0, 33.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(10.0, 20.0, 90.0, 33.0));
        assert!((u.width() - 80.0).abs() < f32::EPSILON);
        assert!((u.height() - 13.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_run_deserializes_without_optional_fields() {
        let run: TextRun =
            serde_json::from_str(r#"{"page": 2, "font_size": 11.5, "text": "Body"}"#).unwrap();
        assert_eq!(run.page, 2);
        assert!(!run.bold);
        assert_eq!(run.bbox, BoundingBox::default());
    }
}
