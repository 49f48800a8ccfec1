//! Outline types: title and H1-H3 headings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Level of an outline node.
///
/// Variants are ordered from the strictest (`Title`) to the deepest (`H3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Document title (at most one per document)
    Title,
    /// First-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
}

impl HeadingLevel {
    /// Map a 1-based depth onto H1-H3, collapsing anything deeper into H3.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Depth of the level (Title = 0, H1 = 1, ...).
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::Title => 0,
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Label used in the outline JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified heading (or the title) of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Index of the anchoring run in the assembled run list
    #[serde(skip)]
    pub anchor: Option<usize>,
    /// Top edge of the anchoring run
    #[serde(skip)]
    pub top: f32,
}

impl OutlineNode {
    /// Create a node without a run anchor.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            anchor: None,
            top: 0.0,
        }
    }

    /// Attach the node to a run index and its top edge.
    pub fn anchored(mut self, anchor: usize, top: f32) -> Self {
        self.anchor = Some(anchor);
        self.top = top;
        self
    }
}

/// Extracted outline of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    /// Resolved title text (title node text or the fallback title)
    pub title: String,
    /// Title node, if one was placed in the document
    pub title_node: Option<OutlineNode>,
    /// H1-H3 nodes in reading order
    pub headings: Vec<OutlineNode>,
}

impl Outline {
    /// Create an empty outline carrying only a title string.
    pub fn untitled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_node: None,
            headings: Vec::new(),
        }
    }

    /// All nodes, title first, then headings in reading order.
    pub fn nodes(&self) -> impl Iterator<Item = &OutlineNode> {
        self.title_node.iter().chain(self.headings.iter())
    }

    /// Total number of nodes including the title.
    pub fn len(&self) -> usize {
        self.headings.len() + usize::from(self.title_node.is_some())
    }

    /// Check if the outline has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to the per-document JSON shape.
    pub fn to_document_outline(&self) -> DocumentOutline {
        DocumentOutline {
            title: self.title.clone(),
            outline: self.headings.clone(),
        }
    }
}

/// Per-document outline output: `{"title", "outline": [{level, text, page}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document title
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<OutlineNode>,
}
