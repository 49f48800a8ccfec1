//! Structural outline extraction.
//!
//! Runs are assembled into lines, profiled for a body baseline, filtered into
//! heading candidates, classified into Title/H1-H3 and finally cut into
//! sections.

mod candidates;
mod hierarchy;
mod lines;
mod options;
mod profile;
mod segment;

pub use candidates::{
    numbering_level, spacing_before, CandidateFilter, HeadingCandidate, StyleSignature,
};
pub use hierarchy::HierarchyClassifier;
pub use lines::assemble_runs;
pub use options::{LayoutOptions, TitleFallback};
pub use profile::{DocumentProfile, DEFAULT_LINE_SPACING};
pub use segment::SectionSegmenter;

use std::collections::BTreeSet;

use crate::model::{Outline, Section, TextRun};

/// Layout analysis of a single document.
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    /// Document file name
    pub document: String,
    /// Assembled, normalized runs
    pub runs: Vec<TextRun>,
    /// Typographic baseline
    pub profile: DocumentProfile,
    /// Indices of running headers and footers
    pub furniture: BTreeSet<usize>,
    /// Extracted outline
    pub outline: Outline,
}

impl DocumentLayout {
    /// Cut the document into sections at its outline nodes.
    pub fn sections(&self, document_index: usize, options: &LayoutOptions) -> Vec<Section> {
        SectionSegmenter::new(&self.runs, &self.profile, &self.furniture, options).segment(
            &self.document,
            document_index,
            &self.outline,
        )
    }
}

/// Runs the per-document layout stages.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    options: LayoutOptions,
}

impl OutlineExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Get the layout options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Assemble, profile and classify one document.
    pub fn analyze(&self, document: &str, runs: &[TextRun]) -> DocumentLayout {
        let runs = assemble_runs(runs);
        let profile = DocumentProfile::from_runs(&runs, &self.options);

        let filter = CandidateFilter::new(&self.options);
        let furniture = filter.furniture(&runs, &profile);
        let candidates = filter.select(&runs, &profile, &furniture);
        let outline = HierarchyClassifier::new(&self.options).classify(
            document,
            &runs,
            &profile,
            &furniture,
            candidates,
        );

        log::debug!(
            "{}: title {:?}, {} headings",
            document,
            outline.title,
            outline.headings.len()
        );

        DocumentLayout {
            document: document.to_string(),
            runs,
            profile,
            furniture,
            outline,
        }
    }

    /// Extract only the outline of one document.
    pub fn extract(&self, document: &str, runs: &[TextRun]) -> Outline {
        self.analyze(document, runs).outline
    }

    /// Analyze a document and cut it into sections.
    pub fn sections(
        &self,
        document: &str,
        document_index: usize,
        runs: &[TextRun],
    ) -> Vec<Section> {
        self.analyze(document, runs)
            .sections(document_index, &self.options)
    }
}
