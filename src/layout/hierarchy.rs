//! Title selection and heading level assignment.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use super::candidates::{HeadingCandidate, StyleSignature};
use super::profile::DocumentProfile;
use super::{LayoutOptions, TitleFallback};
use crate::model::{HeadingLevel, Outline, OutlineNode, TextRun};

/// Assigns Title and H1-H3 levels to heading candidates.
pub struct HierarchyClassifier<'o> {
    options: &'o LayoutOptions,
}

impl<'o> HierarchyClassifier<'o> {
    /// Create a classifier using `options`.
    pub fn new(options: &'o LayoutOptions) -> Self {
        Self { options }
    }

    /// Build the outline of one document.
    ///
    /// `document` is the file name, used by [`TitleFallback::FileName`].
    pub fn classify(
        &self,
        document: &str,
        runs: &[TextRun],
        profile: &DocumentProfile,
        furniture: &BTreeSet<usize>,
        mut candidates: Vec<HeadingCandidate<'_>>,
    ) -> Outline {
        if profile.is_empty() {
            return Outline::untitled(self.fallback_text(document));
        }

        let title = self
            .select_title(&candidates, profile)
            .or_else(|| self.promote_heading(&candidates, profile));
        let title_node = match title {
            Some(position) => {
                let title = candidates.remove(position);
                Some(node_for(HeadingLevel::Title, title.index, title.run))
            }
            None => {
                let node = self.fallback_node(document, runs, profile, furniture);
                if let Some(anchor) = node.as_ref().and_then(|n| n.anchor) {
                    candidates.retain(|c| c.index != anchor);
                }
                node
            }
        };

        let cluster_levels = cluster_levels(&candidates);
        let mut headings: Vec<OutlineNode> = candidates
            .iter()
            .map(|c| {
                let level = match c.numbering_level {
                    Some(depth) => HeadingLevel::from_depth(depth as usize),
                    None => cluster_levels
                        .get(&c.style)
                        .copied()
                        .unwrap_or(HeadingLevel::H3),
                };
                node_for(level, c.index, c.run)
            })
            .collect();

        headings.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then(a.top.total_cmp(&b.top))
                .then(a.anchor.cmp(&b.anchor))
        });

        let title = match &title_node {
            Some(node) => node.text.clone(),
            None => self.fallback_text(document),
        };

        Outline {
            title,
            title_node,
            headings,
        }
    }

    /// Position of the title among `candidates`, if any run qualifies.
    fn select_title(
        &self,
        candidates: &[HeadingCandidate<'_>],
        profile: &DocumentProfile,
    ) -> Option<usize> {
        let threshold = profile.body_font_size * self.options.title_ratio;

        candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.run.page == profile.first_page
                    && c.numbering_level.is_none()
                    && c.run.font_size >= threshold
            })
            // largest size wins, then the earliest on the page
            .max_by(|(_, a), (_, b)| {
                a.run
                    .font_size
                    .total_cmp(&b.run.font_size)
                    .then(b.run.top().total_cmp(&a.run.top()))
                    .then(b.index.cmp(&a.index))
            })
            .map(|(position, _)| position)
    }

    /// Position of the largest first-page candidate, used as title when no
    /// run clears the title threshold.
    fn promote_heading(
        &self,
        candidates: &[HeadingCandidate<'_>],
        profile: &DocumentProfile,
    ) -> Option<usize> {
        if !self.options.promote_first_page_heading {
            return None;
        }

        let promoted = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.run.page == profile.first_page)
            .max_by(|(_, a), (_, b)| {
                a.run
                    .font_size
                    .total_cmp(&b.run.font_size)
                    .then(b.run.top().total_cmp(&a.run.top()))
                    .then(b.index.cmp(&a.index))
            })
            .map(|(position, _)| position);
        if let Some(position) = promoted {
            log::debug!(
                "Promoting first-page heading to title: {:?}",
                candidates[position].run.text
            );
        }
        promoted
    }

    fn fallback_node(
        &self,
        document: &str,
        runs: &[TextRun],
        profile: &DocumentProfile,
        furniture: &BTreeSet<usize>,
    ) -> Option<OutlineNode> {
        match &self.options.title_fallback {
            TitleFallback::FirstLine => runs
                .iter()
                .enumerate()
                .find(|(index, run)| run.page == profile.first_page && !furniture.contains(index))
                .map(|(index, run)| node_for(HeadingLevel::Title, index, run)),
            TitleFallback::FileName => Some(OutlineNode::new(
                HeadingLevel::Title,
                file_stem(document),
                profile.first_page,
            )),
            TitleFallback::Fixed(text) => Some(OutlineNode::new(
                HeadingLevel::Title,
                text.clone(),
                profile.first_page,
            )),
            TitleFallback::Untitled => None,
        }
    }

    /// Title text when no run supplies one.
    fn fallback_text(&self, document: &str) -> String {
        match &self.options.title_fallback {
            TitleFallback::FileName => file_stem(document),
            TitleFallback::Fixed(text) => text.clone(),
            TitleFallback::FirstLine | TitleFallback::Untitled => String::new(),
        }
    }
}

fn node_for(level: HeadingLevel, index: usize, run: &TextRun) -> OutlineNode {
    OutlineNode::new(level, run.text.trim(), run.page).anchored(index, run.top())
}

fn file_stem(document: &str) -> String {
    Path::new(document)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| document.to_string())
}

/// Level per style cluster: larger sizes first, bold before regular.
fn cluster_levels(candidates: &[HeadingCandidate<'_>]) -> HashMap<StyleSignature, HeadingLevel> {
    let mut signatures: Vec<StyleSignature> = candidates.iter().map(|c| c.style).collect();
    signatures.sort_by(|a, b| b.size_key.cmp(&a.size_key).then(b.bold.cmp(&a.bold)));
    signatures.dedup();

    if !signatures.is_empty() {
        log::debug!(
            "Style clusters: {}",
            signatures
                .iter()
                .map(|s| format!("{:.1}pt{}", s.font_size(), if s.bold { " bold" } else { "" }))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    signatures
        .into_iter()
        .enumerate()
        .map(|(rank, signature)| (signature, HeadingLevel::from_depth(rank + 1)))
        .collect()
}
