//! Splits a document into sections at outline nodes.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use super::profile::DocumentProfile;
use super::LayoutOptions;
use crate::model::{Outline, Section, SectionParagraph, TextRun};

/// Cuts assembled runs into contiguous sections, one per anchored node.
pub struct SectionSegmenter<'a> {
    runs: &'a [TextRun],
    profile: &'a DocumentProfile,
    furniture: &'a BTreeSet<usize>,
    options: &'a LayoutOptions,
}

impl<'a> SectionSegmenter<'a> {
    /// Create a segmenter over one document's assembled runs.
    pub fn new(
        runs: &'a [TextRun],
        profile: &'a DocumentProfile,
        furniture: &'a BTreeSet<usize>,
        options: &'a LayoutOptions,
    ) -> Self {
        Self {
            runs,
            profile,
            furniture,
            options,
        }
    }

    /// Sections of `document` in reading order.
    ///
    /// Runs before the first node belong to the first section. Without any
    /// anchored node the whole document is a single section titled with the
    /// outline's title.
    pub fn segment(
        &self,
        document: &str,
        document_index: usize,
        outline: &Outline,
    ) -> Vec<Section> {
        let anchors: BTreeMap<usize, &str> = outline
            .nodes()
            .filter_map(|n| n.anchor.map(|a| (a, n.text.as_str())))
            .filter(|(a, _)| *a < self.runs.len())
            .collect();

        if anchors.is_empty() {
            return vec![self.section(
                document,
                document_index,
                0,
                &outline.title,
                0..self.runs.len(),
                None,
            )];
        }

        let anchors: Vec<(usize, &str)> = anchors.into_iter().collect();
        let sections: Vec<Section> = anchors
            .iter()
            .enumerate()
            .map(|(i, &(anchor, title))| {
                let start = if i == 0 { 0 } else { anchor };
                let end = anchors
                    .get(i + 1)
                    .map_or(self.runs.len(), |&(next, _)| next);
                self.section(document, document_index, i, title, start..end, Some(anchor))
            })
            .collect();

        log::debug!("{}: {} sections", document, sections.len());
        sections
    }

    fn section(
        &self,
        document: &str,
        document_index: usize,
        index: usize,
        title: &str,
        runs: Range<usize>,
        heading: Option<usize>,
    ) -> Section {
        let covered = &self.runs[runs.clone()];
        let start_page = covered
            .first()
            .map_or(self.profile.first_page, |r| r.page);
        let end_page = covered.iter().map(|r| r.page).max().unwrap_or(start_page);

        let body = runs
            .clone()
            .filter(|i| Some(*i) != heading && !self.furniture.contains(i))
            .map(|i| &self.runs[i]);

        Section {
            document: document.to_string(),
            document_index,
            index,
            title: title.to_string(),
            start_page,
            end_page,
            runs,
            paragraphs: self.paragraphs(body),
        }
    }

    /// Group body runs into paragraphs at page changes and wide line gaps.
    fn paragraphs<'r>(&self, body: impl Iterator<Item = &'r TextRun>) -> Vec<SectionParagraph> {
        let max_gap = self.profile.median_line_spacing * self.options.paragraph_gap_ratio;
        let mut paragraphs: Vec<SectionParagraph> = Vec::new();
        let mut prev: Option<&TextRun> = None;

        for run in body {
            let text = run.text.trim();
            if text.is_empty() {
                continue;
            }

            let breaks = match prev {
                None => true,
                Some(p) => {
                    let gap = run.top() - p.top();
                    p.page != run.page || gap > max_gap || gap < -1.0
                }
            };

            match paragraphs.last_mut() {
                Some(paragraph) if !breaks => {
                    paragraph.text.push(' ');
                    paragraph.text.push_str(text);
                }
                _ => paragraphs.push(SectionParagraph::new(text, run.page)),
            }
            prev = Some(run);
        }

        paragraphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineNode};

    fn runs() -> Vec<TextRun> {
        vec![
            TextRun::new(1, "Travel Guide", 24.0).at(72.0, 50.0),
            TextRun::new(1, "1. Introduction", 16.0).at(72.0, 100.0),
            TextRun::new(1, "Welcome to the coast.", 12.0).at(72.0, 130.0),
            TextRun::new(1, "It is sunny most days.", 12.0).at(72.0, 144.0),
            TextRun::new(1, "A second paragraph starts here.", 12.0).at(72.0, 200.0),
            TextRun::new(2, "2. Activities", 16.0).at(72.0, 60.0),
            TextRun::new(2, "Hiking and kayaking.", 12.0).at(72.0, 90.0),
        ]
    }

    fn outline(runs: &[TextRun]) -> Outline {
        let node = |level, i: usize| {
            OutlineNode::new(level, runs[i].text.clone(), runs[i].page).anchored(i, runs[i].top())
        };
        Outline {
            title: "Travel Guide".to_string(),
            title_node: Some(node(HeadingLevel::Title, 0)),
            headings: vec![node(HeadingLevel::H1, 1), node(HeadingLevel::H1, 5)],
        }
    }

    fn segment(runs: &[TextRun], outline: &Outline) -> Vec<Section> {
        let options = LayoutOptions::default();
        let profile = DocumentProfile::from_runs(runs, &options);
        let furniture = BTreeSet::new();
        SectionSegmenter::new(runs, &profile, &furniture, &options).segment("guide.pdf", 0, outline)
    }

    #[test]
    fn test_sections_follow_nodes() {
        let runs = runs();
        let sections = segment(&runs, &outline(&runs));

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, "Travel Guide");
        assert!(sections[0].paragraphs.is_empty());
        assert_eq!(sections[1].title, "1. Introduction");
        assert_eq!(sections[1].runs, 1..5);
        assert_eq!(
            sections[1].text(),
            "Welcome to the coast. It is sunny most days.\n\nA second paragraph starts here."
        );
        assert_eq!(sections[2].start_page, 2);
        assert_eq!(sections[2].text(), "Hiking and kayaking.");
    }

    #[test]
    fn test_sections_partition_runs() {
        let runs = runs();
        let sections = segment(&runs, &outline(&runs));
        let mut next = 0;
        for section in &sections {
            assert_eq!(section.runs.start, next);
            next = section.runs.end;
        }
        assert_eq!(next, runs.len());
    }

    #[test]
    fn test_leading_runs_join_first_section() {
        let runs = runs();
        let mut outline = outline(&runs);
        outline.title_node = None;
        let sections = segment(&runs, &outline);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].runs, 0..5);
        assert!(sections[0].text().starts_with("Travel Guide"));
    }

    #[test]
    fn test_nodeless_document_is_single_idempotent_section() {
        let runs = runs();
        let outline = Outline::untitled("guide");
        let first = segment(&runs, &outline);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].title, "guide");
        assert_eq!(first[0].start_page, 1);
        assert_eq!(first[0].end_page, 2);

        let again = segment(&runs[first[0].runs.clone()], &outline);
        assert_eq!(again, first);
    }

    #[test]
    fn test_furniture_is_left_out_of_body() {
        let runs = vec![
            TextRun::new(1, "Running header", 10.0).at(72.0, 20.0),
            TextRun::new(1, "Body line.", 12.0).at(72.0, 100.0),
        ];
        let options = LayoutOptions::default();
        let profile = DocumentProfile::from_runs(&runs, &options);
        let furniture: BTreeSet<usize> = [0].into_iter().collect();
        let sections = SectionSegmenter::new(&runs, &profile, &furniture, &options).segment(
            "a.pdf",
            0,
            &Outline::untitled(""),
        );
        assert_eq!(sections[0].text(), "Body line.");
    }

    #[test]
    fn test_empty_document() {
        let sections = segment(&[], &Outline::untitled(""));
        assert_eq!(sections.len(), 1);
        assert!(sections[0].is_empty());
        assert_eq!(sections[0].runs, 0..0);
    }
}
