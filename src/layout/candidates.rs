//! Heading candidate selection and running header/footer detection.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use super::profile::{size_key, DocumentProfile};
use super::LayoutOptions;
use crate::model::TextRun;

/// Style cluster key: font size in tenths of a point plus weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleSignature {
    /// Font size bucket (0.1pt)
    pub size_key: i32,
    /// Bold flag
    pub bold: bool,
}

impl StyleSignature {
    /// Signature of a run.
    pub fn of(run: &TextRun) -> Self {
        Self {
            size_key: size_key(run.font_size),
            bold: run.bold,
        }
    }

    /// Font size in points.
    pub fn font_size(&self) -> f32 {
        self.size_key as f32 / 10.0
    }
}

/// A run provisionally eligible to become an outline node.
#[derive(Debug, Clone, Copy)]
pub struct HeadingCandidate<'a> {
    /// Index of the run in the assembled run list
    pub index: usize,
    /// The run itself
    pub run: &'a TextRun,
    /// Depth derived from section numbering ("2.1" = 2)
    pub numbering_level: Option<u8>,
    /// Style cluster key
    pub style: StyleSignature,
}

/// Depth of a numbered heading such as "2.1 Scope" or "3. Results".
///
/// The depth is the number of numeric components. A lone number needs a
/// trailing dot ("3. Results"), so list quantities like "2 cups" do not count.
pub fn numbering_level(text: &str) -> Option<u8> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)*)(\.?)\s+\S").unwrap());

    let caps = re.captures(text.trim_start())?;
    let components = caps.get(1)?.as_str().split('.').count();
    let trailing_dot = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
    if components == 1 && !trailing_dot {
        return None;
    }
    Some(components.min(u8::MAX as usize) as u8)
}

/// Text that looks like a heading typographically but never is one.
fn is_non_heading(text: &str) -> bool {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            // revision history rows: "0.2 18 JUNE 2013 ..."
            r"(?i)^\d+\.\d+\s+\d{1,2}\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)",
            r"(?i)^version\s+\d+(\.\d+)*",
            r"^[-=_*•·.\s]+$",
            r"(?i)^(page\s+)?\d+(\s+of\s+\d+)?$",
            r"(?i)copyright|©",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });

    patterns.iter().any(|re| re.is_match(text))
}

/// Top-to-top distance from the previous run on the same page.
///
/// The first run of a page, and a run that jumps back up (a new column), are
/// unbounded. Runs sharing a line get zero.
pub fn spacing_before(runs: &[TextRun]) -> Vec<f32> {
    runs.iter()
        .enumerate()
        .map(|(i, run)| {
            let Some(prev) = i.checked_sub(1).map(|p| &runs[p]) else {
                return f32::INFINITY;
            };
            if prev.page != run.page {
                return f32::INFINITY;
            }
            let distance = run.top() - prev.top();
            if distance < -1.0 {
                f32::INFINITY
            } else {
                distance.max(0.0)
            }
        })
        .collect()
}

/// Selects heading candidates from assembled runs.
pub struct CandidateFilter<'o> {
    options: &'o LayoutOptions,
}

impl<'o> CandidateFilter<'o> {
    /// Create a filter using `options`.
    pub fn new(options: &'o LayoutOptions) -> Self {
        Self { options }
    }

    /// Indices of running headers and footers.
    ///
    /// A run is furniture when the same text appears at the same top edge on
    /// enough distinct pages.
    pub fn furniture(&self, runs: &[TextRun], profile: &DocumentProfile) -> BTreeSet<usize> {
        let mut furniture = BTreeSet::new();
        if profile.page_count < self.options.furniture_min_pages {
            return furniture;
        }

        let required = ((profile.page_count as f32 * self.options.furniture_page_ratio).ceil()
            as usize)
            .max(self.options.furniture_min_pages);
        let tolerance = self.options.furniture_tolerance;

        let mut groups: HashMap<(String, i32), (BTreeSet<u32>, Vec<usize>)> = HashMap::new();
        for (index, run) in runs.iter().enumerate() {
            let key = (
                run.text.trim().to_lowercase(),
                (run.top() / tolerance).round() as i32,
            );
            let entry = groups.entry(key).or_default();
            entry.0.insert(run.page);
            entry.1.push(index);
        }

        for ((text, _), (pages, indices)) in groups {
            if pages.len() >= required {
                log::debug!("Furniture on {} pages: {:?}", pages.len(), text);
                furniture.extend(indices);
            }
        }
        furniture
    }

    /// Runs that qualify as heading candidates, in run order.
    pub fn select<'a>(
        &self,
        runs: &'a [TextRun],
        profile: &DocumentProfile,
        furniture: &BTreeSet<usize>,
    ) -> Vec<HeadingCandidate<'a>> {
        if profile.is_empty() {
            return Vec::new();
        }

        let body = profile.body_font_size;
        let spacing_threshold = profile.median_line_spacing * self.options.spacing_ratio;
        let spacing = spacing_before(runs);

        let candidates: Vec<HeadingCandidate<'a>> = runs
            .iter()
            .enumerate()
            .filter(|(index, _)| !furniture.contains(index))
            .filter_map(|(index, run)| {
                let text = run.text.trim();
                let chars = text.chars().count();
                if chars < self.options.min_heading_chars || chars > self.options.max_heading_chars
                {
                    return None;
                }
                if run.font_size < body * self.options.min_heading_ratio || is_non_heading(text) {
                    return None;
                }

                let prominent = run.font_size > body * self.options.font_ratio || run.bold;
                let numbering = numbering_level(text);
                let separated = spacing[index] >= spacing_threshold;
                if !prominent || !(separated || numbering.is_some()) {
                    return None;
                }

                Some(HeadingCandidate {
                    index,
                    run,
                    numbering_level: numbering,
                    style: StyleSignature::of(run),
                })
            })
            .collect();

        log::debug!(
            "{} heading candidates out of {} runs (body {:.1}pt, spacing threshold {:.1}pt)",
            candidates.len(),
            runs.len(),
            body,
            spacing_threshold
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_lines(page: u32, from: f32, count: usize) -> Vec<TextRun> {
        (0..count)
            .map(|i| {
                TextRun::new(
                    page,
                    format!("regular paragraph text {} on sheet {}", i, page),
                    12.0,
                )
                .at(72.0, from + i as f32 * 14.0)
            })
            .collect()
    }

    fn select(runs: &[TextRun]) -> Vec<usize> {
        let options = LayoutOptions::default();
        let profile = DocumentProfile::from_runs(runs, &options);
        let filter = CandidateFilter::new(&options);
        let furniture = filter.furniture(runs, &profile);
        filter
            .select(runs, &profile, &furniture)
            .iter()
            .map(|c| c.index)
            .collect()
    }

    #[test]
    fn test_numbering_level() {
        assert_eq!(numbering_level("1. Introduction"), Some(1));
        assert_eq!(numbering_level("2.1 Scope"), Some(2));
        assert_eq!(numbering_level("2.1. Scope"), Some(2));
        assert_eq!(numbering_level("2.1.1 Details"), Some(3));
        assert_eq!(numbering_level("4.2.1.3 Deep"), Some(4));
        assert_eq!(numbering_level("2 cups of rice"), None);
        assert_eq!(numbering_level("Introduction"), None);
        assert_eq!(numbering_level("3.5"), None);
    }

    #[test]
    fn test_non_heading_patterns() {
        assert!(is_non_heading("Copyright 2024 Example Corp"));
        assert!(is_non_heading("Page 3 of 10"));
        assert!(is_non_heading("-----"));
        assert!(is_non_heading("0.2 18 JUNE 2013 Initial draft"));
        assert!(is_non_heading("Version 1.0"));
        assert!(!is_non_heading("Summary of Findings"));
    }

    #[test]
    fn test_large_separated_run_is_candidate() {
        let mut runs = body_lines(1, 100.0, 6);
        runs.push(TextRun::new(1, "Local Cuisine", 16.0).at(72.0, 200.0));
        runs.extend(body_lines(1, 222.0, 4));
        assert_eq!(select(&runs), vec![6]);
    }

    #[test]
    fn test_bold_inline_label_without_spacing_is_rejected() {
        let mut runs = body_lines(1, 100.0, 6);
        // same line as the previous body line, bold
        runs.push(TextRun::new(1, "Note:", 12.0).with_bold(true).at(400.0, 170.0));
        runs.extend(body_lines(1, 184.0, 3));
        assert!(select(&runs).is_empty());
    }

    #[test]
    fn test_numbered_bold_heading_needs_no_spacing() {
        let mut runs = body_lines(1, 100.0, 6);
        runs.push(
            TextRun::new(1, "3.2 Packing Tips", 12.0)
                .with_bold(true)
                .at(72.0, 184.0),
        );
        runs.extend(body_lines(1, 198.0, 3));
        let options = LayoutOptions::default();
        let profile = DocumentProfile::from_runs(&runs, &options);
        let filter = CandidateFilter::new(&options);
        let candidates = filter.select(&runs, &profile, &BTreeSet::new());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].numbering_level, Some(2));
        assert!(candidates[0].style.bold);
    }

    #[test]
    fn test_long_text_is_rejected() {
        let mut runs = body_lines(1, 100.0, 6);
        runs.push(TextRun::new(1, "x".repeat(200), 18.0).at(72.0, 220.0));
        assert!(select(&runs).is_empty());
    }

    #[test]
    fn test_running_header_is_furniture() {
        let mut runs = Vec::new();
        for page in 1..=4 {
            runs.push(
                TextRun::new(page, "Annual Report", 14.0)
                    .with_bold(true)
                    .at(72.0, 20.0),
            );
            runs.extend(body_lines(page, 100.0, 5));
        }
        let options = LayoutOptions::default();
        let profile = DocumentProfile::from_runs(&runs, &options);
        let furniture = CandidateFilter::new(&options).furniture(&runs, &profile);
        assert_eq!(furniture.into_iter().collect::<Vec<_>>(), vec![0, 6, 12, 18]);
        assert!(select(&runs).is_empty());
    }

    #[test]
    fn test_spacing_before() {
        let runs = vec![
            TextRun::new(1, "a", 12.0).at(72.0, 100.0),
            TextRun::new(1, "b", 12.0).at(72.0, 130.0),
            TextRun::new(1, "c", 12.0).at(300.0, 130.0),
            TextRun::new(1, "d", 12.0).at(300.0, 50.0),
            TextRun::new(2, "e", 12.0).at(72.0, 500.0),
        ];
        let spacing = spacing_before(&runs);
        assert!(spacing[0].is_infinite());
        assert_eq!(spacing[1], 30.0);
        assert_eq!(spacing[2], 0.0);
        assert!(spacing[3].is_infinite());
        assert!(spacing[4].is_infinite());
    }
}
