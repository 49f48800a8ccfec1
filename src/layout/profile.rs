//! Per-document typographic baseline.

use std::collections::{BTreeSet, HashMap};

use super::LayoutOptions;
use crate::model::TextRun;

/// Line spacing assumed when no usable gap is observed.
pub const DEFAULT_LINE_SPACING: f32 = 15.0;

/// Gaps outside `(MIN_LINE_GAP, MAX_LINE_GAP]` are not line spacing.
const MIN_LINE_GAP: f32 = 1.0;
const MAX_LINE_GAP: f32 = 50.0;

/// Baseline statistics for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentProfile {
    /// Body text font size (character-weighted mode)
    pub body_font_size: f32,
    /// Median top-to-top distance between lines
    pub median_line_spacing: f32,
    /// Number of runs profiled
    pub run_count: usize,
    /// Lowest page number seen
    pub first_page: u32,
    /// Number of distinct pages carrying text
    pub page_count: usize,
}

impl DocumentProfile {
    /// Sentinel profile for a document without runs.
    pub fn empty() -> Self {
        Self {
            body_font_size: 0.0,
            median_line_spacing: DEFAULT_LINE_SPACING,
            run_count: 0,
            first_page: 1,
            page_count: 0,
        }
    }

    /// Whether this is the sentinel produced for empty input.
    pub fn is_empty(&self) -> bool {
        self.run_count == 0
    }

    /// Profile assembled runs.
    pub fn from_runs(runs: &[TextRun], options: &LayoutOptions) -> Self {
        if runs.is_empty() {
            return Self::empty();
        }

        let body_font_size = body_font_size(runs, options.min_body_run_chars);
        let median_line_spacing = median_line_spacing(runs);
        let pages: BTreeSet<u32> = runs.iter().map(|r| r.page).collect();

        log::debug!(
            "Profile: body {:.1}pt, line spacing {:.1}pt, {} runs on {} pages",
            body_font_size,
            median_line_spacing,
            runs.len(),
            pages.len()
        );

        Self {
            body_font_size,
            median_line_spacing,
            run_count: runs.len(),
            first_page: pages.iter().next().copied().unwrap_or(1),
            page_count: pages.len(),
        }
    }
}

/// Size bucket at 0.1pt precision.
pub(crate) fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

fn body_font_size(runs: &[TextRun], min_body_run_chars: usize) -> f32 {
    let is_body_like = |r: &&TextRun| r.char_count() >= min_body_run_chars && !r.is_uppercase();

    let mut histogram: HashMap<i32, usize> = HashMap::new();
    for run in runs.iter().filter(is_body_like) {
        *histogram.entry(size_key(run.font_size)).or_insert(0) += run.char_count();
    }
    if histogram.is_empty() {
        for run in runs {
            *histogram.entry(size_key(run.font_size)).or_insert(0) += run.char_count().max(1);
        }
    }

    // Heaviest bucket; equal weights resolve to the smaller size
    histogram
        .into_iter()
        .max_by(|(ka, wa), (kb, wb)| wa.cmp(wb).then(kb.cmp(ka)))
        .map(|(key, _)| key as f32 / 10.0)
        .unwrap_or(0.0)
}

fn median_line_spacing(runs: &[TextRun]) -> f32 {
    let mut tops_by_page: HashMap<u32, Vec<f32>> = HashMap::new();
    for run in runs {
        tops_by_page.entry(run.page).or_default().push(run.top());
    }

    let mut gaps = Vec::new();
    for tops in tops_by_page.values_mut() {
        tops.sort_by(f32::total_cmp);
        for pair in tops.windows(2) {
            let gap = pair[1] - pair[0];
            if gap > MIN_LINE_GAP && gap <= MAX_LINE_GAP {
                gaps.push(gap);
            }
        }
    }

    median(&mut gaps).unwrap_or(DEFAULT_LINE_SPACING)
}

fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f32::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
