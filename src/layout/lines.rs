//! Line assembly: normalizes run text and glues fragments of one visual line.

use crate::model::TextRun;
use crate::text::normalize;

/// Fragments further apart vertically than this start a new line.
const SAME_LINE_TOLERANCE: f32 = 5.0;

/// Fragments whose sizes differ by more than this are not merged.
const SAME_SIZE_TOLERANCE: f32 = 1.0;

/// Normalize run text and merge split fragments of the same line.
///
/// Two consecutive runs merge when they sit on the same page with the same
/// weight, their top edges are within 5pt, their sizes within 1pt, and the
/// second starts to the right of the first. Runs that normalize to an empty
/// string are dropped.
pub fn assemble_runs(runs: &[TextRun]) -> Vec<TextRun> {
    let mut assembled: Vec<TextRun> = Vec::with_capacity(runs.len());
    let mut prev_trailing_space = false;

    for run in runs {
        let text = normalize(&run.text);
        if text.is_empty() {
            continue;
        }
        let leading_space = run.text.starts_with(char::is_whitespace);
        let trailing_space = run.text.ends_with(char::is_whitespace);
        let run = TextRun {
            text,
            ..run.clone()
        };

        if let Some(prev) = assembled.last_mut() {
            if continues_line(prev, &run) {
                if prev_trailing_space || leading_space || needs_space(prev, &run) {
                    prev.text.push(' ');
                }
                prev.text.push_str(&run.text);
                prev.bbox = prev.bbox.union(&run.bbox);
                prev_trailing_space = trailing_space;
                continue;
            }
        }

        assembled.push(run);
        prev_trailing_space = trailing_space;
    }

    log::debug!("Assembled {} runs into {} lines", runs.len(), assembled.len());
    assembled
}

fn continues_line(prev: &TextRun, run: &TextRun) -> bool {
    prev.page == run.page
        && prev.bold == run.bold
        && (prev.bbox.y0 - run.bbox.y0).abs() < SAME_LINE_TOLERANCE
        && (prev.font_size - run.font_size).abs() < SAME_SIZE_TOLERANCE
        && run.bbox.x0 > prev.bbox.x0
}

/// Insert a space when the horizontal gap exceeds 20% of a character width,
/// except between characters of scripts written without word spaces.
fn needs_space(prev: &TextRun, run: &TextRun) -> bool {
    let char_count = run.text.chars().count();
    let avg_char_width = if char_count > 0 && run.bbox.width() > 0.0 {
        run.bbox.width() / char_count as f32
    } else {
        run.font_size * 0.5
    };
    let gap = run.bbox.x0 - prev.bbox.x1;
    if gap <= avg_char_width * 0.2 {
        return false;
    }

    let prev_spaceless = prev
        .text
        .chars()
        .last()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    let curr_spaceless = run
        .text
        .chars()
        .next()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    !(prev_spaceless && curr_spaceless)
}

/// Han, Hiragana, Katakana and CJK punctuation. Hangul uses word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}
