//! Line reconstruction from positioned text runs.
//!
//! Runs are grouped into lines by baseline, ordered top to bottom, and the
//! spacing between runs on a line is rebuilt from their horizontal gaps.

use std::cmp::Ordering;

use crate::model::{Line, TextRun};

use super::Tolerances;

/// Group runs into lines in reading order (top to bottom, left to right).
///
/// Two runs share a line when their baselines differ by at most
/// `tolerances.line_tolerance` from the line's topmost run. PDF y grows
/// upward, so lines are emitted by descending y.
pub fn extract_lines(runs: &[TextRun], tolerances: &Tolerances) -> Vec<Line> {
    let mut ordered: Vec<&TextRun> = runs.iter().filter(|r| !r.text.is_empty()).collect();
    ordered.sort_by(|a, b| reading_order(a, b));

    let mut lines = Vec::new();
    let mut current: Vec<TextRun> = Vec::new();
    let mut anchor_y = 0.0;

    for run in ordered {
        if !current.is_empty() && (anchor_y - run.y).abs() > tolerances.line_tolerance {
            lines.push(build_line(std::mem::take(&mut current), tolerances));
        }
        if current.is_empty() {
            anchor_y = run.y;
        }
        current.push(run.clone());
    }

    if !current.is_empty() {
        lines.push(build_line(current, tolerances));
    }

    lines
}

/// Extract lines and join their text with `\n`.
///
/// A vertical gap wider than `paragraph_gap_factor` times the page's median
/// line spacing becomes a blank line, so paragraph breaks survive reflow.
pub fn extract_text(runs: &[TextRun], tolerances: &Tolerances) -> String {
    let lines = extract_lines(runs, tolerances);
    let gaps: Vec<f32> = lines.windows(2).map(|w| w[0].y - w[1].y).collect();
    let paragraph_gap = median(&gaps)
        .filter(|_| tolerances.paragraph_gap_factor > 0.0)
        .map(|spacing| spacing * tolerances.paragraph_gap_factor);

    let mut text = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            text.push('\n');
            if paragraph_gap.map(|limit| gaps[i - 1] > limit).unwrap_or(false) {
                text.push('\n');
            }
        }
        text.push_str(&line.text);
    }
    text
}

fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(sorted[sorted.len() / 2])
}

/// Ordering used everywhere runs are visited "as read": y descending, then
/// x ascending. Stable sorts keep decoder order for exact ties.
pub(crate) fn reading_order(a: &TextRun, b: &TextRun) -> Ordering {
    b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x))
}

fn build_line(mut runs: Vec<TextRun>, tolerances: &Tolerances) -> Line {
    runs.sort_by(|a, b| a.x.total_cmp(&b.x));

    let y = runs[0].y;
    let x = runs[0].x;
    let text = join_runs(&runs, tolerances);

    Line { runs, x, y, text }
}

/// Concatenate runs of one line, inserting a single space where the gap
/// after the previous run exceeds the spacing threshold.
fn join_runs(runs: &[TextRun], tolerances: &Tolerances) -> String {
    let mut result = String::new();

    for (i, run) in runs.iter().enumerate() {
        if i > 0 {
            let prev = &runs[i - 1];
            let gap = run.x - prev.end_x(tolerances.avg_char_width);
            if gap > tolerances.space_threshold && needs_space(&prev.text, &run.text) {
                result.push(' ');
            }
        }
        result.push_str(&run.text);
    }

    result
}

/// Whether a space should separate two runs that are visually apart.
pub(crate) fn needs_space(prev: &str, next: &str) -> bool {
    let prev_last = prev.chars().last();
    let next_first = next.chars().next();

    let prev_ends_with_space = prev_last.map(char::is_whitespace).unwrap_or(true);
    let next_starts_with_space = next_first.map(char::is_whitespace).unwrap_or(true);
    if prev_ends_with_space || next_starts_with_space {
        return false;
    }

    // No space between ideographs
    let prev_is_cjk = prev_last.map(is_spaceless_script_char).unwrap_or(false);
    let next_is_cjk = next_first.map(is_spaceless_script_char).unwrap_or(false);
    !(prev_is_cjk && next_is_cjk)
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
