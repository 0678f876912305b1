//! Extraction of a numeric score and an optional weak-area label from the
//! free-text feedback the reasoning service returns.
//!
//! This is the most failure-prone boundary in the pipeline, so it is kept as
//! a pure function with defensive defaults: any text that does not carry a
//! usable score line yields [`DEFAULT_SCORE`], and weak-area labels that
//! amount to "no issue" are dropped.

/// Marker token the analysis prompt asks the reasoning service to emit.
pub const SCORE_MARKER: &str = "score:";

/// Marker token for the weak-area line.
pub const WEAK_AREA_MARKER: &str = "weak area:";

/// Score substituted when no parseable score line is present.
pub const DEFAULT_SCORE: u8 = 5;

const NO_ISSUE_LABELS: &[&str] = &["none", "n/a", "na", "-", ""];

/// Parsed result of one feedback text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Always within [1, 10].
    pub score: u8,
    pub weak_area: Option<String>,
}

/// Parses raw feedback text into a clamped score and an optional label.
pub fn parse_evaluation(text: &str) -> Evaluation {
    Evaluation {
        score: parse_score(text),
        weak_area: parse_weak_area(text),
    }
}

fn parse_score(text: &str) -> u8 {
    let Some(rest) = marker_line(text, SCORE_MARKER) else {
        return DEFAULT_SCORE;
    };
    match first_integer(rest) {
        Some(value) => value.clamp(1, 10) as u8,
        None => DEFAULT_SCORE,
    }
}

fn parse_weak_area(text: &str) -> Option<String> {
    let rest = marker_line(text, WEAK_AREA_MARKER)?;
    let label = rest.trim().trim_matches('*').trim();
    let lowered = label.to_ascii_lowercase();
    if NO_ISSUE_LABELS.contains(&lowered.as_str()) {
        return None;
    }
    Some(label.to_string())
}

/// Finds the first line starting with `marker` (case-insensitive, ignoring
/// leading markdown decoration) and returns the remainder of that line.
fn marker_line<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    for line in text.lines() {
        let stripped = line.trim_start().trim_start_matches(['*', '#', '>']).trim_start();
        if stripped.len() >= marker.len()
            && stripped.is_char_boundary(marker.len())
            && stripped[..marker.len()].eq_ignore_ascii_case(marker)
        {
            return Some(&stripped[marker.len()..]);
        }
    }
    None
}

/// First integer on the line, honoring a directly attached minus sign.
/// Formats like `7`, `7/10`, or `**7**` all yield 7.
fn first_integer(line: &str) -> Option<i64> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let negative = i > 0 && bytes[i - 1] == b'-';
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            // Cap the digit run so absurdly long runs cannot overflow.
            let digits = &line[start..(start + (i - start).min(9))];
            let mut value: i64 = digits.parse().ok()?;
            if negative {
                value = -value;
            }
            return Some(value);
        }
        i += 1;
    }
    None
}
