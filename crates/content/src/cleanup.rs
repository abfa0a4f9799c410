//! Formatting-artifact cleanup applied before classification.
//!
//! Model output occasionally contains runaway emphasis markers
//! (`****bold****`, `#######` headings) or orphaned symbol lines. The
//! cleanup pass normalizes those so the classifier and renderer see
//! canonical markers. The pass is idempotent: applying it twice gives
//! the same result as applying it once.

use crate::predicates::{is_fence, is_horizontal_rule};

/// Normalizes stray formatting artifacts in `text`.
///
/// - Runs of 3+ `*`, `_` or `~` collapse to the doubled form; runs of
///   4+ backticks collapse to a fence; runs of 7+ `#` collapse to 6.
/// - Lines that are pure symbol noise (a lone `###`, a lone `**`)
///   are dropped entirely.
/// - Code-fence contents, fence lines, and horizontal-rule candidates
///   pass through untouched.
pub fn cleanup(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_code = false;

    for line in text.lines() {
        if in_code {
            if is_fence(line) {
                in_code = false;
                out.push(canonicalize_fence(line));
            } else {
                out.push(line.to_owned());
            }
            continue;
        }
        if is_fence(line) || has_fence_run(line) {
            in_code = true;
            out.push(canonicalize_fence(line));
            continue;
        }
        let trimmed = line.trim();
        if is_horizontal_rule(trimmed) {
            out.push(line.to_owned());
            continue;
        }
        if is_symbol_noise(trimmed) {
            continue;
        }
        out.push(collapse_runs(line));
    }

    let mut result = out.join("\n");
    if text.ends_with('\n') && !result.is_empty() {
        result.push('\n');
    }
    result
}

/// A non-fence line carrying a run of 4+ backticks is a malformed
/// fence and gets canonicalized into one.
fn has_fence_run(line: &str) -> bool {
    line.trim_start().starts_with("````")
}

fn canonicalize_fence(line: &str) -> String {
    let trimmed = line.trim();
    let hint = trimmed.trim_start_matches('`');
    format!("```{}", hint.trim())
}

/// True for non-empty lines made only of stray marker symbols, with
/// no word characters at all.
fn is_symbol_noise(trimmed: &str) -> bool {
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| matches!(c, '#' | '~' | '`' | '*' | '_') || c.is_whitespace())
}

fn collapse_runs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let emit = match c {
            '*' | '_' | '~' if run >= 3 => 2,
            '`' if run >= 4 => 3,
            '#' if run >= 7 => 6,
            _ => run,
        };
        for _ in 0..emit {
            out.push(c);
        }
    }
    out
}
