//! Line-level predicates for the classifier.
//!
//! Each predicate is a pure function over a single line. The classify
//! pass evaluates them in a fixed priority order; keeping them
//! separate makes every heuristic independently testable.

use std::sync::LazyLock;

use regex::Regex;

use crate::section::NoteKind;

static QA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Question|Q\d*|Answer|A\d*)\s*:").unwrap()
});

static NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Note|Tip|Warning|Important|Caution)\s*:\s*").unwrap()
});

static DIALOGUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:User|Agent|Support|Customer|Assistant)\s*:").unwrap()
});

static HR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})$").unwrap());

static MATH_LEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:Formula|Equation)\s*:").unwrap());

static STEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+\.\s|(?:Step|Phase|Stage)\s*\d+\s*:)").unwrap()
});

static TIMELINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?:
            \d{4}(?:-\d{1,2}(?:-\d{1,2})?)?\s*:
          | (?:January|February|March|April|May|June|July|August
             |September|October|November|December
             |Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)
            \.?\s+\d{4}\s*:
          | (?:Timeline|History)\s*:
        )",
    )
    .unwrap()
});

/// Glyphs that open a checklist line. The first four mark checked
/// items, the rest unchecked/crossed ones.
const CHECK_GLYPHS: [char; 4] = ['✓', '✔', '☑', '✅'];
const CROSS_GLYPHS: [char; 4] = ['✗', '✘', '☒', '❌'];

const BLOCK_GLYPHS: &str = "█▓▒░─│┌┐└┘├┤┬┴┼═║╔╗╚╝▀▄";

/// Lead-in words that mark a sentence as a trailing table summary.
const SUMMARY_LEAD_INS: [&str; 6] = [
    "This table",
    "Summary",
    "Note:",
    "In summary",
    "Overall",
    "Conclusion",
];

/// First words that disqualify a `term: definition` reading.
const NON_DEFINITION_KEYWORDS: [&str; 33] = [
    "question", "q", "answer", "a", "user", "agent", "support", "customer",
    "assistant", "note", "tip", "warning", "important", "caution", "step",
    "phase", "stage", "formula", "equation", "timeline", "history",
    "january", "february", "march", "april", "may", "june", "july",
    "august", "september", "october", "november", "december",
];

/// Returns `true` if the line is a code-fence delimiter.
#[inline]
pub(crate) fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Extracts the language hint from a fence line, if any.
pub(crate) fn fence_language(line: &str) -> Option<String> {
    let hint = line.trim().trim_start_matches('`').trim();
    if hint.is_empty() {
        None
    } else {
        Some(hint.to_owned())
    }
}

/// Returns `true` if the line opens a `<details>` collapsible region.
#[inline]
pub(crate) fn is_details_open(line: &str) -> bool {
    line.trim().starts_with("<details")
}

/// Returns `true` if the line closes a `<details>` collapsible region.
#[inline]
pub(crate) fn is_details_close(line: &str) -> bool {
    line.trim().starts_with("</details")
}

/// Returns `true` if the line reads as a table row: it contains the
/// column separator and splits into at least three parts with at
/// least two non-empty cells.
pub(crate) fn is_table_row(line: &str) -> bool {
    if !line.contains('|') {
        return false;
    }
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 3 {
        return false;
    }
    parts.iter().filter(|cell| !cell.trim().is_empty()).count() >= 2
}

/// Returns `true` for `Question:`/`Q1:`/`Answer:`/`A2:` style lines.
#[inline]
pub(crate) fn is_qa(line: &str) -> bool {
    QA_RE.is_match(line)
}

/// Detects a note lead-in and returns its sub-kind.
pub(crate) fn note_kind(line: &str) -> Option<NoteKind> {
    let caps = NOTE_RE.captures(line)?;
    Some(match &caps[1] {
        "Note" => NoteKind::Note,
        "Tip" => NoteKind::Tip,
        "Important" => NoteKind::Important,
        // `Warning` and `Caution` share a sub-kind.
        _ => NoteKind::Warning,
    })
}

/// Returns `true` if the line starts with a check/cross glyph.
pub(crate) fn is_checklist(line: &str) -> bool {
    let Some(first) = line.trim_start().chars().next() else {
        return false;
    };
    CHECK_GLYPHS.contains(&first) || CROSS_GLYPHS.contains(&first)
}

/// Returns `true` if the glyph marks a completed checklist item.
#[inline]
pub(crate) fn is_check_glyph(glyph: char) -> bool {
    CHECK_GLYPHS.contains(&glyph)
}

/// Returns `true` for speaker-labeled lines (`User:`, `Agent:`, ...).
#[inline]
pub(crate) fn is_dialogue(line: &str) -> bool {
    DIALOGUE_RE.is_match(line)
}

/// Returns `true` if the trimmed line is a horizontal rule.
#[inline]
pub(crate) fn is_horizontal_rule(line: &str) -> bool {
    HR_RE.is_match(line.trim())
}

/// Returns `true` if the line carries math content.
pub(crate) fn is_math(line: &str) -> bool {
    line.contains("$$")
        || (line.contains("\\[") && line.contains("\\]"))
        || line.contains("\\begin{")
        || MATH_LEAD_RE.is_match(line)
}

/// Returns `true` if the line reads as a `term: definition` entry.
///
/// The term must be short (at most 4 words, 100 chars), must not look
/// like one of the other lead-in forms, and must not be a date or a
/// conversational fragment ("Here's the thing: ...").
pub(crate) fn is_definition(line: &str) -> bool {
    let Some((term, definition)) = line.split_once(':') else {
        return false;
    };
    let term = term.trim();
    if term.is_empty() || definition.trim().is_empty() {
        return false;
    }
    if term.len() > 100 || term.split_whitespace().count() > 4 {
        return false;
    }
    if term.contains('|') || term.contains('\'') || term.contains('’') {
        return false;
    }
    if term.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    let first_word = term
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    !NON_DEFINITION_KEYWORDS.contains(&first_word.as_str())
}

/// Returns `true` for `1.`/`Step 1:` style lines.
#[inline]
pub(crate) fn is_step(line: &str) -> bool {
    STEP_RE.is_match(line)
}

/// Returns `true` for dated/timeline lead lines.
#[inline]
pub(crate) fn is_timeline(line: &str) -> bool {
    TIMELINE_RE.is_match(line)
}

/// Returns `true` if the line looks like part of a text diagram.
pub(crate) fn is_ascii_chart(line: &str) -> bool {
    if line.chars().any(|c| BLOCK_GLYPHS.contains(c)) {
        return true;
    }
    line.contains('|')
        && line.contains('-')
        && line.len() > 10
        && !is_table_row(line)
}

/// Returns `true` if the line reads as a trailing summary sentence
/// (used to detect the end of a table).
pub(crate) fn is_summary_lead_in(line: &str) -> bool {
    let trimmed = line.trim_start();
    SUMMARY_LEAD_INS
        .iter()
        .any(|lead| trimmed.starts_with(lead))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_detection() {
        assert!(is_fence("```"));
        assert!(is_fence("```rust"));
        assert!(is_fence("  ```"));
        assert!(!is_fence("`inline`"));
        assert_eq!(fence_language("```rust"), Some("rust".to_owned()));
        assert_eq!(fence_language("```"), None);
    }

    #[test]
    fn test_table_row() {
        assert!(is_table_row("| Name | Age |"));
        assert!(is_table_row("| --- | --- |"));
        assert!(is_table_row("Alice | 30 | Paris"));
        assert!(!is_table_row("a | b"));
        assert!(!is_table_row("no separator here"));
    }

    #[test]
    fn test_qa_lines() {
        assert!(is_qa("Question: why?"));
        assert!(is_qa("Q1: why?"));
        assert!(is_qa("A: because"));
        assert!(is_qa("Answer: because"));
        assert!(!is_qa("Assistant: hello"));
        assert!(!is_qa("Quite: wrong"));
    }

    #[test]
    fn test_note_kinds() {
        assert_eq!(note_kind("Note: x"), Some(NoteKind::Note));
        assert_eq!(note_kind("Tip: x"), Some(NoteKind::Tip));
        assert_eq!(note_kind("Warning: x"), Some(NoteKind::Warning));
        assert_eq!(note_kind("Caution: x"), Some(NoteKind::Warning));
        assert_eq!(note_kind("Important: x"), Some(NoteKind::Important));
        assert_eq!(note_kind("Notes on x"), None);
    }

    #[test]
    fn test_checklist_glyphs() {
        assert!(is_checklist("✓ done"));
        assert!(is_checklist("❌ not done"));
        assert!(!is_checklist("- [x] markdown style"));
        assert!(is_check_glyph('✔'));
        assert!(!is_check_glyph('✗'));
    }

    #[test]
    fn test_horizontal_rule() {
        assert!(is_horizontal_rule("---"));
        assert!(is_horizontal_rule("*****"));
        assert!(is_horizontal_rule("  ___  "));
        assert!(!is_horizontal_rule("--"));
        assert!(!is_horizontal_rule("--- text"));
    }

    #[test]
    fn test_math_lines() {
        assert!(is_math("$$x^2$$"));
        assert!(is_math(r"\[ e = mc^2 \]"));
        assert!(is_math(r"\begin{align}x\end{align}"));
        assert!(is_math("Equation: F = ma"));
        assert!(!is_math("plain text with $5 price"));
    }

    #[test]
    fn test_definition_lines() {
        assert!(is_definition("Ownership: Rust's memory model"));
        assert!(is_definition("Borrow checker: compile-time validation"));
        assert!(!is_definition("User: hello"));
        assert!(!is_definition("2021: something happened"));
        assert!(!is_definition("Here's the thing: it works"));
        assert!(!is_definition("No definition here"));
        assert!(!is_definition(
            "This term is way too long to be a definition term: x"
        ));
    }

    #[test]
    fn test_step_lines() {
        assert!(is_step("1. Open the lid"));
        assert!(is_step("Step 2: press the button"));
        assert!(is_step("Phase 1: discovery"));
        assert!(!is_step("1.5 is a number"));
    }

    #[test]
    fn test_timeline_lines() {
        assert!(is_timeline("2021: founded"));
        assert!(is_timeline("2021-06: first release"));
        assert!(is_timeline("March 2024: rewrite"));
        assert!(is_timeline("Timeline: the project"));
        assert!(!is_timeline("21: not a year"));
    }

    #[test]
    fn test_ascii_chart_lines() {
        assert!(is_ascii_chart("┌────┐"));
        assert!(is_ascii_chart("0 |-----*----- 10"));
        assert!(!is_ascii_chart("| a | b |"));
        assert!(!is_ascii_chart("a-b"));
    }

    #[test]
    fn test_summary_lead_in() {
        assert!(is_summary_lead_in("This table shows the results."));
        assert!(is_summary_lead_in("In summary, prices rose."));
        assert!(!is_summary_lead_in("| Alice | 30 |"));
    }
}
