//! Maps classified sections to a presentation tree.
//!
//! The nodes here are toolkit-agnostic: the UI layer walks them and
//! applies its own styling. Rendering is pure with respect to the
//! section's `text`/`language`/`note_kind` — no I/O of any kind.

use std::sync::LazyLock;

use regex::Regex;

use crate::predicates::{is_check_glyph, is_checklist, is_summary_lead_in};
use crate::section::{ContentSection, NoteKind, SectionKind};

static NOTE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Note|Tip|Warning|Important|Caution)\s*:\s*").unwrap()
});

static QA_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Question|Q\d*|Answer|A\d*)\s*:\s*").unwrap()
});

static STEP_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+\.\s*|(?:Step|Phase|Stage)\s*\d+\s*:\s*)").unwrap()
});

static TIMELINE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:Timeline|History)\s*:").unwrap());

static SUMMARY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<summary>(.*?)</summary>").unwrap()
});

/// A presentation node produced from one [`ContentSection`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderNode {
    /// Plain prose paragraph.
    Paragraph {
        /// Paragraph text.
        text: String,
    },
    /// A code block, rendered verbatim.
    ///
    /// `code` is the full block content, which also backs the
    /// "copy full code" affordance (clipboard I/O is the host's job).
    CodeBlock {
        /// Fence language hint, if present.
        language: Option<String>,
        /// Verbatim code.
        code: String,
    },
    /// A table with a fixed column count.
    Table {
        /// Column headers.
        headers: Vec<String>,
        /// Data rows; every row has exactly `headers.len()` cells.
        rows: Vec<Vec<String>>,
    },
    /// A callout note.
    Note {
        /// Note sub-kind.
        kind: NoteKind,
        /// Note text with its lead-in keyword stripped.
        text: String,
    },
    /// A checklist.
    Checklist {
        /// The items, in source order.
        items: Vec<ChecklistItem>,
    },
    /// A speaker-labeled exchange.
    Dialogue {
        /// The turns, in source order.
        turns: Vec<DialogueTurn>,
    },
    /// A question/answer exchange.
    QuestionAnswer {
        /// Question and answer rows, in source order.
        items: Vec<QaItem>,
    },
    /// A definition list.
    Definitions {
        /// The `term -> definition` entries, in source order.
        entries: Vec<Definition>,
    },
    /// Sequential instructions.
    Steps {
        /// The steps, renumbered from 1.
        steps: Vec<Step>,
    },
    /// A dated history.
    Timeline {
        /// The entries, in source order.
        entries: Vec<TimelineEntry>,
    },
    /// A math formula, rendered as-is.
    Math {
        /// The formula text.
        formula: String,
    },
    /// A preformatted text diagram.
    AsciiChart {
        /// The diagram, rendered in a monospace block.
        art: String,
    },
    /// A collapsible region, closed by default.
    Collapsible {
        /// The always-visible summary line.
        summary: String,
        /// The hidden body.
        body: String,
    },
    /// A horizontal divider.
    Divider,
}

/// One checklist row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Whether the item is checked off.
    pub checked: bool,
    /// Item text with the glyph stripped.
    pub text: String,
}

/// One dialogue turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueTurn {
    /// Speaker label (`User`, `Agent`, ...).
    pub speaker: String,
    /// What was said.
    pub text: String,
}

/// Whether a Q&A row is the question or the answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QaLabel {
    /// A question row.
    Question,
    /// An answer row.
    Answer,
}

/// One Q&A row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QaItem {
    /// Question or answer.
    pub label: QaLabel,
    /// Row text with the `Q:`/`A:` prefix stripped.
    pub text: String,
}

/// One definition-list entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    /// The term being defined.
    pub term: String,
    /// Its definition.
    pub definition: String,
}

/// One step of a step-by-step section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// Display number, assigned sequentially from 1 regardless of the
    /// numbers present in the source text.
    pub number: usize,
    /// Step text with the numbering prefix stripped.
    pub text: String,
}

/// One timeline entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    /// The date/period label.
    pub when: String,
    /// What happened.
    pub what: String,
}

/// Renders one section into a presentation node.
pub fn render(section: &ContentSection) -> RenderNode {
    match section.kind {
        SectionKind::Code => RenderNode::CodeBlock {
            language: section.language.clone(),
            code: section.text.clone(),
        },
        SectionKind::Table => render_table(&section.text),
        SectionKind::NoteBlock => RenderNode::Note {
            kind: section.note_kind.unwrap_or(NoteKind::Note),
            text: NOTE_PREFIX_RE.replace(section.text.trim(), "").into_owned(),
        },
        SectionKind::Checklist => RenderNode::Checklist {
            items: non_blank_lines(&section.text)
                .map(render_checklist_item)
                .collect(),
        },
        SectionKind::Dialogue => RenderNode::Dialogue {
            turns: non_blank_lines(&section.text)
                .map(|line| {
                    let (speaker, text) = split_label(line);
                    DialogueTurn { speaker, text }
                })
                .collect(),
        },
        SectionKind::QuestionAnswer => RenderNode::QuestionAnswer {
            items: non_blank_lines(&section.text)
                .map(render_qa_item)
                .collect(),
        },
        SectionKind::DefinitionList => RenderNode::Definitions {
            entries: non_blank_lines(&section.text)
                .map(|line| {
                    let (term, definition) = split_label(line);
                    Definition { term, definition }
                })
                .collect(),
        },
        SectionKind::StepByStep => RenderNode::Steps {
            steps: non_blank_lines(&section.text)
                .enumerate()
                .map(|(idx, line)| Step {
                    number: idx + 1,
                    text: STEP_PREFIX_RE
                        .replace(line.trim(), "")
                        .into_owned(),
                })
                .collect(),
        },
        SectionKind::Timeline => RenderNode::Timeline {
            entries: non_blank_lines(&section.text)
                .filter(|line| !TIMELINE_HEADING_RE.is_match(line.trim()))
                .map(|line| {
                    let (when, what) = split_label(line);
                    TimelineEntry { when, what }
                })
                .collect(),
        },
        SectionKind::Math => RenderNode::Math {
            formula: section.text.clone(),
        },
        SectionKind::AsciiChart => RenderNode::AsciiChart {
            art: section.text.clone(),
        },
        SectionKind::Collapsible => render_collapsible(&section.text),
        SectionKind::HorizontalRule => RenderNode::Divider,
        SectionKind::Plain => RenderNode::Paragraph {
            text: section.text.clone(),
        },
    }
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

/// Splits `Label: rest` at the first colon; a line without a colon
/// becomes a label-less row.
fn split_label(line: &str) -> (String, String) {
    match line.split_once(':') {
        Some((label, rest)) => {
            (label.trim().to_owned(), rest.trim().to_owned())
        }
        None => (String::new(), line.trim().to_owned()),
    }
}

fn render_checklist_item(line: &str) -> ChecklistItem {
    let trimmed = line.trim();
    if is_checklist(trimmed) {
        let mut chars = trimmed.chars();
        let glyph = chars.next().unwrap_or_default();
        ChecklistItem {
            checked: is_check_glyph(glyph),
            text: chars.as_str().trim().to_owned(),
        }
    } else {
        ChecklistItem {
            checked: false,
            text: trimmed.to_owned(),
        }
    }
}

fn render_qa_item(line: &str) -> QaItem {
    let trimmed = line.trim();
    let label = match QA_PREFIX_RE.captures(trimmed) {
        Some(caps) if caps[1].starts_with('Q') => QaLabel::Question,
        // Unprefixed continuation lines read as part of the answer.
        _ => QaLabel::Answer,
    };
    QaItem {
        label,
        text: QA_PREFIX_RE.replace(trimmed, "").into_owned(),
    }
}

/// Separator rows are layout artifacts: either classic `---` rules or
/// double-line `═══` dividers.
fn is_table_separator(line: &str) -> bool {
    line.contains("---") || line.contains("═══")
}

fn render_table(text: &str) -> RenderNode {
    let mut lines = non_blank_lines(text)
        .filter(|line| !is_table_separator(line))
        .filter(|line| !is_summary_lead_in(line));

    let Some(header_line) = lines.next() else {
        return RenderNode::Table {
            headers: Vec::new(),
            rows: Vec::new(),
        };
    };
    let headers = split_cells(header_line);

    let rows = lines
        .map(|line| {
            let mut cells = split_cells(line);
            // Pad or truncate each row to the header's cell count.
            cells.resize(headers.len(), String::new());
            cells
        })
        .collect();

    RenderNode::Table { headers, rows }
}

/// Splits a table line into trimmed cells, stripping inline emphasis
/// markers and dropping the empty edge cells produced by leading and
/// trailing separators.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells: Vec<String> = line
        .split('|')
        .map(|cell| cell.trim().trim_matches(['*', '_', '`']).trim().to_owned())
        .collect();
    while cells.first().is_some_and(String::is_empty) {
        cells.remove(0);
    }
    while cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
    cells
}

fn render_collapsible(text: &str) -> RenderNode {
    let summary = SUMMARY_TAG_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_owned())
        .unwrap_or_else(|| "Details".to_owned());
    let body = SUMMARY_TAG_RE.replace(text, "").trim().to_owned();
    RenderNode::Collapsible { summary, body }
}
