//! The section classifier: a single left-to-right scan over lines.

use crate::cleanup::cleanup;
use crate::predicates::*;
use crate::section::{ContentSection, NoteKind, SectionKind};

/// Partitions `text` into typed sections, in document order.
///
/// The scan keeps an accumulator and a current section kind; the
/// first line-level predicate that matches a different kind flushes
/// the accumulator and starts a new section, while same-kind matches
/// extend it. Unrecognized input always falls back to a plain
/// section, so this function is total: any input (including the empty
/// string) yields at least one section and never fails.
///
/// Two regions suspend normal predicate evaluation: inside a code
/// fence every line is taken verbatim until the closing fence, and
/// inside a `<details>` region every line belongs to the collapsible
/// section until `</details>`.
pub fn classify(text: &str) -> Vec<ContentSection> {
    let cleaned = cleanup(text);
    let mut scan = Scan::default();

    for line in cleaned.lines() {
        scan.feed(line);
    }
    scan.finish(text)
}

#[derive(Default)]
struct Scan {
    sections: Vec<ContentSection>,
    acc: Vec<String>,
    current: Option<SectionKind>,
    note_kind: Option<NoteKind>,
    code_language: Option<String>,
    in_code: bool,
    in_collapsible: bool,
}

impl Scan {
    fn feed(&mut self, line: &str) {
        if self.in_code {
            if is_fence(line) {
                self.flush();
                self.in_code = false;
            } else {
                self.acc.push(line.to_owned());
            }
            return;
        }
        if is_fence(line) {
            self.flush();
            self.in_code = true;
            self.current = Some(SectionKind::Code);
            self.code_language = fence_language(line);
            return;
        }

        if self.in_collapsible {
            if is_details_close(line) {
                self.flush();
                self.in_collapsible = false;
            } else {
                self.acc.push(line.to_owned());
            }
            return;
        }
        if is_details_open(line) {
            self.flush();
            self.in_collapsible = true;
            self.current = Some(SectionKind::Collapsible);
            return;
        }

        if line.trim().is_empty() {
            // Blank lines separate sections, except inside plain prose
            // where they are just paragraph breaks.
            if self.current == Some(SectionKind::Plain) {
                self.acc.push(String::new());
            } else {
                self.flush();
            }
            return;
        }

        let kind = detect_kind(line);

        // Table continuation: a non-table line inside a table only ends
        // it when it reads like a trailing summary sentence. Anything
        // else (wrapped cell content, separator fragments) stays in the
        // table accumulator.
        if self.current == Some(SectionKind::Table)
            && kind != SectionKind::Table
        {
            let ends_table =
                !line.contains("---") && is_summary_lead_in(line);
            if !ends_table {
                self.acc.push(line.to_owned());
                return;
            }
        }

        if kind == SectionKind::HorizontalRule {
            self.flush();
            self.sections.push(ContentSection::new(
                SectionKind::HorizontalRule,
                line.trim().to_owned(),
            ));
            return;
        }

        if self.current != Some(kind) {
            self.flush();
            self.current = Some(kind);
            if kind == SectionKind::NoteBlock {
                self.note_kind = note_kind(line);
            }
        }
        self.acc.push(line.to_owned());
    }

    fn flush(&mut self) {
        let text = self.acc.join("\n").trim().to_owned();
        self.acc.clear();

        let kind = self.current.take().unwrap_or(SectionKind::Plain);
        let note_kind = self.note_kind.take();
        let language = self.code_language.take();

        // An empty accumulator produces no section, except for code:
        // an empty fenced block is still a (blank) code section.
        if text.is_empty() && kind != SectionKind::Code {
            return;
        }

        trace!("flushing section: {kind:?} ({} bytes)", text.len());
        let mut section = ContentSection::new(kind, text);
        section.language = language;
        section.note_kind = note_kind;
        self.sections.push(section);
    }

    fn finish(mut self, raw: &str) -> Vec<ContentSection> {
        self.flush();
        if self.sections.is_empty() {
            // Nothing classified (e.g. empty input): hand back the raw
            // text as a single plain section.
            self.sections.push(ContentSection::plain(raw.to_owned()));
        }
        self.sections
    }
}

/// Evaluates the line-level predicates in priority order.
///
/// Code fences and `<details>` regions are handled by the scan before
/// this is consulted.
fn detect_kind(line: &str) -> SectionKind {
    if is_table_row(line) {
        SectionKind::Table
    } else if is_qa(line) {
        SectionKind::QuestionAnswer
    } else if note_kind(line).is_some() {
        SectionKind::NoteBlock
    } else if is_checklist(line) {
        SectionKind::Checklist
    } else if is_dialogue(line) {
        SectionKind::Dialogue
    } else if is_horizontal_rule(line) {
        SectionKind::HorizontalRule
    } else if is_math(line) {
        SectionKind::Math
    } else if is_definition(line) {
        SectionKind::DefinitionList
    } else if is_step(line) {
        SectionKind::StepByStep
    } else if is_timeline(line) {
        SectionKind::Timeline
    } else if is_ascii_chart(line) {
        SectionKind::AsciiChart
    } else {
        SectionKind::Plain
    }
}
