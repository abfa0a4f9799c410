/// The type of a classified section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// A fenced code block.
    Code,
    /// A `|`-separated table.
    Table,
    /// Question/answer exchange (`Q:`/`A:` style lines).
    QuestionAnswer,
    /// A callout introduced by `Note:`, `Tip:`, `Warning:` etc.
    NoteBlock,
    /// Lines led by check/cross glyphs.
    Checklist,
    /// Speaker-labeled lines (`User:`, `Agent:`, ...).
    Dialogue,
    /// A divider line of repeated `-`, `*` or `_`.
    HorizontalRule,
    /// LaTeX-style math content.
    Math,
    /// `term: definition` lines.
    DefinitionList,
    /// Numbered instructions (`1.` or `Step 1:`).
    StepByStep,
    /// Dated entries (`2021: ...`, `March 2024: ...`).
    Timeline,
    /// Box-drawing or pipe-and-dash diagrams.
    AsciiChart,
    /// A `<details>`-wrapped collapsible region.
    Collapsible,
    /// Prose that matched nothing else.
    Plain,
}

/// The sub-kind of a note block, derived from its lead-in keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteKind {
    /// `Note:`
    Note,
    /// `Tip:`
    Tip,
    /// `Warning:` or `Caution:`
    Warning,
    /// `Important:`
    Important,
}

/// A contiguous, typed span of message text.
///
/// Sections are produced in document order, and concatenating their
/// texts reproduces the classified content in order (blank-line
/// separators and fence lines excepted).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentSection {
    /// The detected type of this section.
    pub kind: SectionKind,
    /// Raw text belonging to this section, trimmed.
    pub text: String,
    /// The fence's language hint. Only meaningful for [`SectionKind::Code`].
    pub language: Option<String>,
    /// The note sub-kind. Only meaningful for [`SectionKind::NoteBlock`].
    pub note_kind: Option<NoteKind>,
}

impl ContentSection {
    pub(crate) fn new(kind: SectionKind, text: String) -> Self {
        Self {
            kind,
            text,
            language: None,
            note_kind: None,
        }
    }

    pub(crate) fn plain(text: String) -> Self {
        Self::new(SectionKind::Plain, text)
    }
}
