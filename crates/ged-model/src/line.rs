//! Parsed physical lines.

/// One parsed GEDCOM line: `LEVEL [@XREF@] TAG [VALUE]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based physical line number in the source.
    pub number: usize,
    /// Declared nesting level (0..=99).
    pub level: u8,
    /// Defining cross-reference identifier, including the `@` marks.
    pub xref: Option<String>,
    /// Upper-cased tag.
    pub tag: String,
    /// Line payload, verbatim. `None` when the line carries no value.
    pub value: Option<String>,
}

impl Line {
    /// True when the payload is a pointer (`@ID@`).
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        self.value.as_deref().is_some_and(is_pointer)
    }
}

/// How a continuation line joins its owner's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationKind {
    /// `CONT`: a newline precedes the continued text.
    Cont,
    /// `CONC`: the text is appended directly.
    Conc,
}

impl ContinuationKind {
    /// Classify a tag as a continuation tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "CONT" => Some(Self::Cont),
            "CONC" => Some(Self::Conc),
            _ => None,
        }
    }

    /// Text inserted between the owner's value and the continued text.
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::Cont => "\n",
            Self::Conc => "",
        }
    }

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Cont => "CONT",
            Self::Conc => "CONC",
        }
    }
}

/// A `CONT` or `CONC` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    pub number: usize,
    pub level: u8,
    pub kind: ContinuationKind,
    /// Continued text; empty when the line has no value.
    pub value: String,
}

/// Result of parsing one text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Line(Line),
    Continuation(Continuation),
}

impl ParsedLine {
    /// Declared level of either variant.
    #[must_use]
    pub fn level(&self) -> u8 {
        match self {
            Self::Line(line) => line.level,
            Self::Continuation(cont) => cont.level,
        }
    }
}

/// True when `value` is exactly one cross-reference pointer, `@ID@`.
///
/// Escapes such as `@#DJULIAN@` are not pointers.
#[must_use]
pub fn is_pointer(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 3
        && bytes[0] == b'@'
        && bytes[bytes.len() - 1] == b'@'
        && bytes[1] != b'#'
        && !bytes[1..bytes.len() - 1].contains(&b'@')
}
