//! Conversion options.
//!
//! Options are fixed by the caller before a conversion starts and threaded
//! through every stage by reference; nothing reads them from process state.

use serde::{Deserialize, Serialize};

/// Default maximum physical line length in bytes, excluding the terminator.
pub const DEFAULT_LINE_LIMIT: usize = 255;

/// Smallest limit that still leaves room for a prefix and one character.
const MIN_LINE_LIMIT: usize = 16;

/// Options controlling a 5.5.1 to 7.0 conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Canonicalise cross-reference identifiers to upper case.
    pub xref_case_insensitive: bool,

    /// Drop unmatched enumeration text instead of keeping it as a `PHRASE`.
    pub omit_phrases: bool,

    /// Maximum physical line length; longer values are split with `CONC`.
    /// `None` disables splitting.
    pub line_limit: Option<usize>,

    /// Write a UTF-8 byte-order mark before the header.
    pub byte_order_mark: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            xref_case_insensitive: false,
            omit_phrases: false,
            line_limit: Some(DEFAULT_LINE_LIMIT),
            byte_order_mark: false,
        }
    }
}

impl ConvertOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare (and emit) identifiers case-insensitively.
    #[must_use]
    pub fn with_xref_case_insensitive(mut self, enable: bool) -> Self {
        self.xref_case_insensitive = enable;
        self
    }

    /// Omit phrases for unmatched enumeration values.
    #[must_use]
    pub fn with_omit_phrases(mut self, enable: bool) -> Self {
        self.omit_phrases = enable;
        self
    }

    /// Set the maximum physical line length (clamped to a workable minimum).
    #[must_use]
    pub fn with_line_limit(mut self, limit: usize) -> Self {
        self.line_limit = Some(limit.max(MIN_LINE_LIMIT));
        self
    }

    /// Disable line-length splitting.
    #[must_use]
    pub fn without_line_limit(mut self) -> Self {
        self.line_limit = None;
        self
    }

    /// Write a byte-order mark.
    #[must_use]
    pub fn with_byte_order_mark(mut self, enable: bool) -> Self {
        self.byte_order_mark = enable;
        self
    }
}
