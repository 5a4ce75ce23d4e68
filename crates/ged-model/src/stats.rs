//! Per-run conversion statistics.

use serde::{Deserialize, Serialize};

use crate::encoding::SourceEncoding;

/// Counters collected while converting one stream.
///
/// The counters are owned by the conversion driver for a single run; there is
/// no process-wide accumulator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Encoding the source was decoded with (after `HEAD.CHAR`).
    pub source_encoding: SourceEncoding,
    /// Records read from the source.
    pub records: usize,
    /// Records written to the sink, including the rewritten header.
    pub records_written: usize,
    /// Structures read from the source, records included.
    pub structures: usize,
    pub renamed: usize,
    pub restructured: usize,
    pub dropped: usize,
    /// Enumeration values replaced by a code.
    pub enum_matched: usize,
    /// Unmatched enumeration values kept as `PHRASE`.
    pub phrases_added: usize,
    /// Unmatched enumeration values discarded under `omit_phrases`.
    pub phrases_omitted: usize,
    /// Malformed lines, orphan continuations and misplaced identifiers.
    pub irregular_lines: usize,
    /// Physical lines written.
    pub lines_written: usize,
}

impl ConversionStats {
    /// Total structures touched by a non-passthrough rule.
    #[must_use]
    pub fn rewritten(&self) -> usize {
        self.renamed
            + self.restructured
            + self.dropped
            + self.enum_matched
            + self.phrases_added
            + self.phrases_omitted
    }
}
