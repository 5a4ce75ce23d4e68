//! Shared data model for the GEDCOM 5.5.1 to 7.0 converter.
//!
//! This crate holds the types every pipeline stage agrees on:
//!
//! - **line**: one parsed physical line, or a `CONT`/`CONC` continuation
//! - **structure**: the owned record tree built from lines
//! - **encoding**: source character encodings declared by `HEAD.CHAR`
//! - **options**: the immutable conversion options chosen by the caller
//! - **stats**: counters collected over one conversion run
//! - **error**: the fatal error taxonomy (I/O vs. encoding)

pub mod encoding;
pub mod error;
pub mod line;
pub mod options;
pub mod stats;
pub mod structure;

pub use encoding::SourceEncoding;
pub use error::{ConvertError, Result};
pub use line::{Continuation, ContinuationKind, Line, ParsedLine, is_pointer};
pub use options::{ConvertOptions, DEFAULT_LINE_LIMIT};
pub use stats::ConversionStats;
pub use structure::{Record, Structure};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_reports_its_tag() {
        let record = Record::new(Some("@I1@".to_string()), Structure::new("INDI"));
        assert_eq!(record.tag(), "INDI");
        assert!(!record.is_header());
        assert!(!record.is_trailer());
        assert!(Record::new(None, Structure::new("TRLR")).is_trailer());
    }

    #[test]
    fn stats_serialize() {
        let mut stats = ConversionStats::default();
        stats.records = 3;
        stats.phrases_added = 1;
        let json = serde_json::to_string(&stats).expect("serialize stats");
        let round: ConversionStats = serde_json::from_str(&json).expect("deserialize stats");
        assert_eq!(round.records, 3);
        assert_eq!(round.phrases_added, 1);
    }
}
