//! Line parsing.
//!
//! # Line grammar
//!
//! ```text
//! LEVEL [DELIM XREF] DELIM TAG [DELIM VALUE]
//! ```
//!
//! | Field   | Form                         | Notes                              |
//! |---------|------------------------------|------------------------------------|
//! | `LEVEL` | 1-2 decimal digits, 0..=99   | leading whitespace / U+FEFF skipped |
//! | `XREF`  | `@` id `@`, id has no `@`    | optional, defining identifier      |
//! | `TAG`   | `[A-Za-z0-9_]+`              | upper-cased                        |
//! | `VALUE` | rest of the line             | verbatim after one delimiter       |
//!
//! Runs of whitespace between `LEVEL`, `XREF` and `TAG` are accepted. `CONT`
//! and `CONC` lines are returned as [`Continuation`]s.

use ged_model::{Continuation, ContinuationKind, Line, ParsedLine, is_pointer};
use thiserror::Error;

/// Highest level accepted by the parser.
pub const MAX_LEVEL: u8 = 99;

/// A line that does not follow the line grammar.
///
/// Malformed lines are skipped by the builder; this is never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {number}: {reason}")]
pub struct MalformedLine {
    pub number: usize,
    pub reason: MalformedReason,
}

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("missing level")]
    MissingLevel,
    #[error("level above 99")]
    LevelOutOfRange,
    #[error("no delimiter after level")]
    MissingDelimiter,
    #[error("unterminated cross-reference identifier")]
    UnterminatedXref,
    #[error("missing tag")]
    MissingTag,
    #[error("invalid character in tag")]
    InvalidTag,
}

fn is_delim(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Parse one decoded text line.
///
/// `number` is the 1-based physical line number, carried into the result.
pub fn parse_line(text: &str, number: usize) -> Result<ParsedLine, MalformedLine> {
    let fail = |reason| MalformedLine { number, reason };

    let rest = text.trim_start_matches(|c: char| c == '\u{FEFF}' || c.is_whitespace());

    // LEVEL
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return Err(fail(MalformedReason::MissingLevel));
    }
    let level = rest[..digits]
        .parse::<u8>()
        .ok()
        .filter(|level| *level <= MAX_LEVEL)
        .ok_or_else(|| fail(MalformedReason::LevelOutOfRange))?;
    let rest = &rest[digits..];
    if !rest.starts_with(is_delim) {
        return Err(fail(MalformedReason::MissingDelimiter));
    }
    let mut rest = rest.trim_start_matches(is_delim);

    // XREF
    let mut xref = None;
    if rest.starts_with('@') {
        let close = rest[1..]
            .find('@')
            .map(|idx| idx + 1)
            .ok_or_else(|| fail(MalformedReason::UnterminatedXref))?;
        let after = &rest[close + 1..];
        if close == 1 || !after.starts_with(is_delim) {
            return Err(fail(MalformedReason::UnterminatedXref));
        }
        xref = Some(rest[..=close].to_string());
        rest = after.trim_start_matches(is_delim);
    }

    // TAG
    let tag_len = rest.len() - rest.trim_start_matches(is_tag_char).len();
    if tag_len == 0 {
        return Err(fail(MalformedReason::MissingTag));
    }
    let tag = rest[..tag_len].to_ascii_uppercase();
    let rest = &rest[tag_len..];

    // VALUE
    let value = match rest.chars().next() {
        None => None,
        Some(ch) if is_delim(ch) => {
            let value = &rest[ch.len_utf8()..];
            (!value.is_empty()).then(|| value.to_string())
        }
        Some(_) => return Err(fail(MalformedReason::InvalidTag)),
    };

    if let Some(kind) = ContinuationKind::from_tag(&tag) {
        return Ok(ParsedLine::Continuation(Continuation {
            number,
            level,
            kind,
            value: value.unwrap_or_default(),
        }));
    }

    // A pointer payload is never text, so padding around it is dropped.
    let value = value.map(|value| {
        let trimmed = value.trim();
        if trimmed.len() != value.len() && is_pointer(trimmed) {
            trimmed.to_string()
        } else {
            value
        }
    });

    Ok(ParsedLine::Line(Line {
        number,
        level,
        xref,
        tag,
        value,
    }))
}
