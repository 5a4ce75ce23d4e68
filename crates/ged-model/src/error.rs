//! Fatal conversion errors.
//!
//! Only two conditions stop a conversion: the byte source or sink failing, and
//! bytes that cannot be decoded under the declared source encoding. Structural
//! irregularities never surface here.

use thiserror::Error;

use crate::encoding::SourceEncoding;

/// Errors that abort a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Source unreadable or sink unwritable.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes on a line are not valid under the declared encoding.
    #[error("line {line}: cannot decode as {encoding}: {detail}")]
    Encoding {
        line: usize,
        encoding: SourceEncoding,
        detail: String,
    },
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Create an Encoding error.
    pub fn encoding(line: usize, encoding: SourceEncoding, detail: impl Into<String>) -> Self {
        Self::Encoding {
            line,
            encoding,
            detail: detail.into(),
        }
    }

    /// True for source/sink failures, false for format failures.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Physical line number for encoding failures.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Encoding { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
