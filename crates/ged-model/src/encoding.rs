//! Source character encodings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Character encoding of a GEDCOM 5.5.1 source.
///
/// | `HEAD.CHAR` value        | Encoding        |
/// |--------------------------|-----------------|
/// | `ANSEL`                  | ANSEL (Z39.47)  |
/// | `ASCII`                  | 7-bit ASCII     |
/// | `UTF-8`                  | UTF-8           |
/// | `UNICODE`                | UTF-16 (by BOM) |
/// | `ANSI`, `CP1252`, ...    | Windows-1252    |
/// | `MACINTOSH`              | Mac OS Roman    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceEncoding {
    /// ANSI Z39.47, the legacy genealogical 8-bit encoding.
    Ansel,
    /// Plain 7-bit text (default when no `CHAR` line is seen).
    #[default]
    Ascii,
    Utf8,
    Utf16Le,
    Utf16Be,
    /// Non-standard `ANSI` declarations.
    Windows1252,
    MacRoman,
}

impl SourceEncoding {
    /// Map a `HEAD.CHAR` payload to an encoding.
    ///
    /// Returns `None` for unrecognised declarations.
    #[must_use]
    pub fn from_declared(value: &str) -> Option<Self> {
        let key: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .map(|ch| ch.to_ascii_uppercase())
            .collect();
        match key.as_str() {
            "ANSEL" => Some(Self::Ansel),
            "ASCII" | "USASCII" => Some(Self::Ascii),
            "UTF8" => Some(Self::Utf8),
            "UNICODE" | "UTF16" | "UTF16LE" => Some(Self::Utf16Le),
            "UTF16BE" => Some(Self::Utf16Be),
            "ANSI" | "CP1252" | "WINDOWS1252" | "ISO88591" | "LATIN1" => Some(Self::Windows1252),
            "MACINTOSH" | "MACROMAN" => Some(Self::MacRoman),
            _ => None,
        }
    }

    /// True for the two-byte encodings, which are transcoded before line splitting.
    #[must_use]
    pub const fn is_utf16(self) -> bool {
        matches!(self, Self::Utf16Le | Self::Utf16Be)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ansel => "ANSEL",
            Self::Ascii => "ASCII",
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Windows1252 => "windows-1252",
            Self::MacRoman => "macintosh",
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
