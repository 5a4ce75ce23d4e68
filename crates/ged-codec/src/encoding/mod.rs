//! Encoding normalizer.
//!
//! Decodes each raw line into UTF-8 text under the source encoding. The
//! encoding starts as the one sniffed from a byte-order mark, or ASCII, and
//! may be replaced once by the header's `CHAR` declaration.

mod ansel;

use encoding_rs::{Encoding, MACINTOSH, WINDOWS_1252};
use ged_model::{ConvertError, Result, SourceEncoding};
use tracing::debug;

use crate::reader::RawLine;

/// Per-stream line decoder.
#[derive(Debug, Clone)]
pub struct LineDecoder {
    encoding: SourceEncoding,
    /// Set when the encoding came from the byte stream itself.
    sniffed: bool,
}

impl LineDecoder {
    /// Create a decoder, seeded with the encoding detected from a byte-order
    /// mark when there was one.
    pub fn new(detected: Option<SourceEncoding>) -> Self {
        match detected {
            Some(encoding) => Self {
                encoding,
                sniffed: true,
            },
            None => Self {
                encoding: SourceEncoding::default(),
                sniffed: false,
            },
        }
    }

    /// Encoding currently used for decoding.
    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    /// Apply a `HEAD.CHAR` declaration. Returns true when the encoding changed.
    ///
    /// A sniffed encoding always wins over the declaration, and a UTF-16
    /// declaration without a byte-order mark cannot be honoured since the
    /// lines were already split as 8-bit text.
    pub fn declare(&mut self, declared: SourceEncoding) -> bool {
        if self.sniffed {
            if declared != self.encoding {
                debug!(
                    declared = %declared,
                    detected = %self.encoding,
                    "CHAR declaration ignored, byte-order mark takes precedence"
                );
            }
            return false;
        }
        if declared.is_utf16() {
            debug!(declared = %declared, "CHAR declares UTF-16 but no byte-order mark was found");
            return false;
        }
        let changed = declared != self.encoding;
        self.encoding = declared;
        changed
    }

    /// Decode one raw line.
    pub fn decode(&self, line: &RawLine) -> Result<String> {
        match self.encoding {
            SourceEncoding::Ascii => decode_ascii(line),
            SourceEncoding::Utf8 | SourceEncoding::Utf16Le | SourceEncoding::Utf16Be => {
                // UTF-16 sources were transcoded to UTF-8 by the reader.
                String::from_utf8(line.bytes.clone()).map_err(|e| {
                    let column = e.utf8_error().valid_up_to() + 1;
                    ConvertError::encoding(
                        line.number,
                        self.encoding,
                        format!("invalid UTF-8 sequence at column {column}"),
                    )
                })
            }
            SourceEncoding::Windows1252 => Ok(decode_single_byte(WINDOWS_1252, &line.bytes)),
            SourceEncoding::MacRoman => Ok(decode_single_byte(MACINTOSH, &line.bytes)),
            SourceEncoding::Ansel => ansel::decode(&line.bytes).map_err(|(column, byte)| {
                ConvertError::encoding(
                    line.number,
                    SourceEncoding::Ansel,
                    format!("undefined byte 0x{byte:02X} at column {column}"),
                )
            }),
        }
    }
}

fn decode_ascii(line: &RawLine) -> Result<String> {
    if let Some(idx) = line.bytes.iter().position(|b| !b.is_ascii()) {
        return Err(ConvertError::encoding(
            line.number,
            SourceEncoding::Ascii,
            format!("byte 0x{:02X} at column {}", line.bytes[idx], idx + 1),
        ));
    }
    Ok(line.bytes.iter().copied().map(char::from).collect())
}

/// Single-byte legacy code pages map every byte, so decoding cannot fail.
fn decode_single_byte(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}
