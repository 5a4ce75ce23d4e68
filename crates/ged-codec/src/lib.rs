//! GEDCOM line codec.
//!
//! Reading turns a byte stream into a lazy sequence of record trees; writing
//! serializes record trees as GEDCOM 7.0 text.
//!
//! # Features
//!
//! - `\n`, `\r` and `\r\n` line terminators
//! - byte-order mark sniffing, UTF-16 transcoding
//! - ANSEL, ASCII, UTF-8, Windows-1252 and Mac Roman decoding per `HEAD.CHAR`
//! - `CONT`/`CONC` folding and tolerant level handling
//! - line-length limited output with `CONC` splitting on char boundaries
//!
//! # Example
//!
//! ```
//! use ged_codec::{GedWriter, RecordReader};
//!
//! let input = "0 @I1@ INDI\n1 NAME Ann\n2 CONC e\n0 TRLR\n";
//! let mut writer = GedWriter::new(Vec::new());
//! for record in RecordReader::new(input.as_bytes()) {
//!     writer.write_record(&record.unwrap()).unwrap();
//! }
//! let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(out, "0 @I1@ INDI\n1 NAME Anne\n0 TRLR\n");
//! ```

mod builder;
mod encoding;
mod parser;
mod reader;
mod writer;

// Re-export the shared model so callers need a single import.
pub use ged_model::{ConvertError, Record, Result, SourceEncoding, Structure};

pub use builder::RecordReader;
pub use encoding::LineDecoder;
pub use parser::{MAX_LEVEL, MalformedLine, MalformedReason, parse_line};
pub use reader::{LineReader, RawLine};
pub use writer::{GedWriter, split_text};
