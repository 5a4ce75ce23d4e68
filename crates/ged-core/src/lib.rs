//! GEDCOM 5.5.1 to 7.0 conversion.
//!
//! The pipeline is a single forward pass over the source:
//!
//! 1. **Read**: split the byte stream into lines and decode them
//!    ([`ged_codec::RecordReader`])
//! 2. **Build**: group lines into one record tree per level-0 line
//! 3. **Transform**: apply the 5.5.1 to 7.0 rule table
//!    ([`ged_transform::Transformer`])
//! 4. **Header/trailer**: replace the header, guarantee a trailer
//! 5. **Write**: serialize 7.0 lines ([`ged_codec::GedWriter`])
//!
//! Only one record is held in memory at a time.
//!
//! # Example
//!
//! ```
//! use ged_core::{ConvertOptions, convert};
//!
//! let input = "0 HEAD\n1 CHAR ASCII\n0 @I1@ INDI\n1 SEX Male\n0 TRLR\n";
//! let mut output = Vec::new();
//! let stats = convert(input.as_bytes(), &mut output, &ConvertOptions::default()).unwrap();
//!
//! let text = String::from_utf8(output).unwrap();
//! assert!(text.contains("0 @I1@ INDI\n1 SEX M\n"));
//! assert_eq!(stats.enum_matched, 1);
//! ```

mod convert;

pub use convert::convert;

// Re-export the types callers need alongside `convert`.
pub use ged_model::{ConversionStats, ConvertError, ConvertOptions, Result, SourceEncoding};
