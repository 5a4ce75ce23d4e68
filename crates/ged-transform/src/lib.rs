//! GEDCOM 5.5.1 to 7.0 structure rewriting.
//!
//! This crate provides the transformation stage of the converter:
//!
//! - **rules**: the ordered tag-rule table and its lookup by source tag path
//! - **enums**: free-text to enumeration-code tables, with `PHRASE` fallback
//! - **restructure**: subtree rewrites (addresses, external ids, media types)
//! - **escape**: 5.5.1 at-sign and calendar escapes
//! - **xref**: identifier normalization
//! - **header**: the 7.0 header and trailer
//! - **transformer**: the depth-first driver that applies all of the above

pub mod enums;
pub mod escape;
pub mod header;
pub mod restructure;
pub mod rules;
pub mod transformer;
pub mod xref;

pub use enums::{EnumOutcome, EnumRule};
pub use header::{minimal_header, rewrite_header, trailer};
pub use rules::{Action, Context, TagRule};
pub use transformer::{RewriteCounts, Transformer};
pub use xref::normalize_xref;
