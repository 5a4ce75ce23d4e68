//! Header and trailer records.
//!
//! The output header always has the shape
//!
//! ```text
//! 0 HEAD
//! 1 GEDC
//! 2 VERS 7.0
//! 1 SCHMA
//! 2 TAG _FONE https://gedcom.io/terms/v5.5.1/FONE
//! ...
//! ```
//!
//! followed by whatever the source header carried that still has a 7.0 home.

use ged_model::{Record, Structure};
use tracing::debug;

use crate::rules::extension_tags;

/// Version written to `HEAD.GEDC.VERS`.
pub const GEDCOM_VERSION: &str = "7.0";

/// Base of the URIs documenting 5.5.1 tags kept as extensions.
pub const V551_TERMS: &str = "https://gedcom.io/terms/v5.5.1/";

/// Source header substructures carried into the new header, in output order.
const CARRIED: [&str; 9] = [
    "SOUR", "DEST", "DATE", "SUBM", "COPR", "LANG", "PLAC", "NOTE", "SNOTE",
];

/// `SCHMA` block declaring every extension tag the rules can produce.
#[must_use]
pub fn schema() -> Structure {
    extension_tags().fold(Structure::new("SCHMA"), |schma, (tag, original)| {
        schma.with_child(Structure::new("TAG").with_value(format!("{tag} {V551_TERMS}{original}")))
    })
}

/// A header with only the version marker and schema.
#[must_use]
pub fn minimal_header() -> Record {
    let root = Structure::new("HEAD")
        .with_child(
            Structure::new("GEDC").with_child(Structure::new("VERS").with_value(GEDCOM_VERSION)),
        )
        .with_child(schema());
    Record::new(None, root)
}

/// Build the 7.0 header from an already transformed source header.
///
/// Carried substructures keep their source order within each tag; extension
/// (`_`-prefixed) substructures follow them. Anything else is discarded.
#[must_use]
pub fn rewrite_header(source: Option<Record>) -> Record {
    let mut header = minimal_header();
    let Some(mut source) = source else {
        return header;
    };

    for tag in CARRIED {
        header.root.children.extend(source.root.take_children(tag));
    }
    for child in source.root.children {
        if child.tag.starts_with('_') {
            header.root.children.push(child);
        } else {
            debug!(tag = %child.tag, "header substructure discarded");
        }
    }
    header
}

/// The trailer record.
#[must_use]
pub fn trailer() -> Record {
    Record::new(None, Structure::new("TRLR"))
}
