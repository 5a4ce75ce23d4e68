//! The 5.5.1 to 7.0 rule table.

use super::{Action, TagRule};
use crate::enums::{ADOP, MEDI, NAME_TYPE, ORD_STAT, PEDI, RESN, ROLE, SEX};
use crate::restructure::{address, external_id, language, media_type, shared_note};

const fn rule(pattern: &'static str, action: Action) -> TagRule {
    TagRule { pattern, action }
}

/// Ordered rule table; first match wins.
pub static RULES: &[TagRule] = &[
    // No 7.0 counterpart.
    rule("SUBN", Action::Drop),
    rule("*.SUBN", Action::Drop),
    rule("*.BLOB", Action::Drop),
    rule("*.CHAR", Action::Drop),
    rule("*.GEDC", Action::Drop),
    rule("HEAD.FILE", Action::Drop),
    rule("*.ASSO.TYPE", Action::Drop),
    // Renamed in 7.0.
    rule("*.EMAI", Action::Rename("EMAIL")),
    rule("*._UID", Action::Rename("UID")),
    // Kept as extensions.
    rule("*.FONE", Action::Rename("_FONE")),
    rule("*.ROMN", Action::Rename("_ROMN")),
    rule("*.ANCI", Action::Rename("_ANCI")),
    rule("*.DESI", Action::Rename("_DESI")),
    // Reshaped.
    rule("*.ADDR", Action::Restructure(address)),
    rule("*.AFN", Action::Restructure(external_id)),
    rule("*.RFN", Action::Restructure(external_id)),
    rule("*.RIN", Action::Restructure(external_id)),
    rule("NOTE", Action::Restructure(shared_note)),
    rule("*.NOTE", Action::Restructure(shared_note)),
    rule("*.PLAC.FORM", Action::Passthrough),
    rule("*.FORM", Action::Restructure(media_type)),
    rule("*.LANG", Action::Restructure(language)),
    // Enumerations.
    rule("*.SEX", Action::EnumMap { rule: &SEX, rename: None }),
    rule("*.FAMC.PEDI", Action::EnumMap { rule: &PEDI, rename: None }),
    rule("*.ADOP.FAMC.ADOP", Action::EnumMap { rule: &ADOP, rename: None }),
    rule("*.RESN", Action::EnumMap { rule: &RESN, rename: None }),
    rule("*.NAME.TYPE", Action::EnumMap { rule: &NAME_TYPE, rename: None }),
    rule("*.ASSO.RELA", Action::EnumMap { rule: &ROLE, rename: Some("ROLE") }),
    rule("*.EVEN.ROLE", Action::EnumMap { rule: &ROLE, rename: None }),
    rule("*.FORM.TYPE", Action::EnumMap { rule: &MEDI, rename: Some("MEDI") }),
    rule("*.CALN.MEDI", Action::EnumMap { rule: &MEDI, rename: None }),
    rule("*.BAPL.STAT", Action::EnumMap { rule: &ORD_STAT, rename: None }),
    rule("*.CONL.STAT", Action::EnumMap { rule: &ORD_STAT, rename: None }),
    rule("*.ENDL.STAT", Action::EnumMap { rule: &ORD_STAT, rename: None }),
    rule("*.SLGC.STAT", Action::EnumMap { rule: &ORD_STAT, rename: None }),
    rule("*.SLGS.STAT", Action::EnumMap { rule: &ORD_STAT, rename: None }),
];
