//! Enumeration tables and free-text mapping.
//!
//! Each [`EnumRule`] maps upper-cased 5.5.1 free text to a 7.0 enumeration
//! code. Values are trimmed and upper-cased before lookup.

use ged_model::Structure;

/// Tag of the child carrying unmatched free text.
pub const PHRASE_TAG: &str = "PHRASE";

/// A static free-text to enumeration-code table.
#[derive(Debug)]
pub struct EnumRule {
    /// Name used in logs.
    pub name: &'static str,
    /// `(upper-cased legacy text, code)` pairs.
    pub legacy_values: &'static [(&'static str, &'static str)],
}

impl EnumRule {
    /// Look up free text, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn lookup(&self, value: &str) -> Option<&'static str> {
        let key = value.trim().to_uppercase();
        self.legacy_values
            .iter()
            .find(|(legacy, _)| *legacy == key)
            .map(|(_, code)| *code)
    }

    /// Every code this rule can produce, without duplicates.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.legacy_values
            .iter()
            .enumerate()
            .filter(|(idx, (_, code))| {
                !self.legacy_values[..*idx].iter().any(|(_, seen)| seen == code)
            })
            .map(|(_, (_, code))| *code)
    }
}

/// What happened to one enumeration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumOutcome {
    /// Value was empty; nothing to map.
    Empty,
    /// Value replaced by a code.
    Matched,
    /// Value emptied, original text kept as a `PHRASE` child.
    Phrase,
    /// Value emptied, original text discarded.
    Omitted,
}

/// Map a structure's value through `rule`.
pub fn apply(rule: &EnumRule, node: &mut Structure, omit_phrases: bool) -> EnumOutcome {
    let Some(text) = node.value.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return EnumOutcome::Empty;
    };

    if let Some(code) = rule.lookup(text) {
        node.value = Some(code.to_string());
        return EnumOutcome::Matched;
    }

    let phrase = text.to_string();
    node.value = None;
    if omit_phrases {
        EnumOutcome::Omitted
    } else {
        node.children
            .insert(0, Structure::new(PHRASE_TAG).with_value(phrase));
        EnumOutcome::Phrase
    }
}

pub static SEX: EnumRule = EnumRule {
    name: "SEX",
    legacy_values: &[
        ("M", "M"),
        ("MALE", "M"),
        ("F", "F"),
        ("FEMALE", "F"),
        ("U", "U"),
        ("UNKNOWN", "U"),
        ("X", "X"),
        ("INTERSEX", "X"),
    ],
};

pub static PEDI: EnumRule = EnumRule {
    name: "PEDI",
    legacy_values: &[
        ("ADOPTED", "ADOPTED"),
        ("BIRTH", "BIRTH"),
        ("FOSTER", "FOSTER"),
        ("SEALING", "SEALING"),
    ],
};

pub static ADOP: EnumRule = EnumRule {
    name: "ADOP",
    legacy_values: &[("HUSB", "HUSB"), ("WIFE", "WIFE"), ("BOTH", "BOTH")],
};

pub static RESN: EnumRule = EnumRule {
    name: "RESN",
    legacy_values: &[
        ("CONFIDENTIAL", "CONFIDENTIAL"),
        ("LOCKED", "LOCKED"),
        ("PRIVACY", "PRIVACY"),
    ],
};

pub static NAME_TYPE: EnumRule = EnumRule {
    name: "NAME.TYPE",
    legacy_values: &[
        ("AKA", "AKA"),
        ("ALSO KNOWN AS", "AKA"),
        ("BIRTH", "BIRTH"),
        ("IMMIGRANT", "IMMIGRANT"),
        ("MAIDEN", "MAIDEN"),
        ("MARRIED", "MARRIED"),
        ("PROFESSIONAL", "PROFESSIONAL"),
    ],
};

pub static ROLE: EnumRule = EnumRule {
    name: "ROLE",
    legacy_values: &[
        ("CHIL", "CHIL"),
        ("CHILD", "CHIL"),
        ("CLERGY", "CLERGY"),
        ("FATH", "FATH"),
        ("FATHER", "FATH"),
        ("FRIEND", "FRIEND"),
        ("GODP", "GODP"),
        ("GODPARENT", "GODP"),
        ("GODFATHER", "GODP"),
        ("GODMOTHER", "GODP"),
        ("HUSB", "HUSB"),
        ("HUSBAND", "HUSB"),
        ("MOTH", "MOTH"),
        ("MOTHER", "MOTH"),
        ("MULTIPLE", "MULTIPLE"),
        ("NGHBR", "NGHBR"),
        ("NEIGHBOR", "NGHBR"),
        ("NEIGHBOUR", "NGHBR"),
        ("OFFICIATOR", "OFFICIATOR"),
        ("PARENT", "PARENT"),
        ("SPOU", "SPOU"),
        ("SPOUSE", "SPOU"),
        ("WIFE", "WIFE"),
        ("WITN", "WITN"),
        ("WITNESS", "WITN"),
        ("OTHER", "OTHER"),
    ],
};

pub static MEDI: EnumRule = EnumRule {
    name: "MEDI",
    legacy_values: &[
        ("AUDIO", "AUDIO"),
        ("BOOK", "BOOK"),
        ("CARD", "CARD"),
        ("ELECTRONIC", "ELECTRONIC"),
        ("FICHE", "FICHE"),
        ("FILM", "FILM"),
        ("MAGAZINE", "MAGAZINE"),
        ("MANUSCRIPT", "MANUSCRIPT"),
        ("MAP", "MAP"),
        ("NEWSPAPER", "NEWSPAPER"),
        ("PHOTO", "PHOTO"),
        ("PHOTOGRAPH", "PHOTO"),
        ("TOMBSTONE", "TOMBSTONE"),
        ("VIDEO", "VIDEO"),
    ],
};

/// Latter-day Saint ordinance status.
pub static ORD_STAT: EnumRule = EnumRule {
    name: "STAT",
    legacy_values: &[
        ("BIC", "BIC"),
        ("CANCELED", "CANCELED"),
        ("CANCELLED", "CANCELED"),
        ("CHILD", "CHILD"),
        ("COMPLETED", "COMPLETED"),
        ("DNS", "DNS"),
        ("DNS/CAN", "DNS_CAN"),
        ("DNS_CAN", "DNS_CAN"),
        ("EXCLUDED", "EXCLUDED"),
        ("INFANT", "INFANT"),
        ("PRE-1970", "PRE_1970"),
        ("PRE_1970", "PRE_1970"),
        ("STILLBORN", "STILLBORN"),
        ("SUBMITTED", "SUBMITTED"),
        ("UNCLEARED", "UNCLEARED"),
    ],
};
