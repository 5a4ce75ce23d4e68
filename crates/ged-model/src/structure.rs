//! Record trees.
//!
//! A [`Structure`] exclusively owns its children; a [`Record`] is the level-0
//! structure plus its defining identifier. Trees are built, transformed and
//! serialized one record at a time and never reference each other.

use crate::line::{Line, is_pointer};

/// One node of a record tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Structure {
    pub tag: String,
    pub value: Option<String>,
    pub children: Vec<Structure>,
    /// Level declared in the source, kept for diagnostics only.
    pub source_level: u8,
    /// Physical source line, 0 for synthesized structures.
    pub source_line: usize,
}

impl Structure {
    /// Create a synthesized structure with no value.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Build a structure from a parsed line (the identifier is not kept here).
    #[must_use]
    pub fn from_line(line: &Line) -> Self {
        Self {
            tag: line.tag.clone(),
            value: line.value.clone(),
            children: Vec::new(),
            source_level: line.level,
            source_line: line.number,
        }
    }

    /// Set the value (builder style).
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Append a child (builder style).
    #[must_use]
    pub fn with_child(mut self, child: Structure) -> Self {
        self.children.push(child);
        self
    }

    /// The value, or `""` when absent.
    #[must_use]
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// True when the value is present and non-empty.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// True when the value is a single `@ID@` pointer.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        self.value.as_deref().is_some_and(is_pointer)
    }

    /// Append continued text to the value.
    pub fn append_value(&mut self, separator: &str, text: &str) {
        let value = self.value.get_or_insert_with(String::new);
        value.push_str(separator);
        value.push_str(text);
    }

    /// First child with the given tag.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&Structure> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Remove and return every child with the given tag, preserving order.
    pub fn take_children(&mut self, tag: &str) -> Vec<Structure> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.children)
            .into_iter()
            .partition(|c| c.tag == tag);
        self.children = kept;
        taken
    }

    /// Number of structures in this subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Structure::subtree_len).sum::<usize>()
    }
}

/// A level-0 structure and its defining identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub xref: Option<String>,
    pub root: Structure,
}

impl Record {
    pub fn new(xref: Option<String>, root: Structure) -> Self {
        Self { xref, root }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.root.tag
    }

    #[must_use]
    pub fn is_header(&self) -> bool {
        self.root.tag == "HEAD"
    }

    #[must_use]
    pub fn is_trailer(&self) -> bool {
        self.root.tag == "TRLR"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_value_creates_missing_value() {
        let mut note = Structure::new("NOTE");
        note.append_value("\n", "second");
        assert_eq!(note.value.as_deref(), Some("\nsecond"));
        note.append_value("", " part");
        assert_eq!(note.value_str(), "\nsecond part");
    }

    #[test]
    fn take_children_keeps_order() {
        let mut addr = Structure::new("ADDR")
            .with_child(Structure::new("ADR1").with_value("a"))
            .with_child(Structure::new("CITY").with_value("c"))
            .with_child(Structure::new("ADR1").with_value("b"));
        let taken = addr.take_children("ADR1");
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[1].value_str(), "b");
        assert_eq!(addr.children.len(), 1);
        assert_eq!(addr.children[0].tag, "CITY");
    }

    #[test]
    fn subtree_len_counts_all_nodes() {
        let tree = Structure::new("INDI")
            .with_child(Structure::new("NAME").with_child(Structure::new("GIVN")))
            .with_child(Structure::new("SEX"));
        assert_eq!(tree.subtree_len(), 4);
    }

    #[test]
    fn pointer_values() {
        assert!(Structure::new("FAMC").with_value("@F1@").is_pointer());
        assert!(!Structure::new("NOTE").with_value("text").is_pointer());
        assert!(!Structure::new("NOTE").has_value());
    }
}
