//! Tag rules.
//!
//! A [`TagRule`] pairs a tag-path pattern with an [`Action`]. Patterns are
//! written in 5.5.1 tags, joined with `.`:
//!
//! - `INDI.SEX` matches only that exact path from the record root
//! - `*.SEX` matches any path ending in `SEX`
//!
//! The table in [`table`] is ordered; the first matching rule wins, so more
//! specific patterns come before general ones.

mod table;

use std::collections::HashMap;
use std::sync::LazyLock;

use ged_model::{ConvertOptions, Structure};

use crate::enums::{self, EnumOutcome, EnumRule};

pub use table::RULES;

/// Read-only state available to rewrites.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub options: &'a ConvertOptions,
    /// Depth of the structure being rewritten; 0 for a record root.
    pub depth: usize,
}

/// Subtree rewrite function.
pub type RestructureFn = fn(Structure, &Context<'_>) -> Structure;

/// What a rule does to a matching structure.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    /// Replace the tag.
    Rename(&'static str),
    /// Rebuild the subtree.
    Restructure(RestructureFn),
    /// Remove the structure and its subtree.
    Drop,
    /// Map the value through an enumeration, optionally renaming the tag.
    EnumMap {
        rule: &'static EnumRule,
        rename: Option<&'static str>,
    },
    /// Keep as is.
    Passthrough,
}

/// Result of applying an action, for bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Renamed,
    Restructured,
    Dropped,
    Enum(EnumOutcome),
}

/// One entry of the rule table.
#[derive(Debug)]
pub struct TagRule {
    pub pattern: &'static str,
    pub action: Action,
}

impl TagRule {
    /// True when the pattern matches `path` (record root first).
    pub fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        match self.pattern.strip_prefix("*.") {
            Some(suffix) => {
                let segments: Vec<&str> = suffix.split('.').collect();
                path.len() >= segments.len()
                    && path[path.len() - segments.len()..]
                        .iter()
                        .zip(&segments)
                        .all(|(tag, segment)| tag.as_ref() == *segment)
            }
            None => {
                let mut segments = self.pattern.split('.');
                path.iter()
                    .all(|tag| segments.next() == Some(tag.as_ref()))
                    && segments.next().is_none()
            }
        }
    }

    /// Rewrite a structure; `None` when it is dropped.
    pub fn rewrite(&self, node: Structure, ctx: &Context<'_>) -> Option<Structure> {
        self.apply(node, ctx).0
    }

    /// Rewrite a structure and report what happened.
    pub fn apply(&self, mut node: Structure, ctx: &Context<'_>) -> (Option<Structure>, Outcome) {
        match self.action {
            Action::Rename(tag) => {
                node.tag = tag.to_string();
                (Some(node), Outcome::Renamed)
            }
            Action::Restructure(rewrite) => (Some(rewrite(node, ctx)), Outcome::Restructured),
            Action::Drop => (None, Outcome::Dropped),
            Action::EnumMap { rule, rename } => {
                if let Some(tag) = rename {
                    node.tag = tag.to_string();
                }
                let outcome = enums::apply(rule, &mut node, ctx.options.omit_phrases);
                (Some(node), Outcome::Enum(outcome))
            }
            Action::Passthrough => (Some(node), Outcome::Unchanged),
        }
    }
}

/// Rules indexed by the last tag of their pattern, in table order.
static BY_LAST_TAG: LazyLock<HashMap<&'static str, Vec<&'static TagRule>>> = LazyLock::new(|| {
    let mut map: HashMap<&'static str, Vec<&'static TagRule>> = HashMap::new();
    for rule in RULES {
        let last = rule.pattern.rsplit('.').next().unwrap_or(rule.pattern);
        map.entry(last).or_default().push(rule);
    }
    map
});

/// First rule matching `path`, if any.
pub fn lookup<S: AsRef<str>>(path: &[S]) -> Option<&'static TagRule> {
    let last = path.last()?.as_ref();
    BY_LAST_TAG
        .get(last)?
        .iter()
        .copied()
        .find(|rule| rule.matches(path))
}

/// Extension tags produced by renames, with their 5.5.1 originals.
pub fn extension_tags() -> impl Iterator<Item = (&'static str, &'static str)> {
    RULES.iter().filter_map(|rule| match rule.action {
        Action::Rename(tag) if tag.starts_with('_') => {
            let original = rule.pattern.rsplit('.').next().unwrap_or(rule.pattern);
            Some((tag, original))
        }
        _ => None,
    })
}
