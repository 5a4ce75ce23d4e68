//! Record transformer.
//!
//! Walks a record depth-first. For each structure the value is normalized
//! first (identifier folding for pointers, at-sign escapes for text), then the
//! children are transformed, then the first matching [`TagRule`] is applied.
//! A dropped structure is discarded without visiting its children.
//!
//! [`TagRule`]: crate::rules::TagRule

use std::borrow::Cow;

use ged_model::{ConversionStats, ConvertOptions, Record, Structure};
use tracing::trace;

use crate::enums::EnumOutcome;
use crate::escape::unescape;
use crate::rules::{self, Context, Outcome};
use crate::xref::normalize_xref;

/// Rewrite counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteCounts {
    pub renamed: usize,
    pub restructured: usize,
    pub dropped: usize,
    pub enum_matched: usize,
    pub phrases_added: usize,
    pub phrases_omitted: usize,
}

impl RewriteCounts {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Unchanged | Outcome::Enum(EnumOutcome::Empty) => {}
            Outcome::Renamed => self.renamed += 1,
            Outcome::Restructured => self.restructured += 1,
            Outcome::Dropped => self.dropped += 1,
            Outcome::Enum(EnumOutcome::Matched) => self.enum_matched += 1,
            Outcome::Enum(EnumOutcome::Phrase) => self.phrases_added += 1,
            Outcome::Enum(EnumOutcome::Omitted) => self.phrases_omitted += 1,
        }
    }

    /// Add these counts to run statistics.
    pub fn add_to(&self, stats: &mut ConversionStats) {
        stats.renamed += self.renamed;
        stats.restructured += self.restructured;
        stats.dropped += self.dropped;
        stats.enum_matched += self.enum_matched;
        stats.phrases_added += self.phrases_added;
        stats.phrases_omitted += self.phrases_omitted;
    }
}

/// Applies the rule table to records, one at a time.
#[derive(Debug, Clone)]
pub struct Transformer {
    options: ConvertOptions,
    counts: RewriteCounts,
}

impl Transformer {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            counts: RewriteCounts::default(),
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Counters accumulated so far.
    pub fn counts(&self) -> RewriteCounts {
        self.counts
    }

    /// Transform one record. Returns `None` when the record is dropped.
    pub fn transform(&mut self, record: Record) -> Option<Record> {
        let xref = record
            .xref
            .map(|xref| normalize_xref(&xref, self.options.xref_case_insensitive).into_owned());
        let mut path = Vec::new();
        let root = self.visit(record.root, &mut path)?;
        Some(Record::new(xref, root))
    }

    fn visit(&mut self, mut node: Structure, path: &mut Vec<String>) -> Option<Structure> {
        path.push(node.tag.clone());
        let rule = rules::lookup(path.as_slice());

        let result = if let Some(rule) = rule.filter(|r| matches!(r.action, rules::Action::Drop)) {
            trace!(path = %path.join("."), pattern = rule.pattern, "dropped");
            self.counts.record(Outcome::Dropped);
            None
        } else {
            self.normalize_value(&mut node);
            let children = std::mem::take(&mut node.children);
            node.children = children
                .into_iter()
                .filter_map(|child| self.visit(child, path))
                .collect();

            match rule {
                Some(rule) => {
                    let ctx = Context {
                        options: &self.options,
                        depth: path.len() - 1,
                    };
                    let (out, outcome) = rule.apply(node, &ctx);
                    trace!(path = %path.join("."), pattern = rule.pattern, ?outcome, "rule applied");
                    self.counts.record(outcome);
                    out
                }
                None => Some(node),
            }
        };

        path.pop();
        result
    }

    fn normalize_value(&self, node: &mut Structure) {
        let replacement = {
            let Some(value) = node.value.as_deref() else {
                return;
            };
            let normalized = if node.is_pointer() {
                normalize_xref(value, self.options.xref_case_insensitive)
            } else {
                unescape(value)
            };
            match normalized {
                Cow::Owned(value) => Some(value),
                Cow::Borrowed(_) => None,
            }
        };
        if replacement.is_some() {
            node.value = replacement;
        }
    }
}
