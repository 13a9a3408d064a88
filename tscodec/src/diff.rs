//! Message-level comparison of two documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Context, Document, MessageKey, Translation};

/// A message identified by its key, as listed in a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffItem {
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub comment: String,
}

impl From<&MessageKey> for DiffItem {
    fn from(key: &MessageKey) -> Self {
        Self {
            source: key.source.clone(),
            comment: key.comment.clone(),
        }
    }
}

/// A message whose translation value or state differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffChangedItem {
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub comment: String,
    pub before: Translation,
    pub after: Translation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextDiff {
    pub context: String,
    /// Present only in the second document.
    pub added: Vec<DiffItem>,
    /// Present only in the first document.
    pub removed: Vec<DiffItem>,
    pub changed: Vec<DiffChangedItem>,
    pub unchanged: usize,
}

impl ContextDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub contexts: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffReport {
    pub summary: DiffSummary,
    pub contexts: Vec<ContextDiff>,
}

impl DiffReport {
    pub fn has_differences(&self) -> bool {
        self.summary.added + self.summary.removed + self.summary.changed > 0
    }
}

/// Compares `before` with `after` message by message.
///
/// Contexts are reported in the order they first appear in `before`, then
/// `after`; messages within a context in key order.
pub fn diff_documents(before: &Document, after: &Document) -> DiffReport {
    let mut names: Vec<&str> = Vec::new();
    for context in before.contexts.iter().chain(&after.contexts) {
        if !names.contains(&context.name.as_str()) {
            names.push(&context.name);
        }
    }

    let mut report = DiffReport::default();
    for name in names {
        let old = translations(before.context(name));
        let new = translations(after.context(name));

        let mut diff = ContextDiff {
            context: name.to_string(),
            ..ContextDiff::default()
        };

        let mut keys: Vec<&MessageKey> = old.keys().chain(new.keys()).collect();
        keys.sort();
        keys.dedup();

        for key in keys {
            match (old.get(key), new.get(key)) {
                (None, Some(_)) => diff.added.push(key.into()),
                (Some(_), None) => diff.removed.push(key.into()),
                (Some(a), Some(b)) if a != b => diff.changed.push(DiffChangedItem {
                    source: key.source.clone(),
                    comment: key.comment.clone(),
                    before: (*a).clone(),
                    after: (*b).clone(),
                }),
                (Some(_), Some(_)) => diff.unchanged += 1,
                (None, None) => {}
            }
        }

        report.summary.contexts += 1;
        report.summary.added += diff.added.len();
        report.summary.removed += diff.removed.len();
        report.summary.changed += diff.changed.len();
        report.summary.unchanged += diff.unchanged;
        report.contexts.push(diff);
    }

    report
}

fn translations(context: Option<&Context>) -> BTreeMap<MessageKey, &Translation> {
    context
        .map(|c| {
            c.messages
                .iter()
                .map(|m| (m.key(), &m.translation))
                .collect()
        })
        .unwrap_or_default()
}
