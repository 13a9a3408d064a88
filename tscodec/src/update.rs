//! Merging freshly extracted messages into an existing translation document.

use std::{collections::HashMap, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    numerus::rule_for_language,
    types::{Context, Document, Message, MessageKey, Translation, TranslationState, TranslationValue},
};

/// How locations are written after an update or normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStyle {
    /// lupdate's default: `line="+N"` with repeated filenames omitted.
    #[default]
    Relative,
    Absolute,
    None,
}

impl LocationStyle {
    pub fn apply(&self, doc: &mut Document) {
        match self {
            LocationStyle::Relative => doc.relativize_locations(),
            LocationStyle::Absolute => doc.resolve_locations(),
            LocationStyle::None => doc.strip_locations(),
        }
    }
}

impl FromStr for LocationStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relative" => Ok(LocationStyle::Relative),
            "absolute" => Ok(LocationStyle::Absolute),
            "none" => Ok(LocationStyle::None),
            other => Err(Error::invalid_document(format!(
                "unknown location style `{}`",
                other
            ))),
        }
    }
}

/// Options for [`update_document`], usually loaded from the `[update]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateOptions {
    /// Drop messages that disappeared from the code instead of marking them vanished.
    pub no_obsolete: bool,
    /// Offer a finished translation of the same source from another context
    /// as the translator comment of a new message.
    pub same_text_heuristic: bool,
    pub locations: LocationStyle,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            no_obsolete: false,
            same_text_heuristic: true,
            locations: LocationStyle::Relative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Messages found again with their translation kept.
    pub kept: usize,
    /// New messages without any translation.
    pub added: usize,
    /// Vanished or obsolete messages that reappeared in the code.
    pub revived: usize,
    /// New messages given a suggestion by the same-text heuristic.
    pub same_text: usize,
    pub vanished: usize,
    pub pruned: usize,
}

/// Old messages of one context, removable by key.
struct Pool {
    name: String,
    comment: Option<String>,
    slots: Vec<Option<Message>>,
    index: HashMap<MessageKey, usize>,
}

impl Pool {
    fn new(context: Context) -> Self {
        let mut index = HashMap::new();
        for (i, message) in context.messages.iter().enumerate() {
            index.entry(message.key()).or_insert(i);
        }
        Self {
            name: context.name,
            comment: context.comment,
            slots: context.messages.into_iter().map(Some).collect(),
            index,
        }
    }

    fn take_message(&mut self, key: &MessageKey) -> Option<Message> {
        let i = self.index.remove(key)?;
        self.slots[i].take()
    }

    fn remaining(self) -> impl Iterator<Item = Message> {
        self.slots.into_iter().flatten()
    }
}

/// Updates `existing` in place so it holds exactly the messages of `extracted`,
/// keeping translations and marking the rest vanished.
///
/// # Example
///
/// ```rust
/// use tscodec::{Document, Message, Translation, UpdateOptions, update_document};
///
/// let mut existing = Document::new(Some("ja_JP".to_string()));
/// let mut old = Message::new("Invalid JDF");
/// old.translation = Translation::finished("無効なJDF");
/// existing.context_or_insert("QObject").messages.push(old);
///
/// let mut extracted = Document::default();
/// extracted
///     .context_or_insert("QObject")
///     .messages
///     .push(Message::new("JSON error: %1").with_location("../abstractrestapi.cpp", 256));
///
/// let report = update_document(&mut existing, &extracted, &UpdateOptions::default());
/// assert_eq!((report.added, report.vanished), (1, 1));
/// ```
pub fn update_document(
    existing: &mut Document,
    extracted: &Document,
    options: &UpdateOptions,
) -> UpdateReport {
    let mut report = UpdateReport::default();
    let form_count = existing
        .language
        .as_deref()
        .map(|lang| rule_for_language(lang).form_count())
        .unwrap_or(2);

    let mut known: HashMap<&str, &TranslationValue> = HashMap::new();
    if options.same_text_heuristic {
        for (_, message) in existing.messages() {
            if message.translation.state == TranslationState::Finished
                && !message.translation.is_empty()
            {
                known
                    .entry(message.source.as_str())
                    .or_insert(&message.translation.value);
            }
        }
    }
    let known: HashMap<String, TranslationValue> = known
        .into_iter()
        .map(|(source, value)| (source.to_string(), value.clone()))
        .collect();

    let mut pools: Vec<Pool> = std::mem::take(&mut existing.contexts)
        .into_iter()
        .map(Pool::new)
        .collect();

    let mut contexts: Vec<Context> = Vec::new();
    for fresh in &extracted.contexts {
        let mut pool = pools.iter_mut().find(|p| p.name == fresh.name);
        let mut context = Context {
            name: fresh.name.clone(),
            comment: pool
                .as_ref()
                .and_then(|p| p.comment.clone())
                .or_else(|| fresh.comment.clone()),
            messages: Vec::with_capacity(fresh.messages.len()),
        };

        for message in &fresh.messages {
            let previous = pool.as_mut().and_then(|p| p.take_message(&message.key()));
            let merged = match previous {
                Some(mut old) => {
                    old.locations = message.locations.clone();
                    old.extracomment = message.extracomment.clone();
                    old.numerus = message.numerus;
                    if old.translation.state.is_active() {
                        report.kept += 1;
                    } else {
                        old.translation.state = if old.translation.is_empty() {
                            TranslationState::Unfinished
                        } else {
                            TranslationState::Finished
                        };
                        report.revived += 1;
                    }
                    old
                }
                None => {
                    let mut new = message.clone();
                    new.translation = Translation {
                        state: TranslationState::Unfinished,
                        value: if message.numerus {
                            TranslationValue::Numerus(vec![String::new(); form_count])
                        } else {
                            TranslationValue::default()
                        },
                    };
                    match known.get(&message.source) {
                        Some(value)
                            if matches!(value, TranslationValue::Numerus(_)) == message.numerus =>
                        {
                            // Unfinished messages must stay empty, so the match
                            // is offered as a translator note.
                            report.same_text += 1;
                            if new.translatorcomment.is_none() {
                                new.translatorcomment = Some(value.to_string());
                            }
                        }
                        _ => report.added += 1,
                    }
                    new
                }
            };
            context.messages.push(merged);
        }
        contexts.push(context);
    }

    for pool in pools {
        let name = pool.name.clone();
        let comment = pool.comment.clone();
        let mut leftovers = Vec::new();
        for mut message in pool.remaining() {
            if options.no_obsolete || message.translation.is_empty() {
                report.pruned += 1;
                continue;
            }
            if message.translation.state != TranslationState::Obsolete {
                message.translation.state = TranslationState::Vanished;
            }
            message.locations.clear();
            report.vanished += 1;
            leftovers.push(message);
        }
        if leftovers.is_empty() {
            continue;
        }
        match contexts.iter_mut().find(|c| c.name == name) {
            Some(context) => context.messages.extend(leftovers),
            None => contexts.push(Context {
                name,
                comment,
                messages: leftovers,
            }),
        }
    }

    existing.contexts = contexts;
    options.locations.apply(existing);

    debug!(
        kept = report.kept,
        added = report.added,
        revived = report.revived,
        same_text = report.same_text,
        vanished = report.vanished,
        pruned = report.pruned,
        "updated document"
    );
    report
}
