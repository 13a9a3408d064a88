//! Translation progress counters.

use serde::Serialize;

use crate::types::{Document, Message, TranslationState};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StateCounts {
    pub total: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub vanished: usize,
    pub obsolete: usize,
    /// `finished / (finished + unfinished)` in percent, rounded to two decimals.
    pub completion_percent: f64,
}

impl StateCounts {
    fn add(&mut self, message: &Message) {
        self.total += 1;
        match message.translation.state {
            TranslationState::Finished => self.finished += 1,
            TranslationState::Unfinished => self.unfinished += 1,
            TranslationState::Vanished => self.vanished += 1,
            TranslationState::Obsolete => self.obsolete += 1,
        }
    }

    fn finish(mut self) -> Self {
        let active = self.finished + self.unfinished;
        let percent = if active == 0 {
            100.0
        } else {
            (self.finished as f64) * 100.0 / (active as f64)
        };
        self.completion_percent = (percent * 100.0).round() / 100.0;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextStats {
    pub context: String,
    #[serde(flatten)]
    pub counts: StateCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub summary: StateCounts,
    pub contexts: Vec<ContextStats>,
}

pub fn document_stats(doc: &Document) -> DocumentStats {
    let mut summary = StateCounts::default();
    let contexts = doc
        .contexts
        .iter()
        .map(|context| {
            let mut counts = StateCounts::default();
            for message in &context.messages {
                counts.add(message);
                summary.add(message);
            }
            ContextStats {
                context: context.name.clone(),
                counts: counts.finish(),
            }
        })
        .collect();

    DocumentStats {
        language: doc.language.clone(),
        summary: summary.finish(),
        contexts,
    }
}
