//! Runtime lookup of translations, following `QTranslator` semantics.

use std::{borrow::Cow, collections::HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    numerus::{NumerusRule, rule_for_language},
    placeholder::{arg_all, replace_count},
    traits::Parser,
    types::{Document, TranslationState, TranslationValue},
};

/// Options for [`Translator`], usually loaded from the `[translator]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorOptions {
    /// Also serve non-empty translations that are still unfinished.
    pub include_unfinished: bool,
}

type LookupKey = (String, String, String);

/// An immutable lookup table built from one or more documents.
///
/// # Example
///
/// ```rust
/// use tscodec::{Document, Message, Translation, Translator, TranslatorOptions};
///
/// let mut doc = Document::new(Some("ja_JP".to_string()));
/// let mut message = Message::new("JSON error: %1");
/// message.translation = Translation::finished("JSONエラー: %1");
/// doc.context_or_insert("QObject").messages.push(message);
///
/// let translator = Translator::from_document(&doc, &TranslatorOptions::default());
/// assert_eq!(
///     translator.tr_args("QObject", "JSON error: %1", &["EOF"]),
///     "JSONエラー: EOF"
/// );
/// assert_eq!(translator.tr("QObject", "Invalid JDF"), "Invalid JDF");
/// ```
#[derive(Debug, Clone)]
pub struct Translator {
    language: Option<String>,
    rule: NumerusRule,
    options: TranslatorOptions,
    entries: HashMap<LookupKey, TranslationValue>,
}

impl Translator {
    pub fn new(options: &TranslatorOptions) -> Self {
        Self {
            language: None,
            rule: NumerusRule::OneOther,
            options: options.clone(),
            entries: HashMap::new(),
        }
    }

    pub fn from_document(doc: &Document, options: &TranslatorOptions) -> Self {
        let mut translator = Self::new(options);
        translator.load(doc);
        translator
    }

    /// Reads a `.ts` file and builds a translator from it.
    pub fn from_file<P: AsRef<std::path::Path>>(
        path: P,
        options: &TranslatorOptions,
    ) -> Result<Self, Error> {
        let doc = Document::read_from(path)?;
        Ok(Self::from_document(&doc, options))
    }

    /// Merges the servable translations of `doc`; entries already present are
    /// replaced.
    pub fn load(&mut self, doc: &Document) {
        if let Some(lang) = &doc.language {
            self.rule = rule_for_language(lang);
            self.language = Some(lang.clone());
        }

        let mut loaded = 0usize;
        for (context, message) in doc.messages() {
            let translation = &message.translation;
            let servable = match translation.state {
                TranslationState::Finished => true,
                TranslationState::Unfinished => self.options.include_unfinished,
                TranslationState::Vanished | TranslationState::Obsolete => false,
            };
            if !servable || translation.is_empty() {
                continue;
            }
            self.entries.insert(
                (
                    context.to_string(),
                    message.source.clone(),
                    message.comment.clone().unwrap_or_default(),
                ),
                translation.value.clone(),
            );
            loaded += 1;
        }
        debug!(loaded, total = self.entries.len(), language = ?self.language, "loaded translations");
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&TranslationValue> {
        let comment = comment.unwrap_or("");
        let key = (context.to_string(), source.to_string(), comment.to_string());
        if let Some(value) = self.entries.get(&key) {
            return Some(value);
        }
        if comment.is_empty() {
            return None;
        }
        // A disambiguated lookup falls back to the plain message.
        self.entries
            .get(&(context.to_string(), source.to_string(), String::new()))
    }

    /// The translated text, or `None` when nothing servable exists.
    pub fn translate(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&str> {
        self.lookup(context, source, comment)?.primary()
    }

    /// Like [`Translator::translate`], falling back to the source text.
    pub fn tr<'a>(&'a self, context: &str, source: &'a str) -> Cow<'a, str> {
        match self.translate(context, source, None) {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Borrowed(source),
        }
    }

    /// Picks the numerus form for `n` and substitutes `%n`.
    pub fn translate_n(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        n: i64,
    ) -> Option<String> {
        let text = match self.lookup(context, source, comment)? {
            TranslationValue::Numerus(forms) => {
                let index = self.rule.form_index(n);
                forms
                    .get(index)
                    .or_else(|| forms.last())
                    .filter(|form| !form.is_empty())?
                    .as_str()
            }
            other => other.primary()?,
        };
        Some(replace_count(text, n))
    }

    /// Translates, then applies `QString::arg` for each argument.
    pub fn tr_args<S: AsRef<str>>(&self, context: &str, source: &str, args: &[S]) -> String {
        arg_all(&self.tr(context, source), args)
    }
}
