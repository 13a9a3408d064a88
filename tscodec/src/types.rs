//! Core types for tscodec.
//! Parsers decode into these; encoders serialize these.

use std::{
    collections::HashMap,
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// Default `<TS version>` written by current lupdate releases.
pub const DEFAULT_TS_VERSION: &str = "2.1";

/// A complete Linguist translation document (one `.ts` file).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Document {
    /// Value of `<TS version>`.
    pub version: String,

    /// Target language, e.g. `ja_JP`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub language: Option<String>,

    /// Language of the source strings, e.g. `en_US`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub source_language: Option<String>,

    /// Contexts in document order.
    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: DEFAULT_TS_VERSION.to_string(),
            language: None,
            source_language: None,
            contexts: Vec::new(),
        }
    }
}

impl Document {
    /// Creates an empty document for the given target language.
    pub fn new(language: Option<String>) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Returns the context with `name`, appending an empty one if needed.
    pub fn context_or_insert(&mut self, name: &str) -> &mut Context {
        let idx = match self.contexts.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.contexts.push(Context::new(name));
                self.contexts.len() - 1
            }
        };
        &mut self.contexts[idx]
    }

    /// Finds a message by its lookup key inside `context`.
    pub fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        self.context(context)?.find(source, comment)
    }

    pub fn find_mut(
        &mut self,
        context: &str,
        source: &str,
        comment: Option<&str>,
    ) -> Option<&mut Message> {
        self.context_mut(context)?.find_mut(source, comment)
    }

    /// Iterates over every message together with its context name.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c.name.as_str(), m)))
    }

    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    /// Stores a translator-supplied value on an existing message.
    pub fn set_translation(
        &mut self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        value: TranslationValue,
        state: TranslationState,
    ) -> Result<(), Error> {
        let message =
            self.find_mut(context, source, comment)
                .ok_or_else(|| Error::MessageNotFound {
                    context: context.to_string(),
                    source_text: source.to_string(),
                })?;
        message.translation = Translation { state, value };
        Ok(())
    }

    pub fn parse_language_identifier(&self) -> Option<LanguageIdentifier> {
        self.language
            .as_deref()
            .and_then(|lang| lang.replace('_', "-").parse().ok())
    }

    /// Rewrites every relative location (`line="+3"`) to an absolute one.
    ///
    /// A location without `filename` refers to the file of the previous
    /// location; relative offsets accumulate per file across messages.
    pub fn resolve_locations(&mut self) {
        let mut last_line: HashMap<String, i64> = HashMap::new();
        let mut current_file: Option<String> = None;

        for message in self.contexts.iter_mut().flat_map(|c| c.messages.iter_mut()) {
            for location in &mut message.locations {
                if let Some(name) = &location.filename {
                    current_file = Some(name.clone());
                } else if let Some(name) = &current_file {
                    location.filename = Some(name.clone());
                }
                let Some(file) = location.filename.clone() else {
                    continue;
                };
                let line = match location.line {
                    Some(LineNumber::Absolute(n)) => i64::from(n),
                    Some(LineNumber::Relative(delta)) => {
                        last_line.get(&file).copied().unwrap_or(0) + delta
                    }
                    None => continue,
                };
                last_line.insert(file, line);
                location.line = Some(LineNumber::Absolute(line.clamp(0, i64::from(u32::MAX)) as u32));
            }
        }
    }

    /// Rewrites locations into lupdate's relative form.
    pub fn relativize_locations(&mut self) {
        self.resolve_locations();

        let mut last_line: HashMap<String, i64> = HashMap::new();
        let mut previous_file: Option<String> = None;

        for message in self.contexts.iter_mut().flat_map(|c| c.messages.iter_mut()) {
            for location in &mut message.locations {
                let Some(file) = location.filename.clone() else {
                    continue;
                };
                if let Some(LineNumber::Absolute(n)) = location.line {
                    let line = i64::from(n);
                    let base = last_line.get(&file).copied().unwrap_or(0);
                    location.line = Some(LineNumber::Relative(line - base));
                    last_line.insert(file.clone(), line);
                }
                if previous_file.as_deref() == Some(file.as_str()) {
                    location.filename = None;
                }
                previous_file = Some(file);
            }
        }
    }

    pub fn strip_locations(&mut self) {
        for message in self.contexts.iter_mut().flat_map(|c| c.messages.iter_mut()) {
            message.locations.clear();
        }
    }

    /// Sorts contexts by name and messages by first location, then source.
    pub fn sort(&mut self) {
        self.resolve_locations();
        self.contexts.sort_by(|a, b| a.name.cmp(&b.name));
        for context in &mut self.contexts {
            context.messages.sort_by(|a, b| {
                let la = a.locations.first().map(Location::sort_key);
                let lb = b.locations.first().map(Location::sort_key);
                la.cmp(&lb).then_with(|| a.source.cmp(&b.source))
            });
        }
    }
}

/// A named group of messages (`<context>`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Context {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            messages: Vec::new(),
        }
    }

    pub fn find(&self, source: &str, comment: Option<&str>) -> Option<&Message> {
        self.messages.iter().find(|m| m.matches(source, comment))
    }

    pub fn find_mut(&mut self, source: &str, comment: Option<&str>) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.matches(source, comment))
    }
}

/// Lookup key of a message inside its context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub source: String,
    pub comment: String,
}

/// A single translation unit (`<message>`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub id: Option<String>,

    /// `numerus="yes"`: the translation carries one form per plural rule.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    #[serde(default)]
    pub numerus: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub locations: Vec<Location>,

    /// Source text, kept byte-exact.
    pub source: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub oldsource: Option<String>,

    /// Disambiguation comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub oldcomment: Option<String>,

    /// Developer note for translators (`//:` in the code).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub extracomment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub translatorcomment: Option<String>,

    #[serde(default)]
    pub translation: Translation,
}

impl Message {
    /// Creates an untranslated message, as emitted by extraction.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.locations.push(Location::new(filename, line));
        self
    }

    pub fn key(&self) -> MessageKey {
        MessageKey {
            source: self.source.clone(),
            comment: self.comment.clone().unwrap_or_default(),
        }
    }

    /// An absent comment and an empty comment are the same key.
    pub fn matches(&self, source: &str, comment: Option<&str>) -> bool {
        self.source == source
            && self.comment.as_deref().unwrap_or("") == comment.unwrap_or("")
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message {{ source: {:?}, translation: {}, state: {} }}",
            self.source, self.translation.value, self.translation.state
        )
    }
}

/// Provenance of a message (`<location>`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Location {
    /// `None` means "same file as the previous location".
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub line: Option<LineNumber>,
}

impl Location {
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self {
            filename: Some(filename.into()),
            line: Some(LineNumber::Absolute(line)),
        }
    }

    fn sort_key(&self) -> (String, i64) {
        let line = match self.line {
            Some(LineNumber::Absolute(n)) => i64::from(n),
            Some(LineNumber::Relative(d)) => d,
            None => 0,
        };
        (self.filename.clone().unwrap_or_default(), line)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.filename, &self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}", file, line),
            (Some(file), None) => write!(f, "{}", file),
            (None, Some(line)) => write!(f, ":{}", line),
            (None, None) => Ok(()),
        }
    }
}

/// `line` attribute of a location: absolute (`12`) or relative (`+3`, `-2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineNumber {
    Absolute(u32),
    Relative(i64),
}

impl FromStr for LineNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::invalid_document(format!("invalid line number `{}`", s));
        if s.starts_with('+') || s.starts_with('-') {
            s.parse::<i64>().map(LineNumber::Relative).map_err(|_| invalid())
        } else {
            s.parse::<u32>().map(LineNumber::Absolute).map_err(|_| invalid())
        }
    }
}

impl Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineNumber::Absolute(n) => write!(f, "{}", n),
            LineNumber::Relative(d) if *d >= 0 => write!(f, "+{}", d),
            LineNumber::Relative(d) => write!(f, "{}", d),
        }
    }
}

/// The translated side of a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Translation {
    pub state: TranslationState,
    pub value: TranslationValue,
}

impl Translation {
    pub fn finished(text: impl Into<String>) -> Self {
        Self {
            state: TranslationState::Finished,
            value: TranslationValue::Text(text.into()),
        }
    }

    pub fn unfinished() -> Self {
        Self::default()
    }

    /// Text approved for use. Unfinished translations have none, even when
    /// a draft is present.
    pub fn approved(&self) -> Option<&str> {
        match (&self.state, &self.value) {
            (TranslationState::Finished, TranslationValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Status of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationState {
    /// Approved; written without a `type` attribute.
    Finished,

    /// Not yet approved.
    #[default]
    Unfinished,

    /// The source string disappeared from the code.
    Vanished,

    /// Legacy marker for removed messages.
    Obsolete,
}

impl TranslationState {
    /// The `type` attribute value, `None` for finished translations.
    pub fn type_attribute(&self) -> Option<&'static str> {
        match self {
            TranslationState::Finished => None,
            TranslationState::Unfinished => Some("unfinished"),
            TranslationState::Vanished => Some("vanished"),
            TranslationState::Obsolete => Some("obsolete"),
        }
    }

    /// Whether the message is still present in the code.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TranslationState::Finished | TranslationState::Unfinished
        )
    }
}

impl FromStr for TranslationState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "finished" => Ok(TranslationState::Finished),
            "unfinished" => Ok(TranslationState::Unfinished),
            "vanished" => Ok(TranslationState::Vanished),
            "obsolete" => Ok(TranslationState::Obsolete),
            other => Err(Error::invalid_document(format!(
                "unknown translation type `{}`",
                other
            ))),
        }
    }
}

impl Display for TranslationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_attribute().unwrap_or("finished"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationValue {
    /// Plain translation text.
    Text(String),

    /// One string per `<numerusform>`.
    Numerus(Vec<String>),

    /// Length variants (`variants="yes"`), longest first.
    Variants(Vec<String>),
}

impl Default for TranslationValue {
    fn default() -> Self {
        TranslationValue::Text(String::new())
    }
}

impl TranslationValue {
    pub fn is_empty(&self) -> bool {
        match self {
            TranslationValue::Text(text) => text.is_empty(),
            TranslationValue::Numerus(forms) | TranslationValue::Variants(forms) => {
                forms.iter().all(String::is_empty)
            }
        }
    }

    /// Every non-empty string carried by this value.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            TranslationValue::Text(text) => vec![text.as_str()],
            TranslationValue::Numerus(forms) | TranslationValue::Variants(forms) => {
                forms.iter().map(String::as_str).collect()
            }
        }
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect()
    }

    /// The first non-empty text, used where a single string is needed.
    pub fn primary(&self) -> Option<&str> {
        self.texts().into_iter().next()
    }
}

impl Display for TranslationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationValue::Text(text) => write!(f, "{}", text),
            TranslationValue::Numerus(forms) | TranslationValue::Variants(forms) => {
                write!(f, "{}", forms.join(" | "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        let mut doc = Document::new(Some("ja_JP".to_string()));
        let ctx = doc.context_or_insert("QObject");
        ctx.messages.push(
            Message::new("JSON error: %1")
                .with_location("../abstractrestapi.cpp", 256)
                .with_location("../abstractrestapi_p.h", 84),
        );
        ctx.messages
            .push(Message::new("Invalid JDF").with_location("../imposition/impositionapi.cpp", 47));
        doc
    }

    #[test]
    fn test_find_treats_missing_and_empty_comment_alike() {
        let doc = sample_document();
        assert!(doc.find("QObject", "Invalid JDF", None).is_some());
        assert!(doc.find("QObject", "Invalid JDF", Some("")).is_some());
        assert!(doc.find("QObject", "Invalid JDF", Some("other")).is_none());
        assert!(doc.find("Other", "Invalid JDF", None).is_none());
    }

    #[test]
    fn test_set_translation() {
        let mut doc = sample_document();
        doc.set_translation(
            "QObject",
            "Invalid JDF",
            None,
            TranslationValue::Text("無効なJDF".to_string()),
            TranslationState::Finished,
        )
        .unwrap();
        let message = doc.find("QObject", "Invalid JDF", None).unwrap();
        assert_eq!(message.translation.approved(), Some("無効なJDF"));
    }

    #[test]
    fn test_set_translation_missing_message() {
        let mut doc = sample_document();
        let err = doc
            .set_translation(
                "QObject",
                "No such string",
                None,
                TranslationValue::default(),
                TranslationState::Finished,
            )
            .unwrap_err();
        assert!(matches!(err, Error::MessageNotFound { .. }));
    }

    #[test]
    fn test_unfinished_translation_is_not_approved() {
        let translation = Translation {
            state: TranslationState::Unfinished,
            value: TranslationValue::Text("下書き".to_string()),
        };
        assert_eq!(translation.approved(), None);
        assert_eq!(Translation::finished("済").approved(), Some("済"));
    }

    #[test]
    fn test_line_number_parse_and_display() {
        assert_eq!("12".parse::<LineNumber>().unwrap(), LineNumber::Absolute(12));
        assert_eq!("+3".parse::<LineNumber>().unwrap(), LineNumber::Relative(3));
        assert_eq!("-2".parse::<LineNumber>().unwrap(), LineNumber::Relative(-2));
        assert!("abc".parse::<LineNumber>().is_err());
        assert_eq!(LineNumber::Relative(0).to_string(), "+0");
        assert_eq!(LineNumber::Relative(-4).to_string(), "-4");
        assert_eq!(LineNumber::Absolute(7).to_string(), "7");
    }

    #[test]
    fn test_relativize_then_resolve_restores_lines() {
        let mut doc = sample_document();
        doc.context_mut("QObject").unwrap().messages.push(
            Message::new("Can't delete job").with_location("../abstractrestapi.cpp", 300),
        );
        let original = doc.clone();

        doc.relativize_locations();
        let locations: Vec<_> = doc.messages().flat_map(|(_, m)| m.locations.clone()).collect();
        assert_eq!(locations[0].line, Some(LineNumber::Relative(256)));
        assert_eq!(locations[1].filename.as_deref(), Some("../abstractrestapi_p.h"));
        assert_eq!(locations[3].line, Some(LineNumber::Relative(44)));

        doc.resolve_locations();
        assert_eq!(doc, original);
    }

    #[test]
    fn test_relativize_omits_repeated_filename() {
        let mut doc = Document::default();
        doc.context_or_insert("QObject").messages.push(
            Message::new("Can't read flag from server response")
                .with_location("../fiery/jobsapi.cpp", 156)
                .with_location("../fiery/jobsapi.cpp", 186),
        );
        doc.relativize_locations();
        let message = &doc.contexts[0].messages[0];
        assert_eq!(message.locations[0].filename.as_deref(), Some("../fiery/jobsapi.cpp"));
        assert_eq!(message.locations[1].filename, None);
        assert_eq!(message.locations[1].line, Some(LineNumber::Relative(30)));
    }

    #[test]
    fn test_sort_orders_by_location() {
        let mut doc = Document::default();
        let ctx = doc.context_or_insert("QObject");
        ctx.messages.push(Message::new("b").with_location("a.cpp", 20));
        ctx.messages.push(Message::new("a").with_location("a.cpp", 10));
        doc.context_or_insert("Alpha");
        doc.sort();
        assert_eq!(doc.contexts[0].name, "Alpha");
        assert_eq!(doc.contexts[1].messages[0].source, "a");
    }

    #[test]
    fn test_translation_state_from_str() {
        assert_eq!(
            TranslationState::from_str("unfinished").unwrap(),
            TranslationState::Unfinished
        );
        assert_eq!(
            TranslationState::from_str("").unwrap(),
            TranslationState::Finished
        );
        assert_eq!(
            TranslationState::from_str("VANISHED").unwrap(),
            TranslationState::Vanished
        );
        assert!(TranslationState::from_str("draft").is_err());
    }

    #[test]
    fn test_translation_value_texts() {
        let value = TranslationValue::Numerus(vec!["%n file".into(), String::new()]);
        assert_eq!(value.texts(), vec!["%n file"]);
        assert!(!value.is_empty());
        assert!(TranslationValue::Numerus(vec![String::new()]).is_empty());
    }

    #[test]
    fn test_parse_language_identifier_accepts_underscore() {
        let doc = Document::new(Some("ja_JP".to_string()));
        let lang = doc.parse_language_identifier().unwrap();
        assert_eq!(lang.language.as_str(), "ja");
        assert_eq!(lang.region.unwrap().as_str(), "JP");
    }
}
