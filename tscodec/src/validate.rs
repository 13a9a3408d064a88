//! Consistency checks over a [`Document`].
//!
//! Each check produces [`ValidationIssue`]s; nothing here mutates the document.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    numerus::rule_for_language,
    placeholder::marker_set,
    types::{Document, LineNumber, TranslationState, TranslationValue},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    EmptySource,
    ConflictingLocation,
    DuplicateMessage,
    UnfinishedWithText,
    FinishedEmpty,
    PlaceholderMismatch,
    NumerusFormCount,
    InvalidLanguage,
    ZeroLine,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::ConflictingLocation
            | IssueKind::PlaceholderMismatch
            | IssueKind::NumerusFormCount
            | IssueKind::InvalidLanguage => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::EmptySource => "empty_source",
            IssueKind::ConflictingLocation => "conflicting_location",
            IssueKind::DuplicateMessage => "duplicate_message",
            IssueKind::UnfinishedWithText => "unfinished_with_text",
            IssueKind::FinishedEmpty => "finished_empty",
            IssueKind::PlaceholderMismatch => "placeholder_mismatch",
            IssueKind::NumerusFormCount => "numerus_form_count",
            IssueKind::InvalidLanguage => "invalid_language",
            IssueKind::ZeroLine => "zero_line",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ", self.kind.as_str())?;
        if let Some(context) = &self.context {
            write!(f, "{}: ", context)?;
        }
        if let Some(source) = &self.source {
            write!(f, "{:?}: ", source)?;
        }
        f.write_str(&self.message)
    }
}

/// Options for [`validate`], usually loaded from the `[validate]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Checks that are skipped entirely.
    pub ignore: Vec<IssueKind>,
    /// Treat warnings as failures.
    pub deny_warnings: bool,
    pub check_placeholders: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            deny_warnings: false,
            check_placeholders: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    #[serde(skip)]
    deny_warnings: bool,
}

impl ValidationReport {
    /// Issues that make the document fail validation.
    pub fn failing(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error || self.deny_warnings)
    }

    pub fn has_errors(&self) -> bool {
        self.failing().next().is_some()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn into_result(self) -> Result<Self, Error> {
        if !self.has_errors() {
            return Ok(self);
        }
        let lines: Vec<String> = self.failing().map(ToString::to_string).collect();
        Err(Error::validation_error(format!(
            "{} issue(s):\n{}",
            lines.len(),
            lines.join("\n")
        )))
    }
}

struct Collector<'a> {
    options: &'a ValidateOptions,
    issues: Vec<ValidationIssue>,
}

impl Collector<'_> {
    fn push(&mut self, kind: IssueKind, context: Option<&str>, source: Option<&str>, message: String) {
        if self.options.ignore.contains(&kind) {
            return;
        }
        self.issues.push(ValidationIssue {
            kind,
            severity: kind.severity(),
            context: context.map(str::to_string),
            source: source.map(str::to_string),
            message,
        });
    }
}

pub fn validate(doc: &Document, options: &ValidateOptions) -> ValidationReport {
    let mut out = Collector {
        options,
        issues: Vec::new(),
    };

    for (attr, value) in [
        ("language", doc.language.as_deref()),
        ("sourcelanguage", doc.source_language.as_deref()),
    ] {
        let Some(lang) = value else { continue };
        if lang
            .replace('_', "-")
            .parse::<unic_langid::LanguageIdentifier>()
            .is_err()
        {
            out.push(
                IssueKind::InvalidLanguage,
                None,
                None,
                format!("{} `{}` is not a valid language identifier", attr, lang),
            );
        }
    }

    let rule = doc.language.as_deref().map(rule_for_language);

    for context in &doc.contexts {
        let mut seen = HashSet::new();
        for message in &context.messages {
            let ctx = Some(context.name.as_str());
            let src = Some(message.source.as_str());

            if !message.locations.is_empty() && message.source.is_empty() {
                out.push(
                    IssueKind::EmptySource,
                    ctx,
                    src,
                    "message with locations has an empty source".to_string(),
                );
            }

            if !seen.insert(message.key()) {
                out.push(
                    IssueKind::DuplicateMessage,
                    ctx,
                    src,
                    "source and comment repeat within the context".to_string(),
                );
            }

            if message
                .locations
                .iter()
                .any(|l| l.line == Some(LineNumber::Absolute(0)))
            {
                out.push(
                    IssueKind::ZeroLine,
                    ctx,
                    src,
                    "location with line 0".to_string(),
                );
            }

            let translation = &message.translation;
            match translation.state {
                TranslationState::Unfinished if !translation.is_empty() => out.push(
                    IssueKind::UnfinishedWithText,
                    ctx,
                    src,
                    format!("translation {:?} is still unfinished", translation.value.to_string()),
                ),
                TranslationState::Finished if translation.is_empty() => out.push(
                    IssueKind::FinishedEmpty,
                    ctx,
                    src,
                    "finished translation is empty".to_string(),
                ),
                _ => {}
            }

            if !translation.state.is_active() || translation.is_empty() {
                continue;
            }

            if options.check_placeholders {
                let expected = marker_set(&message.source);
                for text in translation.value.texts() {
                    let found = marker_set(text);
                    if found != expected {
                        out.push(
                            IssueKind::PlaceholderMismatch,
                            ctx,
                            src,
                            format!(
                                "translation {:?} uses markers {:?}, source uses {:?}",
                                text, found, expected
                            ),
                        );
                    }
                }
            }

            if let (Some(rule), TranslationValue::Numerus(forms)) = (rule, &translation.value)
                && forms.len() != rule.form_count()
            {
                out.push(
                    IssueKind::NumerusFormCount,
                    ctx,
                    src,
                    format!(
                        "{} numerus form(s), language expects {}",
                        forms.len(),
                        rule.form_count()
                    ),
                );
            }
        }
    }

    check_locations(doc, &mut out);

    debug!(
        messages = doc.message_count(),
        issues = out.issues.len(),
        "validated document"
    );
    ValidationReport {
        issues: out.issues,
        deny_warnings: options.deny_warnings,
    }
}

/// Flags a `(file, line)` shared by different source texts. Two `tr()` calls
/// on one line produce exactly this, so it is only a warning.
fn check_locations(doc: &Document, out: &mut Collector<'_>) {
    let mut resolved = doc.clone();
    resolved.resolve_locations();

    let mut owners: HashMap<(String, u32), &str> = HashMap::new();
    for (context, message) in resolved.messages() {
        for location in &message.locations {
            let (Some(file), Some(LineNumber::Absolute(line))) = (&location.filename, location.line)
            else {
                continue;
            };
            let first = *owners
                .entry((file.clone(), line))
                .or_insert(message.source.as_str());
            if first != message.source {
                out.push(
                    IssueKind::ConflictingLocation,
                    Some(context),
                    Some(&message.source),
                    format!("{}:{} already belongs to {:?}", file, line, first),
                );
            }
        }
    }
}
