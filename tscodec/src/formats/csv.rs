//! CSV hand-off table for translators.
//!
//! One row per message with the columns
//! `context,source,comment,extracomment,translation,state,form,locations`.
//! Numerus and length-variant translations store their forms as a JSON array
//! in the `translation` column; `form` says which one it is.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::Error,
    types::{
        Context, Document, LineNumber, Location, Message, Translation, TranslationState,
        TranslationValue,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CSVRecord {
    pub context: String,
    pub source: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub extracomment: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub locations: String,
}

impl CSVRecord {
    fn from_message(context: &str, message: &Message) -> Result<Self, Error> {
        let (form, translation) = match &message.translation.value {
            TranslationValue::Text(text) => ("", text.clone()),
            TranslationValue::Numerus(forms) => ("numerus", serde_json::to_string(forms)?),
            TranslationValue::Variants(forms) => ("variants", serde_json::to_string(forms)?),
        };
        Ok(Self {
            context: context.to_string(),
            source: message.source.clone(),
            comment: message.comment.clone().unwrap_or_default(),
            extracomment: message.extracomment.clone().unwrap_or_default(),
            translation,
            state: message.translation.state.to_string(),
            form: form.to_string(),
            locations: message
                .locations
                .iter()
                .map(Location::to_string)
                .collect::<Vec<_>>()
                .join(";"),
        })
    }

    fn comment(&self) -> Option<&str> {
        Some(self.comment.as_str()).filter(|c| !c.is_empty())
    }

    fn value(&self) -> Result<TranslationValue, Error> {
        match self.form.trim() {
            "" | "text" => Ok(TranslationValue::Text(self.translation.clone())),
            "numerus" => Ok(TranslationValue::Numerus(self.forms()?)),
            "variants" => Ok(TranslationValue::Variants(self.forms()?)),
            other => Err(Error::invalid_document(format!(
                "unknown CSV form `{}` for {:?}",
                other, self.source
            ))),
        }
    }

    fn forms(&self) -> Result<Vec<String>, Error> {
        if self.translation.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&self.translation)?)
    }

    /// Explicit state column, or a default derived from the translation.
    fn state(&self, value: &TranslationValue) -> Result<TranslationState, Error> {
        if self.state.trim().is_empty() {
            Ok(if value.is_empty() {
                TranslationState::Unfinished
            } else {
                TranslationState::Finished
            })
        } else {
            self.state.parse()
        }
    }

    fn parsed_locations(&self) -> Result<Vec<Location>, Error> {
        self.locations
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|item| match item.rsplit_once(':') {
                Some((file, line)) => Ok(Location {
                    filename: Some(file.to_string()).filter(|f| !f.is_empty()),
                    line: Some(line.parse::<LineNumber>()?),
                }),
                None => Ok(Location {
                    filename: Some(item.to_string()),
                    line: None,
                }),
            })
            .collect()
    }
}

/// Flattens a document into CSV rows. Locations are written absolute.
pub fn records_from_document(doc: &Document) -> Result<Vec<CSVRecord>, Error> {
    let mut resolved = doc.clone();
    resolved.resolve_locations();
    resolved
        .messages()
        .map(|(context, message)| CSVRecord::from_message(context, message))
        .collect()
}

pub fn write_records<W: Write>(records: &[CSVRecord], writer: W) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<CSVRecord>, Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

/// Rebuilds a full document from CSV rows; contexts keep first-seen order.
pub fn document_from_records(
    records: &[CSVRecord],
    language: Option<String>,
) -> Result<Document, Error> {
    let mut doc = Document::new(language);
    for record in records {
        let value = record.value()?;
        let state = record.state(&value)?;
        let message = Message {
            numerus: matches!(value, TranslationValue::Numerus(_)),
            locations: record.parsed_locations()?,
            source: record.source.clone(),
            comment: record.comment().map(str::to_string),
            extracomment: Some(record.extracomment.clone()).filter(|c| !c.is_empty()),
            translation: Translation { state, value },
            ..Message::default()
        };
        let context: &mut Context = doc.context_or_insert(&record.context);
        context.messages.push(message);
    }
    Ok(doc)
}

/// Options for [`apply_csv`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Store filled rows as finished when their `state` column is blank or
    /// still says `unfinished`.
    pub mark_finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub applied: usize,
    pub unchanged: usize,
    pub skipped_empty: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unknown: Vec<(String, String)>,
}

/// Applies translated rows onto the matching messages of `doc`.
///
/// Rows without translation text are skipped and rows that match no message
/// are reported, never added.
pub fn apply_csv(
    doc: &mut Document,
    records: &[CSVRecord],
    options: &ImportOptions,
) -> Result<ImportReport, Error> {
    let mut report = ImportReport::default();

    for record in records {
        let value = record.value()?;
        if value.is_empty() {
            report.skipped_empty += 1;
            continue;
        }
        let state = if record.state.trim().is_empty() {
            TranslationState::Unfinished
        } else {
            record.state.parse()?
        };
        let state = match state {
            TranslationState::Unfinished if options.mark_finished => TranslationState::Finished,
            state => state,
        };

        let Some(message) = doc.find_mut(&record.context, &record.source, record.comment()) else {
            warn!(context = %record.context, source = ?record.source, "CSV row matches no message");
            report
                .unknown
                .push((record.context.clone(), record.source.clone()));
            continue;
        };

        let translation = Translation { state, value };
        if message.translation == translation {
            report.unchanged += 1;
        } else {
            message.translation = translation;
            report.applied += 1;
        }
    }

    Ok(report)
}
