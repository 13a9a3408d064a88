//! All supported file formats for tscodec.
//!
//! `.ts` is the native format; CSV and JSON exist for hand-off and debugging.
//! The [`FormatType`] enum drives generic reading and writing across the crate.

pub mod csv;
pub mod json;
pub mod ts;

use std::{
    fmt::{Display, Formatter},
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

pub use csv::CSVRecord;

use crate::{Error, traits::Parser, types::Document};

/// Represents all supported file formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Qt Linguist `.ts` XML.
    Ts,
    /// Translator hand-off CSV table.
    Csv,
    /// Lossless JSON dump of the document model.
    Json,
}

/// Human-friendly name of each format: `"ts"`, `"csv"`, `"json"`.
///
/// # Example
/// ```rust
/// use tscodec::formats::FormatType;
/// assert_eq!(FormatType::Ts.to_string(), "ts");
/// assert_eq!(FormatType::Csv.to_string(), "csv");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Accepts the case-insensitive names `ts`/`linguist`, `csv` and `json`.
///
/// # Example
/// ```rust
/// use tscodec::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("linguist").unwrap(), FormatType::Ts);
/// assert!(FormatType::from_str("po").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "ts" | "linguist" => Ok(FormatType::Ts),
            "csv" => Ok(FormatType::Csv),
            "json" => Ok(FormatType::Json),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Ts => "ts",
            FormatType::Csv => "csv",
            FormatType::Json => "json",
        }
    }
}

/// Infers the format from a file extension.
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    let ext = path.as_ref().extension()?.to_str()?;
    FormatType::from_str(ext).ok()
}

/// Reads a document from `path`.
///
/// `language` fills in the target language when the file does not carry one
/// (always the case for CSV).
pub fn read_file<P: AsRef<Path>>(
    path: P,
    format: FormatType,
    language: Option<String>,
) -> Result<Document, Error> {
    let path = path.as_ref();
    let mut doc = match format {
        FormatType::Ts => Document::read_from(path)?,
        FormatType::Csv => {
            let records = csv::read_records(BufReader::new(File::open(path)?))?;
            csv::document_from_records(&records, None)?
        }
        FormatType::Json => json::read_json(BufReader::new(File::open(path)?))?,
    };
    if doc.language.is_none() {
        doc.language = language;
    }
    Ok(doc)
}

/// Writes `doc` to `path`, creating parent directories as needed.
pub fn write_file<P: AsRef<Path>>(doc: &Document, path: P, format: FormatType) -> Result<(), Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    match format {
        FormatType::Ts => doc.write_to(path),
        FormatType::Csv => {
            let mut writer = BufWriter::new(File::create(path)?);
            csv::write_records(&csv::records_from_document(doc)?, &mut writer)?;
            writer.flush()?;
            Ok(())
        }
        FormatType::Json => {
            let mut writer = BufWriter::new(File::create(path)?);
            json::write_json(doc, &mut writer)?;
            writer.flush()?;
            Ok(())
        }
    }
}

/// Options for [`convert`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub input_format: Option<FormatType>,
    pub output_format: Option<FormatType>,
    pub language: Option<String>,
}

/// Converts between any two supported formats, inferring them from the
/// extensions unless given.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<(), Error> {
    let input = input.as_ref();
    let output = output.as_ref();
    let input_format = options
        .input_format
        .or_else(|| infer_format_from_extension(input))
        .ok_or_else(|| Error::UnknownFormat(input.display().to_string()))?;
    let output_format = options
        .output_format
        .or_else(|| infer_format_from_extension(output))
        .ok_or_else(|| Error::UnknownFormat(output.display().to_string()))?;

    let mut doc = read_file(input, input_format, None)?;
    if options.language.is_some() {
        doc.language = options.language.clone();
    }
    write_file(&doc, output, output_format)
}
