//! The single error type returned by every fallible tscodec API.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("unsupported encoding `{0}`")]
    Encoding(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("message not found in context `{context}`: {source_text:?}")]
    MessageNotFound {
        context: String,
        source_text: String,
    },

    #[error("duplicate error code {0}")]
    DuplicateErrorCode(i64),

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Creates a new invalid-document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Error::InvalidDocument(message.into())
    }

    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}
