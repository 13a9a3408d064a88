#![forbid(unsafe_code)]
//! Qt Linguist translation file toolkit for Rust.
//!
//! Reads, validates, edits, merges and writes `.ts` files byte-compatibly with
//! `lupdate`, and serves their translations at runtime with Qt's `%1`
//! argument and numerus semantics. All formats go through the [`Document`] model.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tscodec::{Document, Translator, TranslatorOptions, traits::Parser};
//!
//! let doc = Document::read_from("translations/ProofNetwork.ja.ts")?;
//! let translator = Translator::from_document(&doc, &TranslatorOptions::default());
//! println!("{}", translator.tr_args("QObject", "JSON error: %1", &["unexpected EOF"]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Formats
//!
//! - **Qt Linguist `.ts`**: read and written in lupdate's exact layout
//! - **CSV**: one row per message, for handing strings to translators
//! - **JSON**: lossless dump of the document model
//!
//! # Lifecycle
//!
//! [`extract`] collects `tr()` literals from C++ sources, [`update_document`]
//! merges them into an existing file, and [`validate()`] checks the result.

pub mod diff;
pub mod error;
pub mod extract;
pub mod formats;
pub mod numerus;
pub mod placeholder;
pub mod registry;
pub mod stats;
pub mod traits;
pub mod translator;
pub mod types;
pub mod update;
pub mod validate;

// Re-export most used types for easy consumption
pub use crate::{
    diff::{DiffReport, diff_documents},
    error::Error,
    extract::{ExtractOptions, extract_files, extract_str},
    formats::{ConvertOptions, FormatType, convert, infer_format_from_extension, read_file, write_file},
    numerus::{NumerusRule, rule_for_language},
    placeholder::{arg, arg_all},
    registry::{ErrorInfo, ErrorMessagesRegistry},
    stats::{DocumentStats, document_stats},
    translator::{Translator, TranslatorOptions},
    types::{
        Context, Document, LineNumber, Location, Message, MessageKey, Translation,
        TranslationState, TranslationValue,
    },
    update::{LocationStyle, UpdateOptions, UpdateReport, update_document},
    validate::{IssueKind, Severity, ValidateOptions, ValidationReport, validate},
};
