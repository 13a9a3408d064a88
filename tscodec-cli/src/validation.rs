//! Argument checks and file helpers shared by the commands.

use std::path::Path;
use std::str::FromStr;

use tscodec::{
    Document, FormatType, LocationStyle, infer_format_from_extension, read_file, write_file,
};
use unic_langid::LanguageIdentifier;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Cannot create output directory: {}", e))?;
        }
    }

    Ok(())
}

/// Validate a Qt (`ja_JP`) or BCP 47 (`ja-JP`) language code.
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    lang.replace('_', "-")
        .parse::<LanguageIdentifier>()
        .map(|_| ())
        .map_err(|_| {
            format!(
                "Invalid language code format: {}. Expected a language like ja_JP or pt-BR",
                lang
            )
        })
}

pub fn parse_format(name: &str) -> Result<FormatType, String> {
    FormatType::from_str(name).map_err(|e| format!("{}. Supported formats: ts, csv, json", e))
}

pub fn parse_location_style(name: &str) -> Result<LocationStyle, String> {
    LocationStyle::from_str(name).map_err(|_| {
        format!(
            "Unknown location style: {}. Expected absolute, relative or none",
            name
        )
    })
}

/// The format for `path`; files with unknown extensions are read as `.ts`.
pub fn format_for_path(path: &str) -> FormatType {
    infer_format_from_extension(path).unwrap_or(FormatType::Ts)
}

pub fn read_document(path: &str) -> Result<Document, String> {
    validate_file_path(path)?;
    read_file(path, format_for_path(path), None)
        .map_err(|e| format!("Failed to read {}: {}", path, e))
}

pub fn write_document(doc: &Document, path: &str) -> Result<(), String> {
    validate_output_path(path)?;
    write_file(doc, path, format_for_path(path))
        .map_err(|e| format!("Failed to write {}: {}", path, e))
}

/// Writes `content` to `output`, or prints it when no output is given.
pub fn print_or_write(output: Option<&String>, content: &str) -> Result<(), String> {
    match output {
        Some(path) => {
            validate_output_path(path)?;
            std::fs::write(path, format!("{}\n", content))
                .map_err(|e| format!("Failed to write {}: {}", path, e))
        }
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
