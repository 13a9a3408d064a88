use std::path::Path;

use tscodec::{
    Document, ExtractOptions, LocationStyle, UpdateOptions, extract_files, update_document,
};

use crate::path_glob::expand_input_globs;
use crate::validation::{validate_language_code, validate_output_path, write_document};

pub struct ExtractCommand {
    pub sources: Vec<String>,
    pub output: String,
    pub language: Option<String>,
    pub default_context: Option<String>,
    pub locations: Option<LocationStyle>,
}

/// Directory that locations are written relative to: the one holding `output`.
pub fn base_dir(output: &str) -> &Path {
    Path::new(output)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Scans sources into a fresh `.ts` file, replacing any existing one.
pub fn run_extract_command(
    cmd: ExtractCommand,
    extract: &ExtractOptions,
    update: &UpdateOptions,
) -> Result<(), String> {
    if let Some(lang) = &cmd.language {
        validate_language_code(lang)?;
    }
    validate_output_path(&cmd.output)?;
    let files = expand_input_globs(&cmd.sources)?;

    let extract = ExtractOptions {
        default_context: cmd
            .default_context
            .unwrap_or_else(|| extract.default_context.clone()),
    };
    let extracted = extract_files(files.as_slice(), base_dir(&cmd.output), &extract)
        .map_err(|e| format!("Extraction failed: {}", e))?;

    let mut doc = Document::new(cmd.language);
    let options = UpdateOptions {
        locations: cmd.locations.unwrap_or(update.locations),
        ..update.clone()
    };
    let report = update_document(&mut doc, &extracted, &options);
    write_document(&doc, &cmd.output)?;

    println!(
        "✅ Extracted {} message(s) from {} file(s) into {}",
        report.added,
        files.len(),
        cmd.output
    );
    Ok(())
}
