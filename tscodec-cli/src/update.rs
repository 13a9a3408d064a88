use std::path::Path;

use tracing::info;
use tscodec::{
    Document, ExtractOptions, LocationStyle, UpdateOptions, UpdateReport, extract_files,
    update_document,
};

use crate::extract::base_dir;
use crate::path_glob::expand_input_globs;
use crate::validation::{read_document, validate_language_code, write_document};

pub struct UpdateCommand {
    pub sources: Vec<String>,
    pub ts: String,
    pub language: Option<String>,
    pub no_obsolete: bool,
    pub locations: Option<LocationStyle>,
    pub json: bool,
}

fn render_human(ts: &str, report: &UpdateReport) -> String {
    [
        format!("=== Update: {} ===", ts),
        format!("kept: {}", report.kept),
        format!("added: {}", report.added),
        format!("revived: {}", report.revived),
        format!("same text: {}", report.same_text),
        format!("vanished: {}", report.vanished),
        format!("pruned: {}", report.pruned),
    ]
    .join("\n")
}

/// Merges freshly extracted strings into a `.ts` file, creating it if needed.
pub fn run_update_command(
    cmd: UpdateCommand,
    extract: &ExtractOptions,
    update: &UpdateOptions,
) -> Result<(), String> {
    if let Some(lang) = &cmd.language {
        validate_language_code(lang)?;
    }
    let files = expand_input_globs(&cmd.sources)?;

    let mut doc = if Path::new(&cmd.ts).exists() {
        read_document(&cmd.ts)?
    } else {
        info!(file = %cmd.ts, "creating new translation file");
        Document::new(None)
    };
    if doc.language.is_none() {
        doc.language = cmd.language;
    }

    let extracted = extract_files(files.as_slice(), base_dir(&cmd.ts), extract)
        .map_err(|e| format!("Extraction failed: {}", e))?;
    let options = UpdateOptions {
        no_obsolete: cmd.no_obsolete || update.no_obsolete,
        locations: cmd.locations.unwrap_or(update.locations),
        ..update.clone()
    };
    let report = update_document(&mut doc, &extracted, &options);
    write_document(&doc, &cmd.ts)?;

    if cmd.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize update report JSON: {}", e))?;
        println!("{}", rendered);
    } else {
        println!("{}", render_human(&cmd.ts, &report));
    }
    Ok(())
}
