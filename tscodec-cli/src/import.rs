use std::fs::File;
use std::io::BufReader;

use tscodec::formats::csv::{ImportOptions, apply_csv, read_records};

use crate::validation::{read_document, validate_file_path, write_document};

pub struct ImportCommand {
    pub input: String,
    pub csv: String,
    pub mark_finished: bool,
    pub output: Option<String>,
}

/// Applies a translator's CSV onto an existing `.ts` file.
///
/// Rows that match no message are listed on stderr and never added.
pub fn run_import_command(cmd: ImportCommand) -> Result<(), String> {
    validate_file_path(&cmd.csv)?;
    let mut doc = read_document(&cmd.input)?;

    let file = File::open(&cmd.csv).map_err(|e| format!("Failed to open {}: {}", cmd.csv, e))?;
    let records = read_records(BufReader::new(file))
        .map_err(|e| format!("Failed to read {}: {}", cmd.csv, e))?;
    let options = ImportOptions {
        mark_finished: cmd.mark_finished,
    };
    let report = apply_csv(&mut doc, &records, &options)
        .map_err(|e| format!("Failed to apply {}: {}", cmd.csv, e))?;

    for (context, source) in &report.unknown {
        eprintln!("⚠️ No message {:?} in context '{}'", source, context);
    }

    let output = cmd.output.as_ref().unwrap_or(&cmd.input);
    write_document(&doc, output)?;
    println!(
        "✅ Applied {} translation(s), {} unchanged, {} empty row(s) skipped",
        report.applied, report.unchanged, report.skipped_empty
    );
    println!("📄 Wrote {}", output);
    Ok(())
}
