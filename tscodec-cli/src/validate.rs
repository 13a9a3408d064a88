use serde_json::json;
use tscodec::{Severity, ValidateOptions, ValidationReport, validate};

use crate::path_glob::expand_input_globs;
use crate::validation::read_document;

fn render_human(file: &str, report: &ValidationReport) -> String {
    if report.issues.is_empty() {
        return format!("✅ {}: no issues", file);
    }
    let mut lines = vec![format!(
        "{} {}: {} error(s), {} warning(s)",
        if report.has_errors() { "❌" } else { "⚠️" },
        file,
        report.count(Severity::Error),
        report.count(Severity::Warning)
    )];
    for issue in &report.issues {
        let label = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        lines.push(format!("  {}: {}", label, issue));
    }
    lines.join("\n")
}

/// Validates every file; fails when any file has a failing issue.
///
/// `strict` fails on warnings too.
pub fn run_validate_command(
    inputs: &[String],
    strict: bool,
    json_output: bool,
    options: &ValidateOptions,
) -> Result<(), String> {
    let files = expand_input_globs(inputs)?;
    let options = ValidateOptions {
        deny_warnings: options.deny_warnings || strict,
        ..options.clone()
    };

    let mut failed = 0;
    let mut results = Vec::new();
    for path in &files {
        let file = path.display().to_string();
        let doc = read_document(&file)?;
        let report = validate(&doc, &options);
        if report.has_errors() {
            failed += 1;
        }
        results.push((file, report));
    }

    if json_output {
        let files_json: Vec<_> = results
            .iter()
            .map(|(file, report)| {
                json!({
                    "file": file,
                    "ok": !report.has_errors(),
                    "issues": report.issues,
                })
            })
            .collect();
        let rendered = serde_json::to_string_pretty(&json!({ "files": files_json }))
            .map_err(|e| format!("Failed to serialize validation JSON: {}", e))?;
        println!("{}", rendered);
    } else {
        for (file, report) in &results {
            println!("{}", render_human(file, report));
        }
    }

    if failed > 0 {
        return Err(format!("Validation failed for {} file(s)", failed));
    }
    Ok(())
}
