use serde_json::json;
use tscodec::{DocumentStats, document_stats};

use crate::path_glob::expand_input_globs;
use crate::validation::read_document;

fn render_human(file: &str, stats: &DocumentStats) -> String {
    let s = &stats.summary;
    let mut lines = vec![
        "=== Stats ===".to_string(),
        format!("File: {}", file),
        format!("Language: {}", stats.language.as_deref().unwrap_or("-")),
        format!("Total: {}", s.total),
        format!("  finished: {}", s.finished),
        format!("  unfinished: {}", s.unfinished),
        format!("  vanished: {}", s.vanished),
        format!("  obsolete: {}", s.obsolete),
        format!("Completion: {:.2}%", s.completion_percent),
    ];
    if stats.contexts.len() > 1 {
        for context in &stats.contexts {
            lines.push(format!(
                "  {}: {}/{} ({:.2}%)",
                context.context,
                context.counts.finished,
                context.counts.finished + context.counts.unfinished,
                context.counts.completion_percent
            ));
        }
    }
    lines.join("\n")
}

pub fn run_stats_command(inputs: &[String], json_output: bool) -> Result<(), String> {
    let files = expand_input_globs(inputs)?;
    let mut reports = Vec::new();
    for path in &files {
        let file = path.display().to_string();
        let doc = read_document(&file)?;
        reports.push((file, document_stats(&doc)));
    }

    if json_output {
        let files_json: Vec<_> = reports
            .iter()
            .map(|(file, stats)| json!({ "file": file, "stats": stats }))
            .collect();
        let rendered = serde_json::to_string_pretty(&json!({ "files": files_json }))
            .map_err(|e| format!("Failed to serialize stats JSON: {}", e))?;
        println!("{}", rendered);
    } else {
        let rendered: Vec<_> = reports
            .iter()
            .map(|(file, stats)| render_human(file, stats))
            .collect();
        println!("{}", rendered.join("\n\n"));
    }
    Ok(())
}
