use tscodec::{DiffReport, diff_documents};

use crate::validation::{print_or_write, read_document, validate_output_path};

fn label(source: &str, comment: &str) -> String {
    let source = source.replace('\n', "\\n");
    if comment.is_empty() {
        format!("\"{}\"", source)
    } else {
        format!("\"{}\" ({})", source, comment)
    }
}

fn render_human(report: &DiffReport) -> String {
    let summary = &report.summary;
    let mut lines = vec![
        "=== Diff ===".to_string(),
        format!("Contexts: {}", summary.contexts),
        format!(
            "Totals: added={}, removed={}, changed={}, unchanged={}",
            summary.added, summary.removed, summary.changed, summary.unchanged
        ),
    ];

    for context in &report.contexts {
        lines.push(format!("\nContext: {}", context.context));
        lines.push(format!("  added: {}", context.added.len()));
        lines.push(format!("  removed: {}", context.removed.len()));
        lines.push(format!("  changed: {}", context.changed.len()));
        lines.push(format!("  unchanged: {}", context.unchanged));
        for item in &context.added {
            lines.push(format!("  + {}", label(&item.source, &item.comment)));
        }
        for item in &context.removed {
            lines.push(format!("  - {}", label(&item.source, &item.comment)));
        }
        for item in &context.changed {
            lines.push(format!(
                "  ~ {}: [{}] '{}' -> [{}] '{}'",
                label(&item.source, &item.comment),
                item.before.state,
                item.before.value.to_string().replace('\n', "\\n"),
                item.after.state,
                item.after.value.to_string().replace('\n', "\\n"),
            ));
        }
    }

    lines.join("\n")
}

pub struct DiffOptions {
    pub source: String,
    pub target: String,
    pub json: bool,
    pub output: Option<String>,
}

pub fn run_diff_command(opts: DiffOptions) -> Result<(), String> {
    if let Some(output) = &opts.output {
        validate_output_path(output)?;
    }
    let before = read_document(&opts.source)?;
    let after = read_document(&opts.target)?;
    let report = diff_documents(&before, &after);

    let rendered = if opts.json {
        serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize diff report JSON: {}", e))?
    } else {
        render_human(&report)
    };
    print_or_write(opts.output.as_ref(), &rendered)
}
