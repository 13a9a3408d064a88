use std::str::FromStr;

use tscodec::{Document, Message, TranslationState, TranslationValue};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_WIDTH: usize = 50;

/// Shortens `value` to [`MAX_WIDTH`] terminal columns, counting CJK glyphs as two.
fn truncate(value: &str) -> String {
    let value = value.replace('\n', "\\n");
    if value.width() <= MAX_WIDTH {
        return value;
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in value.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > MAX_WIDTH - 3 {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn display(value: &str, full: bool) -> String {
    if full { value.to_string() } else { truncate(value) }
}

fn print_message(index: usize, message: &Message, full: bool) {
    println!("\n  Message {}: {}", index, display(&message.source, full));
    println!("    State: {}", message.translation.state);
    if let Some(comment) = &message.comment {
        println!("    Comment: {}", display(comment, full));
    }
    if let Some(extracomment) = &message.extracomment {
        println!("    Extracomment: {}", display(extracomment, full));
    }
    if !message.locations.is_empty() {
        let locations: Vec<_> = message.locations.iter().map(ToString::to_string).collect();
        println!("    Locations: {}", locations.join(", "));
    }
    match &message.translation.value {
        TranslationValue::Text(text) => {
            if !text.is_empty() {
                println!("    Translation: {}", display(text, full));
            }
        }
        TranslationValue::Numerus(forms) => {
            for (i, form) in forms.iter().enumerate() {
                println!("    Form {}: {}", i, display(form, full));
            }
        }
        TranslationValue::Variants(variants) => {
            for (i, variant) in variants.iter().enumerate() {
                println!("    Variant {}: {}", i, display(variant, full));
            }
        }
    }
}

/// Print a view of the messages in a document.
pub fn print_view(
    doc: &Document,
    context_filter: Option<&str>,
    state_filter: Option<&str>,
    full: bool,
) -> Result<(), String> {
    let state = state_filter
        .map(TranslationState::from_str)
        .transpose()
        .map_err(|e| e.to_string())?;

    let mut doc = doc.clone();
    doc.resolve_locations();

    println!("=== Document ===");
    println!("Language: {}", doc.language.as_deref().unwrap_or("-"));
    if let Some(source_language) = &doc.source_language {
        println!("Source language: {}", source_language);
    }

    let mut shown = 0;
    for context in &doc.contexts {
        if context_filter.is_some_and(|name| name != context.name) {
            continue;
        }
        let messages: Vec<_> = context
            .messages
            .iter()
            .filter(|m| state.is_none_or(|s| m.translation.state == s))
            .collect();
        if messages.is_empty() {
            continue;
        }

        println!("\n=== Context: {} ===", context.name);
        println!("Messages: {}", messages.len());
        for (i, message) in messages.into_iter().enumerate() {
            print_message(i + 1, message, full);
            shown += 1;
        }
    }

    if shown == 0 {
        return Err("No messages found".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_wide_characters() {
        let short = "シザーハンズ";
        assert_eq!(truncate(short), short);

        let long = "あ".repeat(40);
        let out = truncate(&long);
        assert!(out.ends_with("..."));
        assert!(out.width() <= MAX_WIDTH);
        assert_eq!(out.chars().count(), 23 + 3);
    }

    #[test]
    fn test_truncate_escapes_newlines() {
        assert_eq!(truncate("Errors: \n"), "Errors: \\n");
    }
}
