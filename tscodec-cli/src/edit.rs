use tscodec::{TranslationState, TranslationValue};

use crate::validation::{read_document, write_document};

pub struct EditCommand {
    pub input: String,
    pub context: String,
    pub source: String,
    pub comment: Option<String>,
    pub values: Vec<String>,
    pub unfinished: bool,
    pub output: Option<String>,
    pub dry_run: bool,
}

/// Builds the value that fits the message's existing shape.
fn value_for(
    numerus: bool,
    current: &TranslationValue,
    values: Vec<String>,
) -> Result<TranslationValue, String> {
    if numerus {
        return Ok(TranslationValue::Numerus(values));
    }
    if matches!(current, TranslationValue::Variants(_)) && values.len() > 1 {
        return Ok(TranslationValue::Variants(values));
    }
    match <[String; 1]>::try_from(values) {
        Ok([text]) => Ok(TranslationValue::Text(text)),
        Err(values) => Err(format!(
            "Message is not numerus; expected a single --value, got {}",
            values.len()
        )),
    }
}

/// Sets the translation of one message and writes the file back.
///
/// Clearing every value leaves the message unfinished.
pub fn run_edit_command(cmd: EditCommand) -> Result<(), String> {
    if cmd.values.is_empty() {
        return Err("At least one --value is required".to_string());
    }
    let mut doc = read_document(&cmd.input)?;
    let comment = cmd.comment.as_deref();

    let message = doc
        .find(&cmd.context, &cmd.source, comment)
        .ok_or_else(|| {
            format!(
                "Message not found in context '{}': {:?}",
                cmd.context, cmd.source
            )
        })?;
    let value = value_for(message.numerus, &message.translation.value, cmd.values)?;
    let state = if cmd.unfinished || value.is_empty() {
        TranslationState::Unfinished
    } else {
        TranslationState::Finished
    };

    doc.set_translation(&cmd.context, &cmd.source, comment, value, state)
        .map_err(|e| e.to_string())?;

    if cmd.dry_run {
        println!(
            "ℹ️ Dry run: would mark {:?} in context '{}' as {}",
            cmd.source, cmd.context, state
        );
        return Ok(());
    }

    let output = cmd.output.as_ref().unwrap_or(&cmd.input);
    write_document(&doc, output)?;
    println!(
        "✅ Updated {:?} in context '{}' ({})",
        cmd.source, cmd.context, state
    );
    println!("📄 Wrote {}", output);
    Ok(())
}
