use tscodec::{ConvertOptions, convert};

use crate::validation::{
    parse_format, validate_file_path, validate_language_code, validate_output_path,
};

pub struct ConvertCommand {
    pub input: String,
    pub output: String,
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub lang: Option<String>,
}

/// Converts between `.ts`, CSV and JSON; formats default to the file extensions.
pub fn run_convert_command(cmd: ConvertCommand) -> Result<(), String> {
    validate_file_path(&cmd.input)?;
    validate_output_path(&cmd.output)?;
    if let Some(lang) = &cmd.lang {
        validate_language_code(lang)?;
    }

    let options = ConvertOptions {
        input_format: cmd.input_format.as_deref().map(parse_format).transpose()?,
        output_format: cmd.output_format.as_deref().map(parse_format).transpose()?,
        language: cmd.lang,
    };
    convert(&cmd.input, &cmd.output, &options)
        .map_err(|e| format!("Conversion failed: {}", e))?;

    println!("✅ Converted {} -> {}", cmd.input, cmd.output);
    Ok(())
}
