use tscodec::LocationStyle;

use crate::validation::{read_document, write_document};

pub struct NormalizeCommand {
    pub input: String,
    pub output: Option<String>,
    pub locations: LocationStyle,
    pub sort: bool,
}

/// Rewrites a file in canonical lupdate layout.
pub fn run_normalize_command(cmd: NormalizeCommand) -> Result<(), String> {
    let mut doc = read_document(&cmd.input)?;
    if cmd.sort {
        doc.sort();
    }
    cmd.locations.apply(&mut doc);

    let output = cmd.output.as_ref().unwrap_or(&cmd.input);
    write_document(&doc, output)?;
    println!("📄 Wrote {} ({} message(s))", output, doc.message_count());
    Ok(())
}
