use tracing::debug;
use tscodec::{Translator, TranslatorOptions, arg_all, placeholder::replace_count};

use crate::validation::read_document;

pub struct LookupCommand {
    pub input: String,
    pub context: String,
    pub source: String,
    pub comment: Option<String>,
    pub count: Option<i64>,
    pub args: Vec<String>,
}

/// Resolves one string the way the runtime would, falling back to the source.
pub fn lookup(translator: &Translator, cmd: &LookupCommand) -> String {
    let comment = cmd.comment.as_deref();
    let text = match cmd.count {
        Some(n) => translator
            .translate_n(&cmd.context, &cmd.source, comment, n)
            .unwrap_or_else(|| replace_count(&cmd.source, n)),
        None => translator
            .translate(&cmd.context, &cmd.source, comment)
            .unwrap_or(cmd.source.as_str())
            .to_string(),
    };
    if cmd.args.is_empty() {
        text
    } else {
        arg_all(&text, &cmd.args)
    }
}

pub fn run_lookup_command(cmd: LookupCommand, options: &TranslatorOptions) -> Result<(), String> {
    let doc = read_document(&cmd.input)?;
    let translator = Translator::from_document(&doc, options);
    debug!(
        entries = translator.len(),
        language = translator.language().unwrap_or("-"),
        "loaded translator"
    );
    println!("{}", lookup(&translator, &cmd));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tscodec::{Document, Message, Translation, TranslationState, TranslationValue};

    fn translator() -> Translator {
        let mut doc = Document::new(Some("ru_RU".to_string()));
        let ctx = doc.context_or_insert("QObject");
        let mut error = Message::new("JSON error: %1");
        error.translation = Translation::finished("Ошибка JSON: %1");
        ctx.messages.push(error);
        let mut jobs = Message::new("%n job(s)");
        jobs.numerus = true;
        jobs.translation = Translation {
            state: TranslationState::Finished,
            value: TranslationValue::Numerus(vec![
                "%n задание".to_string(),
                "%n задания".to_string(),
                "%n заданий".to_string(),
            ]),
        };
        ctx.messages.push(jobs);
        Translator::from_document(&doc, &TranslatorOptions::default())
    }

    fn cmd(source: &str, count: Option<i64>, args: &[&str]) -> LookupCommand {
        LookupCommand {
            input: String::new(),
            context: "QObject".to_string(),
            source: source.to_string(),
            comment: None,
            count,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_lookup_with_args() {
        let t = translator();
        assert_eq!(
            lookup(&t, &cmd("JSON error: %1", None, &["EOF"])),
            "Ошибка JSON: EOF"
        );
        assert_eq!(lookup(&t, &cmd("Invalid JDF", None, &[])), "Invalid JDF");
    }

    #[test]
    fn test_lookup_numerus() {
        let t = translator();
        assert_eq!(lookup(&t, &cmd("%n job(s)", Some(1), &[])), "1 задание");
        assert_eq!(lookup(&t, &cmd("%n job(s)", Some(3), &[])), "3 задания");
        assert_eq!(lookup(&t, &cmd("%n job(s)", Some(11), &[])), "11 заданий");
        assert_eq!(lookup(&t, &cmd("%n file(s)", Some(2), &[])), "2 file(s)");
    }
}
