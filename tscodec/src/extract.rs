//! Extraction of translatable string literals from C/C++ sources.
//!
//! This is a token scanner, not a C++ parser. It recognizes:
//!
//! - `tr("text")`, `tr("text", "comment")`, `tr("%n file(s)", "", n)`
//! - `Class::tr(...)` and `ns::Class::tr(...)`, whose context is the qualifier
//! - `QCoreApplication::translate("Context", "text", "comment", n)`
//! - `QT_TR_NOOP("text")`, `QT_TR_N_NOOP`, `QT_TRANSLATE_NOOP("Context", "text")`,
//!   `QT_TRANSLATE_NOOP3` and `QT_TRANSLATE_N_NOOP`
//!
//! Adjacent literals are concatenated and escapes decoded. A `//:` comment line
//! becomes the extracomment of the next extracted message.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    types::{Document, Location, Message},
};

/// Options for extraction, usually loaded from the `[extract]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Context for unqualified `tr()` and `QT_TR_NOOP()`.
    pub default_context: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            default_context: "QObject".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Scope,
    Open,
    Close,
    Comma,
    ExtraComment(String),
    Punct,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    line: u32,
}

fn tokenize(code: &str) -> Vec<Spanned> {
    let chars: Vec<char> = code.chars().collect();
    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            c if c.is_whitespace() => i += 1,
            '/' if next == Some('/') => {
                let start = i + 2;
                let mut end = start;
                while end < chars.len() && chars[end] != '\n' {
                    end += 1;
                }
                if chars.get(start) == Some(&':') {
                    let text: String = chars[start + 1..end].iter().collect();
                    tokens.push(Spanned {
                        token: Token::ExtraComment(text.trim().to_string()),
                        line,
                    });
                }
                i = end;
            }
            '/' if next == Some('*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    if chars[i] == '\n' {
                        line += 1;
                    }
                    i += 1;
                }
                i = (i + 2).min(chars.len());
            }
            '"' => {
                let (text, end, newlines) = read_string(&chars, i + 1);
                tokens.push(Spanned {
                    token: Token::Str(text),
                    line,
                });
                line += newlines;
                i = end;
            }
            '\'' => {
                i += 1;
                while i < chars.len() && chars[i] != '\'' && chars[i] != '\n' {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if chars.get(i) == Some(&'\'') {
                    i += 1;
                }
            }
            ':' if next == Some(':') => {
                tokens.push(Spanned {
                    token: Token::Scope,
                    line,
                });
                i += 2;
            }
            '(' | ')' | ',' => {
                let token = match c {
                    '(' => Token::Open,
                    ')' => Token::Close,
                    _ => Token::Comma,
                };
                tokens.push(Spanned { token, line });
                i += 1;
            }
            c if c.is_alphanumeric() || c == '_' => {
                let start = i;
                let numeric = c.is_ascii_digit();
                while i < chars.len()
                    && (chars[i].is_alphanumeric()
                        || chars[i] == '_'
                        || (numeric && (chars[i] == '\'' || chars[i] == '.')))
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if chars.get(i) == Some(&'"') {
                    match word.as_str() {
                        // Encoding prefix: the literal follows on the next iteration.
                        "u8" | "u" | "U" | "L" => continue,
                        "R" | "u8R" | "uR" | "UR" | "LR" => {
                            let (text, end, newlines) = read_raw_string(&chars, i + 1);
                            tokens.push(Spanned {
                                token: Token::Str(text),
                                line,
                            });
                            line += newlines;
                            i = end;
                            continue;
                        }
                        _ => {}
                    }
                }
                tokens.push(Spanned {
                    token: Token::Ident(word),
                    line,
                });
            }
            _ => {
                tokens.push(Spanned {
                    token: Token::Punct,
                    line,
                });
                i += 1;
            }
        }
    }

    tokens
}

/// Reads a literal body starting after the opening quote.
///
/// Returns the decoded text, the index after the closing quote and the number
/// of line continuations consumed.
fn read_string(chars: &[char], mut i: usize) -> (String, usize, u32) {
    let mut out = String::new();
    let mut newlines = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => return (out, i + 1, newlines),
            // Unterminated literal.
            '\n' => return (out, i, newlines),
            '\\' => {
                let Some(&escape) = chars.get(i + 1) else {
                    i += 1;
                    break;
                };
                i += 2;
                match escape {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0c}'),
                    'v' => out.push('\u{0b}'),
                    '\\' | '"' | '\'' | '?' => out.push(escape),
                    '\n' => newlines += 1,
                    '0'..='7' => {
                        let mut value = escape.to_digit(8).unwrap_or(0);
                        for _ in 0..2 {
                            match chars.get(i).and_then(|c| c.to_digit(8)) {
                                Some(d) => {
                                    value = value * 8 + d;
                                    i += 1;
                                }
                                None => break,
                            }
                        }
                        out.extend(char::from_u32(value));
                    }
                    'x' => {
                        let value = take_hex(chars, &mut i, usize::MAX);
                        out.extend(value.and_then(char::from_u32));
                    }
                    'u' => {
                        let value = take_hex(chars, &mut i, 4);
                        out.extend(value.and_then(char::from_u32));
                    }
                    'U' => {
                        let value = take_hex(chars, &mut i, 8);
                        out.extend(value.and_then(char::from_u32));
                    }
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    (out, i, newlines)
}

fn take_hex(chars: &[char], i: &mut usize, max: usize) -> Option<u32> {
    let mut value: u32 = 0;
    let mut digits = 0;
    while digits < max {
        let Some(d) = chars.get(*i).and_then(|c| c.to_digit(16)) else {
            break;
        };
        value = value.checked_mul(16)?.checked_add(d)?;
        *i += 1;
        digits += 1;
    }
    (digits > 0).then_some(value)
}

/// `R"delim( ... )delim"`, starting after the opening quote.
fn read_raw_string(chars: &[char], start: usize) -> (String, usize, u32) {
    let mut i = start;
    while i < chars.len() && chars[i] != '(' {
        i += 1;
    }
    let delimiter: String = chars[start..i.min(chars.len())].iter().collect();
    let terminator: Vec<char> = format!("){}\"", delimiter).chars().collect();
    let body_start = (i + 1).min(chars.len());

    let mut j = body_start;
    while j < chars.len() {
        if chars[j..].starts_with(&terminator) {
            let body: String = chars[body_start..j].iter().collect();
            let newlines = body.matches('\n').count() as u32;
            return (body, j + terminator.len(), newlines);
        }
        j += 1;
    }
    let body: String = chars[body_start..].iter().collect();
    let newlines = body.matches('\n').count() as u32;
    (body, chars.len(), newlines)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    /// `tr(source, comment, n)`
    Tr,
    /// `translate(context, source, comment, n)`
    Translate,
    /// `QT_TR_NOOP(source)`
    TrNoop { numerus: bool },
    /// `QT_TRANSLATE_NOOP(context, source, comment)`
    TranslateNoop { numerus: bool },
}

impl Call {
    fn from_ident(name: &str) -> Option<Self> {
        match name {
            "tr" | "trUtf8" => Some(Call::Tr),
            "translate" => Some(Call::Translate),
            "QT_TR_NOOP" | "QT_TR_NOOP_UTF8" => Some(Call::TrNoop { numerus: false }),
            "QT_TR_N_NOOP" => Some(Call::TrNoop { numerus: true }),
            "QT_TRANSLATE_NOOP" | "QT_TRANSLATE_NOOP_UTF8" | "QT_TRANSLATE_NOOP3"
            | "QT_TRANSLATE_NOOP3_UTF8" => Some(Call::TranslateNoop { numerus: false }),
            "QT_TRANSLATE_N_NOOP" | "QT_TRANSLATE_N_NOOP3" => {
                Some(Call::TranslateNoop { numerus: true })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Found {
    context: String,
    source: String,
    comment: Option<String>,
    extracomment: Option<String>,
    numerus: bool,
    line: u32,
}

/// Splits the arguments of the call whose `(` is at `open`.
fn call_arguments(tokens: &[Spanned], open: usize) -> Vec<&[Spanned]> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = open + 1;

    for (idx, spanned) in tokens.iter().enumerate().skip(open) {
        match spanned.token {
            Token::Open => depth += 1,
            Token::Close => {
                depth -= 1;
                if depth == 0 {
                    if idx > start {
                        args.push(&tokens[start..idx]);
                    }
                    return args;
                }
            }
            Token::Comma if depth == 1 => {
                args.push(&tokens[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    // Unbalanced: treat what was seen as the argument list.
    if start < tokens.len() {
        args.push(&tokens[start..]);
    }
    args
}

/// The concatenated text when an argument is nothing but string literals.
fn literal(arg: &[Spanned]) -> Option<String> {
    let mut text = String::new();
    let mut any = false;
    for spanned in arg {
        match &spanned.token {
            Token::Str(s) => {
                text.push_str(s);
                any = true;
            }
            Token::ExtraComment(_) => {}
            _ => return None,
        }
    }
    any.then_some(text)
}

/// `ns::Class` for `ns::Class::tr`, counting back from the `tr` token.
fn qualifier(tokens: &[Spanned], at: usize) -> Option<String> {
    let mut parts = Vec::new();
    let mut j = at;
    while j >= 2 && tokens[j - 1].token == Token::Scope {
        let Token::Ident(name) = &tokens[j - 2].token else {
            break;
        };
        parts.push(name.as_str());
        j -= 2;
    }
    if parts.is_empty() {
        return None;
    }
    parts.reverse();
    Some(parts.join("::"))
}

fn scan(code: &str, options: &ExtractOptions) -> Vec<Found> {
    let tokens = tokenize(code);
    let mut found = Vec::new();
    let mut extra: Vec<String> = Vec::new();

    for (i, spanned) in tokens.iter().enumerate() {
        let name = match &spanned.token {
            Token::ExtraComment(text) => {
                extra.push(text.clone());
                continue;
            }
            Token::Ident(name) => name,
            _ => continue,
        };
        let Some(call) = Call::from_ident(name) else {
            continue;
        };
        if tokens.get(i + 1).map(|t| &t.token) != Some(&Token::Open) {
            continue;
        }

        let args = call_arguments(&tokens, i + 1);
        let literal_at = |n: usize| args.get(n).and_then(|a| literal(a));

        let entry = match call {
            Call::Tr => literal_at(0).map(|source| {
                let context = qualifier(&tokens, i)
                    .unwrap_or_else(|| options.default_context.clone());
                (context, source, literal_at(1), args.len() >= 3)
            }),
            Call::Translate => match (literal_at(0), literal_at(1)) {
                (Some(context), Some(source)) => {
                    Some((context, source, literal_at(2), args.len() >= 4))
                }
                _ => None,
            },
            Call::TrNoop { numerus } => {
                literal_at(0).map(|source| (options.default_context.clone(), source, None, numerus))
            }
            Call::TranslateNoop { numerus } => match (literal_at(0), literal_at(1)) {
                (Some(context), Some(source)) => Some((context, source, literal_at(2), numerus)),
                _ => None,
            },
        };

        let Some((context, source, comment, numerus)) = entry else {
            continue;
        };
        found.push(Found {
            context,
            source,
            comment: comment.filter(|c| !c.is_empty()),
            extracomment: (!extra.is_empty()).then(|| extra.join(" ")),
            numerus,
            line: spanned.line,
        });
        extra.clear();
    }

    found
}

/// Extracts messages from `code` into `doc`, recording `filename` as their location.
///
/// Repeated messages gain another location instead of a second entry.
pub fn extract_into(doc: &mut Document, code: &str, filename: &str, options: &ExtractOptions) {
    for found in scan(code, options) {
        let location = Location::new(filename, found.line);
        let context = doc.context_or_insert(&found.context);
        if let Some(message) = context.find_mut(&found.source, found.comment.as_deref()) {
            message.locations.push(location);
            message.numerus |= found.numerus;
            if message.extracomment.is_none() {
                message.extracomment = found.extracomment;
            }
            continue;
        }
        context.messages.push(Message {
            numerus: found.numerus,
            locations: vec![location],
            source: found.source,
            comment: found.comment,
            extracomment: found.extracomment,
            ..Message::default()
        });
    }
}

/// Extracts from a single in-memory source.
pub fn extract_str(code: &str, filename: &str, options: &ExtractOptions) -> Document {
    let mut doc = Document::default();
    extract_into(&mut doc, code, filename, options);
    doc
}

/// Extracts from every file in `paths`; locations are written relative to
/// `base_dir` (usually the directory of the `.ts` file).
pub fn extract_files<P: AsRef<Path>>(
    paths: &[P],
    base_dir: &Path,
    options: &ExtractOptions,
) -> Result<Document, Error> {
    let mut doc = Document::default();
    for path in paths {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let code = String::from_utf8_lossy(&bytes);
        let label = relative_location(path, base_dir)?;
        let before = doc.message_count();
        extract_into(&mut doc, &code, &label, options);
        debug!(file = %label, new_messages = doc.message_count() - before, "scanned source");
    }
    Ok(doc)
}

/// `path` relative to `base_dir` with `/` separators, e.g. `../abstractrestapi.cpp`.
pub fn relative_location(path: &Path, base_dir: &Path) -> Result<String, Error> {
    let path = normalize(&std::path::absolute(path)?);
    let base = normalize(&std::path::absolute(base_dir)?);

    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        parts.push("..".to_string());
    }
    for component in &path_parts[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    Ok(parts.join("/"))
}

/// Lexically resolves `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
