//! Support for the Qt Linguist `.ts` XML format.
//!
//! Reads `<TS>` documents into [`Document`] and writes them back in the
//! layout lupdate produces, so a lupdate-generated file survives a
//! parse/serialize cycle byte for byte.

use std::io::Write;

use encoding_rs::{Encoding, UTF_8};
use lazy_static::lazy_static;
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use regex::Regex;
use tracing::debug;

use crate::{
    error::Error,
    traits::Parser,
    types::{
        Context, Document, LineNumber, Location, Message, Translation, TranslationState,
        TranslationValue,
    },
};

lazy_static! {
    static ref XML_DECL_ENCODING: Regex =
        Regex::new(r#"^<\?xml[^>]*encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#).unwrap();
}

const MESSAGE_INDENT: &str = "\n    ";
const CHILD_INDENT: &str = "\n        ";
const FORM_INDENT: &str = "\n            ";

impl Parser for Document {
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        parse_document(&decode_xml_bytes(bytes)?)
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        write_document(self, writer)
    }
}

/// Decodes raw file bytes to a string.
///
/// A byte order mark wins; otherwise the `encoding` of the XML declaration is
/// used, defaulting to UTF-8.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String, Error> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?, bytes),
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(Error::Encoding(format!(
            "input is not valid {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

fn declared_encoding(bytes: &[u8]) -> Result<&'static Encoding, Error> {
    let head_len = bytes
        .windows(2)
        .position(|w| w == b"?>")
        .map_or(0, |pos| pos + 2);
    let head = String::from_utf8_lossy(&bytes[..head_len]);

    match XML_DECL_ENCODING.captures(&head) {
        Some(caps) => {
            let label = &caps[1];
            Encoding::for_label(label.as_bytes()).ok_or_else(|| Error::Encoding(label.to_string()))
        }
        None => Ok(UTF_8),
    }
}

/// Parses a decoded `.ts` document.
pub fn parse_document(xml: &str) -> Result<Document, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"TS" => {
                let mut doc = document_from_root(&e)?;
                parse_ts_body(&mut reader, &mut doc)?;
                debug!(
                    contexts = doc.contexts.len(),
                    messages = doc.message_count(),
                    "parsed .ts document"
                );
                return Ok(doc);
            }
            Event::Empty(e) if e.name().as_ref() == b"TS" => return document_from_root(&e),
            Event::Start(e) | Event::Empty(e) => {
                return Err(Error::invalid_document(format!(
                    "expected <TS> root element, found <{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Eof => return Err(Error::invalid_document("missing <TS> root element")),
            _ => {}
        }
    }
}

fn document_from_root(e: &BytesStart) -> Result<Document, Error> {
    let mut doc = Document::default();
    if let Some(version) = attribute(e, b"version")? {
        doc.version = version;
    }
    doc.language = attribute(e, b"language")?;
    doc.source_language = attribute(e, b"sourcelanguage")?;
    Ok(doc)
}

fn parse_ts_body(reader: &mut Reader<&[u8]>, doc: &mut Document) -> Result<(), Error> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"context" => doc.contexts.push(parse_context(reader)?),
                b"message" => {
                    return Err(Error::invalid_document("<message> outside of <context>"));
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"TS" => return Ok(()),
            Event::Eof => return Err(Error::invalid_document("unexpected end of file in <TS>")),
            _ => {}
        }
    }
}

fn parse_context(reader: &mut Reader<&[u8]>) -> Result<Context, Error> {
    let mut name = None;
    let mut comment = None;
    let mut messages = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"name" => name = Some(read_text(reader, b"name")?),
                b"comment" => comment = Some(read_text(reader, b"comment")?),
                b"message" => messages.push(parse_message(&e, reader)?),
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"name" => name = Some(String::new()),
                b"comment" => comment = Some(String::new()),
                b"message" => return Err(Error::invalid_document("<message> without <source>")),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"context" => break,
            Event::Eof => {
                return Err(Error::invalid_document("unexpected end of file in <context>"));
            }
            _ => {}
        }
    }

    Ok(Context {
        name: name.ok_or_else(|| Error::invalid_document("<context> without <name>"))?,
        comment,
        messages,
    })
}

fn parse_message(start: &BytesStart, reader: &mut Reader<&[u8]>) -> Result<Message, Error> {
    let mut message = Message {
        id: attribute(start, b"id")?,
        numerus: attribute(start, b"numerus")?.as_deref() == Some("yes"),
        ..Message::default()
    };
    let mut source = None;

    loop {
        match reader.read_event()? {
            Event::Empty(e) => match e.name().as_ref() {
                b"location" => message.locations.push(parse_location(&e)?),
                b"source" => source = Some(String::new()),
                b"translation" => {
                    message.translation = Translation {
                        state: translation_state(&e)?,
                        value: empty_value(message.numerus),
                    }
                }
                b"oldsource" => message.oldsource = Some(String::new()),
                b"comment" => message.comment = Some(String::new()),
                b"oldcomment" => message.oldcomment = Some(String::new()),
                b"extracomment" => message.extracomment = Some(String::new()),
                b"translatorcomment" => message.translatorcomment = Some(String::new()),
                _ => {}
            },
            Event::Start(e) => match e.name().as_ref() {
                b"location" => {
                    message.locations.push(parse_location(&e)?);
                    reader.read_to_end(e.name())?;
                }
                b"source" => source = Some(read_text(reader, b"source")?),
                b"translation" => {
                    message.translation = parse_translation(&e, reader, message.numerus)?
                }
                b"oldsource" => message.oldsource = Some(read_text(reader, b"oldsource")?),
                b"comment" => message.comment = Some(read_text(reader, b"comment")?),
                b"oldcomment" => message.oldcomment = Some(read_text(reader, b"oldcomment")?),
                b"extracomment" => {
                    message.extracomment = Some(read_text(reader, b"extracomment")?)
                }
                b"translatorcomment" => {
                    message.translatorcomment = Some(read_text(reader, b"translatorcomment")?)
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"message" => break,
            Event::Eof => {
                return Err(Error::invalid_document("unexpected end of file in <message>"));
            }
            _ => {}
        }
    }

    message.source = source.ok_or_else(|| Error::invalid_document("<message> without <source>"))?;
    Ok(message)
}

fn parse_location(e: &BytesStart) -> Result<Location, Error> {
    let line = attribute(e, b"line")?
        .map(|line| line.parse::<LineNumber>())
        .transpose()?;
    Ok(Location {
        filename: attribute(e, b"filename")?,
        line,
    })
}

fn translation_state(e: &BytesStart) -> Result<TranslationState, Error> {
    attribute(e, b"type")?
        .map(|t| t.parse())
        .unwrap_or(Ok(TranslationState::Finished))
}

fn empty_value(numerus: bool) -> TranslationValue {
    if numerus {
        TranslationValue::Numerus(Vec::new())
    } else {
        TranslationValue::default()
    }
}

fn parse_translation(
    start: &BytesStart,
    reader: &mut Reader<&[u8]>,
    numerus: bool,
) -> Result<Translation, Error> {
    let state = translation_state(start)?;
    let variants = attribute(start, b"variants")?.as_deref() == Some("yes");

    let mut text = String::new();
    let mut forms: Vec<String> = Vec::new();
    let mut lengths: Vec<String> = Vec::new();
    let mut saw_forms = false;

    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Event::Start(e) => match e.name().as_ref() {
                b"numerusform" => {
                    if attribute(&e, b"variants")?.as_deref() == Some("yes") {
                        return Err(Error::invalid_document(
                            "length variants inside <numerusform> are not supported",
                        ));
                    }
                    saw_forms = true;
                    forms.push(read_text(reader, b"numerusform")?);
                }
                b"lengthvariant" => lengths.push(read_text(reader, b"lengthvariant")?),
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"numerusform" => {
                    saw_forms = true;
                    forms.push(String::new());
                }
                b"lengthvariant" => lengths.push(String::new()),
                b"byte" => push_byte(&e, &mut text)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"translation" => break,
            Event::Eof => {
                return Err(Error::invalid_document("unexpected end of file in <translation>"));
            }
            _ => {}
        }
    }

    let value = if saw_forms {
        TranslationValue::Numerus(forms)
    } else if variants || !lengths.is_empty() {
        TranslationValue::Variants(lengths)
    } else if numerus {
        if text.is_empty() {
            TranslationValue::Numerus(Vec::new())
        } else {
            TranslationValue::Numerus(vec![text])
        }
    } else {
        TranslationValue::Text(text)
    };

    Ok(Translation { state, value })
}

/// Reads character data up to the closing `tag`.
fn read_text(reader: &mut Reader<&[u8]>, tag: &[u8]) -> Result<String, Error> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Event::Empty(e) if e.name().as_ref() == b"byte" => push_byte(&e, &mut text)?,
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            }
            Event::End(e) if e.name().as_ref() == tag => return Ok(text),
            Event::Eof => {
                return Err(Error::invalid_document(format!(
                    "unexpected end of file in <{}>",
                    String::from_utf8_lossy(tag)
                )));
            }
            _ => {}
        }
    }
}

/// Legacy `<byte value="x1b"/>` encoding of control characters.
fn push_byte(e: &BytesStart, text: &mut String) -> Result<(), Error> {
    let value = attribute(e, b"value")?
        .ok_or_else(|| Error::invalid_document("<byte> without value"))?;
    let code = match value.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    }
    .map_err(|_| Error::invalid_document(format!("invalid <byte> value `{}`", value)))?;
    let ch = char::from_u32(code)
        .ok_or_else(|| Error::invalid_document(format!("invalid <byte> value `{}`", value)))?;
    text.push(ch);
    Ok(())
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, Error> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Escapes text the way lupdate does: the five XML entities, plus numeric
/// references for control characters other than tab, CR and LF.
pub fn protect(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 5);
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '>' => out.push_str("&gt;"),
            '<' => out.push_str("&lt;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\r' | '\n' | '\t') => {
                out.push_str(&format!("&#x{:x};", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Serializes a document in lupdate layout.
pub fn write_document<W: Write>(doc: &Document, writer: W) -> Result<(), Error> {
    let mut xml = Writer::new(writer);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    newline(&mut xml, "\n")?;
    xml.write_event(Event::DocType(BytesText::from_escaped("TS")))?;
    newline(&mut xml, "\n")?;

    let mut root = BytesStart::new("TS");
    root.push_attribute(("version", doc.version.as_str()));
    if let Some(language) = &doc.language {
        root.push_attribute(("language", language.as_str()));
    }
    if let Some(source_language) = &doc.source_language {
        root.push_attribute(("sourcelanguage", source_language.as_str()));
    }
    xml.write_event(Event::Start(root))?;
    newline(&mut xml, "\n")?;

    for context in &doc.contexts {
        xml.write_event(Event::Start(BytesStart::new("context")))?;
        newline(&mut xml, MESSAGE_INDENT)?;
        text_element(&mut xml, "name", &context.name)?;
        if let Some(comment) = &context.comment {
            newline(&mut xml, MESSAGE_INDENT)?;
            text_element(&mut xml, "comment", comment)?;
        }
        for message in &context.messages {
            newline(&mut xml, MESSAGE_INDENT)?;
            write_message(&mut xml, message)?;
        }
        newline(&mut xml, "\n")?;
        xml.write_event(Event::End(BytesEnd::new("context")))?;
        newline(&mut xml, "\n")?;
    }

    xml.write_event(Event::End(BytesEnd::new("TS")))?;
    newline(&mut xml, "\n")?;
    Ok(())
}

fn write_message<W: Write>(xml: &mut Writer<W>, message: &Message) -> Result<(), Error> {
    let mut start = BytesStart::new("message");
    if let Some(id) = &message.id {
        start.push_attribute(("id", id.as_str()));
    }
    if message.numerus {
        start.push_attribute(("numerus", "yes"));
    }
    xml.write_event(Event::Start(start))?;

    for location in &message.locations {
        newline(xml, CHILD_INDENT)?;
        let mut elem = BytesStart::new("location");
        if let Some(filename) = &location.filename {
            elem.push_attribute(("filename", filename.as_str()));
        }
        if let Some(line) = &location.line {
            elem.push_attribute(("line", line.to_string().as_str()));
        }
        xml.write_event(Event::Empty(elem))?;
    }

    newline(xml, CHILD_INDENT)?;
    text_element(xml, "source", &message.source)?;

    let optional = [
        ("oldsource", &message.oldsource),
        ("comment", &message.comment),
        ("oldcomment", &message.oldcomment),
        ("extracomment", &message.extracomment),
        ("translatorcomment", &message.translatorcomment),
    ];
    for (tag, value) in optional {
        if let Some(value) = value {
            newline(xml, CHILD_INDENT)?;
            text_element(xml, tag, value)?;
        }
    }

    newline(xml, CHILD_INDENT)?;
    write_translation(xml, &message.translation)?;

    newline(xml, MESSAGE_INDENT)?;
    xml.write_event(Event::End(BytesEnd::new("message")))?;
    Ok(())
}

fn write_translation<W: Write>(xml: &mut Writer<W>, translation: &Translation) -> Result<(), Error> {
    let mut start = BytesStart::new("translation");
    if let Some(kind) = translation.state.type_attribute() {
        start.push_attribute(("type", kind));
    }

    match &translation.value {
        TranslationValue::Text(text) => {
            xml.write_event(Event::Start(start))?;
            write_text(xml, text)?;
        }
        TranslationValue::Numerus(forms) => {
            xml.write_event(Event::Start(start))?;
            for form in forms {
                newline(xml, FORM_INDENT)?;
                text_element(xml, "numerusform", form)?;
            }
            if !forms.is_empty() {
                newline(xml, CHILD_INDENT)?;
            }
        }
        TranslationValue::Variants(variants) => {
            start.push_attribute(("variants", "yes"));
            xml.write_event(Event::Start(start))?;
            for variant in variants {
                newline(xml, FORM_INDENT)?;
                text_element(xml, "lengthvariant", variant)?;
            }
            if !variants.is_empty() {
                newline(xml, CHILD_INDENT)?;
            }
        }
    }

    xml.write_event(Event::End(BytesEnd::new("translation")))?;
    Ok(())
}

fn text_element<W: Write>(xml: &mut Writer<W>, tag: &str, text: &str) -> Result<(), Error> {
    xml.write_event(Event::Start(BytesStart::new(tag)))?;
    write_text(xml, text)?;
    xml.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_text<W: Write>(xml: &mut Writer<W>, text: &str) -> Result<(), Error> {
    if !text.is_empty() {
        xml.write_event(Event::Text(BytesText::from_escaped(protect(text))))?;
    }
    Ok(())
}

fn newline<W: Write>(xml: &mut Writer<W>, whitespace: &str) -> Result<(), Error> {
    xml.write_event(Event::Text(BytesText::from_escaped(whitespace)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;
    use indoc::indoc;

    const PROOF_NETWORK: &str = include_str!("../../tests/fixtures/ProofNetwork.ja.ts");

    #[test]
    fn test_parse_fixture_header_and_counts() {
        let doc = Document::from_str(PROOF_NETWORK).unwrap();
        assert_eq!(doc.version, "2.1");
        assert_eq!(doc.language.as_deref(), Some("ja_JP"));
        assert_eq!(doc.source_language, None);
        assert_eq!(doc.contexts.len(), 1);
        assert_eq!(doc.contexts[0].name, "QObject");
        assert_eq!(doc.message_count(), 36);
        assert!(
            doc.messages()
                .all(|(_, m)| m.translation.state == TranslationState::Unfinished)
        );
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let doc = Document::from_str(PROOF_NETWORK).unwrap();
        assert!(
            doc.find("QObject", "Can't create entity from server response", None)
                .is_some()
        );
        assert!(
            doc.find(
                "QObject",
                "Can't create remaining boxes list: there is no \"type\" field",
                None
            )
            .is_some()
        );
    }

    #[test]
    fn test_parse_keeps_whitespace_in_source() {
        let doc = Document::from_str(PROOF_NETWORK).unwrap();
        assert!(doc.find("QObject", "Errors: \n", None).is_some());
        assert!(
            doc.find(
                "QObject",
                "Can't connect to Scissorhands service.\nPlease check your internet connection.",
                None
            )
            .is_some()
        );
    }

    #[test]
    fn test_parse_multiple_locations() {
        let doc = Document::from_str(PROOF_NETWORK).unwrap();
        let message = doc.find("QObject", "JSON error: %1", None).unwrap();
        assert_eq!(message.locations.len(), 11);
        assert_eq!(
            message.locations[0],
            Location::new("../abstractrestapi.cpp", 256)
        );
        assert_eq!(
            message.locations[10],
            Location::new("../profit/presssheetitemsapi.cpp", 155)
        );
    }

    #[test]
    fn test_fixture_roundtrip_is_byte_identical() {
        let doc = Document::from_str(PROOF_NETWORK).unwrap();
        assert_eq!(doc.to_string_lossless().unwrap(), PROOF_NETWORK);
    }

    #[test]
    fn test_parse_finished_numerus_and_vanished() {
        let xml = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <!DOCTYPE TS>
            <TS version="2.1" language="ru_RU" sourcelanguage="en_US">
            <context>
                <name>JobsApi</name>
                <message numerus="yes">
                    <location filename="../fiery/jobsapi.cpp" line="+12"/>
                    <source>%n job(s) deleted</source>
                    <translation>
                        <numerusform>Удалено %n задание</numerusform>
                        <numerusform>Удалено %n задания</numerusform>
                        <numerusform>Удалено %n заданий</numerusform>
                    </translation>
                </message>
                <message>
                    <source>Can&apos;t delete job</source>
                    <comment>toolbar</comment>
                    <translation type="vanished">Не удалось удалить задание</translation>
                </message>
            </context>
            </TS>
        "#};

        let doc = Document::from_str(xml).unwrap();
        assert_eq!(doc.source_language.as_deref(), Some("en_US"));

        let numerus = &doc.contexts[0].messages[0];
        assert!(numerus.numerus);
        assert_eq!(numerus.locations[0].line, Some(LineNumber::Relative(12)));
        assert_eq!(numerus.translation.state, TranslationState::Finished);
        assert_eq!(
            numerus.translation.value,
            TranslationValue::Numerus(vec![
                "Удалено %n задание".to_string(),
                "Удалено %n задания".to_string(),
                "Удалено %n заданий".to_string(),
            ])
        );

        let vanished = doc.find("JobsApi", "Can't delete job", Some("toolbar")).unwrap();
        assert_eq!(vanished.translation.state, TranslationState::Vanished);

        assert_eq!(doc.to_string_lossless().unwrap(), xml);
    }

    #[test]
    fn test_parse_self_closing_translation_and_missing_translation() {
        let xml = indoc! {r#"
            <TS version="2.1">
            <context>
                <name>QObject</name>
                <message>
                    <source>No trucks found</source>
                    <translation type="unfinished"/>
                </message>
                <message>
                    <source>Invalid JDF</source>
                </message>
            </context>
            </TS>
        "#};
        let doc = Document::from_str(xml).unwrap();
        for (_, message) in doc.messages() {
            assert_eq!(message.translation, Translation::unfinished());
        }
    }

    #[test]
    fn test_length_variants() {
        let xml = indoc! {r#"
            <TS version="2.1" language="de_DE">
            <context>
                <name>QObject</name>
                <message>
                    <source>Unknown server error</source>
                    <translation variants="yes">
                        <lengthvariant>Unbekannter Serverfehler</lengthvariant>
                        <lengthvariant>Serverfehler</lengthvariant>
                    </translation>
                </message>
            </context>
            </TS>
        "#};
        let doc = Document::from_str(xml).unwrap();
        let message = &doc.contexts[0].messages[0];
        assert_eq!(
            message.translation.value,
            TranslationValue::Variants(vec![
                "Unbekannter Serverfehler".to_string(),
                "Serverfehler".to_string()
            ])
        );
        let reparsed = Document::from_str(&doc.to_string_lossless().unwrap()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let xml = r#"<TS version="2.1"><context><name>QObject</name><message><translation>x</translation></message></context></TS>"#;
        let err = Document::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("without <source>"));
    }

    #[test]
    fn test_message_outside_context_is_an_error() {
        let xml = r#"<TS version="2.1"><message><source>x</source></message></TS>"#;
        let err = Document::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("outside of <context>"));
    }

    #[test]
    fn test_invalid_line_is_an_error() {
        let xml = r#"<TS version="2.1"><context><name>Q</name><message><location filename="a.cpp" line="abc"/><source>x</source></message></context></TS>"#;
        assert!(Document::from_str(xml).is_err());
    }

    #[test]
    fn test_unknown_translation_type_is_an_error() {
        let xml = r#"<TS version="2.1"><context><name>Q</name><message><source>x</source><translation type="draft">y</translation></message></context></TS>"#;
        let err = Document::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("unknown translation type"));
    }

    #[test]
    fn test_wrong_root_is_an_error() {
        assert!(Document::from_str("<resources></resources>").is_err());
        assert!(Document::from_str("").is_err());
    }

    #[test]
    fn test_control_characters_roundtrip() {
        let mut doc = Document::new(Some("ja_JP".to_string()));
        doc.context_or_insert("QObject")
            .messages
            .push(Message::new("bell\u{7} & <tab>\t"));
        let out = doc.to_string_lossless().unwrap();
        assert!(out.contains("<source>bell&#x7; &amp; &lt;tab&gt;\t</source>"));
        assert_eq!(Document::from_str(&out).unwrap(), doc);
    }

    #[test]
    fn test_legacy_byte_element() {
        let xml = r#"<TS version="2.0"><context><name>Q</name><message><source>a<byte value="x1b"/>b</source></message></context></TS>"#;
        let doc = Document::from_str(xml).unwrap();
        assert_eq!(doc.contexts[0].messages[0].source, "a\u{1b}b");
    }

    #[test]
    fn test_protect_matches_lupdate_escaping() {
        assert_eq!(
            protect(r#"Can't convert %1 for "Content-Length""#),
            "Can&apos;t convert %1 for &quot;Content-Length&quot;"
        );
        assert_eq!(protect("a\nb"), "a\nb");
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let xml = "<TS version=\"2.1\" language=\"ja_JP\"><context><name>Q</name><message><source>x</source><translation>無効</translation></message></context></TS>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(doc.contexts[0].messages[0].translation.approved(), Some("無効"));
    }

    #[test]
    fn test_decode_declared_latin1() {
        let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><TS version=\"2.0\"><context><name>Q</name><message><source>caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</source></message></context></TS>");
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(doc.contexts[0].messages[0].source, "café");
    }

    #[test]
    fn test_unknown_declared_encoding_is_an_error() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"klingon\"?><TS version=\"2.1\"/>";
        let err = Document::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
