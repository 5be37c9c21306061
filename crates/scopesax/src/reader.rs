// Dweve ScopeSAX - Scoped Event-Driven XML Parsing
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Namespace-aware push reader on top of `quick-xml`.
//!
//! The reader tokenizes the input, resolves namespaces, checks the
//! well-formedness rules the tokenizer leaves out, optionally validates
//! against a compiled schema, and pushes the resulting events into a
//! [`ContentHandler`]. Problems are routed through an [`ErrorHandler`];
//! the first callback that returns an error stops the loop.

use crate::error::{Diagnostic, ParseError, ParseResult, Severity};
use crate::error_policy::{self, ErrorHandler};
use crate::event::{Attributes, QualifiedName};
use crate::factory::{ReaderConfig, ValidationMode};
use crate::input::{lookup_encoding, InputSource, Opened};
use crate::namespace::{Declaration, NamespaceScopes};
use crate::schema::{Finding, Schema, Validator};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::{self, BufRead, Read};
use std::sync::Arc;
use tracing::debug;

/// Receiver of document events.
///
/// Empty elements arrive as a start followed by an end. Text may be split
/// over several `characters` calls.
pub trait ContentHandler {
    fn start_document(&mut self) -> ParseResult<()> {
        Ok(())
    }

    fn start_element(&mut self, name: &QualifiedName, attributes: &Attributes) -> ParseResult<()>;

    fn characters(&mut self, text: &str) -> ParseResult<()>;

    fn end_element(&mut self, name: &QualifiedName) -> ParseResult<()>;

    fn end_document(&mut self) -> ParseResult<()> {
        Ok(())
    }
}

/// A configured reader, validating or not.
///
/// Built by a [`ReaderFactory`](crate::ReaderFactory); cheap to clone, and
/// every [`parse`](Self::parse) call is independent.
#[derive(Debug, Clone)]
pub struct XmlReader {
    mode: ValidationMode,
    schema: Option<Arc<Schema>>,
    buffer_size: usize,
    trim_text: bool,
}

impl XmlReader {
    pub(crate) fn new(mode: ValidationMode, schema: Option<Arc<Schema>>, config: &ReaderConfig) -> Self {
        Self {
            mode,
            schema,
            buffer_size: config.buffer_size,
            trim_text: config.trim_text,
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn is_validating(&self) -> bool {
        self.mode == ValidationMode::Validating
    }

    /// The schema documents are checked against, in validating mode.
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    /// Read `input` to the end, pushing events into `content`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the tokenizer, the error policy or
    /// a content callback.
    pub fn parse(
        &self,
        input: InputSource<'_>,
        content: &mut dyn ContentHandler,
        errors: &mut dyn ErrorHandler,
    ) -> ParseResult<()> {
        debug!(
            "Parsing {} ({:?})",
            input.system_id().unwrap_or("<anonymous input>"),
            self.mode
        );

        match input.open(self.buffer_size)? {
            Opened::Text(text) => {
                let body = text.strip_prefix('\u{feff}').unwrap_or(text.as_ref());
                self.drive(Reader::from_str(body), Some(body.as_bytes()), content, errors)
            }
            Opened::Bytes(stream) => {
                self.drive(Reader::from_reader(Tracked::new(stream)), None, content, errors)
            }
        }
    }

    fn drive<R: TokenInput>(
        &self,
        mut reader: Reader<R>,
        text: Option<&[u8]>,
        content: &mut dyn ContentHandler,
        errors: &mut dyn ErrorHandler,
    ) -> ParseResult<()> {
        reader.trim_text(self.trim_text);
        reader.expand_empty_elements(true);

        let validator = match (self.mode, self.schema.as_deref()) {
            (ValidationMode::Validating, Some(schema)) => Some(Validator::new(schema)),
            _ => None,
        };

        Driver {
            reader,
            text,
            validator,
            namespaces: NamespaceScopes::new(),
            open: Vec::new(),
            seen_root: false,
            content,
            errors,
        }
        .run()
    }
}

/// Tokenizer input.
trait TokenInput: BufRead {
    /// The last byte handed to the tokenizer, when the input keeps it.
    fn last_consumed(&self) -> Option<u8> {
        None
    }
}

impl TokenInput for &[u8] {}

/// Byte stream wrapper remembering the last byte consumed.
///
/// A tag the tokenizer reports must have ended in `>`; anything else means
/// the input stopped inside it.
struct Tracked<R> {
    inner: R,
    last: Option<u8>,
}

impl<R> Tracked<R> {
    fn new(inner: R) -> Self {
        Self { inner, last: None }
    }
}

impl<R: BufRead> Read for Tracked<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.last = Some(buf[n - 1]);
        }
        Ok(n)
    }
}

impl<R: BufRead> BufRead for Tracked<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        if amt > 0 {
            if let Ok(available) = self.inner.fill_buf() {
                if let Some(&byte) = available.get(amt - 1) {
                    self.last = Some(byte);
                }
            }
        }
        self.inner.consume(amt);
    }
}

impl<R: BufRead> TokenInput for Tracked<R> {
    fn last_consumed(&self) -> Option<u8> {
        self.last
    }
}

struct Driver<'i, 's, 'h, R> {
    reader: Reader<R>,
    /// The whole input, when it was decoded before tokenizing
    text: Option<&'i [u8]>,
    validator: Option<Validator<'s>>,
    namespaces: NamespaceScopes,
    open: Vec<QualifiedName>,
    seen_root: bool,
    content: &'h mut dyn ContentHandler,
    errors: &'h mut dyn ErrorHandler,
}

impl<R: TokenInput> Driver<'_, '_, '_, R> {
    fn run(mut self) -> ParseResult<()> {
        self.content.start_document()?;

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    self.ensure_tag_closed()?;
                    self.open_element(&e)?;
                }
                Ok(Event::End(e)) => {
                    self.ensure_tag_closed()?;
                    let raw = self.decode(e.name().as_ref())?.into_owned();
                    self.close_element(&raw)?;
                }
                Ok(Event::Text(e)) => {
                    let text = match e.unescape() {
                        Ok(text) => text,
                        Err(err) => return Err(self.tokenizer_error(err)),
                    };
                    self.text(&text)?;
                }
                Ok(Event::CData(e)) => {
                    let text = self.decode(&e)?.into_owned();
                    self.text(&text)?;
                }
                Ok(Event::Decl(e)) => {
                    self.ensure_tag_closed()?;
                    self.declaration(&e)?;
                }
                Ok(Event::PI(_)) => self.ensure_tag_closed()?,
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => return Err(self.tokenizer_error(err)),
            }
            buf.clear();
        }

        self.finish()
    }

    fn open_element(&mut self, e: &BytesStart<'_>) -> ParseResult<()> {
        let raw_name = self.decode(e.name().as_ref())?.into_owned();

        let mut declarations: Vec<Declaration> = Vec::new();
        let mut raw_attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| ParseError::syntax(self.position(), err.to_string()))?;
            let key = self.decode(attr.key.as_ref())?.into_owned();
            let value = match attr.decode_and_unescape_value(&self.reader) {
                Ok(value) => value.into_owned(),
                Err(err) => return Err(self.tokenizer_error(err)),
            };
            if key == "xmlns" {
                declarations.push((None, value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                declarations.push((Some(prefix.to_string()), value));
            } else {
                raw_attributes.push((key, value));
            }
        }

        if self.open.is_empty() {
            if self.seen_root {
                return Err(self.fatal(format!(
                    "Element '{}' follows the document element; only one root element is allowed",
                    raw_name
                )));
            }
            self.seen_root = true;
        }

        if let Err(message) = self.namespaces.push_scope(declarations) {
            return Err(self.fatal(message));
        }
        let name = match self.namespaces.resolve_element(&raw_name) {
            Ok(name) => name,
            Err(message) => return Err(self.fatal(message)),
        };
        let mut attributes = Attributes::new();
        for (key, value) in raw_attributes {
            match self.namespaces.resolve_attribute(&key) {
                Ok(attr_name) => attributes.push(attr_name, value),
                Err(message) => return Err(self.fatal(message)),
            }
        }
        self.open.push(name.clone());

        if let Some(validator) = self.validator.as_mut() {
            let findings = validator.start_element(&name, &attributes);
            self.report(findings)?;
        }
        self.content.start_element(&name, &attributes)
    }

    fn close_element(&mut self, raw_name: &str) -> ParseResult<()> {
        let name = match self.open.last() {
            Some(name) => name.clone(),
            None => {
                return Err(self.fatal(format!("Unexpected closing tag '{}'", raw_name)));
            }
        };

        if let Some(validator) = self.validator.as_mut() {
            let findings = validator.end_element();
            self.report(findings)?;
        }
        self.open.pop();
        self.namespaces.pop_scope();
        self.content.end_element(&name)
    }

    fn text(&mut self, text: &str) -> ParseResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        if self.open.is_empty() {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(self.fatal("Text content is not allowed outside the root element"));
        }

        if let Some(validator) = self.validator.as_mut() {
            let findings = validator.characters(text);
            self.report(findings)?;
        }
        self.content.characters(text)
    }

    fn declaration(&mut self, decl: &BytesDecl<'_>) -> ParseResult<()> {
        let encoding = match decl.encoding() {
            Some(Ok(encoding)) => encoding,
            Some(Err(err)) => return Err(self.tokenizer_error(err)),
            None => return Ok(()),
        };
        // Decoded input is already text; the declaration is moot.
        if self.text.is_some() {
            return Ok(());
        }
        let label = String::from_utf8_lossy(&encoding);
        if !lookup_encoding(&label)?.is_ascii_compatible() {
            return Err(ParseError::Encoding {
                position: self.position(),
                message: format!("document declares {} but is not encoded in it", label),
            });
        }
        Ok(())
    }

    /// Reject a tag cut off by the end of the input.
    fn ensure_tag_closed(&self) -> ParseResult<()> {
        let last = match self.text {
            Some(text) => self
                .reader
                .buffer_position()
                .checked_sub(1)
                .and_then(|i| text.get(i).copied()),
            None => self.reader.get_ref().last_consumed(),
        };
        if last == Some(b'>') {
            Ok(())
        } else {
            Err(ParseError::syntax(
                self.position(),
                "Unexpected end of input inside a tag",
            ))
        }
    }

    fn finish(mut self) -> ParseResult<()> {
        if let Some(name) = self.open.last() {
            let message = format!("Unexpected end of input: element '{}' is not closed", name);
            return Err(self.fatal(message));
        }
        if !self.seen_root {
            return Err(self.fatal("No root element found"));
        }
        self.content.end_document()
    }

    fn position(&self) -> usize {
        self.reader.buffer_position()
    }

    fn path(&self) -> String {
        self.open
            .iter()
            .map(|name| format!("/{}", name.local_name()))
            .collect()
    }

    fn decode<'b>(&self, bytes: &'b [u8]) -> ParseResult<Cow<'b, str>> {
        self.reader
            .decoder()
            .decode(bytes)
            .map_err(|e| ParseError::Encoding {
                position: self.position(),
                message: e.to_string(),
            })
    }

    fn report(&mut self, findings: Vec<Finding>) -> ParseResult<()> {
        for finding in findings {
            let diagnostic =
                Diagnostic::new(finding.severity, self.position(), self.path(), finding.message);
            error_policy::report(&mut *self.errors, diagnostic)?;
        }
        Ok(())
    }

    fn fatal(&mut self, message: impl Into<String>) -> ParseError {
        let diagnostic = Diagnostic::new(Severity::Fatal, self.position(), self.path(), message);
        error_policy::escalate_fatal(&mut *self.errors, diagnostic)
    }

    fn tokenizer_error(&mut self, err: quick_xml::Error) -> ParseError {
        let position = self.position();
        match err {
            quick_xml::Error::Io(e) => ParseError::Io(io::Error::new(e.kind(), e.to_string())),
            quick_xml::Error::NonDecodable(e) => ParseError::Encoding {
                position,
                message: e.map_or_else(|| "invalid byte sequence".to_string(), |e| e.to_string()),
            },
            quick_xml::Error::EndEventMismatch { expected, found } if expected.is_empty() => {
                self.fatal(format!("Unexpected closing tag '{}'", found))
            }
            quick_xml::Error::EndEventMismatch { expected, found } => self.fatal(format!(
                "Closing tag '{}' does not match open element '{}'",
                found, expected
            )),
            other => ParseError::syntax(position, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_policy::{CollectingErrorHandler, FailFast};
    use crate::namespace::XML_NAMESPACE;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ContentHandler for Recorder {
        fn start_document(&mut self) -> ParseResult<()> {
            self.events.push("start-document".to_string());
            Ok(())
        }

        fn start_element(&mut self, name: &QualifiedName, attributes: &Attributes) -> ParseResult<()> {
            let attrs: Vec<String> = attributes
                .iter()
                .map(|a| format!("{}={}", a.name, a.value))
                .collect();
            self.events.push(format!("start {} [{}]", name, attrs.join(",")));
            Ok(())
        }

        fn characters(&mut self, text: &str) -> ParseResult<()> {
            match self.events.last_mut() {
                Some(last) if last.starts_with("text ") => last.push_str(text),
                _ => self.events.push(format!("text {}", text)),
            }
            Ok(())
        }

        fn end_element(&mut self, name: &QualifiedName) -> ParseResult<()> {
            self.events.push(format!("end {}", name));
            Ok(())
        }

        fn end_document(&mut self) -> ParseResult<()> {
            self.events.push("end-document".to_string());
            Ok(())
        }
    }

    fn reader() -> XmlReader {
        XmlReader::new(ValidationMode::NonValidating, None, &ReaderConfig::default())
    }

    fn parse(xml: &str) -> (ParseResult<()>, Vec<String>) {
        let mut recorder = Recorder::default();
        let result = reader().parse(InputSource::from_str(xml), &mut recorder, &mut FailFast);
        (result, recorder.events)
    }

    #[test]
    fn test_event_sequence() {
        let (result, events) = parse(r#"<?xml version="1.0"?><root a="1"><item/>text &amp; more</root>"#);
        result.unwrap();
        assert_eq!(
            events,
            vec![
                "start-document",
                "start root [a=1]",
                "start item []",
                "end item",
                "text text & more",
                "end root",
                "end-document",
            ]
        );
    }

    #[test]
    fn test_cdata_is_reported_as_characters() {
        let (result, events) = parse("<root><![CDATA[<raw>]]></root>");
        result.unwrap();
        assert!(events.contains(&"text <raw>".to_string()));
    }

    #[test]
    fn test_namespace_resolution() {
        struct Names(Vec<(Option<String>, String)>);
        impl ContentHandler for Names {
            fn start_element(&mut self, name: &QualifiedName, attributes: &Attributes) -> ParseResult<()> {
                self.0.push((name.namespace().map(str::to_owned), name.local_name().to_string()));
                for attr in attributes {
                    self.0.push((
                        attr.name.namespace().map(str::to_owned),
                        attr.name.local_name().to_string(),
                    ));
                }
                Ok(())
            }
            fn characters(&mut self, _: &str) -> ParseResult<()> {
                Ok(())
            }
            fn end_element(&mut self, _: &QualifiedName) -> ParseResult<()> {
                Ok(())
            }
        }

        let xml = r#"<DIDL-Lite xmlns="urn:didl" xmlns:dc="urn:dc"><dc:title xml:lang="en">T</dc:title></DIDL-Lite>"#;
        let mut names = Names(Vec::new());
        reader()
            .parse(InputSource::from_str(xml), &mut names, &mut FailFast)
            .unwrap();
        assert_eq!(
            names.0,
            vec![
                (Some("urn:didl".to_string()), "DIDL-Lite".to_string()),
                (Some("urn:dc".to_string()), "title".to_string()),
                (Some(XML_NAMESPACE.to_string()), "lang".to_string()),
            ]
        );
    }

    #[test]
    fn test_undeclared_prefix_is_fatal() {
        let (result, _) = parse("<root><x:item/></root>");
        let err = result.unwrap_err();
        let diagnostic = err.diagnostic().unwrap();
        assert_eq!(diagnostic.severity, Severity::Fatal);
        assert_eq!(diagnostic.path, "/root");
    }

    #[test]
    fn test_reserved_namespace_declarations_are_fatal() {
        let (result, events) = parse(r#"<root><item xmlns:p=""/></root>"#);
        let diagnostic = result.unwrap_err().diagnostic().cloned().unwrap();
        assert_eq!(diagnostic.severity, Severity::Fatal);
        assert_eq!(diagnostic.message, "Namespace prefix 'p' cannot be undeclared");
        assert!(!events.iter().any(|e| e.starts_with("start item")));

        let (result, _) = parse(r#"<root xmlns:xml="urn:other"/>"#);
        assert!(result.unwrap_err().to_string().contains("prefix 'xml'"));

        let (result, _) = parse("<root><p:/></root>");
        assert!(result.unwrap_err().to_string().contains("Malformed qualified name"));
    }

    #[test]
    fn test_multiple_roots_are_fatal() {
        let (result, events) = parse("<a/><b/>");
        assert!(result.unwrap_err().is_validation());
        assert!(!events.contains(&"start b []".to_string()));
    }

    #[test]
    fn test_text_outside_root_is_fatal() {
        let (result, _) = parse("<a/>trailing");
        assert!(result.unwrap_err().is_validation());
        let (result, _) = parse("\n<a/>\n");
        assert!(result.is_ok());
    }

    #[test]
    fn test_mismatched_and_unclosed_elements() {
        let (result, _) = parse("<a></b>");
        assert!(result.is_err());
        let (result, _) = parse("<a><b></b>");
        assert!(result.is_err());
        let (result, _) = parse("");
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_fatal_errors_abort_even_when_collecting() {
        let mut recorder = Recorder::default();
        let mut errors = CollectingErrorHandler::new();
        let result = reader().parse(InputSource::from_str("<a/><b/>"), &mut recorder, &mut errors);
        assert!(result.is_err());
        assert_eq!(errors.diagnostics().len(), 1);
        assert!(!recorder.events.contains(&"end-document".to_string()));
    }

    fn parse_bytes(input: InputSource<'_>) -> (ParseResult<()>, Vec<String>) {
        let mut recorder = Recorder::default();
        let result = reader().parse(input, &mut recorder, &mut FailFast);
        (result, recorder.events)
    }

    #[test]
    fn test_declared_encoding() {
        let mut xml = br#"<?xml version="1.0" encoding="ISO-8859-1"?><a t="d"#.to_vec();
        xml.push(0xE9);
        xml.extend_from_slice(b"j\xE0\">caf\xE9</a>");
        let (result, events) = parse_bytes(InputSource::from_bytes(&xml));
        result.unwrap();
        assert_eq!(events[1], "start a [t=d\u{e9}j\u{e0}]");
        assert_eq!(events[2], "text caf\u{e9}");

        // A character stream is already decoded.
        let (result, events) =
            parse("<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a>caf\u{e9}</a>");
        result.unwrap();
        assert_eq!(events[2], "text caf\u{e9}");
    }

    #[test]
    fn test_undecodable_declared_encoding() {
        let (result, _) = parse_bytes(InputSource::from_bytes(
            br#"<?xml version="1.0" encoding="x-no-such-charset"?><a/>"#,
        ));
        assert!(matches!(result, Err(ParseError::UnsupportedEncoding(_))));

        let (result, _) = parse_bytes(InputSource::from_bytes(
            br#"<?xml version="1.0" encoding="UTF-16"?><a/>"#,
        ));
        assert!(matches!(result, Err(ParseError::Encoding { .. })));
    }

    #[test]
    fn test_truncated_tags_are_syntax_errors() {
        for xml in ["<a>x</a", "<a/", "<root><b/></root", "<a x=\"1\"/", "<person"] {
            let (result, _) = parse(xml);
            assert!(
                matches!(result, Err(ParseError::Syntax { .. })),
                "{:?} gave {:?}",
                xml,
                result
            );
            let (result, _) = parse_bytes(InputSource::from_bytes(xml.as_bytes()));
            assert!(matches!(result, Err(ParseError::Syntax { .. })), "{:?} as bytes", xml);
        }
    }

    #[test]
    fn test_truncated_tag_is_not_delivered() {
        let (result, events) = parse("<root><b/></root");
        assert!(result.is_err());
        assert!(!events.contains(&"end root".to_string()));
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let (result, events) = parse("\u{feff}<a>x</a>");
        result.unwrap();
        assert_eq!(events[1], "start a []");
        let (result, _) = parse_bytes(InputSource::from_bytes(b"\xEF\xBB\xBF<a>x</a>"));
        result.unwrap();
    }

    #[test]
    fn test_handler_error_stops_the_loop() {
        struct Failing(usize);
        impl ContentHandler for Failing {
            fn start_element(&mut self, name: &QualifiedName, _: &Attributes) -> ParseResult<()> {
                self.0 += 1;
                if name.local_name() == "stop" {
                    return Err(ParseError::handler("stop requested"));
                }
                Ok(())
            }
            fn characters(&mut self, _: &str) -> ParseResult<()> {
                Ok(())
            }
            fn end_element(&mut self, _: &QualifiedName) -> ParseResult<()> {
                Ok(())
            }
        }

        let mut handler = Failing(0);
        let result = reader().parse(
            InputSource::from_str("<a><stop/><later/></a>"),
            &mut handler,
            &mut FailFast,
        );
        assert!(matches!(result, Err(ParseError::Handler(_))));
        assert_eq!(handler.0, 2);
    }
}
