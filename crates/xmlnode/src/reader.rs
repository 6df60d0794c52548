//! Streaming XML reader
//!
//! A pull tokenizer over UTF-8 input. It decodes entities, normalizes line
//! endings, checks that tags balance and enforces the size ceilings from
//! [`Options`]. Comments, processing instructions, the XML declaration and
//! the doctype are skipped and surface only as [`XmlEvent::Other`].

pub mod cursor;
pub mod event;

pub use cursor::Cursor;
pub use event::{EventSource, XmlEvent};

use crate::element::Attribute;
use crate::error::{Error, ErrorKind, Result, Span, Stage};
use crate::options::Options;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const MAX_ENTITY_LEN: usize = 32;

#[derive(Debug)]
struct OpenTag {
    name: String,
    child_count: usize,
}

/// Pull-based XML tokenizer
#[derive(Debug)]
pub struct XmlReader<'a> {
    cursor: Cursor<'a>,
    max_depth: usize,
    max_child_count: usize,
    max_string_length: usize,
    open: Vec<OpenTag>,
    /// End tag owed for a self-closing start tag
    pending_end: Option<String>,
    root_seen: bool,
}

impl<'a> XmlReader<'a> {
    /// Create a reader with the limits from `options`
    pub fn new(input: &'a [u8], options: &Options) -> Self {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        Self {
            cursor: Cursor::new(input),
            max_depth: options.max_nesting_depth(),
            max_child_count: options.max_child_count(),
            max_string_length: options.max_string_length(),
            open: Vec::new(),
            pending_end: None,
            root_seen: false,
        }
    }

    /// Number of currently open tags
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Read the next event
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(XmlEvent::EndTag { name }));
        }

        if self.open.is_empty() {
            return self.next_outside_root();
        }

        if self.cursor.is_eof() {
            return Err(self.error(ErrorKind::UnexpectedEof));
        }

        if self.cursor.current() != Some(b'<') {
            return self.parse_text().map(Some);
        }

        if self.cursor.starts_with(b"</") {
            return self.parse_end_tag().map(Some);
        }
        if self.cursor.starts_with(b"<!--") {
            self.skip_comment()?;
            return Ok(Some(XmlEvent::Other));
        }
        if self.cursor.starts_with(b"<![CDATA[") {
            return self.parse_cdata().map(Some);
        }
        if self.cursor.starts_with(b"<?") {
            self.skip_processing_instruction()?;
            return Ok(Some(XmlEvent::Other));
        }
        if self.cursor.starts_with(b"<!") {
            return Err(self.error_here("markup declaration inside element"));
        }

        self.parse_start_tag().map(Some)
    }

    /// Prolog and epilog: only whitespace, comments, PIs, one doctype and the root
    fn next_outside_root(&mut self) -> Result<Option<XmlEvent>> {
        self.cursor.skip_whitespace();
        if self.cursor.is_eof() {
            return Ok(None);
        }

        if self.cursor.current() != Some(b'<') {
            return Err(self.error_here("content outside the root element"));
        }

        if self.cursor.starts_with(b"<?") {
            self.skip_processing_instruction()?;
            return Ok(Some(XmlEvent::Other));
        }
        if self.cursor.starts_with(b"<!--") {
            self.skip_comment()?;
            return Ok(Some(XmlEvent::Other));
        }
        if self.cursor.starts_with(b"<!DOCTYPE") && !self.root_seen {
            self.skip_doctype()?;
            return Ok(Some(XmlEvent::Other));
        }
        if self.cursor.starts_with(b"</") {
            return Err(self.error_here("unexpected closing tag"));
        }
        if self.cursor.starts_with(b"<!") {
            return Err(self.error_here("unexpected markup declaration"));
        }
        if self.root_seen {
            return Err(self.error_here("document has more than one root element"));
        }

        self.parse_start_tag().map(Some)
    }

    fn parse_start_tag(&mut self) -> Result<XmlEvent> {
        self.expect_byte(b'<')?;
        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        let self_closing = self.cursor.consume(b'/');
        self.expect_byte(b'>')?;

        if self.open.len() + 1 > self.max_depth {
            return Err(self.error(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        if let Some(parent) = self.open.last_mut() {
            parent.child_count += 1;
            if parent.child_count > self.max_child_count {
                return Err(self.error(ErrorKind::MaxChildCountExceeded {
                    max: self.max_child_count,
                }));
            }
        }

        self.root_seen = true;
        if self_closing {
            self.pending_end = Some(name.clone());
        } else {
            self.open.push(OpenTag {
                name: name.clone(),
                child_count: 0,
            });
        }

        Ok(XmlEvent::StartTag {
            name,
            attributes,
            self_closing,
        })
    }

    fn parse_end_tag(&mut self) -> Result<XmlEvent> {
        self.cursor.advance_by(2);
        let name = self.parse_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')?;

        match self.open.pop() {
            Some(open) if open.name == name => Ok(XmlEvent::EndTag { name }),
            Some(open) => Err(self.error(ErrorKind::MismatchedTag {
                expected: open.name,
                found: name,
            })),
            None => Err(self.error_here("unexpected closing tag")),
        }
    }

    fn parse_attributes(&mut self) -> Result<Vec<Attribute>> {
        let mut attrs = Vec::new();

        loop {
            let had_space = self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) if !had_space => {
                    return Err(self.error_here("expected whitespace before attribute"));
                }
                Some(_) => {}
                None => return Err(self.error(ErrorKind::UnexpectedEof)),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            // Duplicate names are kept; the mapper folds them into arrays.
            attrs.push(Attribute { name, value });
            if attrs.len() > self.max_child_count {
                return Err(self.error(ErrorKind::MaxChildCountExceeded {
                    max: self.max_child_count,
                }));
            }
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                let value = self.decode(raw, true)?;
                self.cursor.advance();
                return Ok(value);
            }
            if b == b'<' {
                return Err(self.error_here("'<' is not allowed in attribute values"));
            }
            self.cursor.advance();
        }

        Err(self.error(ErrorKind::UnexpectedEof))
    }

    fn parse_text(&mut self) -> Result<XmlEvent> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = self.decode(raw, false)?;
        Ok(XmlEvent::Text(text))
    }

    fn parse_cdata(&mut self) -> Result<XmlEvent> {
        self.cursor.advance_by(b"<![CDATA[".len());
        let Some(raw) = self.cursor.take_until(b"]]>") else {
            return Err(self.error(ErrorKind::UnexpectedEof));
        };
        let text = normalize_line_endings(&bytes_to_string(raw)?);
        self.check_length(&text)?;
        Ok(XmlEvent::Text(text))
    }

    fn parse_name(&mut self) -> Result<String> {
        match self.cursor.current() {
            Some(b) if is_name_start(b) => {}
            Some(_) => return Err(self.error_here("expected name")),
            None => return Err(self.error(ErrorKind::UnexpectedEof)),
        }
        bytes_to_string(self.cursor.take_while(is_name_char))
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.cursor.advance_by(4);
        self.skip_until(b"-->")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        self.cursor.advance_by(2);
        self.skip_until(b"?>")
    }

    /// Skip `<!DOCTYPE ...>`, including a bracketed internal subset
    fn skip_doctype(&mut self) -> Result<()> {
        let mut brackets = 0usize;
        let mut quote: Option<u8> = None;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => brackets += 1,
                (None, b']') => brackets = brackets.saturating_sub(1),
                (None, b'>') if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error(ErrorKind::UnexpectedEof))
    }

    fn skip_until(&mut self, delimiter: &[u8]) -> Result<()> {
        match self.cursor.take_until(delimiter) {
            Some(_) => Ok(()),
            None => Err(self.error(ErrorKind::UnexpectedEof)),
        }
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else if self.cursor.is_eof() {
            Err(self.error(ErrorKind::UnexpectedEof))
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    /// Decode entities and line endings of a raw text run or attribute value
    fn decode(&self, raw: &[u8], attribute: bool) -> Result<String> {
        let text = bytes_to_string(raw)?;
        let text = decode_entities(&normalize_line_endings(&text), attribute)
            .map_err(|kind| self.error(kind))?;
        self.check_length(&text)?;
        Ok(text)
    }

    fn check_length(&self, text: &str) -> Result<()> {
        if text.len() > self.max_string_length {
            return Err(self.error(ErrorKind::MaxStringLengthExceeded {
                max: self.max_string_length,
            }));
        }
        Ok(())
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::new(Stage::Decode, kind, Span::at(self.cursor.position()))
    }

    fn error_here(&self, message: &str) -> Error {
        Error::with_message(
            Stage::Decode,
            ErrorKind::InvalidToken,
            Span::at(self.cursor.position()),
            message,
        )
    }
}

impl EventSource for XmlReader<'_> {
    fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        XmlReader::next_event(self)
    }
}

/// True if `name` can be used as a tag or attribute name
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':' || !c.is_ascii()
}

fn is_name_char_char(c: char) -> bool {
    is_name_start_char(c) || c.is_ascii_digit() || c == '-' || c == '.'
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || !b.is_ascii()
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::decode(ErrorKind::InvalidUtf8))
}

fn normalize_line_endings(input: &str) -> String {
    if !input.contains('\r') {
        return input.to_string();
    }
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Resolve entity and character references. Attribute values additionally
/// have literal whitespace characters replaced by spaces.
fn decode_entities(input: &str, attribute: bool) -> std::result::Result<String, ErrorKind> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            if attribute && matches!(ch, '\n' | '\t') {
                result.push(' ');
            } else {
                result.push(ch);
            }
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
            if entity.len() > MAX_ENTITY_LEN {
                break;
            }
        }
        if !terminated {
            return Err(ErrorKind::InvalidEntity { entity });
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(ErrorKind::InvalidEntity { entity }),
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
