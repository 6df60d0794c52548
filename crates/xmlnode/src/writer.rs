//! Streaming XML writer
//!
//! StAX-style: a start or empty tag is left open until the next
//! non-attribute event, so attribute events can follow the tag they belong
//! to. Output is compact, with no declaration and no indentation.
//!
//! Two character events in a row are separated by an empty comment, so a
//! reader sees them as two text runs again.

use std::borrow::Cow;
use std::io;

use crate::error::{Error, ErrorKind, Result, Span, Stage};
use crate::reader::is_valid_name;

/// One write instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteEvent<'a> {
    StartTag(&'a str),
    /// Tag with no content; attributes may still follow
    EmptyTag(&'a str),
    Attribute { name: &'a str, value: &'a str },
    /// Raw text, escaped by the sink
    Characters(&'a str),
    /// Closes the innermost open start tag
    EndTag,
}

/// Receiver of write events
pub trait XmlSink {
    fn write_event(&mut self, event: WriteEvent<'_>) -> Result<()>;
}

impl<S: XmlSink + ?Sized> XmlSink for &mut S {
    fn write_event(&mut self, event: WriteEvent<'_>) -> Result<()> {
        (**self).write_event(event)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpenMarkup {
    Start,
    Empty,
}

/// Writes escaped XML to an `io::Write`
#[derive(Debug)]
pub struct XmlWriter<W: io::Write> {
    out: W,
    open_tags: Vec<String>,
    /// `<name` written, `>` or `/>` still owed
    pending: Option<OpenMarkup>,
    after_text: bool,
}

impl<W: io::Write> XmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            open_tags: Vec::new(),
            pending: None,
            after_text: false,
        }
    }

    /// Close any pending tag, check balance, flush and hand back the output
    pub fn finish(mut self) -> Result<W> {
        self.close_pending()?;
        if !self.open_tags.is_empty() {
            return Err(Error::with_message(
                Stage::Encode,
                ErrorKind::UnbalancedWrite,
                Span::empty(),
                format!("{} tag(s) left open", self.open_tags.len()),
            ));
        }
        self.out.flush().map_err(io_error)?;
        Ok(self.out)
    }

    /// Number of start tags not yet closed
    pub fn depth(&self) -> usize {
        self.open_tags.len()
    }

    fn start(&mut self, name: &str, markup: OpenMarkup) -> Result<()> {
        check_name(name)?;
        self.close_pending()?;
        self.after_text = false;
        self.write_all(b"<")?;
        self.write_all(name.as_bytes())?;
        if markup == OpenMarkup::Start {
            self.open_tags.push(name.to_string());
        }
        self.pending = Some(markup);
        Ok(())
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        check_name(name)?;
        if self.pending.is_none() {
            return Err(Error::with_message(
                Stage::Encode,
                ErrorKind::InvalidToken,
                Span::empty(),
                format!("attribute {name:?} written outside a start tag"),
            ));
        }
        self.write_all(b" ")?;
        self.write_all(name.as_bytes())?;
        self.write_all(b"=\"")?;
        self.write_all(escape_attribute(value).as_bytes())?;
        self.write_all(b"\"")
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        self.close_pending()?;
        if text.is_empty() {
            return Ok(());
        }
        if self.after_text {
            self.write_all(b"<!---->")?;
        }
        self.write_all(escape_text(text).as_bytes())?;
        self.after_text = true;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.close_pending()?;
        self.after_text = false;
        let Some(name) = self.open_tags.pop() else {
            return Err(Error::encode(ErrorKind::UnbalancedWrite));
        };
        self.write_all(b"</")?;
        self.write_all(name.as_bytes())?;
        self.write_all(b">")
    }

    fn close_pending(&mut self) -> Result<()> {
        match self.pending.take() {
            Some(OpenMarkup::Start) => self.write_all(b">"),
            Some(OpenMarkup::Empty) => self.write_all(b"/>"),
            None => Ok(()),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes).map_err(io_error)
    }
}

impl<W: io::Write> XmlSink for XmlWriter<W> {
    fn write_event(&mut self, event: WriteEvent<'_>) -> Result<()> {
        match event {
            WriteEvent::StartTag(name) => self.start(name, OpenMarkup::Start),
            WriteEvent::EmptyTag(name) => self.start(name, OpenMarkup::Empty),
            WriteEvent::Attribute { name, value } => self.attribute(name, value),
            WriteEvent::Characters(text) => self.characters(text),
            WriteEvent::EndTag => self.end(),
        }
    }
}

fn io_error(err: io::Error) -> Error {
    Error::io(Stage::Encode, err, "failed to write xml")
}

fn check_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::encode(ErrorKind::InvalidName {
            name: name.to_string(),
        }))
    }
}

/// Escape character data; `\r` is kept as a reference so readers do not
/// normalize it away
pub fn escape_text(input: &str) -> Cow<'_, str> {
    escape(input, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#13;"),
        _ => None,
    })
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    escape(input, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\n' => Some("&#10;"),
        '\t' => Some("&#9;"),
        '\r' => Some("&#13;"),
        _ => None,
    })
}

fn escape(input: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !input.chars().any(|c| replacement(c).is_some()) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match replacement(c) {
            Some(escaped) => result.push_str(escaped),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}
