//! XML pull-parser events

use crate::element::Attribute;
use crate::error::Result;

/// Events emitted by the XML reader
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlEvent {
    /// Opening tag; a self-closing tag is followed by a synthetic `EndTag`
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    /// Closing tag
    EndTag { name: String },
    /// Character data with entities decoded, whitespace untouched
    Text(String),
    /// Declaration, comment, processing instruction or doctype
    Other,
}

impl XmlEvent {
    pub fn start(name: impl Into<String>) -> Self {
        Self::StartTag {
            name: name.into(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    pub fn end(name: impl Into<String>) -> Self {
        Self::EndTag { name: name.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Anything that yields XML events one at a time
pub trait EventSource {
    /// Next event, or `None` once the input is exhausted
    fn next_event(&mut self) -> Result<Option<XmlEvent>>;
}

impl EventSource for std::vec::IntoIter<XmlEvent> {
    fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        Ok(self.next())
    }
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        (**self).next_event()
    }
}
