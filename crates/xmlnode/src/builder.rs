//! Iterative element tree builder
//!
//! Turns a stream of [`XmlEvent`]s into one [`Element`] tree without
//! recursion. Open ancestors live on an explicit [`AncestorStack`], so the
//! host stack stays flat no matter how deep the document nests.

use tracing::{debug, trace};

use crate::element::{Element, TagElement};
use crate::error::{Error, ErrorKind, Result, Span, Stage};
use crate::reader::{EventSource, XmlEvent};

const INITIAL_CAPACITY: usize = 10;
const MIN_GROWTH: usize = 20;
const MAX_GROWTH: usize = 4000;

/// Stack of open ancestor tags with an explicit growth policy
#[derive(Debug, Default)]
pub struct AncestorStack {
    items: Vec<TagElement>,
}

impl AncestorStack {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, tag: TagElement) {
        if self.items.len() == self.items.capacity() {
            self.grow();
        }
        self.items.push(tag);
    }

    pub fn pop(&mut self) -> Option<TagElement> {
        self.items.pop()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// First allocation is 10 slots, later ones add half the length,
    /// clamped to 20..=4000
    fn grow(&mut self) {
        let len = self.items.len();
        let additional = if self.items.capacity() == 0 {
            INITIAL_CAPACITY
        } else {
            (len / 2).clamp(MIN_GROWTH, MAX_GROWTH)
        };
        self.items.reserve_exact(additional);
        trace!(len, additional, "ancestor stack grown");
    }
}

/// Builds one element tree from an event source
#[derive(Debug)]
pub struct TreeBuilder<S> {
    source: S,
}

impl<S: EventSource> TreeBuilder<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Consume events up to the end of the root element, then drain the rest
    pub fn build(mut self) -> Result<Element> {
        let mut stack = AncestorStack::new();
        let mut current: Option<TagElement> = None;

        loop {
            let Some(event) = self.source.next_event()? else {
                let kind = if current.is_none() {
                    ErrorKind::NoRootElement
                } else {
                    ErrorKind::UnexpectedEof
                };
                return Err(Error::decode(kind));
            };

            match event {
                XmlEvent::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => {
                    let mut tag = TagElement::new(name, self_closing);
                    tag.attributes = attributes;
                    if let Some(parent) = current.take() {
                        stack.push(parent);
                    }
                    current = Some(tag);
                }
                XmlEvent::EndTag { name } => {
                    let Some(finished) = current.take() else {
                        return Err(Error::with_message(
                            Stage::Decode,
                            ErrorKind::InvalidToken,
                            Span::empty(),
                            format!("closing tag </{name}> before any opening tag"),
                        ));
                    };
                    match stack.pop() {
                        Some(mut parent) => {
                            parent.push(finished);
                            current = Some(parent);
                        }
                        None => {
                            self.drain()?;
                            debug!(root = %finished.name, "element tree built");
                            return Ok(Element::Tag(finished));
                        }
                    }
                }
                XmlEvent::Text(text) => {
                    if is_blank(&text) {
                        continue;
                    }
                    if let Some(tag) = current.as_mut() {
                        tag.push(Element::text(text));
                    }
                }
                XmlEvent::Other => {}
            }
        }
    }

    fn drain(&mut self) -> Result<()> {
        while self.source.next_event()?.is_some() {}
        Ok(())
    }
}

/// Build an element tree from any event source
pub fn build<S: EventSource>(source: S) -> Result<Element> {
    TreeBuilder::new(source).build()
}

/// XML whitespace only: space, tab, CR, LF
fn is_blank(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}
