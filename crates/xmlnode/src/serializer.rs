//! Element tree serializer

use tracing::instrument;

use crate::element::{Element, TagElement};
use crate::error::{Error, ErrorKind, Result};
use crate::options::Options;
use crate::writer::{WriteEvent, XmlSink};

/// Walks an element tree and emits write events
#[derive(Debug, Clone)]
pub struct Serializer<'a> {
    max_depth: usize,
    root_name: &'a str,
}

impl<'a> Serializer<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            max_depth: options.max_nesting_depth(),
            root_name: options.root_name(),
        }
    }

    /// Emit `element` to `sink`. A bare text element is wrapped in a tag
    /// named after the configured root name.
    #[instrument(skip_all)]
    pub fn serialize<S: XmlSink + ?Sized>(&self, element: &Element, sink: &mut S) -> Result<()> {
        match element {
            Element::Tag(tag) => self.serialize_tag(tag, sink, 1),
            Element::Text(text) => {
                self.check_depth(1)?;
                sink.write_event(WriteEvent::StartTag(self.root_name))?;
                sink.write_event(WriteEvent::Characters(&text.text))?;
                sink.write_event(WriteEvent::EndTag)
            }
        }
    }

    fn serialize_tag<S: XmlSink + ?Sized>(
        &self,
        tag: &TagElement,
        sink: &mut S,
        depth: usize,
    ) -> Result<()> {
        self.check_depth(depth)?;

        if tag.is_empty_element() {
            sink.write_event(WriteEvent::EmptyTag(&tag.name))?;
            return self.serialize_attributes(tag, sink);
        }

        sink.write_event(WriteEvent::StartTag(&tag.name))?;
        self.serialize_attributes(tag, sink)?;
        for child in &tag.children {
            match child {
                Element::Tag(child_tag) => self.serialize_tag(child_tag, sink, depth + 1)?,
                // Text is written at its parent's depth, not one level below
                Element::Text(text) => sink.write_event(WriteEvent::Characters(&text.text))?,
            }
        }
        sink.write_event(WriteEvent::EndTag)
    }

    fn serialize_attributes<S: XmlSink + ?Sized>(&self, tag: &TagElement, sink: &mut S) -> Result<()> {
        for attr in &tag.attributes {
            sink.write_event(WriteEvent::Attribute {
                name: &attr.name,
                value: &attr.value,
            })?;
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::encode(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records events as owned strings for comparison
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl XmlSink for Recorder {
        fn write_event(&mut self, event: WriteEvent<'_>) -> Result<()> {
            let line = match event {
                WriteEvent::StartTag(name) => format!("start {name}"),
                WriteEvent::EmptyTag(name) => format!("empty {name}"),
                WriteEvent::Attribute { name, value } => format!("attr {name}={value}"),
                WriteEvent::Characters(text) => format!("text {text}"),
                WriteEvent::EndTag => "end".to_string(),
            };
            self.events.push(line);
            Ok(())
        }
    }

    fn record(element: impl Into<Element>, options: &Options) -> Result<Vec<String>> {
        let mut recorder = Recorder::default();
        Serializer::new(options).serialize(&element.into(), &mut recorder)?;
        Ok(recorder.events)
    }

    #[test]
    fn test_tag_with_attributes_and_children() -> Result<()> {
        let element = TagElement::new("user", false)
            .with_attribute("id", "1")
            .with_attribute("id", "2")
            .with_child(TagElement::new("name", false).with_child(Element::text("jack")))
            .with_child(TagElement::new("flag", true).with_attribute("on", "yes"))
            .with_child(Element::text("<tail>"));

        let events = record(element, &Options::default())?;
        assert_eq!(
            events,
            vec![
                "start user",
                "attr id=1",
                "attr id=2",
                "start name",
                "text jack",
                "end",
                "empty flag",
                "attr on=yes",
                "text <tail>",
                "end",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_self_closing_with_children_uses_start_tag() -> Result<()> {
        let element = TagElement::new("a", true).with_child(Element::text("x"));
        let events = record(element, &Options::default())?;
        assert_eq!(events, vec!["start a", "text x", "end"]);
        Ok(())
    }

    #[test]
    fn test_bare_text_is_wrapped_in_root() -> Result<()> {
        let events = record(Element::text("hello"), &Options::default())?;
        assert_eq!(events, vec!["start root", "text hello", "end"]);

        let named = Options::default().with_root_name("doc");
        let Ok(named) = named else {
            panic!("name is valid");
        };
        let events = record(Element::text("hello"), &named)?;
        assert_eq!(events, vec!["start doc", "text hello", "end"]);
        Ok(())
    }

    #[test]
    fn test_depth_limit_counts_tags_only() {
        let options = Options::default().with_max_nesting_depth(2);
        let ok = TagElement::new("a", false)
            .with_child(TagElement::new("b", false).with_child(Element::text("text")));
        assert!(record(ok, &options).is_ok());

        let deep = TagElement::new("a", false)
            .with_child(TagElement::new("b", false).with_child(TagElement::new("c", true)));
        let err = record(deep, &options).err();
        assert!(err.as_ref().is_some_and(Error::is_encode));
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MaxDepthExceeded { max: 2 })
        );
    }
}
