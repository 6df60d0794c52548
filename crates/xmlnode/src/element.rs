//! XML element model
//!
//! The intermediate tree between the reader and the node mappers. It keeps
//! exactly what the mappers need: tag names, attributes in source order
//! (duplicates included), mixed children, and whether a tag was written in
//! self-closing form.

use std::fmt;

/// A name/value pair on a tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Tag(TagElement),
    Text(TextElement),
}

impl Element {
    /// Shorthand for a text leaf
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextElement::new(text))
    }

    pub fn as_tag(&self) -> Option<&TagElement> {
        match self {
            Self::Tag(tag) => Some(tag),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(&text.text),
            Self::Tag(_) => None,
        }
    }
}

impl From<TagElement> for Element {
    fn from(tag: TagElement) -> Self {
        Self::Tag(tag)
    }
}

impl From<TextElement> for Element {
    fn from(text: TextElement) -> Self {
        Self::Text(text)
    }
}

/// A tag with ordered attributes and ordered mixed children
#[derive(Clone, Debug, PartialEq)]
pub struct TagElement {
    pub name: String,
    /// Source used `<name/>`; only meaningful while `children` is empty
    pub self_closing: bool,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Element>,
}

impl TagElement {
    pub fn new(name: impl Into<String>, self_closing: bool) -> Self {
        Self {
            name: name.into(),
            self_closing,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute append
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Builder-style child append
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn push(&mut self, child: impl Into<Element>) {
        self.children.push(child.into());
    }

    pub fn push_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push(Attribute::new(name, value));
    }

    /// True when the tag has no children (attributes are not counted)
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// True when the tag serializes as `<name/>`
    pub fn is_empty_element(&self) -> bool {
        self.self_closing && self.children.is_empty()
    }

    /// Iterate over child tags, skipping text
    pub fn child_tags(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Element::as_tag)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "    ".repeat(indent);
        write!(f, "{pad}<{}", self.name)?;
        for attr in &self.attributes {
            write!(f, " {attr}")?;
        }

        if self.children.is_empty() {
            return if self.self_closing {
                write!(f, "/>")
            } else {
                write!(f, "></{}>", self.name)
            };
        }

        writeln!(f, ">")?;
        for child in &self.children {
            match child {
                Element::Tag(tag) => tag.fmt_indented(f, indent + 1)?,
                Element::Text(text) => write!(f, "{pad}    {}", text.text)?,
            }
            writeln!(f)?;
        }
        write!(f, "{pad}</{}>", self.name)
    }
}

/// Indented, unescaped rendering for debugging; use the serializer for real output
impl fmt::Display for TagElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// A run of character data
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextElement {
    pub text: String,
}

impl TextElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => fmt::Display::fmt(tag, f),
            Self::Text(text) => f.write_str(&text.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_builders() {
        let tag = TagElement::new("user", false)
            .with_attribute("id", "1")
            .with_attribute("id", "2")
            .with_child(TagElement::new("name", false).with_child(Element::text("jack")))
            .with_child(Element::text("tail"));

        assert_eq!(tag.attributes.len(), 2);
        assert_eq!(tag.children.len(), 2);
        assert_eq!(tag.child_tags().count(), 1);
        assert_eq!(tag.children.get(1).and_then(Element::as_text), Some("tail"));
    }

    #[test]
    fn test_empty_element_requires_self_closing_and_no_children() {
        assert!(TagElement::new("a", true).is_empty_element());
        assert!(!TagElement::new("a", false).is_empty_element());

        let mut tag = TagElement::new("a", true);
        tag.push(Element::text("x"));
        assert!(!tag.is_empty_element());
        assert!(!tag.is_empty());
    }

    #[test]
    fn test_display_is_indented() {
        let tag = TagElement::new("a", false)
            .with_attribute("k", "v")
            .with_child(TagElement::new("b", true))
            .with_child(TagElement::new("c", false))
            .with_child(Element::text("t"));

        let expected = "<a k=\"v\">\n    <b/>\n    <c></c>\n    t\n</a>";
        assert_eq!(tag.to_string(), expected);
    }

    #[test]
    fn test_text_display() {
        assert_eq!(Element::text("plain").to_string(), "plain");
    }
}
