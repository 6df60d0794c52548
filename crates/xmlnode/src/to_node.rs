//! Element tree to node mapping
//!
//! XML and the generic node model do not line up: XML has attributes, mixed
//! content, repeated names and no arrays or nulls. The mapping resolves that
//! with a fixed rule set:
//!
//! | XML | Node |
//! |---|---|
//! | `<a></a>` or whitespace only | `""` |
//! | `<a/>` | `null` |
//! | `<a>123</a>` | `"123"` |
//! | `<a><b>123</b></a>` | `{"b": "123"}` |
//! | `<a name="jack"/>` | `{"name": "jack"}` |
//! | `<a name="jack"><age>18</age></a>` | `{"name": "jack", "age": "18"}` |
//! | `<a>000<b>123</b></a>` | `{"b": "123", "": "000"}` |
//! | `<a>000<b>123</b>6666</a>` | `{"b": "123", "": ["000", "6666"]}` |
//! | `<a><b>1</b><b>2</b></a>` | `{"b": ["1", "2"]}` |
//! | `<a n="1" n="2"></a>` | `{"n": ["1", "2"]}` |
//!
//! Attributes and child tags share one key space; attributes are inserted
//! first. Text keeps its original whitespace once it is not blank.

use tracing::instrument;

use crate::element::{Element, TagElement};
use crate::error::{Error, ErrorKind, Result};
use crate::node::{Array, Node, Object};
use crate::options::Options;

/// Key under which loose text is stored next to child elements
pub const TEXT_KEY: &str = "";

/// Map an element tree to a node; the root counts as depth 1
#[instrument(skip_all)]
pub fn element_to_node(element: &Element, options: &Options) -> Result<Node> {
    let mapper = ElementMapper {
        max_depth: options.max_nesting_depth(),
    };
    mapper.map(element, 1)
}

struct ElementMapper {
    max_depth: usize,
}

impl ElementMapper {
    fn map(&self, element: &Element, depth: usize) -> Result<Node> {
        if depth > self.max_depth {
            return Err(Error::decode(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        match element {
            Element::Tag(tag) => self.map_tag(tag, depth),
            Element::Text(text) => Ok(Node::String(text.text.clone())),
        }
    }

    fn map_tag(&self, tag: &TagElement, depth: usize) -> Result<Node> {
        let mut fields = Fields::default();

        for attr in &tag.attributes {
            fields.merge_into(&attr.name, Node::String(attr.value.clone()));
        }

        if tag.is_empty_element() {
            return Ok(if fields.is_empty() {
                Node::Null
            } else {
                Node::Object(fields.into_object())
            });
        }

        let mut texts = Vec::new();
        for child in &tag.children {
            match child {
                Element::Tag(child_tag) => {
                    let node = self.map(child, depth + 1)?;
                    fields.merge_into(&child_tag.name, node);
                }
                Element::Text(text) => texts.push(Node::String(text.text.clone())),
            }
        }

        if fields.is_empty() {
            return Ok(match texts.len() {
                0 => Node::String(String::new()),
                1 => texts.pop().unwrap_or_default(),
                _ => Node::Array(Array::from(texts)),
            });
        }

        let mut object = fields.into_object();
        match texts.len() {
            0 => {}
            1 => {
                object.insert(TEXT_KEY, texts.pop().unwrap_or_default());
            }
            _ => {
                object.insert(TEXT_KEY, Array::from(texts));
            }
        }
        Ok(Node::Object(object))
    }
}

/// Ordered name buckets shared by attributes and child elements
#[derive(Default)]
struct Fields {
    entries: Object,
}

impl Fields {
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absent: store the value. Present non-array: replace with a
    /// two-element array. Present array: append.
    fn merge_into(&mut self, name: &str, value: Node) {
        match self.entries.get_mut(name) {
            None => {
                self.entries.insert(name, value);
            }
            Some(Node::Array(values)) => values.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, Node::Null);
                *existing = Node::Array(Array::from(vec![first, value]));
            }
        }
    }

    fn into_object(self) -> Object {
        self.entries
    }
}
