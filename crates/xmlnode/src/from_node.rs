//! Node to element tree mapping
//!
//! The dual of [`element_to_node`](crate::element_to_node):
//!
//! | Node | XML |
//! |---|---|
//! | `"123"` | `<root>123</root>` |
//! | `null` | `<root/>` |
//! | `{"a": 123}` | `<root><a>123</a></root>` |
//! | `{"a": [1, 2]}` | `<root><a>1</a><a>2</a></root>` |
//! | `[1, 2]` | `<root><item>1</item><item>2</item></root>` |
//! | `[1, [2]]` | `<root><item>1</item><item><item>2</item></item></root>` |
//! | `{"": 123}` | `<root>123</root>` |
//!
//! Root and item tag names come from [`Options`].

use tracing::instrument;

use crate::element::{Element, TagElement, TextElement};
use crate::error::{Error, ErrorKind, Result};
use crate::node::Node;
use crate::options::Options;

/// Map a node to an element tree rooted at the configured root name
#[instrument(skip_all)]
pub fn node_to_element(node: &Node, options: &Options) -> Result<Element> {
    let mapper = NodeMapper {
        max_depth: options.max_nesting_depth(),
        item_name: options.item_name(),
    };
    mapper.map(node, options.root_name(), node.is_array(), 1)
}

struct NodeMapper<'a> {
    max_depth: usize,
    item_name: &'a str,
}

impl NodeMapper<'_> {
    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::encode(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        Ok(())
    }

    fn map(&self, node: &Node, key: &str, in_array: bool, depth: usize) -> Result<Element> {
        self.check_depth(depth)?;

        match node {
            Node::Null => Ok(TagElement::new(key, true).into()),
            Node::Bool(_) | Node::Number(_) | Node::String(_) => {
                let text = node.as_text().unwrap_or_default().into_owned();
                if key.is_empty() {
                    Ok(TextElement::new(text).into())
                } else {
                    Ok(TagElement::new(key, false)
                        .with_child(TextElement::new(text))
                        .into())
                }
            }
            Node::Object(object) => {
                let mut tag = TagElement::new(key, false);
                for (name, value) in object {
                    self.push_entry(&mut tag, name, value, depth + 1)?;
                }
                Ok(tag.into())
            }
            Node::Array(array) => {
                let child_key = if in_array { self.item_name } else { key };
                let mut tag = TagElement::new(key, false);
                for entry in array {
                    tag.push(self.map(entry, child_key, true, depth + 1)?);
                }
                Ok(tag.into())
            }
        }
    }

    /// Array values under an object key become repeated sibling tags
    fn push_entry(&self, parent: &mut TagElement, name: &str, value: &Node, depth: usize) -> Result<()> {
        match value {
            Node::Array(array) => {
                self.check_depth(depth)?;
                for entry in array {
                    parent.push(self.map(entry, name, true, depth)?);
                }
            }
            _ => parent.push(self.map(value, name, false, depth)?),
        }
        Ok(())
    }
}
