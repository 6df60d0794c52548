//! xmlnode - predictable conversion between XML and a generic node tree
//!
//! XML and tree-shaped data models are not equivalent: XML has attributes,
//! mixed content and repeated names, and has no arrays or nulls. This crate
//! maps between the two with a fixed, documented rule set so that the
//! result is predictable and mostly reversible.
//!
//! # Quick Start
//!
//! ```
//! use xmlnode::{from_str, to_string, Node, Options};
//! # fn main() -> Result<(), xmlnode::Error> {
//! let options = Options::default();
//! let node = from_str("<user id=\"7\"><tags>a</tags><tags>b</tags></user>", &options)?;
//!
//! let tags = node
//!     .as_object()
//!     .and_then(|obj| obj.get("tags"))
//!     .and_then(Node::as_array)
//!     .map(|tags| tags.len())
//!     .unwrap_or_default();
//! assert_eq!(tags, 2);
//!
//! let xml = to_string(&node, &options)?;
//! assert_eq!(xml, "<root><id>7</id><tags>a</tags><tags>b</tags></root>");
//! # Ok(())
//! # }
//! ```
//!
//! The individual stages are public as well: [`XmlReader`] produces events,
//! [`TreeBuilder`] turns them into an [`Element`] tree, [`element_to_node`]
//! and [`node_to_element`] map between the two models, and [`Serializer`]
//! feeds an [`XmlWriter`].

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, OptionsError, Pos, Result, Span, Stage};

pub mod options;
pub use options::Options;

pub mod element;
pub use element::{Attribute, Element, TagElement, TextElement};

pub mod node;
pub use node::{Array, Node, Number, Object};

pub mod reader;
pub use reader::{is_valid_name, EventSource, XmlEvent, XmlReader};

pub mod builder;
pub use builder::{AncestorStack, TreeBuilder};

pub mod to_node;
pub use to_node::{element_to_node, TEXT_KEY};

pub mod from_node;
pub use from_node::node_to_element;

pub mod writer;
pub use writer::{WriteEvent, XmlSink, XmlWriter};

pub mod serializer;
pub use serializer::Serializer;

pub mod convert;
pub use convert::{
    from_file, from_reader, from_slice, from_str, parse_element, parse_element_bytes, to_file,
    to_string, to_vec, to_writer, write_element, write_element_to,
};
