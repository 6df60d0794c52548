//! Conversion entry points
//!
//! Decoding runs `reader -> builder -> to_node`; encoding runs
//! `from_node -> serializer -> writer`. The same [`Options`] value is
//! threaded through every stage of one call.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, instrument};

use crate::builder::TreeBuilder;
use crate::element::Element;
use crate::error::{Error, ErrorKind, Result, Stage};
use crate::from_node::node_to_element;
use crate::node::Node;
use crate::options::Options;
use crate::reader::XmlReader;
use crate::serializer::Serializer;
use crate::to_node::element_to_node;
use crate::writer::XmlWriter;

/// Parse XML text into an element tree
pub fn parse_element(input: &str, options: &Options) -> Result<Element> {
    parse_element_bytes(input.as_bytes(), options)
}

/// Parse UTF-8 XML bytes into an element tree
pub fn parse_element_bytes(input: &[u8], options: &Options) -> Result<Element> {
    let reader = XmlReader::new(input, options);
    TreeBuilder::new(reader).build()
}

/// Serialize an element tree to an XML string
pub fn write_element(element: &Element, options: &Options) -> Result<String> {
    let mut out = Vec::new();
    write_element_to(element, &mut out, options)?;
    into_string(out)
}

/// Serialize an element tree into any writer
pub fn write_element_to<W: io::Write>(
    element: &Element,
    writer: W,
    options: &Options,
) -> Result<()> {
    let mut sink = XmlWriter::new(writer);
    Serializer::new(options).serialize(element, &mut sink)?;
    sink.finish()?;
    Ok(())
}

/// Decode XML text into a node
pub fn from_str(input: &str, options: &Options) -> Result<Node> {
    from_slice(input.as_bytes(), options)
}

/// Decode UTF-8 XML bytes into a node; a leading byte order mark is skipped
#[instrument(skip_all, fields(len = input.len()))]
pub fn from_slice(input: &[u8], options: &Options) -> Result<Node> {
    let element = parse_element_bytes(input, options)?;
    debug!("element tree built, mapping to node");
    element_to_node(&element, options)
}

/// Decode XML from a reader, reading it to completion first
pub fn from_reader<R: Read>(mut reader: R, options: &Options) -> Result<Node> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| Error::io(Stage::Decode, e, "failed to read xml input"))?;
    from_slice(&buf, options)
}

/// Decode an XML file
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn from_file(path: impl AsRef<Path>, options: &Options) -> Result<Node> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        Error::io(
            Stage::Decode,
            e,
            format!("failed to read {}", path.display()),
        )
    })?;
    debug!(bytes = bytes.len(), "file read");
    from_slice(&bytes, options)
}

/// Encode a node as an XML string
pub fn to_string(node: &Node, options: &Options) -> Result<String> {
    into_string(to_vec(node, options)?)
}

/// Encode a node as UTF-8 XML bytes
pub fn to_vec(node: &Node, options: &Options) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    to_writer(node, &mut out, options)?;
    Ok(out)
}

/// Encode a node into any writer. Bytes already written stay written if a
/// later step fails.
#[instrument(skip_all)]
pub fn to_writer<W: io::Write>(node: &Node, writer: W, options: &Options) -> Result<()> {
    let element = node_to_element(node, options)?;
    debug!("node mapped to element tree, serializing");
    write_element_to(&element, writer, options)
}

/// Encode a node into a file; the file is only touched once encoding succeeded
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn to_file(node: &Node, path: impl AsRef<Path>, options: &Options) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_vec(node, options)?;
    fs::write(path, &bytes).map_err(|e| {
        Error::io(
            Stage::Encode,
            e,
            format!("failed to write {}", path.display()),
        )
    })?;
    debug!(bytes = bytes.len(), "file written");
    Ok(())
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::encode(ErrorKind::InvalidUtf8))
}
