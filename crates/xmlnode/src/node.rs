//! Generic, format-agnostic node tree

use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::ops::Index;

/// A null / scalar / object / array value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value, integer-exact when it came from an integer
    Number(Number),
    /// String value
    String(String),
    /// Array of nodes
    Array(Array),
    /// Object (key-node pairs with order preservation)
    Object(Object),
}

impl Node {
    /// Returns true if this node is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for booleans, numbers and strings
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Bool(_) | Self::Number(_) | Self::String(_))
    }

    /// Returns true if this node is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns true if this node is an array
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns true if this node is an object
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns the boolean value if this is a boolean, None otherwise
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number if this is a number, None otherwise
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the number as f64 if this is a number, None otherwise
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    /// Returns the string value if this is a string, None otherwise
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text form of a scalar: strings as-is, booleans as `true`/`false`,
    /// integers exactly, floats in their shortest decimal form. None for null
    /// and containers.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::String(s) => Some(Cow::Borrowed(s)),
            Self::Bool(b) => Some(Cow::Owned(b.to_string())),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Null | Self::Array(_) | Self::Object(_) => None,
        }
    }

    /// Returns the array if this is an array, None otherwise
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the object if this is an object, None otherwise
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns a mutable reference to the array if this is an array, None otherwise
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object if this is an object, None otherwise
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Number> for Node {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Array> for Node {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Node {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Self::Array(Array(nodes))
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A JSON-style number: unsigned, negative or floating point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(N);

#[derive(Debug, Clone, Copy, PartialEq)]
enum N {
    PosInt(u64),
    /// Always less than zero
    NegInt(i64),
    Float(f64),
}

impl Number {
    /// Wraps a float; integral floats stay floats
    pub fn from_f64(value: f64) -> Self {
        Self(N::Float(value))
    }

    /// Returns true if the number was stored as a float
    pub fn is_f64(&self) -> bool {
        matches!(self.0, N::Float(_))
    }

    /// Value as i64 when it is an integer in range
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            N::PosInt(n) => i64::try_from(n).ok(),
            N::NegInt(n) => Some(n),
            N::Float(_) => None,
        }
    }

    /// Value as u64 when it is a non-negative integer
    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            N::PosInt(n) => Some(n),
            N::NegInt(_) | N::Float(_) => None,
        }
    }

    /// Value as f64; integers above 2^53 are rounded
    #[allow(clippy::as_conversions)]
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            N::PosInt(n) => n as f64,
            N::NegInt(n) => n as f64,
            N::Float(n) => n,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            N::PosInt(n) => write!(f, "{n}"),
            N::NegInt(n) => write!(f, "{n}"),
            N::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self(N::PosInt(value))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        match u64::try_from(value) {
            Ok(n) => Self(N::PosInt(n)),
            Err(_) => Self(N::NegInt(value)),
        }
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self::from(u64::from(value))
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

/// An order-preserving object (map of unique string keys to nodes)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object(pub(crate) IndexMap<String, Node>);

impl Object {
    /// Creates a new empty object
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Creates a new object with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Returns the number of entries in the object
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the object has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a reference to the node stored under the key
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the node stored under the key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.0.get_mut(key)
    }

    /// Inserts a key-node pair, keeping the original position of an existing key.
    /// Returns the previous node if the key already existed
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a key, preserving the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.0.shift_remove(key)
    }

    /// Returns true if the object contains the specified key
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns an iterator over the keys
    pub fn keys(&self) -> Keys<'_, String, Node> {
        self.0.keys()
    }

    /// Returns an iterator over the nodes
    pub fn values(&self) -> Values<'_, String, Node> {
        self.0.values()
    }

    /// Returns an iterator over key-node pairs
    pub fn iter(&self) -> Iter<'_, String, Node> {
        self.0.iter()
    }
}

impl Index<&str> for Object {
    type Output = Node;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, key: &str) -> &Self::Output {
        &self.0[key]
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Node);
    type IntoIter = Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Object {
    type Item = (String, Node);
    type IntoIter = IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<IndexMap<String, Node>> for Object {
    fn from(map: IndexMap<String, Node>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// An ordered array of nodes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array(pub(crate) Vec<Node>);

impl Array {
    /// Creates a new empty array
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a new array with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Returns the number of elements in the array
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the array contains no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a reference to the element at the given index
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.0.get(index)
    }

    /// Appends an element to the end of the array
    pub fn push(&mut self, value: impl Into<Node>) {
        self.0.push(value.into());
    }

    /// Returns an iterator over the array
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }
}

impl Index<usize> for Array {
    type Output = Node;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Array {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Vec<Node>> for Array {
    fn from(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }
}

impl FromIterator<Node> for Array {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Array, N, Node, Number, Object};
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    // Largest magnitude at which every integer is exactly representable in f64.
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    impl Serialize for Node {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Null => serializer.serialize_unit(),
                Self::Bool(b) => serializer.serialize_bool(*b),
                Self::Number(n) => n.serialize(serializer),
                Self::String(s) => serializer.serialize_str(s),
                Self::Array(arr) => arr.serialize(serializer),
                Self::Object(obj) => obj.serialize(serializer),
            }
        }
    }

    impl Serialize for Number {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.0 {
                N::PosInt(n) => serializer.serialize_u64(n),
                N::NegInt(n) => serializer.serialize_i64(n),
                N::Float(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                    #[allow(clippy::as_conversions)]
                    let int = n as i64;
                    serializer.serialize_i64(int)
                }
                N::Float(n) => serializer.serialize_f64(n),
            }
        }
    }

    impl Serialize for Array {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for item in self {
                seq.serialize_element(item)?;
            }
            seq.end()
        }
    }

    impl Serialize for Object {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }

    struct NodeVisitor;

    impl<'de> Visitor<'de> for NodeVisitor {
        type Value = Node;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("null, a boolean, a number, a string, an array or a map")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
            Ok(Node::Null)
        }

        fn visit_none<E: de::Error>(self) -> Result<Node, E> {
            Ok(Node::Null)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
            Node::deserialize(deserializer)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
            Ok(Node::Bool(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
            Ok(Node::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
            Ok(Node::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
            Ok(Node::from(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
            Ok(Node::String(v.to_owned()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
            Ok(Node::String(v))
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
            let mut arr = Array::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(item) = seq.next_element::<Node>()? {
                arr.push(item);
            }
            Ok(Node::Array(arr))
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
            let mut obj = Object::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, Node>()? {
                obj.insert(key, value);
            }
            Ok(Node::Object(obj))
        }
    }

    impl<'de> Deserialize<'de> for Node {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(NodeVisitor)
        }
    }
}
