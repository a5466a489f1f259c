//! Schema node types

use crate::types::JsonValue;
use indexmap::IndexMap;
use std::fmt;

/// Handle of a node owned by a [`SchemaArena`](super::SchemaArena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Object-shaped schema fragment, in insertion order
pub type SchemaObject = IndexMap<String, SchemaValue>;

/// A value inside a schema fragment
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaValue {
    /// Plain JSON, copied verbatim into the output
    Json(JsonValue),
    /// Another arena node, resolved when rendering
    Node(NodeId),
    /// Array mixing nodes and plain values (e.g. `allOf` parts)
    Array(Vec<SchemaValue>),
    /// Named sub-values (e.g. `properties`)
    Map(SchemaObject),
}

impl SchemaValue {
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(JsonValue::as_str)
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<JsonValue> for SchemaValue {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<NodeId> for SchemaValue {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<&str> for SchemaValue {
    fn from(value: &str) -> Self {
        Self::Json(JsonValue::String(value.to_string()))
    }
}

impl From<Vec<SchemaValue>> for SchemaValue {
    fn from(values: Vec<SchemaValue>) -> Self {
        Self::Array(values)
    }
}

/// Convert a JSON object into a schema fragment; other JSON values give an empty one
pub fn object_from_json(value: JsonValue) -> SchemaObject {
    match value {
        JsonValue::Object(map) => map
            .into_iter()
            .map(|(key, value)| (key, SchemaValue::Json(value)))
            .collect(),
        _ => SchemaObject::new(),
    }
}
