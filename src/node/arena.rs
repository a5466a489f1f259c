//! Node arena
//!
//! Owns every schema fragment created during one generation run. Nodes refer
//! to each other by [`NodeId`], so reference placeholders can be registered
//! before their content exists and rewritten in a single final pass.

use crate::error::{Error, Result};
use crate::node::types::{NodeId, SchemaObject, SchemaValue};
use crate::types::{JsonObject, JsonValue};

/// Storage for all schema nodes of a generation run
#[derive(Debug, Default)]
pub struct SchemaArena {
    nodes: Vec<SchemaObject>,
}

impl SchemaArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with the given content
    pub fn alloc(&mut self, content: SchemaObject) -> NodeId {
        self.nodes.push(content);
        NodeId(self.nodes.len() - 1)
    }

    /// Allocate an empty node
    pub fn alloc_empty(&mut self) -> NodeId {
        self.alloc(SchemaObject::new())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Ids are only handed out by `alloc`, so indexing cannot fail.
    pub fn get(&self, id: NodeId) -> &SchemaObject {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SchemaObject {
        &mut self.nodes[id.0]
    }

    /// Move the content out, leaving the node empty until [`put`](Self::put)
    pub fn take(&mut self, id: NodeId) -> SchemaObject {
        std::mem::take(&mut self.nodes[id.0])
    }

    /// Replace the content of a node
    pub fn put(&mut self, id: NodeId, content: SchemaObject) {
        self.nodes[id.0] = content;
    }

    /// Insert all entries, overwriting existing keys
    pub fn set_all(&mut self, id: NodeId, content: SchemaObject) {
        self.nodes[id.0].extend(content);
    }

    /// Insert entries whose keys are not present yet
    pub fn merge_missing(&mut self, id: NodeId, content: &SchemaObject) {
        let node = &mut self.nodes[id.0];
        for (key, value) in content {
            if !node.contains_key(key) {
                node.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn insert(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<SchemaValue>) {
        self.nodes[id.0].insert(key.into(), value.into());
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Resolve a node and everything it refers to into plain JSON.
    ///
    /// Nodes may be shared; a node that (transitively) contains itself fails
    /// with `CircularInline`.
    pub fn render(&self, id: NodeId) -> Result<JsonValue> {
        let mut visiting = vec![false; self.nodes.len()];
        self.render_node(id, &mut visiting)
    }

    /// Render a single value
    pub fn render_value(&self, value: &SchemaValue) -> Result<JsonValue> {
        let mut visiting = vec![false; self.nodes.len()];
        self.render_inner(value, &mut visiting)
    }

    fn render_node(&self, id: NodeId, visiting: &mut [bool]) -> Result<JsonValue> {
        if visiting[id.0] {
            return Err(Error::circular_inline(format!(
                "node {id} contains itself"
            )));
        }
        visiting[id.0] = true;
        let rendered = self.render_object(&self.nodes[id.0], visiting);
        visiting[id.0] = false;
        rendered.map(JsonValue::Object)
    }

    fn render_object(&self, object: &SchemaObject, visiting: &mut [bool]) -> Result<JsonObject> {
        let mut rendered = JsonObject::new();
        for (key, value) in object {
            rendered.insert(key.clone(), self.render_inner(value, visiting)?);
        }
        Ok(rendered)
    }

    fn render_inner(&self, value: &SchemaValue, visiting: &mut [bool]) -> Result<JsonValue> {
        match value {
            SchemaValue::Json(json) => Ok(json.clone()),
            SchemaValue::Node(id) => self.render_node(*id, visiting),
            SchemaValue::Array(items) => items
                .iter()
                .map(|item| self.render_inner(item, visiting))
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array),
            SchemaValue::Map(map) => self.render_object(map, visiting).map(JsonValue::Object),
        }
    }
}
