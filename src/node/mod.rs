//! Schema node module
//!
//! Arena-backed, mutable schema fragments.
//!
//! - `SchemaArena` - owns all nodes of a run, renders them to JSON
//! - `NodeId` - handle to an arena node
//! - `SchemaValue` / `SchemaObject` - fragment content

mod arena;
mod types;

pub use arena::SchemaArena;
pub use types::{object_from_json, NodeId, SchemaObject, SchemaValue};

#[cfg(test)]
mod tests;
