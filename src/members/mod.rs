//! Member collection
//!
//! Gathers the properties of an object type across its type hierarchy.
//!
//! # Features
//!
//! - **Inheritance**: instance members of the type and all supertypes, subtype first
//! - **Overrides**: the first member seen under a schema-visible name wins
//! - **Static members**: optionally collected per hierarchy level
//! - **Ordering**: configurable comparator, fields before methods by default

mod collector;
mod types;

pub use collector::{collect_object_properties, type_hierarchy};
pub use types::CollectedProperties;
