//! Introspection module
//!
//! Everything the generator knows about the host type graph comes through
//! the `TypeIntrospector` trait.
//!
//! # Overview
//!
//! The introspect module provides:
//! - `TypeIntrospector` - member enumeration and structural lookups
//! - `TypeRegistry` - in-memory type graph with generic substitution
//! - `TypeGraphDocument` - YAML form of a type graph, with validation

mod parser;
mod registry;
mod types;

pub use parser::{load_type_graph, load_type_graph_from_str};
pub use registry::{TypeIntrospector, TypeRegistry};
pub use types::{MemberDefinition, TypeDefinition, TypeGraphDocument, TypeKind};
