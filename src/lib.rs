// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Solidafy Schemagen
//!
//! JSON Schema generation from a graph of type descriptors.
//!
//! ## Features
//!
//! - **Draft Support**: Draft 6, Draft 7, Draft 2019-09 and Draft 2020-12 keyword tables
//! - **Cycle Safe**: Self-referential and mutually recursive types resolve to `$ref` pointers
//! - **Pluggable Rules**: Ordered resolver hooks for titles, constraints, nullability and subtypes
//! - **Custom Definitions**: Provider chains that may defer to the next provider
//! - **Cleanup**: `allOf` merging, `anyOf` flattening and strict type info
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_schemagen::{
//!     GeneratorOption, MemberDefinition, OptionPreset, SchemaGenerator, SchemaGeneratorConfig,
//!     SchemaVersion, TypeDefinition, TypeRegistry,
//! };
//!
//! let registry = TypeRegistry::new()
//!     .with_type(TypeDefinition::object("Person").with_field(MemberDefinition::new("name", "String")))?;
//!
//! let config = SchemaGeneratorConfig::builder(SchemaVersion::Draft2020_12, OptionPreset::PlainJson)
//!     .with_option(GeneratorOption::DefinitionsForAllObjects)
//!     .build();
//!
//! let schema = SchemaGenerator::new(&config, &registry).generate(&"Person".parse()?)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SchemaGenerator                          │
//! │  parse root → resolve definitions → render → cleanup            │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Keywords │ Context   │ Members       │ Finalizer │ Cleanup     │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Drafts   │ Traversal │ Inheritance   │ Naming    │ allOf merge │
//! │ Types    │ Providers │ Required      │ $defs     │ anyOf flat  │
//! │          │ Nullable  │ Ordering      │ Nullable  │ Strict type │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the generator
pub mod error;

/// Common types and type aliases
pub mod types;

/// Keyword table per schema draft
pub mod keyword;

/// Type expressions and member descriptors
pub mod descriptor;

/// Type graph introspection and YAML documents
pub mod introspect;

/// Schema node arena
pub mod node;

/// Options, resolver hooks and providers
pub mod config;

/// Recursive traversal and reference bookkeeping
pub mod context;

/// Attribute collection for members and types
pub mod attributes;

/// Property collection across the type hierarchy
pub mod members;

/// Post-processing of finished documents
pub mod cleanup;

/// Definition naming and reference resolution
pub mod builder;

/// Built-in rule modules
pub mod modules;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use builder::{DefaultNamingStrategy, DefinitionNamingStrategy, SchemaGenerator};
pub use config::{GeneratorOption, GeneratorSettings, OptionPreset, SchemaGeneratorConfig};
pub use descriptor::{MemberDescriptor, TypeDescriptor};
pub use introspect::{
    load_type_graph, load_type_graph_from_str, MemberDefinition, TypeDefinition, TypeGraphDocument,
    TypeIntrospector, TypeRegistry,
};
pub use keyword::{SchemaKeyword, SchemaVersion};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
