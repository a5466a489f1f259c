//! Keyword table
//!
//! Maps abstract keyword identifiers plus a target draft version to the
//! literal strings written into the schema document.
//!
//! # Features
//!
//! - **Version-aware names**: `definitions`/`$defs`, `dependencies`, `items`/`prefixItems`
//! - **Implied types**: which `type` values a keyword implies (used for strict type info)
//! - **Content kinds**: which keywords hold sub-schemas (used by the cleanup traversal)

mod types;

pub use types::{SchemaKeyword, SchemaType, SchemaVersion, TagContent};
