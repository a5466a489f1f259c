//! Schema builder
//!
//! Runs a generation context for a root type and assembles the final document.
//!
//! # Overview
//!
//! 1. The root type is traversed; every type becomes one stored definition
//! 2. Definitions are named and grouped; clashing names get numbered
//! 3. Each definition is emitted under `$defs` (or `definitions`) and referenced,
//!    or copied into its use sites when it is used only once
//! 4. The rendered document runs through the cleanup pass
//!
//! Names pass through one of two sanitizers: a URI-safe one keeping array and
//! generic markers as `*` and `(...)`, or a plain one (`PlainDefinitionKeys`).

mod finalizer;
mod generator;
mod naming;

pub use generator::SchemaGenerator;
pub use naming::{plain_key, uri_compatible_key, DefaultNamingStrategy, DefinitionNamingStrategy};
