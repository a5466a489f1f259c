//! Generation context
//!
//! Holds the state of one generation run and implements the recursive
//! traversal that turns types into schema nodes.
//!
//! # Features
//!
//! - **One definition per key**: repeated types only register use sites
//! - **Provider chains**: custom definitions, resumable after a given provider
//! - **Member schemas**: attributes, type overrides, container items, nullability
//! - **Nullable wrapping**: idempotent, `type` widening or `anyOf` with a null branch

mod generation;
mod types;

pub use generation::GenerationContext;
pub use types::DefinitionKey;

#[cfg(test)]
mod tests;
