//! Cleanup pass
//!
//! Simplifies the rendered schema document after all references are resolved.
//! Every step walks the document breadth-first through the keywords that hold
//! sub-schemas, including the definitions section.
//!
//! # Features
//!
//! - **allOf merge**: parts are folded into their parent unless a keyword conflicts
//! - **anyOf flatten**: nested wrappers holding nothing but `anyOf` are spliced in
//! - **Redundant member attributes**: property attributes repeating the referenced definition are dropped
//! - **Strict type info**: the `type` implied by other keywords is added where missing

mod cleaner;
mod merge;

pub use cleaner::SchemaCleanup;
