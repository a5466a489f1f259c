//! Attribute collection
//!
//! Resolves the configured attribute hooks for a member or a type into a
//! flat schema fragment (documentation, enumerations, constraints).

mod collector;

pub use collector::{
    allowed_schema_types, collect_member_attributes, collect_type_attributes, merge_missing_attributes,
};

#[cfg(test)]
mod tests;
