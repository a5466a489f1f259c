//! Generator configuration
//!
//! Everything a generation run consults besides the type graph itself.
//!
//! # Overview
//!
//! The config module provides:
//! - `SchemaGeneratorConfig` / `SchemaGeneratorConfigBuilder` - version, options, resolvers
//! - `GeneratorOption` / `OptionPreset` - behavioral switches and their default sets
//! - `MemberConfigPart` / `TypeConfigPart` - ordered resolver hooks per attribute
//! - `CustomDefinitionProvider` / `CustomPropertyDefinitionProvider` - definition overrides
//! - `Module` - bundles of hooks installed in one step
//! - `GeneratorSettings` - serde form of version and options

mod generator;
mod options;
mod parts;
mod provider;
mod settings;

pub use generator::{default_property_order, SchemaGeneratorConfig, SchemaGeneratorConfigBuilder};
pub use options::{GeneratorOption, OptionPreset};
pub use parts::{
    AdditionalProperties, AttributeOverrides, ConfigFunction, ConfigPart, ConfigPredicate,
    MemberConfigPart, TypeConfigPart,
};
pub use provider::{
    CustomDefinition, CustomDefinitionProvider, CustomPropertyDefinitionProvider, DefinitionType,
    Module, ProviderMarker,
};
pub use settings::GeneratorSettings;

#[cfg(test)]
mod tests;
