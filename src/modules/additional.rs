//! `additionalProperties` defaults

use crate::config::{AdditionalProperties, Module, SchemaGeneratorConfigBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    MapValues,
    ForbiddenButContainers,
}

/// Fills in `additionalProperties` for whole categories of types
#[derive(Debug, Clone, Copy)]
pub struct AdditionalPropertiesModule {
    strategy: Strategy,
}

impl AdditionalPropertiesModule {
    /// Map types accept additional properties of their value type
    pub fn for_map_values() -> Self {
        Self {
            strategy: Strategy::MapValues,
        }
    }

    /// Every non-container type forbids additional properties
    pub fn forbidden_for_all_objects_but_containers() -> Self {
        Self {
            strategy: Strategy::ForbiddenButContainers,
        }
    }
}

impl Module for AdditionalPropertiesModule {
    fn apply_to_config(&self, builder: &mut SchemaGeneratorConfigBuilder) {
        let resolver = &mut builder.types_mut().attributes.additional_properties;
        match self.strategy {
            // a raw map has `Object` values, which leaves the keyword out
            Strategy::MapValues => resolver.add(|ty, introspector| {
                introspector.map_value_type(ty).map(AdditionalProperties::Schema)
            }),
            Strategy::ForbiddenButContainers => resolver.add(|ty, introspector| {
                (!introspector.is_container_type(ty)).then_some(AdditionalProperties::Forbidden)
            }),
        };
    }
}
