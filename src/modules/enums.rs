//! Enumerations as plain string values

use crate::config::{
    CustomDefinition, CustomDefinitionProvider, Module, ProviderMarker, SchemaGeneratorConfigBuilder,
};
use crate::context::GenerationContext;
use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::keyword::SchemaKeyword;
use crate::node::SchemaObject;
use crate::types::JsonValue;

/// Turns every type with enum constants into `{"type":"string","enum":[...]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumModule;

impl EnumModule {
    /// Constants listed by name
    pub fn as_strings() -> Self {
        Self
    }
}

impl Module for EnumModule {
    fn apply_to_config(&self, builder: &mut SchemaGeneratorConfigBuilder) {
        builder
            .types_mut()
            .add_custom_definition_provider(EnumAsStringProvider);
    }
}

struct EnumAsStringProvider;

impl CustomDefinitionProvider for EnumAsStringProvider {
    fn provide_custom_schema_definition(
        &self,
        ty: &TypeDescriptor,
        context: &mut GenerationContext<'_>,
        _marker: ProviderMarker,
    ) -> Result<Option<CustomDefinition>> {
        let Some(constants) = context.introspector().enum_constants(ty) else {
            return Ok(None);
        };
        let mut values: Vec<JsonValue> = Vec::with_capacity(constants.len());
        for constant in constants {
            let value = JsonValue::String(constant);
            if !values.contains(&value) {
                values.push(value);
            }
        }

        let mut schema = SchemaObject::new();
        schema.insert(
            context.keyword(SchemaKeyword::Type).to_string(),
            context.keyword(SchemaKeyword::TypeString).into(),
        );
        if values.len() == 1 && context.config().single_value_as_const() {
            schema.insert(context.keyword(SchemaKeyword::Const).to_string(), values.remove(0).into());
        } else if !values.is_empty() {
            schema.insert(context.keyword(SchemaKeyword::Enum).to_string(), JsonValue::Array(values).into());
        }
        Ok(Some(CustomDefinition::new(schema)))
    }
}
