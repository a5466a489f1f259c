//! Generator options and presets

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Options
// ============================================================================

/// Behavioral switches of the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorOption {
    /// Write `$schema` into the root node
    SchemaVersionIndicator,
    /// Map date/time, UUID, URI and big-number types as simple types
    AdditionalFixedTypes,
    /// Add OpenAPI `format` values (int32, int64, float, double, ...) to simple types
    ExtraOpenApiFormatValues,
    /// Enum types become `{"type":"string","enum":[...]}`
    FlattenedEnums,
    /// Map types get `additionalProperties` from their value type
    MapValuesAsAdditionalProperties,
    /// Object types get `additionalProperties: false` unless told otherwise
    ForbiddenAdditionalPropertiesByDefault,
    /// Fields are nullable unless a resolver says otherwise
    NullableFieldsByDefault,
    /// Method results are nullable unless a resolver says otherwise
    NullableMethodReturnValuesByDefault,
    /// Items of container members may be nullable
    NullableArrayItemsAllowed,
    /// Write a single allowed value as `enum: [v]` instead of `const`
    EnumKeywordForSingleValues,
    /// Emit every object type under the definitions section
    DefinitionsForAllObjects,
    /// Emit the root type under the definitions section and reference it
    DefinitionForMainSchema,
    /// Never emit definitions; inline everything (fails on cycles)
    InlineAllSchemas,
    /// Never emit separate nullable definitions
    InlineNullableSchemas,
    /// Definition names use the plain charset instead of URI-safe punctuation
    PlainDefinitionKeys,
    /// Merge `allOf` parts into their parent where no conflict arises
    AllOfCleanupAtTheEnd,
    /// Drop member attributes that repeat the referenced definition's value
    DuplicateMemberAttributeCleanupAtTheEnd,
    /// Include static fields
    StaticFields,
    /// Include static methods
    StaticMethods,
    /// Include non-static methods
    InstanceMethods,
    /// Include methods without return value (as schema `false`)
    VoidMethods,
    /// Always express nullability as `anyOf` with a null branch
    NullableAlwaysAsAnyOf,
    /// Add the implied `type` wherever it is missing
    StrictTypeInfo,
}

impl GeneratorOption {
    /// All options, in declaration order
    pub const ALL: [GeneratorOption; 23] = [
        GeneratorOption::SchemaVersionIndicator,
        GeneratorOption::AdditionalFixedTypes,
        GeneratorOption::ExtraOpenApiFormatValues,
        GeneratorOption::FlattenedEnums,
        GeneratorOption::MapValuesAsAdditionalProperties,
        GeneratorOption::ForbiddenAdditionalPropertiesByDefault,
        GeneratorOption::NullableFieldsByDefault,
        GeneratorOption::NullableMethodReturnValuesByDefault,
        GeneratorOption::NullableArrayItemsAllowed,
        GeneratorOption::EnumKeywordForSingleValues,
        GeneratorOption::DefinitionsForAllObjects,
        GeneratorOption::DefinitionForMainSchema,
        GeneratorOption::InlineAllSchemas,
        GeneratorOption::InlineNullableSchemas,
        GeneratorOption::PlainDefinitionKeys,
        GeneratorOption::AllOfCleanupAtTheEnd,
        GeneratorOption::DuplicateMemberAttributeCleanupAtTheEnd,
        GeneratorOption::StaticFields,
        GeneratorOption::StaticMethods,
        GeneratorOption::InstanceMethods,
        GeneratorOption::VoidMethods,
        GeneratorOption::NullableAlwaysAsAnyOf,
        GeneratorOption::StrictTypeInfo,
    ];

    /// Snake-case name as used in documents and on the command line
    pub fn name(self) -> &'static str {
        match self {
            GeneratorOption::SchemaVersionIndicator => "schema_version_indicator",
            GeneratorOption::AdditionalFixedTypes => "additional_fixed_types",
            GeneratorOption::ExtraOpenApiFormatValues => "extra_open_api_format_values",
            GeneratorOption::FlattenedEnums => "flattened_enums",
            GeneratorOption::MapValuesAsAdditionalProperties => {
                "map_values_as_additional_properties"
            }
            GeneratorOption::ForbiddenAdditionalPropertiesByDefault => {
                "forbidden_additional_properties_by_default"
            }
            GeneratorOption::NullableFieldsByDefault => "nullable_fields_by_default",
            GeneratorOption::NullableMethodReturnValuesByDefault => {
                "nullable_method_return_values_by_default"
            }
            GeneratorOption::NullableArrayItemsAllowed => "nullable_array_items_allowed",
            GeneratorOption::EnumKeywordForSingleValues => "enum_keyword_for_single_values",
            GeneratorOption::DefinitionsForAllObjects => "definitions_for_all_objects",
            GeneratorOption::DefinitionForMainSchema => "definition_for_main_schema",
            GeneratorOption::InlineAllSchemas => "inline_all_schemas",
            GeneratorOption::InlineNullableSchemas => "inline_nullable_schemas",
            GeneratorOption::PlainDefinitionKeys => "plain_definition_keys",
            GeneratorOption::AllOfCleanupAtTheEnd => "all_of_cleanup_at_the_end",
            GeneratorOption::DuplicateMemberAttributeCleanupAtTheEnd => {
                "duplicate_member_attribute_cleanup_at_the_end"
            }
            GeneratorOption::StaticFields => "static_fields",
            GeneratorOption::StaticMethods => "static_methods",
            GeneratorOption::InstanceMethods => "instance_methods",
            GeneratorOption::VoidMethods => "void_methods",
            GeneratorOption::NullableAlwaysAsAnyOf => "nullable_always_as_any_of",
            GeneratorOption::StrictTypeInfo => "strict_type_info",
        }
    }

    /// Options that are ignored while this one is enabled
    pub fn overrides(self) -> &'static [GeneratorOption] {
        match self {
            GeneratorOption::InlineAllSchemas => &[
                GeneratorOption::DefinitionsForAllObjects,
                GeneratorOption::DefinitionForMainSchema,
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for GeneratorOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|option| option.name() == normalized)
            .ok_or_else(|| Error::invalid_value("option", format!("unknown option '{s}'")))
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Default option sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionPreset {
    /// Plain data documents: fields only, flattened enums, extra fixed types
    #[default]
    PlainJson,
    /// Everything documented, shared definitions for all objects
    FullDocumentation,
    /// All members including static and void ones
    JavaObject,
}

impl OptionPreset {
    /// Options enabled unless explicitly disabled
    pub fn enabled_options(self) -> &'static [GeneratorOption] {
        match self {
            OptionPreset::PlainJson => &[
                GeneratorOption::SchemaVersionIndicator,
                GeneratorOption::AdditionalFixedTypes,
                GeneratorOption::FlattenedEnums,
                GeneratorOption::AllOfCleanupAtTheEnd,
            ],
            OptionPreset::FullDocumentation => &[
                GeneratorOption::StaticFields,
                GeneratorOption::StaticMethods,
                GeneratorOption::InstanceMethods,
                GeneratorOption::VoidMethods,
                GeneratorOption::FlattenedEnums,
                GeneratorOption::DefinitionsForAllObjects,
                GeneratorOption::NullableFieldsByDefault,
                GeneratorOption::NullableMethodReturnValuesByDefault,
                GeneratorOption::AllOfCleanupAtTheEnd,
            ],
            OptionPreset::JavaObject => &[
                GeneratorOption::StaticFields,
                GeneratorOption::StaticMethods,
                GeneratorOption::InstanceMethods,
                GeneratorOption::VoidMethods,
                GeneratorOption::FlattenedEnums,
                GeneratorOption::AllOfCleanupAtTheEnd,
            ],
        }
    }

    pub fn is_enabled_by_default(self, option: GeneratorOption) -> bool {
        self.enabled_options().contains(&option)
    }
}

impl FromStr for OptionPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "plain_json" => Ok(OptionPreset::PlainJson),
            "full_documentation" => Ok(OptionPreset::FullDocumentation),
            "java_object" => Ok(OptionPreset::JavaObject),
            other => Err(Error::invalid_value(
                "preset",
                format!("unknown preset '{other}'"),
            )),
        }
    }
}
