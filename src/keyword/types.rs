//! Keyword table types
//!
//! Schema versions, JSON schema type values and the abstract keyword set.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Schema Version
// ============================================================================

/// Supported JSON Schema draft versions
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SchemaVersion {
    #[serde(rename = "draft6", alias = "draft-06")]
    Draft6,
    #[serde(rename = "draft7", alias = "draft-07")]
    Draft7,
    #[serde(rename = "draft2019-09")]
    Draft2019_09,
    #[default]
    #[serde(rename = "draft2020-12")]
    Draft2020_12,
}

impl SchemaVersion {
    /// All versions, oldest first
    pub const ALL: [SchemaVersion; 4] = [
        SchemaVersion::Draft6,
        SchemaVersion::Draft7,
        SchemaVersion::Draft2019_09,
        SchemaVersion::Draft2020_12,
    ];

    /// Meta-schema URI written into `$schema`
    pub fn identifier(self) -> &'static str {
        match self {
            SchemaVersion::Draft6 => "http://json-schema.org/draft-06/schema#",
            SchemaVersion::Draft7 => "http://json-schema.org/draft-07/schema#",
            SchemaVersion::Draft2019_09 => "https://json-schema.org/draft/2019-09/schema",
            SchemaVersion::Draft2020_12 => "https://json-schema.org/draft/2020-12/schema",
        }
    }

    /// Short name as accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            SchemaVersion::Draft6 => "draft6",
            SchemaVersion::Draft7 => "draft7",
            SchemaVersion::Draft2019_09 => "draft2019-09",
            SchemaVersion::Draft2020_12 => "draft2020-12",
        }
    }

    /// Drafts 6 and 7 ignore every sibling of `$ref` and use the old keyword names
    pub fn is_legacy(self) -> bool {
        matches!(self, SchemaVersion::Draft6 | SchemaVersion::Draft7)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "draft6" | "draft-06" | "6" => Ok(SchemaVersion::Draft6),
            "draft7" | "draft-07" | "7" => Ok(SchemaVersion::Draft7),
            "draft2019-09" | "2019-09" => Ok(SchemaVersion::Draft2019_09),
            "draft2020-12" | "2020-12" => Ok(SchemaVersion::Draft2020_12),
            other => Err(Error::invalid_value(
                "schema_version",
                format!("unknown schema version '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Schema Types
// ============================================================================

/// Values of the `type` keyword, in their canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaType {
    Null,
    Array,
    Object,
    Boolean,
    String,
    Integer,
    Number,
}

impl SchemaType {
    /// Keyword value of this type
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Boolean => "boolean",
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
        }
    }
}

/// What a keyword's value holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagContent {
    /// A single sub-schema
    Schema,
    /// An array of sub-schemas
    ArrayOfSchemas,
    /// An object whose values are sub-schemas
    NamedSchemas,
    /// Anything else
    NonSchema,
}

// ============================================================================
// Schema Keywords
// ============================================================================

/// Abstract keyword identifiers, resolved per version by [`SchemaKeyword::for_version`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaKeyword {
    Schema,
    SchemaValue,
    Id,
    Anchor,
    Definitions,
    Ref,
    RefMain,
    Type,
    TypeNull,
    TypeArray,
    TypeObject,
    TypeBoolean,
    TypeString,
    TypeInteger,
    TypeNumber,
    Properties,
    UnevaluatedProperties,
    Items,
    PrefixItems,
    UnevaluatedItems,
    Required,
    DependentSchemas,
    DependentRequired,
    AdditionalProperties,
    PatternProperties,
    PropertiesMin,
    PropertiesMax,
    AllOf,
    AnyOf,
    OneOf,
    Not,
    Title,
    Description,
    Const,
    Enum,
    Default,
    ReadOnly,
    WriteOnly,
    LengthMin,
    LengthMax,
    Format,
    Pattern,
    Minimum,
    MinimumExclusive,
    Maximum,
    MaximumExclusive,
    MultipleOf,
    ItemsMin,
    ItemsMax,
    ItemsUnique,
    If,
    Then,
    Else,
}

const OBJECT: &[SchemaType] = &[SchemaType::Object];
const ARRAY: &[SchemaType] = &[SchemaType::Array];
const STRING: &[SchemaType] = &[SchemaType::String];
const NUMERIC: &[SchemaType] = &[SchemaType::Integer, SchemaType::Number];

const SCHEMA: &[TagContent] = &[TagContent::Schema];
const SCHEMAS: &[TagContent] = &[TagContent::ArrayOfSchemas];
const NAMED: &[TagContent] = &[TagContent::NamedSchemas];
const PLAIN: &[TagContent] = &[TagContent::NonSchema];

impl SchemaKeyword {
    /// Every keyword in declaration order
    pub const ALL: [SchemaKeyword; 53] = [
        SchemaKeyword::Schema,
        SchemaKeyword::SchemaValue,
        SchemaKeyword::Id,
        SchemaKeyword::Anchor,
        SchemaKeyword::Definitions,
        SchemaKeyword::Ref,
        SchemaKeyword::RefMain,
        SchemaKeyword::Type,
        SchemaKeyword::TypeNull,
        SchemaKeyword::TypeArray,
        SchemaKeyword::TypeObject,
        SchemaKeyword::TypeBoolean,
        SchemaKeyword::TypeString,
        SchemaKeyword::TypeInteger,
        SchemaKeyword::TypeNumber,
        SchemaKeyword::Properties,
        SchemaKeyword::UnevaluatedProperties,
        SchemaKeyword::Items,
        SchemaKeyword::PrefixItems,
        SchemaKeyword::UnevaluatedItems,
        SchemaKeyword::Required,
        SchemaKeyword::DependentSchemas,
        SchemaKeyword::DependentRequired,
        SchemaKeyword::AdditionalProperties,
        SchemaKeyword::PatternProperties,
        SchemaKeyword::PropertiesMin,
        SchemaKeyword::PropertiesMax,
        SchemaKeyword::AllOf,
        SchemaKeyword::AnyOf,
        SchemaKeyword::OneOf,
        SchemaKeyword::Not,
        SchemaKeyword::Title,
        SchemaKeyword::Description,
        SchemaKeyword::Const,
        SchemaKeyword::Enum,
        SchemaKeyword::Default,
        SchemaKeyword::ReadOnly,
        SchemaKeyword::WriteOnly,
        SchemaKeyword::LengthMin,
        SchemaKeyword::LengthMax,
        SchemaKeyword::Format,
        SchemaKeyword::Pattern,
        SchemaKeyword::Minimum,
        SchemaKeyword::MinimumExclusive,
        SchemaKeyword::Maximum,
        SchemaKeyword::MaximumExclusive,
        SchemaKeyword::MultipleOf,
        SchemaKeyword::ItemsMin,
        SchemaKeyword::ItemsMax,
        SchemaKeyword::ItemsUnique,
        SchemaKeyword::If,
        SchemaKeyword::Then,
        SchemaKeyword::Else,
    ];

    /// Literal keyword for the given version
    pub fn for_version(self, version: SchemaVersion) -> &'static str {
        let legacy = version.is_legacy();
        match self {
            SchemaKeyword::Schema => "$schema",
            SchemaKeyword::SchemaValue => version.identifier(),
            SchemaKeyword::Id => "$id",
            SchemaKeyword::Anchor => "$anchor",
            SchemaKeyword::Definitions if legacy => "definitions",
            SchemaKeyword::Definitions => "$defs",
            SchemaKeyword::Ref => "$ref",
            SchemaKeyword::RefMain => "#",
            SchemaKeyword::Type => "type",
            SchemaKeyword::TypeNull => SchemaType::Null.as_str(),
            SchemaKeyword::TypeArray => SchemaType::Array.as_str(),
            SchemaKeyword::TypeObject => SchemaType::Object.as_str(),
            SchemaKeyword::TypeBoolean => SchemaType::Boolean.as_str(),
            SchemaKeyword::TypeString => SchemaType::String.as_str(),
            SchemaKeyword::TypeInteger => SchemaType::Integer.as_str(),
            SchemaKeyword::TypeNumber => SchemaType::Number.as_str(),
            SchemaKeyword::Properties => "properties",
            SchemaKeyword::UnevaluatedProperties => "unevaluatedProperties",
            SchemaKeyword::Items => "items",
            SchemaKeyword::PrefixItems if legacy => "items",
            SchemaKeyword::PrefixItems => "prefixItems",
            SchemaKeyword::UnevaluatedItems => "unevaluatedItems",
            SchemaKeyword::Required => "required",
            SchemaKeyword::DependentSchemas if legacy => "dependencies",
            SchemaKeyword::DependentSchemas => "dependentSchemas",
            SchemaKeyword::DependentRequired if legacy => "dependencies",
            SchemaKeyword::DependentRequired => "dependentRequired",
            SchemaKeyword::AdditionalProperties => "additionalProperties",
            SchemaKeyword::PatternProperties => "patternProperties",
            SchemaKeyword::PropertiesMin => "minProperties",
            SchemaKeyword::PropertiesMax => "maxProperties",
            SchemaKeyword::AllOf => "allOf",
            SchemaKeyword::AnyOf => "anyOf",
            SchemaKeyword::OneOf => "oneOf",
            SchemaKeyword::Not => "not",
            SchemaKeyword::Title => "title",
            SchemaKeyword::Description => "description",
            SchemaKeyword::Const => "const",
            SchemaKeyword::Enum => "enum",
            SchemaKeyword::Default => "default",
            SchemaKeyword::ReadOnly => "readOnly",
            SchemaKeyword::WriteOnly => "writeOnly",
            SchemaKeyword::LengthMin => "minLength",
            SchemaKeyword::LengthMax => "maxLength",
            SchemaKeyword::Format => "format",
            SchemaKeyword::Pattern => "pattern",
            SchemaKeyword::Minimum => "minimum",
            SchemaKeyword::MinimumExclusive => "exclusiveMinimum",
            SchemaKeyword::Maximum => "maximum",
            SchemaKeyword::MaximumExclusive => "exclusiveMaximum",
            SchemaKeyword::MultipleOf => "multipleOf",
            SchemaKeyword::ItemsMin => "minItems",
            SchemaKeyword::ItemsMax => "maxItems",
            SchemaKeyword::ItemsUnique => "uniqueItems",
            SchemaKeyword::If => "if",
            SchemaKeyword::Then => "then",
            SchemaKeyword::Else => "else",
        }
    }

    /// Types a schema must allow when this keyword is present
    pub fn implied_types(self) -> &'static [SchemaType] {
        match self {
            SchemaKeyword::Properties
            | SchemaKeyword::UnevaluatedProperties
            | SchemaKeyword::Required
            | SchemaKeyword::DependentSchemas
            | SchemaKeyword::DependentRequired
            | SchemaKeyword::AdditionalProperties
            | SchemaKeyword::PatternProperties
            | SchemaKeyword::PropertiesMin
            | SchemaKeyword::PropertiesMax => OBJECT,
            SchemaKeyword::Items
            | SchemaKeyword::PrefixItems
            | SchemaKeyword::UnevaluatedItems
            | SchemaKeyword::ItemsMin
            | SchemaKeyword::ItemsMax
            | SchemaKeyword::ItemsUnique => ARRAY,
            SchemaKeyword::LengthMin
            | SchemaKeyword::LengthMax
            | SchemaKeyword::Format
            | SchemaKeyword::Pattern => STRING,
            SchemaKeyword::Minimum
            | SchemaKeyword::MinimumExclusive
            | SchemaKeyword::Maximum
            | SchemaKeyword::MaximumExclusive
            | SchemaKeyword::MultipleOf => NUMERIC,
            _ => &[],
        }
    }

    /// Content kinds this keyword's value may hold; empty for pure value constants
    pub fn content_types(self) -> &'static [TagContent] {
        match self {
            SchemaKeyword::SchemaValue
            | SchemaKeyword::RefMain
            | SchemaKeyword::TypeNull
            | SchemaKeyword::TypeArray
            | SchemaKeyword::TypeObject
            | SchemaKeyword::TypeBoolean
            | SchemaKeyword::TypeString
            | SchemaKeyword::TypeInteger
            | SchemaKeyword::TypeNumber => &[],
            SchemaKeyword::Definitions
            | SchemaKeyword::Properties
            | SchemaKeyword::DependentSchemas
            | SchemaKeyword::PatternProperties => NAMED,
            SchemaKeyword::Items => &[TagContent::Schema, TagContent::ArrayOfSchemas],
            SchemaKeyword::PrefixItems
            | SchemaKeyword::AllOf
            | SchemaKeyword::AnyOf
            | SchemaKeyword::OneOf => SCHEMAS,
            SchemaKeyword::UnevaluatedProperties
            | SchemaKeyword::UnevaluatedItems
            | SchemaKeyword::AdditionalProperties
            | SchemaKeyword::Not
            | SchemaKeyword::If
            | SchemaKeyword::Then
            | SchemaKeyword::Else => SCHEMA,
            _ => PLAIN,
        }
    }

    /// Whether this keyword's value may hold the given content kind
    pub fn supports_content_type(self, content: TagContent) -> bool {
        self.content_types().contains(&content)
    }

    /// Map literal keyword names back to keywords for the given version.
    ///
    /// Only keywords with content types are included. When two keywords share
    /// a literal name (e.g. `items` in draft 7) the first declared one wins.
    pub fn reverse_tag_map(
        version: SchemaVersion,
        filter: impl Fn(SchemaKeyword) -> bool,
    ) -> HashMap<&'static str, SchemaKeyword> {
        let mut map = HashMap::new();
        for keyword in Self::ALL {
            if keyword.content_types().is_empty() || !filter(keyword) {
                continue;
            }
            map.entry(keyword.for_version(version)).or_insert(keyword);
        }
        map
    }
}
