//! Type graph document types
//!
//! Declarative type definitions for YAML parsing.

use crate::config::GeneratorSettings;
use crate::types::{AnnotationMap, JsonValue};
use serde::{Deserialize, Serialize};

// ============================================================================
// Document
// ============================================================================

/// Top-level type graph document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct TypeGraphDocument {
    /// Generator settings
    #[serde(default)]
    pub settings: GeneratorSettings,
    /// Type to generate the schema for (may be given on the command line instead)
    #[serde(default)]
    pub root: Option<String>,
    /// Declared types
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

// ============================================================================
// Type Definition
// ============================================================================

/// How a declared type is treated structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Object with fields and methods
    #[default]
    Object,
    /// Enumeration of named constants
    Enum,
    /// Collection whose items have the first type parameter
    Container,
    /// Key/value map whose values have the last type parameter
    Map,
}

/// A declared type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct TypeDefinition {
    /// Type name (may be package-qualified)
    pub name: String,
    /// Structural kind
    #[serde(default)]
    pub kind: TypeKind,
    /// Generic type parameter names
    #[serde(default)]
    pub type_params: Vec<String>,
    /// Direct supertypes, as type expressions over `type_params`
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Enum constants (kind `enum` only)
    #[serde(default)]
    pub constants: Vec<String>,
    /// Type-level markers
    #[serde(default)]
    pub annotations: AnnotationMap,
    /// Declared fields
    #[serde(default)]
    pub fields: Vec<MemberDefinition>,
    /// Declared methods
    #[serde(default)]
    pub methods: Vec<MemberDefinition>,
}

impl TypeDefinition {
    /// An object type without members
    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Object,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            constants: Vec::new(),
            annotations: AnnotationMap::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// An enum type with the given constants
    pub fn enumeration(name: impl Into<String>, constants: &[&str]) -> Self {
        Self {
            kind: TypeKind::Enum,
            constants: constants.iter().map(ToString::to_string).collect(),
            ..Self::object(name)
        }
    }

    /// A generic container type, e.g. `List<E>`
    pub fn container(name: impl Into<String>, item_param: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Container,
            type_params: vec![item_param.into()],
            ..Self::object(name)
        }
    }

    /// A generic map type, e.g. `Map<K, V>`
    pub fn map(
        name: impl Into<String>,
        key_param: impl Into<String>,
        value_param: impl Into<String>,
    ) -> Self {
        Self {
            kind: TypeKind::Map,
            type_params: vec![key_param.into(), value_param.into()],
            ..Self::object(name)
        }
    }

    /// Declare generic type parameters
    #[must_use]
    pub fn with_type_params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(ToString::to_string).collect();
        self
    }

    /// Add a direct supertype
    #[must_use]
    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// Add a type-level marker
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }

    /// Add a field
    #[must_use]
    pub fn with_field(mut self, field: MemberDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a method
    #[must_use]
    pub fn with_method(mut self, method: MemberDefinition) -> Self {
        self.methods.push(method);
        self
    }
}

// ============================================================================
// Member Definition
// ============================================================================

fn default_member_type() -> String {
    crate::descriptor::VOID_TYPE_NAME.to_string()
}

/// A declared field or method; every key besides the known ones is a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberDefinition {
    /// Declared name
    pub name: String,
    /// Type expression (methods default to `void`)
    #[serde(rename = "type", default = "default_member_type")]
    pub ty: String,
    /// Static member
    #[serde(rename = "static", default)]
    pub is_static: bool,
    /// Markers
    #[serde(flatten)]
    pub annotations: AnnotationMap,
}

impl MemberDefinition {
    /// A member of the given type expression
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_static: false,
            annotations: AnnotationMap::new(),
        }
    }

    /// Mark as static
    #[must_use]
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Add a marker
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }
}
