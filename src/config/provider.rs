//! Custom definition providers
//!
//! Providers replace the standard generation for a type or member. They are
//! held in an ordered list; a lookup given a [`ProviderMarker`] resumes right
//! after that position, which lets a provider ask what the rest of the chain
//! would produce for its own type.

use crate::config::generator::SchemaGeneratorConfigBuilder;
use crate::context::GenerationContext;
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::error::Result;
use crate::node::{object_from_json, SchemaObject};
use crate::types::JsonValue;
use std::fmt;

/// Position of a provider in its chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderMarker(pub(crate) usize);

impl ProviderMarker {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProviderMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider#{}", self.0)
    }
}

/// How a custom definition is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefinitionType {
    /// Shared like a standard definition, inlined when referenced once
    #[default]
    Standard,
    /// Copied into every use site
    Inline,
    /// Always emitted under the definitions section
    AlwaysRef,
}

/// A provider-supplied schema
#[derive(Debug, Clone, PartialEq)]
pub struct CustomDefinition {
    pub value: SchemaObject,
    pub definition_type: DefinitionType,
    /// Whether the standard attribute collection still runs and merges in
    pub include_attributes: bool,
}

impl CustomDefinition {
    /// A standard (shareable) definition that still collects attributes
    pub fn new(value: SchemaObject) -> Self {
        Self {
            value,
            definition_type: DefinitionType::Standard,
            include_attributes: true,
        }
    }

    /// A definition copied into every use site
    pub fn inline(value: SchemaObject) -> Self {
        Self {
            definition_type: DefinitionType::Inline,
            ..Self::new(value)
        }
    }

    /// Shorthand for an inline definition built from a JSON object
    pub fn inline_json(value: JsonValue) -> Self {
        Self::inline(object_from_json(value))
    }

    #[must_use]
    pub fn with_definition_type(mut self, definition_type: DefinitionType) -> Self {
        self.definition_type = definition_type;
        self
    }

    #[must_use]
    pub fn without_attributes(mut self) -> Self {
        self.include_attributes = false;
        self
    }

    pub fn is_meant_to_be_inline(&self) -> bool {
        self.definition_type == DefinitionType::Inline
    }

    pub fn should_never_be_inlined(&self) -> bool {
        self.definition_type == DefinitionType::AlwaysRef
    }
}

// ============================================================================
// Provider Traits
// ============================================================================

/// Replaces the standard definition of a type
pub trait CustomDefinitionProvider {
    /// `marker` is this provider's own position; pass it to
    /// [`GenerationContext::create_standard_definition`] to delegate to the
    /// providers after it.
    fn provide_custom_schema_definition(
        &self,
        ty: &TypeDescriptor,
        context: &mut GenerationContext<'_>,
        marker: ProviderMarker,
    ) -> Result<Option<CustomDefinition>>;
}

impl<F> CustomDefinitionProvider for F
where
    F: Fn(&TypeDescriptor, &mut GenerationContext<'_>, ProviderMarker) -> Result<Option<CustomDefinition>>,
{
    fn provide_custom_schema_definition(
        &self,
        ty: &TypeDescriptor,
        context: &mut GenerationContext<'_>,
        marker: ProviderMarker,
    ) -> Result<Option<CustomDefinition>> {
        self(ty, context, marker)
    }
}

/// Replaces the schema of a single member; the result is always inlined
pub trait CustomPropertyDefinitionProvider {
    fn provide_custom_property_definition(
        &self,
        member: &MemberDescriptor,
        context: &mut GenerationContext<'_>,
        marker: ProviderMarker,
    ) -> Result<Option<CustomDefinition>>;
}

impl<F> CustomPropertyDefinitionProvider for F
where
    F: Fn(&MemberDescriptor, &mut GenerationContext<'_>, ProviderMarker) -> Result<Option<CustomDefinition>>,
{
    fn provide_custom_property_definition(
        &self,
        member: &MemberDescriptor,
        context: &mut GenerationContext<'_>,
        marker: ProviderMarker,
    ) -> Result<Option<CustomDefinition>> {
        self(member, context, marker)
    }
}

// ============================================================================
// Modules
// ============================================================================

/// A bundle of resolvers and providers installed in one step
pub trait Module {
    fn apply_to_config(&self, builder: &mut SchemaGeneratorConfigBuilder);
}
