//! Resolver hooks
//!
//! Every attribute is answered by an ordered list of hooks; the first hook
//! returning `Some` wins. Modules append hooks, so whichever module was
//! applied first takes precedence.

use crate::config::provider::{CustomDefinitionProvider, CustomPropertyDefinitionProvider};
use crate::context::GenerationContext;
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::introspect::TypeIntrospector;
use crate::node::SchemaObject;
use crate::types::JsonValue;
use serde_json::Number;

type Hook<S, R> = Box<dyn Fn(&S, &dyn TypeIntrospector) -> Option<R>>;
type Predicate<S> = Box<dyn Fn(&S, &dyn TypeIntrospector) -> bool>;
type Override<S> = Box<dyn Fn(&mut SchemaObject, &S, &mut GenerationContext<'_>)>;

// ============================================================================
// Hook Lists
// ============================================================================

/// Ordered resolver list for one attribute
pub struct ConfigFunction<S, R> {
    hooks: Vec<Hook<S, R>>,
}

impl<S, R> Default for ConfigFunction<S, R> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<S, R> ConfigFunction<S, R> {
    /// Append a resolver
    pub fn add<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&S, &dyn TypeIntrospector) -> Option<R> + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// First non-empty answer
    pub fn resolve(&self, scope: &S, introspector: &dyn TypeIntrospector) -> Option<R> {
        self.hooks.iter().find_map(|hook| hook(scope, introspector))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// Ordered predicate list; any `true` answer wins
pub struct ConfigPredicate<S> {
    hooks: Vec<Predicate<S>>,
}

impl<S> Default for ConfigPredicate<S> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<S> ConfigPredicate<S> {
    pub fn add<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&S, &dyn TypeIntrospector) -> bool + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn any(&self, scope: &S, introspector: &dyn TypeIntrospector) -> bool {
        self.hooks.iter().any(|hook| hook(scope, introspector))
    }
}

/// Final hooks that may add or replace anything in a collected node
pub struct AttributeOverrides<S> {
    hooks: Vec<Override<S>>,
}

impl<S> Default for AttributeOverrides<S> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<S> AttributeOverrides<S> {
    pub fn add<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut SchemaObject, &S, &mut GenerationContext<'_>) + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook in order
    pub fn apply(&self, node: &mut SchemaObject, scope: &S, context: &mut GenerationContext<'_>) {
        for hook in &self.hooks {
            hook(node, scope, context);
        }
    }
}

// ============================================================================
// Attribute Values
// ============================================================================

/// Answer of an `additionalProperties` resolver
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// `additionalProperties: false`
    Forbidden,
    /// No restriction; nothing is written
    Unconstrained,
    /// Additional property values must match this type
    Schema(TypeDescriptor),
}

/// Attribute resolvers shared by member and type scopes
pub struct ConfigPart<S> {
    pub title: ConfigFunction<S, String>,
    pub description: ConfigFunction<S, String>,
    pub default: ConfigFunction<S, JsonValue>,
    pub enum_values: ConfigFunction<S, Vec<JsonValue>>,
    pub additional_properties: ConfigFunction<S, AdditionalProperties>,
    pub pattern_properties: ConfigFunction<S, Vec<(String, TypeDescriptor)>>,
    pub min_length: ConfigFunction<S, u64>,
    pub max_length: ConfigFunction<S, u64>,
    pub format: ConfigFunction<S, String>,
    pub pattern: ConfigFunction<S, String>,
    pub minimum: ConfigFunction<S, Number>,
    pub exclusive_minimum: ConfigFunction<S, Number>,
    pub maximum: ConfigFunction<S, Number>,
    pub exclusive_maximum: ConfigFunction<S, Number>,
    pub multiple_of: ConfigFunction<S, Number>,
    pub min_items: ConfigFunction<S, u64>,
    pub max_items: ConfigFunction<S, u64>,
    pub unique_items: ConfigFunction<S, bool>,
}

impl<S> Default for ConfigPart<S> {
    fn default() -> Self {
        Self {
            title: ConfigFunction::default(),
            description: ConfigFunction::default(),
            default: ConfigFunction::default(),
            enum_values: ConfigFunction::default(),
            additional_properties: ConfigFunction::default(),
            pattern_properties: ConfigFunction::default(),
            min_length: ConfigFunction::default(),
            max_length: ConfigFunction::default(),
            format: ConfigFunction::default(),
            pattern: ConfigFunction::default(),
            minimum: ConfigFunction::default(),
            exclusive_minimum: ConfigFunction::default(),
            maximum: ConfigFunction::default(),
            exclusive_maximum: ConfigFunction::default(),
            multiple_of: ConfigFunction::default(),
            min_items: ConfigFunction::default(),
            max_items: ConfigFunction::default(),
            unique_items: ConfigFunction::default(),
        }
    }
}

// ============================================================================
// Member Part
// ============================================================================

/// Resolvers for fields and methods
#[derive(Default)]
pub struct MemberConfigPart {
    pub attributes: ConfigPart<MemberDescriptor>,
    /// Drop the member entirely
    pub ignore: ConfigPredicate<MemberDescriptor>,
    /// List the member under `required`
    pub required: ConfigPredicate<MemberDescriptor>,
    pub nullable: ConfigFunction<MemberDescriptor, bool>,
    /// Nullability of container items (needs `NullableArrayItemsAllowed`)
    pub nullable_items: ConfigFunction<MemberDescriptor, bool>,
    pub read_only: ConfigPredicate<MemberDescriptor>,
    pub write_only: ConfigPredicate<MemberDescriptor>,
    /// Schema-visible name
    pub property_name: ConfigFunction<MemberDescriptor, String>,
    /// Replace the member's type by one or more alternatives
    pub target_type_overrides: ConfigFunction<MemberDescriptor, Vec<TypeDescriptor>>,
    /// Names that become required when this member is present
    pub dependent_required: ConfigFunction<MemberDescriptor, Vec<String>>,
    pub overrides: AttributeOverrides<MemberDescriptor>,
    custom_definitions: Vec<Box<dyn CustomPropertyDefinitionProvider>>,
}

impl MemberConfigPart {
    /// Append a member-level custom definition provider
    pub fn add_custom_definition_provider(
        &mut self,
        provider: impl CustomPropertyDefinitionProvider + 'static,
    ) -> &mut Self {
        self.custom_definitions.push(Box::new(provider));
        self
    }

    pub fn custom_definition_providers(&self) -> &[Box<dyn CustomPropertyDefinitionProvider>] {
        &self.custom_definitions
    }
}

// ============================================================================
// Type Part
// ============================================================================

/// Resolvers for types, independent of where they are used
#[derive(Default)]
pub struct TypeConfigPart {
    pub attributes: ConfigPart<TypeDescriptor>,
    pub id: ConfigFunction<TypeDescriptor, String>,
    pub anchor: ConfigFunction<TypeDescriptor, String>,
    /// Declared subtypes to offer instead of the type itself
    pub subtypes: ConfigFunction<TypeDescriptor, Vec<TypeDescriptor>>,
    pub overrides: AttributeOverrides<TypeDescriptor>,
    custom_definitions: Vec<Box<dyn CustomDefinitionProvider>>,
}

impl TypeConfigPart {
    /// Append a type-level custom definition provider
    pub fn add_custom_definition_provider(
        &mut self,
        provider: impl CustomDefinitionProvider + 'static,
    ) -> &mut Self {
        self.custom_definitions.push(Box::new(provider));
        self
    }

    pub fn custom_definition_providers(&self) -> &[Box<dyn CustomDefinitionProvider>] {
        &self.custom_definitions
    }
}
