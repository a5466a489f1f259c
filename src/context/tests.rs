//! Tests for the generation context

use super::*;
use crate::config::{
    CustomDefinition, CustomDefinitionProvider, DefinitionType, GeneratorOption, OptionPreset,
    ProviderMarker, SchemaGeneratorConfig, SchemaGeneratorConfigBuilder,
};
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::introspect::{MemberDefinition, TypeDefinition, TypeRegistry};
use crate::keyword::SchemaVersion;
use crate::node::{object_from_json, SchemaObject, SchemaValue};
use crate::types::JsonValue;
use pretty_assertions::assert_eq;
use serde_json::json;

fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with_type(
            TypeDefinition::object("Node")
                .with_field(MemberDefinition::new("value", "String"))
                .with_field(MemberDefinition::new("next", "Node")),
        )
        .and_then(|r| {
            r.with_type(
                TypeDefinition::object("Pair")
                    .with_field(MemberDefinition::new("left", "Node"))
                    .with_field(MemberDefinition::new("right", "Node")),
            )
        })
        .and_then(|r| r.with_type(TypeDefinition::object("Pet")))
        .and_then(|r| r.with_type(TypeDefinition::object("Cat").with_supertype("Pet")))
        .and_then(|r| r.with_type(TypeDefinition::object("Dog").with_supertype("Pet")))
        .and_then(|r| r.with_type(TypeDefinition::object("Fish").with_supertype("Pet")))
        .unwrap()
}

fn builder() -> SchemaGeneratorConfigBuilder {
    SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
}

fn render(context: &GenerationContext<'_>, ty: &str) -> JsonValue {
    let key = DefinitionKey::of(ty.parse().unwrap());
    let node = context.definition(&key).unwrap();
    context.arena().render(node).unwrap()
}

fn named(name: &str) -> DefinitionKey {
    DefinitionKey::of(TypeDescriptor::named(name))
}

// ============================================================================
// Definitions and References
// ============================================================================

#[test]
fn test_one_definition_per_key() {
    let registry = registry();
    let config = builder().build();
    let mut context = GenerationContext::new(&config, &registry);

    let key = context.parse_type(&TypeDescriptor::named("Pair")).unwrap();
    assert_eq!(key, named("Pair"));
    assert_eq!(context.defined_keys(), vec![named("Pair"), named("Node")]);
    // left, right and the cyclic next
    assert_eq!(context.references(&named("Node")).len(), 3);
    assert!(context.nullable_references(&named("Node")).is_empty());

    context
        .create_definition_reference(&TypeDescriptor::named("Node"))
        .unwrap();
    assert_eq!(context.defined_keys().len(), 2);
    assert_eq!(context.references(&named("Node")).len(), 4);
}

#[test]
fn test_cycle_terminates() {
    let registry = registry();
    let config = builder().build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Node")).unwrap();
    assert_eq!(context.defined_keys(), vec![named("Node")]);
    assert_eq!(context.references(&named("Node")).len(), 1);
    assert_eq!(
        render(&context, "Node"),
        json!({"type": "object", "properties": {"next": {}, "value": {"type": "string"}}})
    );
}

#[test]
fn test_nullable_references_tracked_apart() {
    let registry = registry();
    let mut builder = builder();
    builder
        .members_mut()
        .nullable
        .add(|member, _| (member.declared_name() == "next").then_some(true));
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Pair")).unwrap();
    assert_eq!(context.references(&named("Node")).len(), 2);
    assert_eq!(context.nullable_references(&named("Node")).len(), 1);
}

#[test]
fn test_forced_inline_generates_again() {
    let registry = registry();
    let config = builder().build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Node")).unwrap();
    let inline = context.create_definition(&TypeDescriptor::named("Node")).unwrap();
    assert_eq!(context.defined_keys(), vec![named("Node")]);
    assert_eq!(
        context.arena().render(inline).unwrap(),
        json!({"type": "object", "properties": {"next": {}, "value": {"type": "string"}}})
    );
}

#[test]
fn test_object_without_members() {
    let registry = registry();
    let config = builder().build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Pet")).unwrap();
    assert_eq!(render(&context, "Pet"), json!({"type": "object"}));
}

// ============================================================================
// Subtypes
// ============================================================================

#[test]
fn test_several_subtypes_become_any_of() {
    let registry = registry();
    let mut builder = builder();
    builder.types_mut().subtypes.add(|ty, _| {
        (ty.name() == "Pet").then(|| {
            ["Cat", "Dog", "Fish"]
                .into_iter()
                .map(TypeDescriptor::named)
                .collect()
        })
    });
    builder
        .types_mut()
        .attributes
        .title
        .add(|ty, _| Some(ty.name().to_string()));
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Pet")).unwrap();
    // type attributes belong to the subtypes
    assert_eq!(render(&context, "Pet"), json!({"anyOf": [{}, {}, {}]}));
    assert_eq!(render(&context, "Dog"), json!({"type": "object", "title": "Dog"}));
    assert_eq!(context.references(&named("Cat")).len(), 1);
}

#[test]
fn test_single_subtype_becomes_all_of() {
    let registry = registry();
    let mut builder = builder();
    builder
        .types_mut()
        .subtypes
        .add(|ty, _| (ty.name() == "Pet").then(|| vec![TypeDescriptor::named("Cat")]));
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Pet")).unwrap();
    assert_eq!(render(&context, "Pet"), json!({"allOf": [{}]}));
}

// ============================================================================
// Member Schemas
// ============================================================================

#[test]
fn test_member_attributes_next_to_reference() {
    let registry = registry();
    let mut builder = builder();
    builder
        .members_mut()
        .attributes
        .title
        .add(|member, _| (member.declared_name() == "left").then(|| "Left".to_string()));
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Pair")).unwrap();
    assert_eq!(
        render(&context, "Pair"),
        json!({
            "type": "object",
            "properties": {
                "left": {"allOf": [{}, {"title": "Left"}]},
                "right": {}
            }
        })
    );
}

#[test]
fn test_container_member_and_nullable_items() {
    let registry = TypeRegistry::new()
        .with_type(TypeDefinition::object("Bag").with_field(MemberDefinition::new("tags", "List<String>")))
        .unwrap();
    let mut builder = builder().with_option(GeneratorOption::NullableArrayItemsAllowed);
    builder.members_mut().attributes.min_items.add(|_, _| Some(1));
    builder
        .members_mut()
        .nullable_items
        .add(|member, _| member.is_container_item().then_some(true));
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Bag")).unwrap();
    assert_eq!(
        render(&context, "Bag"),
        json!({
            "type": "object",
            "properties": {
                "tags": {
                    "minItems": 1,
                    "type": "array",
                    "items": {"minItems": 1, "type": ["string", "null"]}
                }
            }
        })
    );
}

#[test]
fn test_target_type_overrides_with_null_branch() {
    let registry = TypeRegistry::new()
        .with_type(TypeDefinition::object("Holder").with_field(MemberDefinition::new("value", "Object")))
        .unwrap();
    let mut builder = builder();
    builder.members_mut().target_type_overrides.add(|_, _| {
        Some(vec![TypeDescriptor::named("String"), TypeDescriptor::named("Integer")])
    });
    builder.members_mut().nullable.add(|_, _| Some(true));
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Holder")).unwrap();
    assert_eq!(
        render(&context, "Holder"),
        json!({
            "type": "object",
            "properties": {
                "value": {"anyOf": [{"type": "null"}, {"type": "string"}, {"type": "integer"}]}
            }
        })
    );
}

#[test]
fn test_required_and_dependent_required() {
    let registry = TypeRegistry::new()
        .with_type(
            TypeDefinition::object("Contact")
                .with_field(MemberDefinition::new("name", "String"))
                .with_field(MemberDefinition::new("email", "String")),
        )
        .unwrap();
    let mut builder = builder();
    builder
        .members_mut()
        .required
        .add(|member, _| member.declared_name() == "name");
    builder.members_mut().dependent_required.add(|member, _| {
        (member.declared_name() == "email").then(|| vec!["name".to_string()])
    });
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Contact")).unwrap();
    assert_eq!(
        render(&context, "Contact"),
        json!({
            "type": "object",
            "properties": {"email": {"type": "string"}, "name": {"type": "string"}},
            "required": ["name"],
            "dependentRequired": {"email": ["name"]}
        })
    );
}

#[test]
fn test_void_method_is_false() {
    let registry = TypeRegistry::new()
        .with_type(TypeDefinition::object("Counter").with_method(MemberDefinition::new("reset", "void")))
        .unwrap();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::JavaObject).build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Counter")).unwrap();
    assert_eq!(
        render(&context, "Counter"),
        json!({"type": "object", "properties": {"reset()": false}})
    );
}

#[test]
fn test_unsupported_member_type_is_skipped() {
    let registry = TypeRegistry::new()
        .with_type(
            TypeDefinition::object("Order")
                .with_field(MemberDefinition::new("id", "long"))
                .with_field(MemberDefinition::new("owner", "Missing")),
        )
        .unwrap();
    let config = builder().build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Order")).unwrap();
    assert_eq!(
        render(&context, "Order"),
        json!({"type": "object", "properties": {"id": {"type": "integer"}, "owner": {}}})
    );
}

#[test]
fn test_unsupported_root_type_fails() {
    let registry = TypeRegistry::new();
    let config = builder().build();
    let mut context = GenerationContext::new(&config, &registry);

    let err = context.parse_type(&TypeDescriptor::named("Missing")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType { .. }));
}

// ============================================================================
// Provider Chain
// ============================================================================

/// Wraps the standard definition of `Pet` and describes it
struct DescribedPet;

impl CustomDefinitionProvider for DescribedPet {
    fn provide_custom_schema_definition(
        &self,
        ty: &TypeDescriptor,
        context: &mut GenerationContext<'_>,
        marker: ProviderMarker,
    ) -> Result<Option<CustomDefinition>> {
        if ty.name() != "Pet" {
            return Ok(None);
        }
        let standard = context.create_standard_definition(ty, marker)?;
        let mut value = SchemaObject::new();
        value.insert("description".to_string(), "wrapped".into());
        value.insert("allOf".to_string(), vec![SchemaValue::Node(standard)].into());
        Ok(Some(CustomDefinition::inline(value)))
    }
}

/// Fixed schema for one type name
struct Fixed {
    name: &'static str,
    definition_type: DefinitionType,
}

impl CustomDefinitionProvider for Fixed {
    fn provide_custom_schema_definition(
        &self,
        ty: &TypeDescriptor,
        _context: &mut GenerationContext<'_>,
        _marker: ProviderMarker,
    ) -> Result<Option<CustomDefinition>> {
        Ok((ty.name() == self.name).then(|| {
            CustomDefinition::new(object_from_json(json!({"type": "string", "pattern": "^[A-Z]{3}$"})))
                .with_definition_type(self.definition_type)
        }))
    }
}

#[test]
fn test_provider_delegates_to_rest_of_chain() {
    let registry = registry();
    let mut builder = builder();
    builder.types_mut().add_custom_definition_provider(DescribedPet);
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Pet")).unwrap();
    assert_eq!(
        render(&context, "Pet"),
        json!({"description": "wrapped", "allOf": [{"type": "object"}]})
    );
}

#[test]
fn test_marker_out_of_range_is_misuse() {
    let registry = registry();
    let config = builder().build();
    let mut context = GenerationContext::new(&config, &registry);

    let err = context
        .create_standard_definition(&TypeDescriptor::named("Pet"), ProviderMarker(99))
        .unwrap_err();
    assert!(matches!(err, Error::Misuse { .. }));
}

#[test]
fn test_standard_custom_definition_is_shared() {
    let registry = TypeRegistry::new()
        .with_type(
            TypeDefinition::object("Price")
                .with_field(MemberDefinition::new("currency", "Currency"))
                .with_field(MemberDefinition::new("base", "Currency")),
        )
        .unwrap();
    let mut builder = builder();
    builder.types_mut().add_custom_definition_provider(Fixed {
        name: "Currency",
        definition_type: DefinitionType::AlwaysRef,
    });
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Price")).unwrap();
    assert!(context.is_never_inline(&named("Currency")));
    assert_eq!(context.references(&named("Currency")).len(), 2);
    assert_eq!(
        render(&context, "Currency"),
        json!({"type": "string", "pattern": "^[A-Z]{3}$"})
    );
}

#[test]
fn test_inline_custom_definition_of_root() {
    let registry = TypeRegistry::new();
    let mut builder = builder();
    builder.types_mut().add_custom_definition_provider(Fixed {
        name: "Currency",
        definition_type: DefinitionType::Inline,
    });
    let config = builder.build();
    let mut context = GenerationContext::new(&config, &registry);

    context.parse_type(&TypeDescriptor::named("Currency")).unwrap();
    assert!(!context.is_never_inline(&named("Currency")));
    assert_eq!(
        render(&context, "Currency"),
        json!({"type": "string", "pattern": "^[A-Z]{3}$"})
    );
}

// ============================================================================
// Nullable Wrapping
// ============================================================================

#[test]
fn test_make_nullable_widens_type() {
    let registry = TypeRegistry::new();
    let config = builder().build();
    let mut context = GenerationContext::new(&config, &registry);

    let node = context.arena_mut().alloc(object_from_json(json!({"type": "string"})));
    context.make_nullable(node);
    assert_eq!(context.arena().render(node).unwrap(), json!({"type": ["string", "null"]}));
    context.make_nullable(node);
    assert_eq!(context.arena().render(node).unwrap(), json!({"type": ["string", "null"]}));

    let untyped = context.arena_mut().alloc(object_from_json(json!({"title": "any"})));
    context.make_nullable(untyped);
    assert_eq!(context.arena().render(untyped).unwrap(), json!({"title": "any"}));
}

#[test]
fn test_make_nullable_wraps_reference() {
    let registry = TypeRegistry::new();
    let config = builder().build();
    let mut context = GenerationContext::new(&config, &registry);

    let node = context.arena_mut().alloc(object_from_json(json!({"$ref": "#/$defs/Node"})));
    context.make_nullable(node);
    context.make_nullable(node);
    assert_eq!(
        context.arena().render(node).unwrap(),
        json!({"anyOf": [{"type": "null"}, {"$ref": "#/$defs/Node"}]})
    );
}

#[test]
fn test_make_nullable_always_as_any_of() {
    let registry = TypeRegistry::new();
    let config = builder().with_option(GeneratorOption::NullableAlwaysAsAnyOf).build();
    let mut context = GenerationContext::new(&config, &registry);

    let node = context.arena_mut().alloc(object_from_json(json!({"type": "integer"})));
    context.make_nullable(node);
    context.make_nullable(node);
    assert_eq!(
        context.arena().render(node).unwrap(),
        json!({"anyOf": [{"type": "null"}, {"type": "integer"}]})
    );
}
