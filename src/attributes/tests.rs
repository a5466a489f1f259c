//! Tests for attribute collection

use super::*;
use crate::config::{AdditionalProperties, GeneratorOption, OptionPreset, SchemaGeneratorConfig, SchemaGeneratorConfigBuilder};
use crate::context::GenerationContext;
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::introspect::TypeRegistry;
use crate::keyword::SchemaVersion;
use crate::node::{object_from_json, SchemaObject, SchemaValue};
use crate::types::JsonValue;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;

fn builder() -> SchemaGeneratorConfigBuilder {
    SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
}

fn field(name: &str) -> MemberDescriptor {
    MemberDescriptor::field(name, TypeDescriptor::named("String"), TypeDescriptor::named("Owner"))
}

fn render(context: &mut GenerationContext<'_>, object: SchemaObject) -> JsonValue {
    let node = context.arena_mut().alloc(object);
    context.arena().render(node).unwrap()
}

fn allowed(types: &[&str]) -> HashSet<String> {
    types.iter().map(|t| (*t).to_string()).collect()
}

// ============================================================================
// Member Attributes
// ============================================================================

#[test]
fn test_member_attributes() {
    let mut builder = builder();
    let members = builder.members_mut();
    members.attributes.title.add(|_, _| Some("Name".to_string()));
    members.attributes.description.add(|_, _| Some("Full name".to_string()));
    members.attributes.default.add(|_, _| Some(json!("n/a")));
    members.attributes.min_length.add(|_, _| Some(2));
    members.attributes.maximum.add(|_, _| Some(10.into()));
    members.attributes.unique_items.add(|_, _| Some(true));
    members.read_only.add(|_, _| true);
    let config = builder.build();
    let registry = TypeRegistry::new();
    let mut context = GenerationContext::new(&config, &registry);

    let attributes = collect_member_attributes(&field("name"), &mut context).unwrap();
    let keys: Vec<_> = attributes.keys().cloned().collect();
    assert_eq!(
        keys,
        vec!["title", "description", "default", "readOnly", "minLength", "maximum", "uniqueItems"]
    );
    assert_eq!(
        render(&mut context, attributes),
        json!({
            "title": "Name",
            "description": "Full name",
            "default": "n/a",
            "readOnly": true,
            "minLength": 2,
            "maximum": 10,
            "uniqueItems": true
        })
    );
}

#[test]
fn test_enum_values_deduplicated() {
    let mut builder = builder();
    builder
        .members_mut()
        .attributes
        .enum_values
        .add(|_, _| Some(vec![json!("a"), json!("b"), json!("a")]));
    let config = builder.build();
    let registry = TypeRegistry::new();
    let mut context = GenerationContext::new(&config, &registry);

    let attributes = collect_member_attributes(&field("x"), &mut context).unwrap();
    assert_eq!(render(&mut context, attributes), json!({"enum": ["a", "b"]}));
}

#[test]
fn test_single_value_const_or_enum() {
    let mut single = builder();
    single
        .members_mut()
        .attributes
        .enum_values
        .add(|_, _| Some(vec![json!(1), json!(1)]));
    let config = single.build();
    let registry = TypeRegistry::new();
    let mut context = GenerationContext::new(&config, &registry);
    let attributes = collect_member_attributes(&field("x"), &mut context).unwrap();
    assert_eq!(render(&mut context, attributes), json!({"const": 1}));

    let mut keyword = builder().with_option(GeneratorOption::EnumKeywordForSingleValues);
    keyword
        .members_mut()
        .attributes
        .enum_values
        .add(|_, _| Some(vec![json!(1)]));
    let config = keyword.build();
    let mut context = GenerationContext::new(&config, &registry);
    let attributes = collect_member_attributes(&field("x"), &mut context).unwrap();
    assert_eq!(render(&mut context, attributes), json!({"enum": [1]}));
}

#[test]
fn test_member_overrides_run_last() {
    let mut builder = builder();
    builder.members_mut().attributes.title.add(|_, _| Some("Name".to_string()));
    builder.members_mut().overrides.add(|node, member, _| {
        node.insert("title".to_string(), member.declared_name().to_uppercase().as_str().into());
        node.insert("x-origin".to_string(), "override".into());
    });
    let config = builder.build();
    let registry = TypeRegistry::new();
    let mut context = GenerationContext::new(&config, &registry);

    let attributes = collect_member_attributes(&field("name"), &mut context).unwrap();
    assert_eq!(
        render(&mut context, attributes),
        json!({"title": "NAME", "x-origin": "override"})
    );
}

// ============================================================================
// Type Attributes
// ============================================================================

fn constrained() -> SchemaGeneratorConfig {
    let mut builder = builder();
    let types = builder.types_mut();
    types.id.add(|ty, _| Some(format!("urn:{}", ty.name())));
    types.attributes.title.add(|_, _| Some("T".to_string()));
    types.attributes.min_length.add(|_, _| Some(1));
    types.attributes.minimum.add(|_, _| Some(0.into()));
    types.attributes.min_items.add(|_, _| Some(3));
    types
        .attributes
        .additional_properties
        .add(|_, _| Some(AdditionalProperties::Forbidden));
    builder.build()
}

#[test]
fn test_type_attributes_gated_by_allowed_types() {
    let config = constrained();
    let registry = TypeRegistry::new();
    let mut context = GenerationContext::new(&config, &registry);
    let ty = TypeDescriptor::named("Code");

    let attributes = collect_type_attributes(&ty, &mut context, &allowed(&["string", "null"])).unwrap();
    assert_eq!(
        render(&mut context, attributes),
        json!({"$id": "urn:Code", "title": "T", "minLength": 1})
    );

    let attributes = collect_type_attributes(&ty, &mut context, &allowed(&["integer"])).unwrap();
    assert_eq!(
        render(&mut context, attributes),
        json!({"$id": "urn:Code", "title": "T", "minimum": 0})
    );
}

#[test]
fn test_type_attributes_without_type_restriction() {
    let config = constrained();
    let registry = TypeRegistry::new();
    let mut context = GenerationContext::new(&config, &registry);

    let attributes =
        collect_type_attributes(&TypeDescriptor::named("Code"), &mut context, &HashSet::new()).unwrap();
    assert_eq!(
        render(&mut context, attributes),
        json!({
            "$id": "urn:Code",
            "title": "T",
            "additionalProperties": false,
            "minLength": 1,
            "minimum": 0,
            "minItems": 3
        })
    );
}

#[test]
fn test_additional_and_pattern_properties_reference_types() {
    let mut builder = builder();
    let types = builder.types_mut();
    types.attributes.additional_properties.add(|ty, _| {
        (ty.name() == "Labels").then(|| AdditionalProperties::Schema(TypeDescriptor::named("String")))
    });
    types
        .attributes
        .pattern_properties
        .add(|_, _| Some(vec![("^x-".to_string(), TypeDescriptor::named("int"))]));
    let config = builder.build();
    let registry = TypeRegistry::new();
    let mut context = GenerationContext::new(&config, &registry);

    let attributes = collect_type_attributes(
        &TypeDescriptor::named("Labels"),
        &mut context,
        &allowed(&["object"]),
    )
    .unwrap();
    assert_eq!(
        render(&mut context, attributes),
        json!({
            "additionalProperties": {"type": "string"},
            "patternProperties": {"^x-": {"type": "integer"}}
        })
    );
}

#[test]
fn test_unconstrained_additional_properties_omitted() {
    let mut builder = builder();
    builder
        .types_mut()
        .attributes
        .additional_properties
        .add(|_, _| Some(AdditionalProperties::Schema(TypeDescriptor::named("Object"))));
    let config = builder.build();
    let registry = TypeRegistry::new();
    let mut context = GenerationContext::new(&config, &registry);

    let attributes =
        collect_type_attributes(&TypeDescriptor::named("Bag"), &mut context, &HashSet::new()).unwrap();
    assert!(attributes.is_empty());
}

#[test]
fn test_unsupported_additional_properties_skipped() {
    let mut builder = builder();
    builder
        .types_mut()
        .attributes
        .additional_properties
        .add(|ty, _| (ty.name() == "Bag").then(|| AdditionalProperties::Schema(TypeDescriptor::variable("V"))));
    let config = builder.build();
    let registry = TypeRegistry::new();
    let mut context = GenerationContext::new(&config, &registry);

    let attributes =
        collect_type_attributes(&TypeDescriptor::named("Bag"), &mut context, &HashSet::new()).unwrap();
    assert!(attributes.is_empty());
}

// ============================================================================
// Helpers
// ============================================================================

#[test]
fn test_merge_missing_attributes() {
    let mut target = object_from_json(json!({"type": "string", "title": "kept"}));
    let attributes = object_from_json(json!({"title": "dropped", "format": "email"}));
    merge_missing_attributes(&mut target, &attributes);

    assert_eq!(target.get("title"), Some(&SchemaValue::from("kept")));
    assert_eq!(target.get("format"), Some(&SchemaValue::from("email")));
    assert_eq!(target.len(), 3);
}

#[test]
fn test_allowed_schema_types() {
    let single = object_from_json(json!({"type": "string"}));
    let several = object_from_json(json!({"type": ["integer", "null"]}));
    let untyped = object_from_json(json!({"title": "x"}));

    assert_eq!(allowed_schema_types(&single, "type"), allowed(&["string"]));
    assert_eq!(allowed_schema_types(&several, "type"), allowed(&["integer", "null"]));
    assert!(allowed_schema_types(&untyped, "type").is_empty());
}
