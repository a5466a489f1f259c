//! Tests for the rule modules

use super::*;
use crate::config::{GeneratorOption, OptionPreset, SchemaGeneratorConfig};
use crate::context::GenerationContext;
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::introspect::{MemberDefinition, TypeDefinition, TypeRegistry};
use crate::keyword::SchemaVersion;
use crate::types::JsonValue;
use pretty_assertions::assert_eq;
use serde_json::json;

/// Render the stored definition of `ty`; references stay unresolved
fn definition_of(config: &SchemaGeneratorConfig, registry: &TypeRegistry, ty: &str) -> JsonValue {
    let mut context = GenerationContext::new(config, registry);
    let key = context.parse_type(&ty.parse().unwrap()).unwrap();
    let node = context.definition(&key).unwrap();
    context.arena().render(node).unwrap()
}

fn plain() -> SchemaGeneratorConfig {
    SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson).build()
}

// ============================================================================
// SimpleTypeModule
// ============================================================================

#[test]
fn test_simple_types() {
    let registry = TypeRegistry::new();
    let config = plain();

    assert_eq!(definition_of(&config, &registry, "String"), json!({"type": "string"}));
    assert_eq!(definition_of(&config, &registry, "int"), json!({"type": "integer"}));
    assert_eq!(definition_of(&config, &registry, "Boolean"), json!({"type": "boolean"}));
    assert_eq!(definition_of(&config, &registry, "Object"), json!({}));
}

#[test]
fn test_additional_fixed_types_by_simple_name() {
    let registry = TypeRegistry::new();
    let config = plain();

    assert_eq!(definition_of(&config, &registry, "java.util.UUID"), json!({"type": "string"}));
    assert_eq!(definition_of(&config, &registry, "BigDecimal"), json!({"type": "number"}));
}

#[test]
fn test_additional_fixed_types_need_option() {
    let registry = TypeRegistry::new();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::JavaObject).build();
    let mut context = GenerationContext::new(&config, &registry);

    let err = context.parse_type(&TypeDescriptor::named("UUID")).unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn test_open_api_formats() {
    let registry = TypeRegistry::new();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
        .with_option(GeneratorOption::ExtraOpenApiFormatValues)
        .build();

    assert_eq!(
        definition_of(&config, &registry, "long"),
        json!({"type": "integer", "format": "int64"})
    );
    assert_eq!(
        definition_of(&config, &registry, "LocalDate"),
        json!({"type": "string", "format": "date"})
    );
    assert_eq!(definition_of(&config, &registry, "Short"), json!({"type": "integer"}));
}

#[test]
fn test_generic_type_never_simple() {
    let registry = TypeRegistry::new()
        .with_type(TypeDefinition::object("String").with_type_params(&["T"]))
        .unwrap();
    let config = plain();

    assert_eq!(definition_of(&config, &registry, "String<int>"), json!({"type": "object"}));
}

#[test]
fn test_primitives_never_nullable() {
    let registry = TypeRegistry::new();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::FullDocumentation).build();
    let owner = TypeDescriptor::named("Owner");

    let primitive = MemberDescriptor::field("count", TypeDescriptor::named("int"), owner.clone());
    let boxed = MemberDescriptor::field("total", TypeDescriptor::named("Integer"), owner);
    assert!(!config.is_nullable(&primitive, &registry));
    assert!(config.is_nullable(&boxed, &registry));
}

// ============================================================================
// EnumModule
// ============================================================================

#[test]
fn test_enum_as_strings() {
    let registry = TypeRegistry::new()
        .with_type(TypeDefinition::enumeration("Color", &["RED", "GREEN", "RED"]))
        .and_then(|r| r.with_type(TypeDefinition::enumeration("Unit", &["ONLY"])))
        .unwrap();
    let config = plain();

    assert_eq!(
        definition_of(&config, &registry, "Color"),
        json!({"type": "string", "enum": ["RED", "GREEN"]})
    );
    assert_eq!(
        definition_of(&config, &registry, "Unit"),
        json!({"type": "string", "const": "ONLY"})
    );
}

#[test]
fn test_enum_single_value_keyword() {
    let registry = TypeRegistry::new()
        .with_type(TypeDefinition::enumeration("Unit", &["ONLY"]))
        .unwrap();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
        .with_option(GeneratorOption::EnumKeywordForSingleValues)
        .build();

    assert_eq!(
        definition_of(&config, &registry, "Unit"),
        json!({"type": "string", "enum": ["ONLY"]})
    );
}

// ============================================================================
// AdditionalPropertiesModule
// ============================================================================

#[test]
fn test_map_values_as_additional_properties() {
    let registry = TypeRegistry::new();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
        .with_option(GeneratorOption::MapValuesAsAdditionalProperties)
        .build();

    assert_eq!(
        definition_of(&config, &registry, "Map<String, Integer>"),
        json!({"type": "object", "additionalProperties": {"type": "integer"}})
    );
    assert_eq!(definition_of(&config, &registry, "Map"), json!({"type": "object"}));
}

#[test]
fn test_forbidden_additional_properties() {
    let registry = TypeRegistry::new()
        .with_type(
            TypeDefinition::object("Person").with_field(MemberDefinition::new("tags", "List<String>")),
        )
        .unwrap();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
        .with_option(GeneratorOption::ForbiddenAdditionalPropertiesByDefault)
        .build();

    assert_eq!(
        definition_of(&config, &registry, "Person"),
        json!({
            "type": "object",
            "properties": {"tags": {"type": "array", "items": {"type": "string"}}},
            "additionalProperties": false
        })
    );
}

// ============================================================================
// MethodExclusionModule
// ============================================================================

#[test]
fn test_void_method_exclusion() {
    let registry = TypeRegistry::new();
    let owner = TypeDescriptor::named("Owner");
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::JavaObject)
        .with_module(MethodExclusionModule::for_void_methods())
        .build();

    let void = MemberDescriptor::method("reset", TypeDescriptor::void(), owner.clone());
    let getter = MemberDescriptor::method("getName", TypeDescriptor::named("String"), owner.clone());
    let field = MemberDescriptor::field("reset", TypeDescriptor::void(), owner);
    assert!(config.members().ignore.any(&void, &registry));
    assert!(!config.members().ignore.any(&getter, &registry));
    assert!(!config.members().ignore.any(&field, &registry));
}

// ============================================================================
// AnnotationModule
// ============================================================================

#[test]
fn test_member_markers() {
    let registry = TypeRegistry::new();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
        .with_module(AnnotationModule::new())
        .build();
    let member = MemberDescriptor::field("name", TypeDescriptor::named("String"), TypeDescriptor::named("Owner"))
        .with_annotation(annotations::TITLE, json!("Name"))
        .with_annotation(annotations::MIN_LENGTH, json!(2))
        .with_annotation(annotations::MAXIMUM, json!(1.5))
        .with_annotation(annotations::REQUIRED, json!(true))
        .with_annotation(annotations::RENAME, json!("fullName"))
        .with_annotation(annotations::DEPENDENT_REQUIRED, json!(["email"]));
    let members = config.members();

    assert_eq!(members.attributes.title.resolve(&member, &registry), Some("Name".to_string()));
    assert_eq!(members.attributes.min_length.resolve(&member, &registry), Some(2));
    assert_eq!(
        members.attributes.maximum.resolve(&member, &registry),
        serde_json::Number::from_f64(1.5)
    );
    assert!(members.required.any(&member, &registry));
    assert!(!members.ignore.any(&member, &registry));
    assert_eq!(members.property_name.resolve(&member, &registry), Some("fullName".to_string()));
    assert_eq!(
        members.dependent_required.resolve(&member, &registry),
        Some(vec!["email".to_string()])
    );
}

#[test]
fn test_container_item_sees_only_nullable_items() {
    let registry = TypeRegistry::new();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
        .with_module(AnnotationModule::new())
        .build();
    let member = MemberDescriptor::field(
        "tags",
        "List<String>".parse().unwrap(),
        TypeDescriptor::named("Owner"),
    )
    .with_annotation(annotations::MIN_ITEMS, json!(1))
    .with_annotation(annotations::NULLABLE_ITEMS, json!(true));
    let item = member.as_container_item(TypeDescriptor::named("String"));
    let members = config.members();

    assert_eq!(members.attributes.min_items.resolve(&member, &registry), Some(1));
    assert_eq!(members.attributes.min_items.resolve(&item, &registry), None);
    assert_eq!(members.nullable_items.resolve(&item, &registry), Some(true));
}

#[test]
fn test_type_markers() {
    let registry = TypeRegistry::new()
        .with_type(
            TypeDefinition::object("Pet")
                .with_annotation(annotations::DESCRIPTION, json!("A pet"))
                .with_annotation(annotations::ID, json!("urn:pet"))
                .with_annotation(annotations::SUBTYPES, json!(["Cat", "Dog", "List<"])),
        )
        .unwrap();
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
        .with_module(AnnotationModule::new())
        .build();
    let pet = TypeDescriptor::named("Pet");
    let types = config.types();

    assert_eq!(types.attributes.description.resolve(&pet, &registry), Some("A pet".to_string()));
    assert_eq!(types.id.resolve(&pet, &registry), Some("urn:pet".to_string()));
    assert_eq!(
        types.subtypes.resolve(&pet, &registry),
        Some(vec![TypeDescriptor::named("Cat"), TypeDescriptor::named("Dog")])
    );
    assert_eq!(types.subtypes.resolve(&TypeDescriptor::named("Cat"), &registry), None);
}
