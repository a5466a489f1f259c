//! Tests for the config module

use super::*;
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::introspect::TypeRegistry;
use crate::keyword::SchemaVersion;
use crate::node::SchemaValue;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cmp::Ordering;

fn field(name: &str) -> MemberDescriptor {
    MemberDescriptor::field(name, TypeDescriptor::named("String"), TypeDescriptor::named("Owner"))
}

fn method(name: &str) -> MemberDescriptor {
    MemberDescriptor::method(name, TypeDescriptor::named("String"), TypeDescriptor::named("Owner"))
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_option_from_str() {
    assert_eq!(
        "definitions_for_all_objects".parse::<GeneratorOption>().unwrap(),
        GeneratorOption::DefinitionsForAllObjects
    );
    assert_eq!(
        "Strict-Type-Info".parse::<GeneratorOption>().unwrap(),
        GeneratorOption::StrictTypeInfo
    );
    assert!("no_such_option".parse::<GeneratorOption>().is_err());
}

#[test]
fn test_option_names_are_unique() {
    let mut names: Vec<_> = GeneratorOption::ALL.iter().map(|o| o.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), GeneratorOption::ALL.len());
}

#[test]
fn test_preset_from_str() {
    assert_eq!("plain-json".parse::<OptionPreset>().unwrap(), OptionPreset::PlainJson);
    assert_eq!(
        "full_documentation".parse::<OptionPreset>().unwrap(),
        OptionPreset::FullDocumentation
    );
    assert!("java".parse::<OptionPreset>().is_err());
}

#[test]
fn test_plain_json_preset() {
    let preset = OptionPreset::default();
    assert!(preset.is_enabled_by_default(GeneratorOption::SchemaVersionIndicator));
    assert!(preset.is_enabled_by_default(GeneratorOption::FlattenedEnums));
    assert!(preset.is_enabled_by_default(GeneratorOption::AllOfCleanupAtTheEnd));
    assert!(!preset.is_enabled_by_default(GeneratorOption::InstanceMethods));
    assert!(!preset.is_enabled_by_default(GeneratorOption::StaticFields));
}

// ============================================================================
// Builder
// ============================================================================

#[test]
fn test_builder_explicit_switches_beat_preset() {
    let builder = SchemaGeneratorConfig::builder(SchemaVersion::Draft7, OptionPreset::PlainJson)
        .without_option(GeneratorOption::SchemaVersionIndicator)
        .with_option(GeneratorOption::StrictTypeInfo);

    assert!(!builder.is_enabled(GeneratorOption::SchemaVersionIndicator));
    assert!(builder.is_enabled(GeneratorOption::StrictTypeInfo));
    assert!(builder.is_enabled(GeneratorOption::FlattenedEnums));

    let config = builder.build();
    assert_eq!(config.version(), SchemaVersion::Draft7);
    assert!(!config.has_option(GeneratorOption::SchemaVersionIndicator));
    assert!(config.has_option(GeneratorOption::StrictTypeInfo));
}

#[test]
fn test_inline_all_overrides_definition_options() {
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::FullDocumentation)
        .with_option(GeneratorOption::InlineAllSchemas)
        .with_option(GeneratorOption::DefinitionForMainSchema)
        .build();

    assert!(config.has_option(GeneratorOption::InlineAllSchemas));
    assert!(!config.has_option(GeneratorOption::DefinitionsForAllObjects));
    assert!(!config.has_option(GeneratorOption::DefinitionForMainSchema));
}

#[test]
fn test_keyword_follows_version() {
    let legacy = SchemaGeneratorConfig::builder(SchemaVersion::Draft7, OptionPreset::PlainJson).build();
    let current = SchemaGeneratorConfig::builder(SchemaVersion::Draft2020_12, OptionPreset::PlainJson).build();

    assert_eq!(legacy.keyword(crate::keyword::SchemaKeyword::Definitions), "definitions");
    assert_eq!(current.keyword(crate::keyword::SchemaKeyword::Definitions), "$defs");
}

#[test]
fn test_user_hooks_precede_option_modules() {
    let mut builder = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson);
    builder
        .members_mut()
        .attributes
        .title
        .add(|_, _| Some("first".to_string()))
        .add(|_, _| Some("second".to_string()));
    let config = builder.build();

    let registry = TypeRegistry::new();
    assert_eq!(
        config.members().attributes.title.resolve(&field("a"), &registry),
        Some("first".to_string())
    );
    assert_eq!(config.members().attributes.title.len(), 2);
}

#[test]
fn test_void_and_instance_methods_ignored_by_default() {
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson).build();
    let registry = TypeRegistry::new();

    assert!(config.members().ignore.any(&method("getName"), &registry));
    assert!(!config.members().ignore.any(&field("name"), &registry));

    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::JavaObject).build();
    assert!(!config.members().ignore.any(&method("getName"), &registry));
}

#[test]
fn test_is_nullable_falls_back_to_options() {
    let registry = TypeRegistry::new();
    let plain = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson).build();
    assert!(!plain.is_nullable(&field("a"), &registry));
    assert!(!plain.is_nullable(&method("a"), &registry));

    let full = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::FullDocumentation).build();
    assert!(full.is_nullable(&field("a"), &registry));
    assert!(full.is_nullable(&method("a"), &registry));

    let mut builder = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::FullDocumentation);
    builder.members_mut().nullable.add(|member, _| {
        (member.declared_name() == "id").then_some(false)
    });
    let config = builder.build();
    assert!(!config.is_nullable(&field("id"), &registry));
    assert!(config.is_nullable(&field("other"), &registry));
}

#[test]
fn test_default_property_order() {
    assert_eq!(default_property_order(&field("b"), &field("a")), Ordering::Greater);
    assert_eq!(default_property_order(&field("z"), &method("a")), Ordering::Less);
    assert_eq!(default_property_order(&field("a"), &field("a")), Ordering::Equal);
}

#[test]
fn test_custom_property_order() {
    let config = SchemaGeneratorConfig::builder(SchemaVersion::default(), OptionPreset::PlainJson)
        .with_property_order(|a, b| b.declared_name().cmp(a.declared_name()))
        .build();
    assert_eq!(config.sort_properties(&field("a"), &field("b")), Ordering::Greater);
}

// ============================================================================
// Hooks and Definitions
// ============================================================================

#[test]
fn test_config_function_first_answer_wins() {
    let mut function: ConfigFunction<TypeDescriptor, u64> = ConfigFunction::default();
    assert!(function.is_empty());

    function
        .add(|ty, _| (ty.name() == "Short").then_some(5))
        .add(|_, _| Some(10));

    let registry = TypeRegistry::new();
    assert_eq!(function.resolve(&TypeDescriptor::named("Short"), &registry), Some(5));
    assert_eq!(function.resolve(&TypeDescriptor::named("Long"), &registry), Some(10));
}

#[test]
fn test_custom_definition_flags() {
    let standard = CustomDefinition::new(crate::node::object_from_json(json!({"type": "string"})));
    assert!(!standard.is_meant_to_be_inline());
    assert!(!standard.should_never_be_inlined());
    assert!(standard.include_attributes);

    let inline = CustomDefinition::inline_json(json!({"type": "integer"})).without_attributes();
    assert!(inline.is_meant_to_be_inline());
    assert!(!inline.include_attributes);
    assert_eq!(inline.value.get("type"), Some(&SchemaValue::from("integer")));

    let pinned = standard.with_definition_type(DefinitionType::AlwaysRef);
    assert!(pinned.should_never_be_inlined());
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_settings_defaults_from_yaml() {
    let settings: GeneratorSettings = serde_yaml::from_str("{}").unwrap();
    assert_eq!(settings, GeneratorSettings::default());
    assert_eq!(settings.schema_version, SchemaVersion::Draft2020_12);
    assert_eq!(settings.preset, OptionPreset::PlainJson);
}

#[test]
fn test_settings_from_yaml() {
    let yaml = r#"
schema_version: draft7
preset: java_object
with_options: [strict_type_info]
without_options: [void_methods]
"#;
    let settings: GeneratorSettings = serde_yaml::from_str(yaml).unwrap();
    settings.validate().unwrap();

    let config = settings.to_builder().build();
    assert_eq!(config.version(), SchemaVersion::Draft7);
    assert!(config.has_option(GeneratorOption::StrictTypeInfo));
    assert!(config.has_option(GeneratorOption::InstanceMethods));
    assert!(!config.has_option(GeneratorOption::VoidMethods));
}

#[test]
fn test_settings_conflicting_options() {
    let settings = GeneratorSettings {
        with_options: vec![GeneratorOption::StaticFields],
        without_options: vec![GeneratorOption::StaticFields],
        ..Default::default()
    };
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("static_fields"));
}
