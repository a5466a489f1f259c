//! Generator configuration
//!
//! `SchemaGeneratorConfig` is assembled once through
//! `SchemaGeneratorConfigBuilder` and then shared read-only by a run.

use crate::builder::DefinitionNamingStrategy;
use crate::config::options::{GeneratorOption, OptionPreset};
use crate::config::parts::{MemberConfigPart, TypeConfigPart};
use crate::config::provider::Module;
use crate::descriptor::MemberDescriptor;
use crate::introspect::TypeIntrospector;
use crate::keyword::{SchemaKeyword, SchemaVersion};
use crate::modules::{AdditionalPropertiesModule, EnumModule, MethodExclusionModule, SimpleTypeModule};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

type PropertyComparator = Box<dyn Fn(&MemberDescriptor, &MemberDescriptor) -> Ordering>;

/// Fields before methods, then alphabetically by schema-visible name
pub fn default_property_order(a: &MemberDescriptor, b: &MemberDescriptor) -> Ordering {
    a.kind()
        .cmp(&b.kind())
        .then_with(|| a.schema_property_name().cmp(b.schema_property_name()))
}

// ============================================================================
// Config
// ============================================================================

/// Complete, immutable generator configuration
pub struct SchemaGeneratorConfig {
    version: SchemaVersion,
    options: BTreeSet<GeneratorOption>,
    members: MemberConfigPart,
    types: TypeConfigPart,
    naming_strategy: Option<Box<dyn DefinitionNamingStrategy>>,
    property_order: PropertyComparator,
}

impl SchemaGeneratorConfig {
    /// Start a builder
    pub fn builder(version: SchemaVersion, preset: OptionPreset) -> SchemaGeneratorConfigBuilder {
        SchemaGeneratorConfigBuilder::new(version, preset)
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Literal keyword for the configured version
    pub fn keyword(&self, keyword: SchemaKeyword) -> &'static str {
        keyword.for_version(self.version)
    }

    pub fn has_option(&self, option: GeneratorOption) -> bool {
        self.options.contains(&option)
    }

    /// Enabled options, in declaration order
    pub fn options(&self) -> impl Iterator<Item = GeneratorOption> + '_ {
        self.options.iter().copied()
    }

    pub fn members(&self) -> &MemberConfigPart {
        &self.members
    }

    pub fn types(&self) -> &TypeConfigPart {
        &self.types
    }

    pub fn naming_strategy(&self) -> Option<&dyn DefinitionNamingStrategy> {
        self.naming_strategy.as_deref()
    }

    pub fn sort_properties(&self, a: &MemberDescriptor, b: &MemberDescriptor) -> Ordering {
        (self.property_order)(a, b)
    }

    /// Resolved nullability, falling back to the per-kind default option
    pub fn is_nullable(&self, member: &MemberDescriptor, introspector: &dyn TypeIntrospector) -> bool {
        self.members
            .nullable
            .resolve(member, introspector)
            .unwrap_or_else(|| {
                if member.is_method() {
                    self.has_option(GeneratorOption::NullableMethodReturnValuesByDefault)
                } else {
                    self.has_option(GeneratorOption::NullableFieldsByDefault)
                }
            })
    }

    /// Whether a single allowed value is written as `const`
    pub fn single_value_as_const(&self) -> bool {
        !self.has_option(GeneratorOption::EnumKeywordForSingleValues)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects version, options, modules and resolvers
pub struct SchemaGeneratorConfigBuilder {
    version: SchemaVersion,
    preset: OptionPreset,
    options: HashMap<GeneratorOption, bool>,
    members: MemberConfigPart,
    types: TypeConfigPart,
    naming_strategy: Option<Box<dyn DefinitionNamingStrategy>>,
    property_order: Option<PropertyComparator>,
}

impl SchemaGeneratorConfigBuilder {
    pub fn new(version: SchemaVersion, preset: OptionPreset) -> Self {
        Self {
            version,
            preset,
            options: HashMap::new(),
            members: MemberConfigPart::default(),
            types: TypeConfigPart::default(),
            naming_strategy: None,
            property_order: None,
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Enable an option
    #[must_use]
    pub fn with_option(mut self, option: GeneratorOption) -> Self {
        self.options.insert(option, true);
        self
    }

    /// Disable an option, even if the preset enables it
    #[must_use]
    pub fn without_option(mut self, option: GeneratorOption) -> Self {
        self.options.insert(option, false);
        self
    }

    /// Apply a module right away; earlier modules take precedence
    #[must_use]
    pub fn with_module(mut self, module: impl Module) -> Self {
        module.apply_to_config(&mut self);
        self
    }

    #[must_use]
    pub fn with_naming_strategy(mut self, strategy: impl DefinitionNamingStrategy + 'static) -> Self {
        self.naming_strategy = Some(Box::new(strategy));
        self
    }

    #[must_use]
    pub fn with_property_order<F>(mut self, order: F) -> Self
    where
        F: Fn(&MemberDescriptor, &MemberDescriptor) -> Ordering + 'static,
    {
        self.property_order = Some(Box::new(order));
        self
    }

    pub fn members_mut(&mut self) -> &mut MemberConfigPart {
        &mut self.members
    }

    pub fn types_mut(&mut self) -> &mut TypeConfigPart {
        &mut self.types
    }

    /// Whether an option is enabled, explicitly or through the preset
    pub fn is_enabled(&self, option: GeneratorOption) -> bool {
        self.options
            .get(&option)
            .copied()
            .unwrap_or_else(|| self.preset.is_enabled_by_default(option))
    }

    /// Options in effect, after dropping those overridden by another enabled option
    fn effective_options(&self) -> BTreeSet<GeneratorOption> {
        let enabled: BTreeSet<_> = GeneratorOption::ALL
            .into_iter()
            .filter(|option| self.is_enabled(*option))
            .collect();
        enabled
            .iter()
            .copied()
            .filter(|option| {
                !enabled
                    .iter()
                    .any(|other| other.overrides().contains(option))
            })
            .collect()
    }

    /// Install the modules implied by the options, then freeze the configuration
    pub fn build(mut self) -> SchemaGeneratorConfig {
        let options = self.effective_options();

        let simple_types = if options.contains(&GeneratorOption::AdditionalFixedTypes) {
            SimpleTypeModule::for_primitive_and_additional_types()
        } else {
            SimpleTypeModule::for_primitive_types()
        };
        simple_types.apply_to_config(&mut self);
        if options.contains(&GeneratorOption::FlattenedEnums) {
            EnumModule::as_strings().apply_to_config(&mut self);
        }
        if options.contains(&GeneratorOption::MapValuesAsAdditionalProperties) {
            AdditionalPropertiesModule::for_map_values().apply_to_config(&mut self);
        }
        if options.contains(&GeneratorOption::ForbiddenAdditionalPropertiesByDefault) {
            AdditionalPropertiesModule::forbidden_for_all_objects_but_containers()
                .apply_to_config(&mut self);
        }
        if !options.contains(&GeneratorOption::VoidMethods) {
            MethodExclusionModule::for_void_methods().apply_to_config(&mut self);
        }
        if !options.contains(&GeneratorOption::InstanceMethods) {
            MethodExclusionModule::for_instance_methods().apply_to_config(&mut self);
        }

        SchemaGeneratorConfig {
            version: self.version,
            options,
            members: self.members,
            types: self.types,
            naming_strategy: self.naming_strategy,
            property_order: self
                .property_order
                .unwrap_or_else(|| Box::new(default_property_order)),
        }
    }
}
