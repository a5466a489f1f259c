//! Definition finalizer
//!
//! Turns the definitions remembered by a generation run into the final
//! document: each definition is either emitted once under the definitions
//! section and referenced by pointer, or copied into every use site.

use crate::builder::naming::{
    plain_key, uri_compatible_key, DefaultNamingStrategy, DefinitionNamingStrategy, SanitizingNamingStrategy,
};
use crate::cleanup::SchemaCleanup;
use crate::config::{GeneratorOption, SchemaGeneratorConfig};
use crate::context::{DefinitionKey, GenerationContext};
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::introspect::TypeIntrospector;
use crate::keyword::SchemaKeyword;
use crate::node::{NodeId, SchemaObject, SchemaValue};
use crate::types::JsonValue;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::debug;

static DEFAULT_NAMING: DefaultNamingStrategy = DefaultNamingStrategy;

/// Builds one schema document for a root type
pub(crate) struct SchemaBuilder<'a> {
    config: &'a SchemaGeneratorConfig,
    context: GenerationContext<'a>,
    naming: SanitizingNamingStrategy<'a>,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(config: &'a SchemaGeneratorConfig, introspector: &'a dyn TypeIntrospector) -> Self {
        let strategy = config.naming_strategy().unwrap_or(&DEFAULT_NAMING);
        let sanitize: fn(&str) -> String = if config.has_option(GeneratorOption::PlainDefinitionKeys) {
            plain_key
        } else {
            uri_compatible_key
        };
        Self {
            config,
            context: GenerationContext::new(config, introspector),
            naming: SanitizingNamingStrategy::new(strategy, sanitize),
        }
    }

    fn keyword(&self, keyword: SchemaKeyword) -> &'static str {
        self.config.keyword(keyword)
    }

    fn has_option(&self, option: GeneratorOption) -> bool {
        self.config.has_option(option)
    }

    /// Generate, resolve references and clean up the schema of `root`
    pub fn create_schema(mut self, root: &TypeDescriptor) -> Result<JsonValue> {
        let main_key = self.context.parse_type(root)?;

        let mut document = SchemaObject::new();
        if self.has_option(GeneratorOption::SchemaVersionIndicator) {
            document.insert(
                self.keyword(SchemaKeyword::Schema).to_string(),
                self.keyword(SchemaKeyword::SchemaValue).into(),
            );
        }
        let document = self.context.arena_mut().alloc(document);
        let main_as_definition = self.has_option(GeneratorOption::DefinitionForMainSchema);
        if main_as_definition {
            self.context.add_reference(main_key.clone(), document, false);
        }

        let definitions_tag = self.keyword(SchemaKeyword::Definitions);
        let reference_prefix = format!("{}/{definitions_tag}/", self.keyword(SchemaKeyword::RefMain));
        let definitions = self.build_definitions_and_resolve_references(&reference_prefix, &main_key)?;
        debug!(root = %root, definitions = definitions.len(), "Resolved references");
        if !definitions.is_empty() {
            let definitions = definitions
                .into_iter()
                .map(|(name, node)| (name, SchemaValue::Node(node)))
                .collect();
            self.context
                .arena_mut()
                .insert(document, definitions_tag, SchemaValue::Map(definitions));
        }
        if !main_as_definition {
            let main = self.definition(&main_key)?;
            let content = self.context.arena().get(main).clone();
            self.context.arena_mut().set_all(document, content);
        }

        let JsonValue::Object(mut rendered) = self.context.arena().render(document)? else {
            return Err(Error::misuse("schema document did not render to an object"));
        };
        SchemaCleanup::new(self.config).perform(&mut rendered, &reference_prefix);
        Ok(JsonValue::Object(rendered))
    }

    fn definition(&self, key: &DefinitionKey) -> Result<NodeId> {
        self.context
            .definition(key)
            .ok_or_else(|| Error::misuse(format!("no definition stored for {key}")))
    }

    // ========================================================================
    // Definitions
    // ========================================================================

    /// Whether `key` is emitted under the definitions section.
    ///
    /// While naming, nullable use sites count as well; when resolving, a key
    /// without plain use sites is inlined.
    fn should_produce_definition(&self, key: &DefinitionKey, main_key: &DefinitionKey, direct_only: bool) -> bool {
        if self.context.is_never_inline(key) {
            return true;
        }
        if self.has_option(GeneratorOption::InlineAllSchemas) {
            return false;
        }
        if self.has_option(GeneratorOption::DefinitionsForAllObjects) || key == main_key {
            return true;
        }
        let references = self.context.references(key).len();
        if direct_only && references == 0 {
            return false;
        }
        references + self.context.nullable_references(key).len() > 1
    }

    fn build_definitions_and_resolve_references(
        &mut self,
        reference_prefix: &str,
        main_key: &DefinitionKey,
    ) -> Result<IndexMap<String, NodeId>> {
        let mut definitions = IndexMap::new();
        for (key, name) in self.reference_keys(main_key)? {
            let reference = self.update_references(&key, &name, main_key, reference_prefix, &mut definitions)?;
            if !self.context.nullable_references(&key).is_empty() {
                self.update_nullable_references(&key, &name, reference, reference_prefix, &mut definitions)?;
            }
        }
        Ok(definitions)
    }

    /// Point every plain use site at the definition, or copy the definition into it
    fn update_references(
        &mut self,
        key: &DefinitionKey,
        name: &str,
        main_key: &DefinitionKey,
        reference_prefix: &str,
        definitions: &mut IndexMap<String, NodeId>,
    ) -> Result<Option<String>> {
        let references = self.context.references(key).to_vec();
        let definition = self.definition(key)?;
        if self.should_produce_definition(key, main_key, true) {
            let reference = if key == main_key && !self.has_option(GeneratorOption::DefinitionForMainSchema) {
                self.keyword(SchemaKeyword::RefMain).to_string()
            } else {
                definitions.insert(name.to_string(), definition);
                format!("{reference_prefix}{name}")
            };
            let ref_tag = self.keyword(SchemaKeyword::Ref);
            for node in references {
                self.context.arena_mut().insert(node, ref_tag, reference.as_str());
            }
            return Ok(Some(reference));
        }
        let content = self.context.arena().get(definition).clone();
        for node in references {
            self.context.arena_mut().merge_missing(node, &content);
        }
        Ok(None)
    }

    fn update_nullable_references(
        &mut self,
        key: &DefinitionKey,
        name: &str,
        reference: Option<String>,
        reference_prefix: &str,
        definitions: &mut IndexMap<String, NodeId>,
    ) -> Result<()> {
        let nullable_references = self.context.nullable_references(key).to_vec();
        let nullable = match reference {
            Some(reference) => {
                let mut pointer = SchemaObject::new();
                pointer.insert(self.keyword(SchemaKeyword::Ref).to_string(), reference.as_str().into());
                self.context.arena_mut().alloc(pointer)
            }
            None => {
                let content = self.context.arena().get(self.definition(key)?).clone();
                self.context.arena_mut().alloc(content)
            }
        };
        self.context.make_nullable(nullable);

        if self.should_create_nullable_definition(key, nullable_references.len()) {
            let nullable_name = self.naming.adjust_nullable_name(key, name, &self.context);
            let reference = format!("{reference_prefix}{nullable_name}");
            definitions.insert(nullable_name, nullable);
            let ref_tag = self.keyword(SchemaKeyword::Ref);
            for node in nullable_references {
                self.context.arena_mut().insert(node, ref_tag, reference.as_str());
            }
        } else {
            let content = self.context.arena().get(nullable).clone();
            for node in nullable_references {
                self.context.arena_mut().merge_missing(node, &content);
            }
        }
        Ok(())
    }

    fn should_create_nullable_definition(&self, key: &DefinitionKey, nullable_references: usize) -> bool {
        if self.has_option(GeneratorOption::InlineNullableSchemas) {
            return false;
        }
        if self.context.is_never_inline(key) {
            return true;
        }
        if self.has_option(GeneratorOption::InlineAllSchemas) {
            return false;
        }
        self.has_option(GeneratorOption::DefinitionsForAllObjects) || nullable_references > 1
    }

    // ========================================================================
    // Naming
    // ========================================================================

    /// Name of every defined key, in name order; keys that are never emitted map to ""
    fn reference_keys(&self, main_key: &DefinitionKey) -> Result<IndexMap<DefinitionKey, String>> {
        let mut groups: BTreeMap<String, Vec<DefinitionKey>> = BTreeMap::new();
        for key in self.context.defined_keys() {
            let name = self.naming.definition_name(&key, &self.context);
            groups.entry(name).or_default().push(key);
        }

        let mut reference_keys = IndexMap::new();
        for (name, keys) in groups {
            self.collect_reference_keys_from_group(&mut reference_keys, name, keys, main_key)?;
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for name in reference_keys.values().filter(|name| !name.is_empty()) {
            *counts.entry(name.as_str()).or_default() += 1;
        }
        let duplicates: Vec<&str> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect();
        if !duplicates.is_empty() {
            return Err(Error::misuse(format!(
                "definition naming strategy produced duplicate keys: {}",
                duplicates.join(", ")
            )));
        }
        Ok(reference_keys)
    }

    fn collect_reference_keys_from_group(
        &self,
        reference_keys: &mut IndexMap<DefinitionKey, String>,
        name: String,
        keys: Vec<DefinitionKey>,
        main_key: &DefinitionKey,
    ) -> Result<()> {
        for key in &keys {
            reference_keys.insert(key.clone(), String::new());
        }
        let produced: Vec<DefinitionKey> = keys
            .into_iter()
            .filter(|key| self.should_produce_definition(key, main_key, false))
            .collect();
        if self.are_distinct(main_key, &produced) {
            for key in produced {
                reference_keys.insert(key, name.clone());
            }
            return Ok(());
        }

        let mut group: IndexMap<DefinitionKey, String> =
            produced.iter().map(|key| (key.clone(), name.clone())).collect();
        self.naming.adjust_duplicate_names(&mut group, &self.context);
        if group.len() != produced.len() || !produced.iter().all(|key| group.contains_key(key)) {
            return Err(Error::misuse(format!(
                "definition naming strategy altered the group of definitions named '{name}'"
            )));
        }
        reference_keys.extend(group);
        Ok(())
    }

    /// A lone key needs no suffix; neither does one sharing its name with the inlined main schema
    fn are_distinct(&self, main_key: &DefinitionKey, keys: &[DefinitionKey]) -> bool {
        keys.len() == 1
            || (keys.len() == 2
                && !self.has_option(GeneratorOption::DefinitionForMainSchema)
                && keys.contains(main_key))
    }
}
