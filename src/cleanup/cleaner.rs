//! Post-processing of the rendered schema document

use crate::cleanup::merge::AllOfMerger;
use crate::config::{GeneratorOption, SchemaGeneratorConfig};
use crate::keyword::{SchemaKeyword, SchemaType, TagContent};
use crate::types::{JsonObject, JsonValue};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Simplifies a finished schema document according to the configured options
pub struct SchemaCleanup<'a> {
    config: &'a SchemaGeneratorConfig,
    schema_tags: HashSet<&'static str>,
    schema_array_tags: HashSet<&'static str>,
    named_schema_tags: HashSet<&'static str>,
}

impl<'a> SchemaCleanup<'a> {
    pub fn new(config: &'a SchemaGeneratorConfig) -> Self {
        let version = config.version();
        let tags = |content: TagContent| -> HashSet<&'static str> {
            SchemaKeyword::reverse_tag_map(version, |keyword| keyword.supports_content_type(content))
                .into_keys()
                .collect()
        };
        Self {
            config,
            schema_tags: tags(TagContent::Schema),
            schema_array_tags: tags(TagContent::ArrayOfSchemas),
            named_schema_tags: tags(TagContent::NamedSchemas),
        }
    }

    fn keyword(&self, keyword: SchemaKeyword) -> &'static str {
        self.config.keyword(keyword)
    }

    /// Run every enabled step over the document and the definitions it holds.
    ///
    /// `reference_prefix` is what references to a definition start with,
    /// e.g. `#/$defs/`.
    pub fn perform(&self, document: &mut JsonObject, reference_prefix: &str) {
        if self.config.has_option(GeneratorOption::AllOfCleanupAtTheEnd) {
            self.reduce_all_of_nodes(document);
        }
        self.reduce_any_of_nodes(document);
        if self.config.has_option(GeneratorOption::DuplicateMemberAttributeCleanupAtTheEnd) {
            let definitions = document
                .get(self.keyword(SchemaKeyword::Definitions))
                .and_then(JsonValue::as_object)
                .cloned()
                .unwrap_or_default();
            self.reduce_redundant_member_attributes(document, &definitions, reference_prefix);
        }
        if self.config.has_option(GeneratorOption::StrictTypeInfo) {
            self.set_strict_type_info(document, true);
            // null support may have introduced new anyOf wrappers
            self.reduce_any_of_nodes(document);
        }
    }

    /// Apply `action` to every schema reachable from `root`, level by level.
    ///
    /// Sub-schemas are looked up after the action ran on their parent, so
    /// whatever the action moved into place is visited as well.
    fn finalise_schema_parts<F>(&self, root: &mut JsonObject, mut action: F)
    where
        F: FnMut(&mut JsonObject),
    {
        let mut current = vec![root];
        while !current.is_empty() {
            let mut next = Vec::new();
            for node in current {
                action(&mut *node);
                next.extend(self.sub_schemas(node));
            }
            current = next;
        }
    }

    fn sub_schemas<'n>(&self, node: &'n mut JsonObject) -> Vec<&'n mut JsonObject> {
        let mut found = Vec::new();
        for (tag, value) in node.iter_mut() {
            let tag = tag.as_str();
            let is_schema = self.schema_tags.contains(tag);
            let is_named = self.named_schema_tags.contains(tag);
            let is_array = self.schema_array_tags.contains(tag);
            match value {
                JsonValue::Object(map) => {
                    if is_schema {
                        found.push(map);
                    } else if is_named {
                        found.extend(map.values_mut().filter_map(JsonValue::as_object_mut));
                    }
                }
                JsonValue::Array(items) if is_array => {
                    found.extend(items.iter_mut().filter_map(JsonValue::as_object_mut));
                }
                _ => {}
            }
        }
        found
    }

    // ========================================================================
    // allOf / anyOf
    // ========================================================================

    /// Merge `allOf` parts into their parent wherever that is conflict-free
    pub fn reduce_all_of_nodes(&self, root: &mut JsonObject) {
        let merger = AllOfMerger::new(self.config.version());
        self.finalise_schema_parts(root, |node| merger.merge_all_of_parts(node));
    }

    /// Splice entries of `anyOf` entries that are nothing but another `anyOf`
    pub fn reduce_any_of_nodes(&self, root: &mut JsonObject) {
        let any_of = self.keyword(SchemaKeyword::AnyOf);
        self.finalise_schema_parts(root, |node| {
            if let Some(JsonValue::Array(entries)) = node.get_mut(any_of) {
                flatten_any_of(entries, any_of);
            }
        });
    }

    // ========================================================================
    // Member Attributes
    // ========================================================================

    /// Drop property attributes that repeat the value of the referenced definition
    pub fn reduce_redundant_member_attributes(
        &self,
        root: &mut JsonObject,
        definitions: &JsonObject,
        reference_prefix: &str,
    ) {
        let definitions: HashMap<String, &JsonObject> = definitions
            .iter()
            .filter_map(|(name, definition)| {
                definition
                    .as_object()
                    .map(|definition| (format!("{reference_prefix}{name}"), definition))
            })
            .collect();
        let properties = self.keyword(SchemaKeyword::Properties);
        let reference = self.keyword(SchemaKeyword::Ref);
        self.finalise_schema_parts(root, |node| {
            let Some(JsonValue::Object(members)) = node.get_mut(properties) else {
                return;
            };
            for member in members.values_mut().filter_map(JsonValue::as_object_mut) {
                let target = member.get(reference).and_then(JsonValue::as_str);
                if let Some(definition) = target.and_then(|target| definitions.get(target)) {
                    self.reduce_redundant_attributes(member, definition);
                }
            }
        });
    }

    fn reduce_redundant_attributes(&self, member: &mut JsonObject, definition: &JsonObject) {
        let conditionals = [
            self.keyword(SchemaKeyword::If),
            self.keyword(SchemaKeyword::Then),
            self.keyword(SchemaKeyword::Else),
        ];
        // if/then/else only go away together
        let keep_conditionals = conditionals
            .iter()
            .any(|keyword| member.get(*keyword) != definition.get(*keyword));
        let before = member.len();
        member.retain(|key, value| {
            (keep_conditionals && conditionals.contains(&key.as_str())) || definition.get(key) != Some(&*value)
        });
        if member.len() < before {
            debug!(removed = before - member.len(), "Dropped attributes repeated by definition");
        }
    }

    // ========================================================================
    // Strict Type Info
    // ========================================================================

    /// Add the `type` implied by the present keywords wherever it is missing.
    ///
    /// With `consider_null`, `null` is allowed as well: as an extra type, or
    /// through an `anyOf` wrapper under `NullableAlwaysAsAnyOf`.
    pub fn set_strict_type_info(&self, root: &mut JsonObject, consider_null: bool) {
        let implying = SchemaKeyword::reverse_tag_map(self.config.version(), |keyword| {
            !keyword.implied_types().is_empty()
        });
        self.finalise_schema_parts(root, |node| {
            self.add_type_info_where_missing(node, consider_null, &implying);
        });
    }

    fn add_type_info_where_missing(
        &self,
        node: &mut JsonObject,
        consider_null: bool,
        implying: &HashMap<&'static str, SchemaKeyword>,
    ) {
        let type_keyword = self.keyword(SchemaKeyword::Type);
        if node.contains_key(type_keyword) {
            return;
        }
        let mut implied: Vec<SchemaType> = implying
            .iter()
            .filter(|(tag, _)| node.contains_key(**tag))
            .flat_map(|(_, keyword)| keyword.implied_types().iter().copied())
            .collect();
        if implied.is_empty() {
            return;
        }
        implied.sort();
        implied.dedup();

        let always_any_of = self.config.has_option(GeneratorOption::NullableAlwaysAsAnyOf);
        let mut names: Vec<&str> = implied.into_iter().map(SchemaType::as_str).collect();
        if consider_null && !always_any_of {
            names.push(SchemaType::Null.as_str());
        }
        let value = match names.as_slice() {
            [single] => JsonValue::from(*single),
            _ => JsonValue::from(names),
        };
        node.insert(type_keyword.to_string(), value);
        if consider_null && always_any_of {
            self.wrap_in_nullable_any_of(node);
        }
    }

    fn wrap_in_nullable_any_of(&self, node: &mut JsonObject) {
        let mut null_schema = JsonObject::new();
        null_schema.insert(
            self.keyword(SchemaKeyword::Type).to_string(),
            JsonValue::from(self.keyword(SchemaKeyword::TypeNull)),
        );
        let original = std::mem::take(node);
        node.insert(
            self.keyword(SchemaKeyword::AnyOf).to_string(),
            JsonValue::Array(vec![JsonValue::Object(null_schema), JsonValue::Object(original)]),
        );
    }
}

/// Flatten nested wrappers first, then splice them into `entries` in place
fn flatten_any_of(entries: &mut Vec<JsonValue>, any_of: &str) {
    for entry in entries.iter_mut() {
        if let Some(JsonValue::Array(nested)) = entry.as_object_mut().and_then(|entry| entry.get_mut(any_of)) {
            flatten_any_of(nested, any_of);
        }
    }
    for index in (0..entries.len()).rev() {
        let is_wrapper = matches!(
            &entries[index],
            JsonValue::Object(entry) if entry.len() == 1 && matches!(entry.get(any_of), Some(JsonValue::Array(_)))
        );
        if !is_wrapper {
            continue;
        }
        if let JsonValue::Object(mut wrapper) = entries.remove(index) {
            if let Some(JsonValue::Array(nested)) = wrapper.remove(any_of) {
                for (offset, item) in nested.into_iter().enumerate() {
                    entries.insert(index + offset, item);
                }
            }
        }
    }
}
