//! Recursive type traversal
//!
//! `GenerationContext` walks the type graph once, starting at the root type.
//! Every type gets at most one definition per [`DefinitionKey`]; repeated
//! encounters only register the use site as a reference, which is what makes
//! cyclic graphs terminate. The finalizer later turns each reference into an
//! inlined copy or a `$ref` pointer.

use crate::attributes::{
    allowed_schema_types, collect_member_attributes, collect_type_attributes, merge_missing_attributes,
};
use crate::config::{
    CustomDefinition, DefinitionType, GeneratorOption, ProviderMarker, SchemaGeneratorConfig,
};
use crate::context::types::{DefinitionKey, TypeDetails};
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::error::{Error, Result};
use crate::introspect::TypeIntrospector;
use crate::keyword::SchemaKeyword;
use crate::members::collect_object_properties;
use crate::node::{object_from_json, NodeId, SchemaArena, SchemaObject, SchemaValue};
use crate::types::{JsonObject, JsonValue};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Keywords whose presence forces nullable wrapping into `anyOf`
const WRAPPING_KEYWORDS: [SchemaKeyword; 6] = [
    SchemaKeyword::Ref,
    SchemaKeyword::AllOf,
    SchemaKeyword::AnyOf,
    SchemaKeyword::OneOf,
    SchemaKeyword::Const,
    SchemaKeyword::Enum,
];

/// State of one generation run
pub struct GenerationContext<'a> {
    config: &'a SchemaGeneratorConfig,
    introspector: &'a dyn TypeIntrospector,
    arena: SchemaArena,
    definitions: IndexMap<DefinitionKey, NodeId>,
    references: HashMap<DefinitionKey, Vec<NodeId>>,
    nullable_references: HashMap<DefinitionKey, Vec<NodeId>>,
    never_inline: HashSet<DefinitionKey>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(config: &'a SchemaGeneratorConfig, introspector: &'a dyn TypeIntrospector) -> Self {
        Self {
            config,
            introspector,
            arena: SchemaArena::new(),
            definitions: IndexMap::new(),
            references: HashMap::new(),
            nullable_references: HashMap::new(),
            never_inline: HashSet::new(),
        }
    }

    pub fn config(&self) -> &'a SchemaGeneratorConfig {
        self.config
    }

    pub fn introspector(&self) -> &'a dyn TypeIntrospector {
        self.introspector
    }

    /// Literal keyword for the configured version
    pub fn keyword(&self, keyword: SchemaKeyword) -> &'static str {
        self.config.keyword(keyword)
    }

    pub fn arena(&self) -> &SchemaArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut SchemaArena {
        &mut self.arena
    }

    // ========================================================================
    // Bookkeeping
    // ========================================================================

    pub fn contains_definition(&self, key: &DefinitionKey) -> bool {
        self.definitions.contains_key(key)
    }

    pub fn definition(&self, key: &DefinitionKey) -> Option<NodeId> {
        self.definitions.get(key).copied()
    }

    /// All keys with a definition, in creation order
    pub fn defined_keys(&self) -> Vec<DefinitionKey> {
        self.definitions.keys().cloned().collect()
    }

    /// Use sites where the value may not be null
    pub fn references(&self, key: &DefinitionKey) -> &[NodeId] {
        self.references.get(key).map_or(&[], Vec::as_slice)
    }

    /// Use sites where the value may be null
    pub fn nullable_references(&self, key: &DefinitionKey) -> &[NodeId] {
        self.nullable_references.get(key).map_or(&[], Vec::as_slice)
    }

    /// Whether a provider asked for this definition to always be referenced
    pub fn is_never_inline(&self, key: &DefinitionKey) -> bool {
        self.never_inline.contains(key)
    }

    fn put_definition(&mut self, key: DefinitionKey, node: NodeId) {
        debug!(key = %key, node = %node, "storing definition");
        self.definitions.insert(key, node);
    }

    pub(crate) fn add_reference(&mut self, key: DefinitionKey, node: NodeId, nullable: bool) {
        let target = if nullable {
            &mut self.nullable_references
        } else {
            &mut self.references
        };
        target.entry(key).or_default().push(node);
    }

    // ========================================================================
    // Entry Points
    // ========================================================================

    /// Traverse the root type; its definition is stored without a use site
    pub fn parse_type(&mut self, ty: &TypeDescriptor) -> Result<DefinitionKey> {
        let details = TypeDetails::of(ty.clone());
        self.traverse(&details, None)?;
        Ok(details.key())
    }

    /// Complete schema of a type, generated in place
    pub fn create_definition(&mut self, ty: &TypeDescriptor) -> Result<NodeId> {
        self.create_inline(ty, None)
    }

    /// Use site for a type, resolved to a copy or a `$ref` when finalizing
    pub fn create_definition_reference(&mut self, ty: &TypeDescriptor) -> Result<NodeId> {
        self.create_reference(ty, None)
    }

    /// Like [`create_definition`](Self::create_definition), but only consulting
    /// the type providers after `marker`
    pub fn create_standard_definition(
        &mut self,
        ty: &TypeDescriptor,
        marker: ProviderMarker,
    ) -> Result<NodeId> {
        self.create_inline(ty, Some(marker))
    }

    /// Like [`create_definition_reference`](Self::create_definition_reference),
    /// but only consulting the type providers after `marker`
    pub fn create_standard_definition_reference(
        &mut self,
        ty: &TypeDescriptor,
        marker: ProviderMarker,
    ) -> Result<NodeId> {
        self.create_reference(ty, Some(marker))
    }

    /// Member schema generated in place, only consulting the member providers after `marker`
    pub fn create_standard_member_definition(
        &mut self,
        member: &MemberDescriptor,
        marker: ProviderMarker,
    ) -> Result<SchemaValue> {
        self.create_member_schema(member, false, true, Some(marker))
    }

    /// Member schema that may refer to shared definitions, only consulting the
    /// member providers after `marker`
    pub fn create_standard_member_definition_reference(
        &mut self,
        member: &MemberDescriptor,
        marker: ProviderMarker,
    ) -> Result<SchemaValue> {
        self.create_member_schema(member, false, false, Some(marker))
    }

    fn create_inline(&mut self, ty: &TypeDescriptor, skip: Option<ProviderMarker>) -> Result<NodeId> {
        let node = self.arena.alloc_empty();
        let details = TypeDetails {
            force_inline: true,
            skip,
            ..TypeDetails::of(ty.clone())
        };
        self.traverse(&details, Some(node))?;
        Ok(node)
    }

    fn create_reference(&mut self, ty: &TypeDescriptor, skip: Option<ProviderMarker>) -> Result<NodeId> {
        let node = self.arena.alloc_empty();
        let details = TypeDetails {
            skip,
            ..TypeDetails::of(ty.clone())
        };
        self.traverse(&details, Some(node))?;
        Ok(node)
    }

    // ========================================================================
    // Provider Chains
    // ========================================================================

    fn chain_start(marker: Option<ProviderMarker>, len: usize) -> Result<usize> {
        match marker {
            None => Ok(0),
            Some(marker) if marker.index() < len => Ok(marker.index() + 1),
            Some(marker) => Err(Error::misuse(format!(
                "{marker} is out of range for a chain of {len} providers"
            ))),
        }
    }

    /// First custom definition from the type providers after `skip`
    fn custom_type_definition(
        &mut self,
        ty: &TypeDescriptor,
        skip: Option<ProviderMarker>,
    ) -> Result<Option<CustomDefinition>> {
        let config = self.config;
        let providers = config.types().custom_definition_providers();
        let start = Self::chain_start(skip, providers.len())?;
        for (index, provider) in providers.iter().enumerate().skip(start) {
            let marker = ProviderMarker(index);
            if let Some(definition) = provider.provide_custom_schema_definition(ty, self, marker)? {
                debug!(%ty, %marker, "custom definition applies");
                return Ok(Some(definition));
            }
        }
        Ok(None)
    }

    /// First custom definition from the member providers after `skip`,
    /// falling back to the full type chain
    fn custom_member_definition(
        &mut self,
        member: &MemberDescriptor,
        skip: Option<ProviderMarker>,
    ) -> Result<Option<CustomDefinition>> {
        let config = self.config;
        let providers = config.members().custom_definition_providers();
        let start = Self::chain_start(skip, providers.len())?;
        for (index, provider) in providers.iter().enumerate().skip(start) {
            let marker = ProviderMarker(index);
            if let Some(definition) = provider.provide_custom_property_definition(member, self, marker)? {
                debug!(%member, %marker, "custom property definition applies");
                return Ok(Some(definition.with_definition_type(DefinitionType::Inline)));
            }
        }
        self.custom_type_definition(member.ty(), None)
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    pub(crate) fn traverse(&mut self, details: &TypeDetails<'_>, target: Option<NodeId>) -> Result<()> {
        let key = details.key();
        if !details.force_inline && self.contains_definition(&key) {
            debug!(key = %key, "adding reference to existing definition");
            if let Some(target) = target {
                self.add_reference(key, target, details.nullable);
            }
            return Ok(());
        }

        let custom = self.custom_type_definition(&details.ty, details.skip)?;
        let definition;
        let include_type_attributes;
        match custom {
            Some(custom) if custom.is_meant_to_be_inline() || details.force_inline => {
                include_type_attributes = custom.include_attributes;
                definition = match target {
                    Some(target) => {
                        debug!(key = %key, "applying custom inline definition");
                        self.arena.set_all(target, custom.value);
                        target
                    }
                    None => {
                        debug!(key = %key, "storing custom inline definition of the main schema");
                        let node = self.arena.alloc(custom.value);
                        self.put_definition(key, node);
                        node
                    }
                };
                if details.nullable {
                    self.make_nullable(definition);
                }
            }
            custom => {
                let is_container = self.introspector.is_container_type(&details.ty);
                definition = match target {
                    Some(target) if details.force_inline || (is_container && custom.is_none()) => target,
                    _ => {
                        let node = self.arena.alloc_empty();
                        self.put_definition(key.clone(), node);
                        if let Some(target) = target {
                            self.add_reference(key.clone(), target, details.nullable);
                        }
                        node
                    }
                };
                if let Some(custom) = custom {
                    debug!(key = %key, "applying custom definition");
                    if custom.should_never_be_inlined() {
                        self.never_inline.insert(key);
                    }
                    include_type_attributes = custom.include_attributes;
                    self.arena.set_all(definition, custom.value);
                } else if is_container {
                    debug!(key = %key, "generating array definition");
                    self.generate_array_definition(details, definition)?;
                    include_type_attributes = true;
                } else {
                    debug!(key = %key, "generating definition");
                    include_type_attributes = !self.add_subtype_references(&details.ty, definition)?;
                }
            }
        }

        if include_type_attributes {
            let allowed = allowed_schema_types(self.arena.get(definition), self.keyword(SchemaKeyword::Type));
            let attributes = collect_type_attributes(&details.ty, self, &allowed)?;
            self.arena.merge_missing(definition, &attributes);
        }

        let config = self.config;
        let overrides = &config.types().overrides;
        if !overrides.is_empty() {
            let mut content = self.arena.take(definition);
            overrides.apply(&mut content, &details.ty, self);
            self.arena.put(definition, content);
        }
        Ok(())
    }

    /// Replace the definition by references to the declared subtypes.
    ///
    /// Returns `false` (after generating a plain object) if there are none.
    fn add_subtype_references(&mut self, ty: &TypeDescriptor, definition: NodeId) -> Result<bool> {
        let subtypes = self
            .config
            .types()
            .subtypes
            .resolve(ty, self.introspector)
            .unwrap_or_default();
        if subtypes.is_empty() {
            self.generate_object_definition(ty, definition)?;
            return Ok(false);
        }
        let keyword = if subtypes.len() == 1 {
            SchemaKeyword::AllOf
        } else {
            SchemaKeyword::AnyOf
        };
        let mut parts = Vec::with_capacity(subtypes.len());
        for subtype in subtypes {
            let part = self.arena.alloc_empty();
            self.traverse(&TypeDetails::of(subtype), Some(part))?;
            parts.push(SchemaValue::Node(part));
        }
        let keyword = self.keyword(keyword);
        self.arena.insert(definition, keyword, parts);
        Ok(true)
    }

    fn generate_array_definition(&mut self, details: &TypeDetails<'_>, definition: NodeId) -> Result<()> {
        let array = JsonValue::from(self.keyword(SchemaKeyword::TypeArray));
        let type_value = if details.nullable {
            JsonValue::Array(vec![array, JsonValue::from(self.keyword(SchemaKeyword::TypeNull))])
        } else {
            array
        };
        self.arena.insert(definition, self.keyword(SchemaKeyword::Type), type_value);

        let item_type = self.introspector.container_item_type(&details.ty).ok_or_else(|| {
            Error::unsupported_type(details.ty.to_string(), "container without item type")
        })?;
        let items = match details.member.filter(|member| !member.is_container_item()) {
            Some(member) => self.populate_property_schema(&member.as_container_item(item_type))?,
            None => {
                let items = self.arena.alloc_empty();
                self.traverse(&TypeDetails::of(item_type), Some(items))?;
                SchemaValue::Node(items)
            }
        };
        self.arena.insert(definition, self.keyword(SchemaKeyword::Items), items);
        Ok(())
    }

    fn generate_object_definition(&mut self, ty: &TypeDescriptor, definition: NodeId) -> Result<()> {
        let collected = collect_object_properties(ty, self.config, self.introspector)?;
        self.arena.insert(
            definition,
            self.keyword(SchemaKeyword::Type),
            self.keyword(SchemaKeyword::TypeObject),
        );
        if collected.is_empty() {
            return Ok(());
        }

        let mut properties = SchemaObject::new();
        let mut dependent_required = JsonObject::new();
        for member in &collected.properties {
            let name = member.schema_property_name().to_string();
            if let Some(dependents) = self
                .config
                .members()
                .dependent_required
                .resolve(member, self.introspector)
                .filter(|dependents| !dependents.is_empty())
            {
                dependent_required.insert(name.clone(), JsonValue::from(dependents));
            }
            let schema = self.populate_property_schema(member)?;
            properties.insert(name, schema);
        }
        self.arena.insert(
            definition,
            self.keyword(SchemaKeyword::Properties),
            SchemaValue::Map(properties),
        );

        let required = collected.required_names();
        if !required.is_empty() {
            self.arena.insert(
                definition,
                self.keyword(SchemaKeyword::Required),
                JsonValue::from(required),
            );
        }
        if !dependent_required.is_empty() {
            self.arena.insert(
                definition,
                self.keyword(SchemaKeyword::DependentRequired),
                JsonValue::Object(dependent_required),
            );
        }
        Ok(())
    }

    // ========================================================================
    // Member Schemas
    // ========================================================================

    /// Nullability at the member's position, judged on the declared member
    fn is_member_nullable(&self, member: &MemberDescriptor) -> bool {
        if member.is_void() {
            return true;
        }
        if member.is_container_item() {
            return self.config.has_option(GeneratorOption::NullableArrayItemsAllowed)
                && self
                    .config
                    .members()
                    .nullable_items
                    .resolve(member, self.introspector)
                    .unwrap_or(false);
        }
        self.config.is_nullable(member, self.introspector)
    }

    /// Schema of a collected property, offering alternatives for overridden types
    fn populate_property_schema(&mut self, member: &MemberDescriptor) -> Result<SchemaValue> {
        let mut alternatives = self
            .config
            .members()
            .target_type_overrides
            .resolve(member, self.introspector);
        if alternatives.is_none() && !member.is_void() {
            alternatives = self.config.types().subtypes.resolve(member.ty(), self.introspector);
        }
        let options: Vec<MemberDescriptor> = match alternatives {
            Some(types) if !types.is_empty() => types
                .into_iter()
                .map(|ty| member.with_overridden_type(ty))
                .collect(),
            _ => vec![member.clone()],
        };

        let nullable = self.is_member_nullable(member);
        if let [single] = options.as_slice() {
            return self.create_member_schema(single, nullable, false, None);
        }
        let mut any_of = Vec::with_capacity(options.len() + 1);
        if nullable {
            any_of.push(SchemaValue::Json(self.null_schema()));
        }
        for option in &options {
            any_of.push(self.create_member_schema(option, false, false, None)?);
        }
        let node = self.arena.alloc_empty();
        self.arena.insert(node, self.keyword(SchemaKeyword::AnyOf), any_of);
        Ok(SchemaValue::Node(node))
    }

    fn create_member_schema(
        &mut self,
        member: &MemberDescriptor,
        nullable: bool,
        force_inline: bool,
        skip: Option<ProviderMarker>,
    ) -> Result<SchemaValue> {
        if member.is_void() {
            return Ok(SchemaValue::Json(JsonValue::Bool(false)));
        }
        let target = self.arena.alloc_empty();
        let attributes = collect_member_attributes(member, self)?;
        self.populate_member_schema(member, target, nullable, force_inline, attributes, skip)?;
        Ok(SchemaValue::Node(target))
    }

    fn populate_member_schema(
        &mut self,
        member: &MemberDescriptor,
        target: NodeId,
        nullable: bool,
        force_inline: bool,
        attributes: SchemaObject,
        skip: Option<ProviderMarker>,
    ) -> Result<()> {
        let custom = self.custom_member_definition(member, skip)?;
        if let Some(custom) = custom.as_ref().filter(|custom| custom.is_meant_to_be_inline()) {
            self.arena.set_all(target, custom.value.clone());
            if custom.include_attributes {
                merge_missing_attributes(self.arena.get_mut(target), &attributes);
                let allowed = allowed_schema_types(self.arena.get(target), self.keyword(SchemaKeyword::Type));
                let type_attributes = collect_type_attributes(member.ty(), self, &allowed)?;
                self.arena.merge_missing(target, &type_attributes);
            }
            if nullable {
                self.make_nullable(target);
            }
            return Ok(());
        }

        let excludes_attributes = custom.as_ref().is_some_and(|custom| !custom.include_attributes);
        let container = if excludes_attributes || attributes.is_empty() {
            target
        } else if custom.is_none() && self.introspector.is_container_type(member.ty()) {
            self.arena.merge_missing(target, &attributes);
            target
        } else {
            // keeps member attributes apart from a potential "$ref"
            let container = self.arena.alloc_empty();
            let attributes = self.arena.alloc(attributes);
            self.arena.insert(
                target,
                self.keyword(SchemaKeyword::AllOf),
                vec![SchemaValue::Node(container), SchemaValue::Node(attributes)],
            );
            container
        };

        let details = TypeDetails {
            nullable,
            force_inline,
            member: Some(member),
            ..TypeDetails::of(member.ty().clone())
        };
        match self.traverse(&details, Some(container)) {
            Err(e) if e.is_recoverable() => {
                warn!(%member, "Skipping type definition due to error: {e}");
                Ok(())
            }
            other => other,
        }
    }

    // ========================================================================
    // Nullable Wrapping
    // ========================================================================

    /// `{"type": "null"}`
    pub fn null_schema(&self) -> JsonValue {
        let mut schema = JsonObject::new();
        schema.insert(
            self.keyword(SchemaKeyword::Type).to_string(),
            JsonValue::from(self.keyword(SchemaKeyword::TypeNull)),
        );
        JsonValue::Object(schema)
    }

    /// Allow `null` in addition to what the node already accepts.
    ///
    /// Simple nodes get `null` added to their `type`; nodes holding a
    /// reference, composition or fixed values are wrapped in an `anyOf` with
    /// a null branch. Applying this twice changes nothing further.
    pub fn make_nullable(&mut self, node: NodeId) {
        if self.is_nullable_wrapper(node) {
            return;
        }
        let type_keyword = self.keyword(SchemaKeyword::Type);
        let null = self.keyword(SchemaKeyword::TypeNull);
        let content = self.arena.get(node);
        let wrap = self.config.has_option(GeneratorOption::NullableAlwaysAsAnyOf)
            || WRAPPING_KEYWORDS
                .iter()
                .any(|keyword| content.contains_key(self.keyword(*keyword)));
        if wrap {
            let original = self.arena.take(node);
            let copy = self.arena.alloc(original);
            let branches = vec![SchemaValue::Json(self.null_schema()), SchemaValue::Node(copy)];
            self.arena.insert(node, self.keyword(SchemaKeyword::AnyOf), branches);
            return;
        }
        let widened = match content.get(type_keyword).and_then(SchemaValue::as_json) {
            Some(JsonValue::Array(types)) if !types.iter().any(|t| t.as_str() == Some(null)) => {
                let mut types = types.clone();
                types.push(JsonValue::from(null));
                Some(JsonValue::Array(types))
            }
            Some(JsonValue::String(single)) if single != null => {
                Some(JsonValue::Array(vec![JsonValue::from(single.as_str()), JsonValue::from(null)]))
            }
            // no "type" at all already admits null
            _ => None,
        };
        if let Some(widened) = widened {
            self.arena.insert(node, type_keyword, widened);
        }
    }

    /// Whether the node is exactly an `anyOf` that already has a null branch
    fn is_nullable_wrapper(&self, node: NodeId) -> bool {
        let content = self.arena.get(node);
        if content.len() != 1 {
            return false;
        }
        let Some(SchemaValue::Array(branches)) = content.get(self.keyword(SchemaKeyword::AnyOf)) else {
            return false;
        };
        let null_schema = self.null_schema();
        let null_object = object_from_json(null_schema.clone());
        branches.iter().any(|branch| match branch {
            SchemaValue::Json(json) => *json == null_schema,
            SchemaValue::Node(id) => *self.arena.get(*id) == null_object,
            _ => false,
        })
    }
}
