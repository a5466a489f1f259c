//! Attribute collection
//!
//! Turns the resolver answers for one member or type into a flat schema
//! fragment. Keys are written in a fixed order so output is stable.

use crate::config::{AdditionalProperties, ConfigFunction, ConfigPart};
use crate::context::GenerationContext;
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::error::Result;
use crate::keyword::{SchemaKeyword, SchemaType};
use crate::node::{SchemaObject, SchemaValue};
use crate::types::JsonValue;
use serde_json::Number;
use std::collections::HashSet;
use tracing::warn;

/// Name of the root type that puts no constraint on additional properties
const UNCONSTRAINED_TYPE_NAME: &str = "Object";

/// Attributes of a member, including member-level overrides
pub fn collect_member_attributes(
    member: &MemberDescriptor,
    context: &mut GenerationContext<'_>,
) -> Result<SchemaObject> {
    let config = context.config();
    let introspector = context.introspector();
    let members = config.members();

    let mut collector = Collector::new(&members.attributes, member, context);
    collector.documentation();
    collector.enumeration();
    if members.read_only.any(member, introspector) {
        collector.set(SchemaKeyword::ReadOnly, JsonValue::Bool(true));
    }
    if members.write_only.any(member, introspector) {
        collector.set(SchemaKeyword::WriteOnly, JsonValue::Bool(true));
    }
    collector.object_constraints()?;
    collector.string_constraints();
    collector.numeric_constraints();
    collector.array_constraints();
    let mut node = collector.finish();

    members.overrides.apply(&mut node, member, context);
    Ok(node)
}

/// Attributes of a type.
///
/// Constraint groups are only written when `allowed_types` is empty or
/// contains a type the group applies to.
pub fn collect_type_attributes(
    ty: &TypeDescriptor,
    context: &mut GenerationContext<'_>,
    allowed_types: &HashSet<String>,
) -> Result<SchemaObject> {
    let config = context.config();
    let introspector = context.introspector();
    let types = config.types();
    let allows = |group: &[SchemaType]| {
        allowed_types.is_empty() || group.iter().any(|t| allowed_types.contains(t.as_str()))
    };

    let id = types.id.resolve(ty, introspector);
    let anchor = types.anchor.resolve(ty, introspector);
    let mut collector = Collector::new(&types.attributes, ty, context);
    if let Some(id) = id {
        collector.set(SchemaKeyword::Id, JsonValue::String(id));
    }
    if let Some(anchor) = anchor {
        collector.set(SchemaKeyword::Anchor, JsonValue::String(anchor));
    }
    collector.documentation();
    collector.enumeration();
    if allows(&[SchemaType::Object]) {
        collector.object_constraints()?;
    }
    if allows(&[SchemaType::String]) {
        collector.string_constraints();
    }
    if allows(&[SchemaType::Integer, SchemaType::Number]) {
        collector.numeric_constraints();
    }
    if allows(&[SchemaType::Array]) {
        collector.array_constraints();
    }
    Ok(collector.finish())
}

/// Copy attributes whose keys the target does not have yet
pub fn merge_missing_attributes(target: &mut SchemaObject, attributes: &SchemaObject) {
    for (key, value) in attributes {
        if !target.contains_key(key) {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Values of the `type` keyword in a fragment
pub fn allowed_schema_types(node: &SchemaObject, type_keyword: &str) -> HashSet<String> {
    match node.get(type_keyword).and_then(SchemaValue::as_json) {
        Some(JsonValue::String(single)) => HashSet::from([single.clone()]),
        Some(JsonValue::Array(types)) => types
            .iter()
            .filter_map(JsonValue::as_str)
            .map(str::to_string)
            .collect(),
        _ => HashSet::new(),
    }
}

// ============================================================================
// Collector
// ============================================================================

struct Collector<'p, 'c, 'a, S> {
    part: &'p ConfigPart<S>,
    scope: &'p S,
    context: &'c mut GenerationContext<'a>,
    node: SchemaObject,
}

impl<'p, 'c, 'a, S> Collector<'p, 'c, 'a, S> {
    fn new(part: &'p ConfigPart<S>, scope: &'p S, context: &'c mut GenerationContext<'a>) -> Self {
        Self {
            part,
            scope,
            context,
            node: SchemaObject::new(),
        }
    }

    fn finish(self) -> SchemaObject {
        self.node
    }

    fn set(&mut self, keyword: SchemaKeyword, value: impl Into<SchemaValue>) {
        let key = self.context.keyword(keyword);
        self.node.insert(key.to_string(), value.into());
    }

    fn resolve<R>(&self, function: &ConfigFunction<S, R>) -> Option<R> {
        function.resolve(self.scope, self.context.introspector())
    }

    fn text(&mut self, keyword: SchemaKeyword, function: &ConfigFunction<S, String>) {
        if let Some(value) = self.resolve(function) {
            self.set(keyword, JsonValue::String(value));
        }
    }

    fn count(&mut self, keyword: SchemaKeyword, function: &ConfigFunction<S, u64>) {
        if let Some(value) = self.resolve(function) {
            self.set(keyword, JsonValue::from(value));
        }
    }

    fn number(&mut self, keyword: SchemaKeyword, function: &ConfigFunction<S, Number>) {
        if let Some(value) = self.resolve(function) {
            self.set(keyword, JsonValue::Number(value));
        }
    }

    fn documentation(&mut self) {
        let part = self.part;
        self.text(SchemaKeyword::Title, &part.title);
        self.text(SchemaKeyword::Description, &part.description);
        if let Some(default) = self.resolve(&part.default) {
            self.set(SchemaKeyword::Default, default);
        }
    }

    /// `const` for a single allowed value, `enum` otherwise
    fn enumeration(&mut self) {
        let Some(values) = self.resolve(&self.part.enum_values) else {
            return;
        };
        let mut distinct: Vec<JsonValue> = Vec::with_capacity(values.len());
        for value in values {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        if distinct.len() == 1 && self.context.config().single_value_as_const() {
            let single = distinct.remove(0);
            self.set(SchemaKeyword::Const, single);
        } else if !distinct.is_empty() {
            self.set(SchemaKeyword::Enum, JsonValue::Array(distinct));
        }
    }

    fn object_constraints(&mut self) -> Result<()> {
        let part = self.part;
        match self.resolve(&part.additional_properties) {
            Some(AdditionalProperties::Forbidden) => {
                self.set(SchemaKeyword::AdditionalProperties, JsonValue::Bool(false));
            }
            Some(AdditionalProperties::Schema(ty)) if ty.name() != UNCONSTRAINED_TYPE_NAME => {
                if let Some(reference) = self.reference_to(&ty)? {
                    self.set(SchemaKeyword::AdditionalProperties, reference);
                }
            }
            _ => {}
        }
        if let Some(patterns) = self.resolve(&part.pattern_properties) {
            let mut properties = SchemaObject::new();
            for (pattern, ty) in patterns {
                if let Some(reference) = self.reference_to(&ty)? {
                    properties.insert(pattern, SchemaValue::Node(reference));
                }
            }
            if !properties.is_empty() {
                self.set(SchemaKeyword::PatternProperties, SchemaValue::Map(properties));
            }
        }
        Ok(())
    }

    fn reference_to(&mut self, ty: &TypeDescriptor) -> Result<Option<crate::node::NodeId>> {
        match self.context.create_definition_reference(ty) {
            Ok(reference) => Ok(Some(reference)),
            Err(e) if e.is_recoverable() => {
                warn!(%ty, "Skipping attribute schema: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn string_constraints(&mut self) {
        let part = self.part;
        self.count(SchemaKeyword::LengthMin, &part.min_length);
        self.count(SchemaKeyword::LengthMax, &part.max_length);
        self.text(SchemaKeyword::Format, &part.format);
        self.text(SchemaKeyword::Pattern, &part.pattern);
    }

    fn numeric_constraints(&mut self) {
        let part = self.part;
        self.number(SchemaKeyword::Minimum, &part.minimum);
        self.number(SchemaKeyword::MinimumExclusive, &part.exclusive_minimum);
        self.number(SchemaKeyword::Maximum, &part.maximum);
        self.number(SchemaKeyword::MaximumExclusive, &part.exclusive_maximum);
        self.number(SchemaKeyword::MultipleOf, &part.multiple_of);
    }

    fn array_constraints(&mut self) {
        let part = self.part;
        self.count(SchemaKeyword::ItemsMin, &part.min_items);
        self.count(SchemaKeyword::ItemsMax, &part.max_items);
        if let Some(unique) = self.resolve(&part.unique_items) {
            self.set(SchemaKeyword::ItemsUnique, JsonValue::Bool(unique));
        }
    }
}
