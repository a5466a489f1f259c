//! Declarative markers
//!
//! Type graph documents attach markers (`title`, `min_length`, `required`, ...)
//! to members and types. `AnnotationModule` answers the matching resolvers from
//! those markers. Member markers describe the member itself, so container item
//! scopes only see `nullable_items`.

use crate::config::{ConfigPart, Module, SchemaGeneratorConfigBuilder};
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::introspect::TypeIntrospector;
use crate::types::JsonValue;
use serde_json::Number;
use tracing::warn;

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const DEFAULT: &str = "default";
pub const ENUM: &str = "enum";
pub const MIN_LENGTH: &str = "min_length";
pub const MAX_LENGTH: &str = "max_length";
pub const FORMAT: &str = "format";
pub const PATTERN: &str = "pattern";
pub const MINIMUM: &str = "minimum";
pub const EXCLUSIVE_MINIMUM: &str = "exclusive_minimum";
pub const MAXIMUM: &str = "maximum";
pub const EXCLUSIVE_MAXIMUM: &str = "exclusive_maximum";
pub const MULTIPLE_OF: &str = "multiple_of";
pub const MIN_ITEMS: &str = "min_items";
pub const MAX_ITEMS: &str = "max_items";
pub const UNIQUE_ITEMS: &str = "unique_items";
pub const REQUIRED: &str = "required";
pub const NULLABLE: &str = "nullable";
pub const NULLABLE_ITEMS: &str = "nullable_items";
pub const IGNORE: &str = "ignore";
pub const READ_ONLY: &str = "read_only";
pub const WRITE_ONLY: &str = "write_only";
pub const RENAME: &str = "rename";
pub const DEPENDENT_REQUIRED: &str = "dependent_required";
pub const SUBTYPES: &str = "subtypes";
pub const ID: &str = "id";
pub const ANCHOR: &str = "anchor";

type Lookup<S> = fn(&S, &dyn TypeIntrospector, &str) -> Option<JsonValue>;

/// Resolves attributes from member and type markers
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationModule;

impl AnnotationModule {
    pub fn new() -> Self {
        Self
    }
}

fn member_marker(member: &MemberDescriptor, _: &dyn TypeIntrospector, key: &str) -> Option<JsonValue> {
    if member.is_container_item() {
        return None;
    }
    member.annotation(key).cloned()
}

fn type_marker(ty: &TypeDescriptor, introspector: &dyn TypeIntrospector, key: &str) -> Option<JsonValue> {
    introspector.type_annotations(ty)?.get(key).cloned()
}

fn flag(value: Option<JsonValue>) -> bool {
    value.and_then(|v| v.as_bool()).unwrap_or(false)
}

fn strings(value: JsonValue) -> Option<Vec<String>> {
    match value {
        JsonValue::Array(items) => items
            .into_iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        JsonValue::String(single) => Some(vec![single]),
        _ => None,
    }
}

// ============================================================================
// Typed Hooks
// ============================================================================

fn text<S: 'static>(lookup: Lookup<S>, key: &'static str) -> impl Fn(&S, &dyn TypeIntrospector) -> Option<String> {
    move |scope: &S, introspector: &dyn TypeIntrospector| {
        lookup(scope, introspector, key)?.as_str().map(str::to_string)
    }
}

fn count<S: 'static>(lookup: Lookup<S>, key: &'static str) -> impl Fn(&S, &dyn TypeIntrospector) -> Option<u64> {
    move |scope: &S, introspector: &dyn TypeIntrospector| lookup(scope, introspector, key)?.as_u64()
}

fn number<S: 'static>(lookup: Lookup<S>, key: &'static str) -> impl Fn(&S, &dyn TypeIntrospector) -> Option<Number> {
    move |scope: &S, introspector: &dyn TypeIntrospector| match lookup(scope, introspector, key)? {
        JsonValue::Number(number) => Some(number),
        _ => None,
    }
}

fn boolean<S: 'static>(lookup: Lookup<S>, key: &'static str) -> impl Fn(&S, &dyn TypeIntrospector) -> Option<bool> {
    move |scope: &S, introspector: &dyn TypeIntrospector| lookup(scope, introspector, key)?.as_bool()
}

fn raw<S: 'static>(lookup: Lookup<S>, key: &'static str) -> impl Fn(&S, &dyn TypeIntrospector) -> Option<JsonValue> {
    move |scope: &S, introspector: &dyn TypeIntrospector| lookup(scope, introspector, key)
}

fn values<S: 'static>(
    lookup: Lookup<S>,
    key: &'static str,
) -> impl Fn(&S, &dyn TypeIntrospector) -> Option<Vec<JsonValue>> {
    move |scope: &S, introspector: &dyn TypeIntrospector| match lookup(scope, introspector, key)? {
        JsonValue::Array(values) => Some(values),
        _ => None,
    }
}

/// Hooks shared by the member and the type scope
fn install_part<S: 'static>(part: &mut ConfigPart<S>, lookup: Lookup<S>) {
    part.title.add(text(lookup, TITLE));
    part.description.add(text(lookup, DESCRIPTION));
    part.default.add(raw(lookup, DEFAULT));
    part.enum_values.add(values(lookup, ENUM));
    part.min_length.add(count(lookup, MIN_LENGTH));
    part.max_length.add(count(lookup, MAX_LENGTH));
    part.format.add(text(lookup, FORMAT));
    part.pattern.add(text(lookup, PATTERN));
    part.minimum.add(number(lookup, MINIMUM));
    part.exclusive_minimum.add(number(lookup, EXCLUSIVE_MINIMUM));
    part.maximum.add(number(lookup, MAXIMUM));
    part.exclusive_maximum.add(number(lookup, EXCLUSIVE_MAXIMUM));
    part.multiple_of.add(number(lookup, MULTIPLE_OF));
    part.min_items.add(count(lookup, MIN_ITEMS));
    part.max_items.add(count(lookup, MAX_ITEMS));
    part.unique_items.add(boolean(lookup, UNIQUE_ITEMS));
}

impl Module for AnnotationModule {
    fn apply_to_config(&self, builder: &mut SchemaGeneratorConfigBuilder) {
        let members = builder.members_mut();
        install_part(&mut members.attributes, member_marker);
        members
            .ignore
            .add(|member, introspector| flag(member_marker(member, introspector, IGNORE)));
        members
            .required
            .add(|member, introspector| flag(member_marker(member, introspector, REQUIRED)));
        members
            .read_only
            .add(|member, introspector| flag(member_marker(member, introspector, READ_ONLY)));
        members
            .write_only
            .add(|member, introspector| flag(member_marker(member, introspector, WRITE_ONLY)));
        members.nullable.add(boolean(member_marker, NULLABLE));
        members.nullable_items.add(|member, _| {
            member
                .annotation(NULLABLE_ITEMS)
                .and_then(JsonValue::as_bool)
        });
        members.property_name.add(text(member_marker, RENAME));
        members.dependent_required.add(|member, introspector| {
            member_marker(member, introspector, DEPENDENT_REQUIRED).and_then(strings)
        });

        let types = builder.types_mut();
        install_part(&mut types.attributes, type_marker);
        types.id.add(text(type_marker, ID));
        types.anchor.add(text(type_marker, ANCHOR));
        types.subtypes.add(|ty, introspector| {
            let names = type_marker(ty, introspector, SUBTYPES).and_then(strings)?;
            let subtypes = names
                .iter()
                .filter_map(|name| match name.parse::<TypeDescriptor>() {
                    Ok(subtype) => Some(subtype),
                    Err(e) => {
                        warn!(%ty, "Ignoring subtype marker: {e}");
                        None
                    }
                })
                .collect();
            Some(subtypes)
        });
    }
}
