//! Member descriptors
//!
//! Fields and accessor methods of a type, as seen by the generator.

use crate::descriptor::types::TypeDescriptor;
use crate::types::{AnnotationMap, JsonValue};
use once_cell::unsync::OnceCell;
use std::fmt;

/// Whether a member is field-like or accessor-like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKind {
    Field,
    Method,
}

/// A single declared member.
///
/// Renaming and type overriding return new descriptors; the original value is
/// never mutated.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    kind: MemberKind,
    declared_name: String,
    declared_type: TypeDescriptor,
    declaring_type: TypeDescriptor,
    is_static: bool,
    annotations: AnnotationMap,
    name_override: Option<String>,
    type_override: Option<TypeDescriptor>,
    container_item: bool,
    /// Memoized schema property name. `unsync` cell: a descriptor is never
    /// shared across threads while generating.
    property_name: OnceCell<String>,
}

impl MemberDescriptor {
    /// Create a field member
    pub fn field(
        name: impl Into<String>,
        declared_type: TypeDescriptor,
        declaring_type: TypeDescriptor,
    ) -> Self {
        Self::new(MemberKind::Field, name.into(), declared_type, declaring_type)
    }

    /// Create a method member; pass [`TypeDescriptor::void`] for methods without result
    pub fn method(
        name: impl Into<String>,
        return_type: TypeDescriptor,
        declaring_type: TypeDescriptor,
    ) -> Self {
        Self::new(MemberKind::Method, name.into(), return_type, declaring_type)
    }

    fn new(
        kind: MemberKind,
        declared_name: String,
        declared_type: TypeDescriptor,
        declaring_type: TypeDescriptor,
    ) -> Self {
        Self {
            kind,
            declared_name,
            declared_type,
            declaring_type,
            is_static: false,
            annotations: AnnotationMap::new(),
            name_override: None,
            type_override: None,
            container_item: false,
            property_name: OnceCell::new(),
        }
    }

    /// Mark the member as static
    #[must_use]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Attach a marker
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }

    /// Attach several markers
    #[must_use]
    pub fn with_annotations(mut self, annotations: AnnotationMap) -> Self {
        self.annotations.extend(annotations);
        self
    }

    /// Copy of this member under a different schema-visible name
    pub fn with_overridden_name(&self, name: impl Into<String>) -> Self {
        Self {
            name_override: Some(name.into()),
            property_name: OnceCell::new(),
            ..self.clone()
        }
    }

    /// Copy of this member with a different associated type
    pub fn with_overridden_type(&self, ty: TypeDescriptor) -> Self {
        Self {
            type_override: Some(ty),
            ..self.clone()
        }
    }

    /// Stand-in for the items of this (container-typed) member.
    ///
    /// Keeps name, markers and declaring type; the effective type becomes the
    /// item type.
    pub fn as_container_item(&self, item_type: TypeDescriptor) -> Self {
        Self {
            type_override: Some(item_type),
            container_item: true,
            ..self.clone()
        }
    }

    /// Whether this describes the items of a container member
    pub fn is_container_item(&self) -> bool {
        self.container_item
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn is_field(&self) -> bool {
        self.kind == MemberKind::Field
    }

    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    /// Declared type, ignoring any override
    pub fn declared_type(&self) -> &TypeDescriptor {
        &self.declared_type
    }

    /// Effective type: the override if present, else the declared type
    pub fn ty(&self) -> &TypeDescriptor {
        self.type_override.as_ref().unwrap_or(&self.declared_type)
    }

    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.declaring_type
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether this is a method without result
    pub fn is_void(&self) -> bool {
        self.is_method() && self.declared_type.is_void()
    }

    pub fn overridden_name(&self) -> Option<&str> {
        self.name_override.as_deref()
    }

    pub fn overridden_type(&self) -> Option<&TypeDescriptor> {
        self.type_override.as_ref()
    }

    pub fn annotations(&self) -> &AnnotationMap {
        &self.annotations
    }

    /// Look up a single marker
    pub fn annotation(&self, key: &str) -> Option<&JsonValue> {
        self.annotations.get(key)
    }

    /// Key under which this member appears in `properties`.
    ///
    /// Methods get a `()` suffix unless they were renamed.
    pub fn schema_property_name(&self) -> &str {
        self.property_name.get_or_init(|| match &self.name_override {
            Some(name) => name.clone(),
            None if self.is_method() => format!("{}()", self.declared_name),
            None => self.declared_name.clone(),
        })
    }
}

impl PartialEq for MemberDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.declared_name == other.declared_name
            && self.declared_type == other.declared_type
            && self.declaring_type == other.declaring_type
            && self.is_static == other.is_static
            && self.annotations == other.annotations
            && self.name_override == other.name_override
            && self.type_override == other.type_override
            && self.container_item == other.container_item
    }
}

impl fmt::Display for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.declared_name)?;
        if self.is_method() {
            f.write_str("()")?;
        }
        Ok(())
    }
}
