//! Type introspection
//!
//! The `TypeIntrospector` trait is the only way the generator learns about
//! the host type graph. `TypeRegistry` implements it over declared types.

use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::error::{Error, Result};
use crate::introspect::types::{MemberDefinition, TypeDefinition, TypeGraphDocument, TypeKind};
use crate::types::AnnotationMap;
use std::collections::HashMap;

/// Fallback item and value type of raw containers and maps
const OBJECT_TYPE_NAME: &str = "Object";

/// Structural lookups on the host type graph
pub trait TypeIntrospector {
    /// Declared fields (first) and methods of a type, with generic bindings applied.
    ///
    /// Fails with `UnsupportedType` for unknown types and unbound variables.
    fn declared_members(&self, ty: &TypeDescriptor) -> Result<Vec<MemberDescriptor>>;

    /// Direct supertypes, with generic bindings applied
    fn supertypes(&self, ty: &TypeDescriptor) -> Result<Vec<TypeDescriptor>>;

    /// Item type if `ty` is an array or collection
    fn container_item_type(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor>;

    /// Value type if `ty` is a key/value map
    fn map_value_type(&self, _ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        None
    }

    /// Constant names if `ty` is an enumeration
    fn enum_constants(&self, _ty: &TypeDescriptor) -> Option<Vec<String>> {
        None
    }

    /// Type-level markers
    fn type_annotations(&self, _ty: &TypeDescriptor) -> Option<&AnnotationMap> {
        None
    }

    fn is_container_type(&self, ty: &TypeDescriptor) -> bool {
        self.container_item_type(ty).is_some()
    }

    /// Short human-readable name, used for definition keys
    fn simple_type_description(&self, ty: &TypeDescriptor) -> String {
        ty.simple_description()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// In-memory type graph
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDefinition>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Registry with the built-in `List`, `Set`, `Collection` and `Map` types
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for name in ["List", "Set", "Collection"] {
            registry.insert(TypeDefinition::container(name, "E"));
        }
        registry.insert(TypeDefinition::map("Map", "K", "V"));
        registry
    }

    /// Registry without any built-in type
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Build a registry from a parsed document
    pub fn from_document(doc: &TypeGraphDocument) -> Result<Self> {
        let mut registry = Self::new();
        for def in &doc.types {
            registry.register(def.clone())?;
        }
        Ok(registry)
    }

    /// Add a type, checking that all its type expressions parse
    pub fn register(&mut self, def: TypeDefinition) -> Result<()> {
        for expr in def
            .supertypes
            .iter()
            .chain(def.fields.iter().chain(&def.methods).map(|m| &m.ty))
        {
            expr.parse::<TypeDescriptor>()?;
        }
        self.insert(def);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_type(mut self, def: TypeDefinition) -> Result<Self> {
        self.register(def)?;
        Ok(self)
    }

    fn insert(&mut self, def: TypeDefinition) {
        self.types.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Definition of a named type plus its parameter bindings
    fn resolve(&self, ty: &TypeDescriptor) -> Result<(&TypeDefinition, Vec<(String, TypeDescriptor)>)> {
        let (name, args) = match ty {
            TypeDescriptor::Named { name, args } => (name, args),
            TypeDescriptor::Variable(name) => {
                return Err(Error::unsupported_type(name, "unbound type variable"));
            }
            TypeDescriptor::Array(_) => {
                return Err(Error::unsupported_type(
                    ty.to_string(),
                    "arrays have no declared members",
                ));
            }
        };
        let def = self
            .types
            .get(name)
            .ok_or_else(|| Error::unsupported_type(ty.to_string(), "type is not registered"))?;
        if !args.is_empty() && args.len() != def.type_params.len() {
            return Err(Error::unsupported_type(
                ty.to_string(),
                format!(
                    "expected {} type arguments, got {}",
                    def.type_params.len(),
                    args.len()
                ),
            ));
        }
        let bindings = def
            .type_params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let bound = args
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| TypeDescriptor::variable(param.clone()));
                (param.clone(), bound)
            })
            .collect();
        Ok((def, bindings))
    }

    fn bound_type(expr: &str, bindings: &[(String, TypeDescriptor)]) -> Result<TypeDescriptor> {
        Ok(expr.parse::<TypeDescriptor>()?.substitute(bindings))
    }

    fn member(
        def: &MemberDefinition,
        ty: TypeDescriptor,
        declaring: &TypeDescriptor,
        is_method: bool,
    ) -> MemberDescriptor {
        let member = if is_method {
            MemberDescriptor::method(def.name.clone(), ty, declaring.clone())
        } else {
            MemberDescriptor::field(def.name.clone(), ty, declaring.clone())
        };
        member
            .with_static(def.is_static)
            .with_annotations(def.annotations.clone())
    }

    /// Argument at `index` of a registered generic, or `Object` when used raw
    fn type_argument(&self, ty: &TypeDescriptor, kind: TypeKind, index: usize) -> Option<TypeDescriptor> {
        let TypeDescriptor::Named { name, args } = ty else {
            return None;
        };
        let def = self.types.get(name)?;
        if def.kind != kind {
            return None;
        }
        Some(
            args.get(index)
                .cloned()
                .unwrap_or_else(|| TypeDescriptor::named(OBJECT_TYPE_NAME)),
        )
    }
}

impl TypeIntrospector for TypeRegistry {
    fn declared_members(&self, ty: &TypeDescriptor) -> Result<Vec<MemberDescriptor>> {
        let (def, bindings) = self.resolve(ty)?;
        let mut members = Vec::with_capacity(def.fields.len() + def.methods.len());
        for field in &def.fields {
            let field_type = Self::bound_type(&field.ty, &bindings)?;
            members.push(Self::member(field, field_type, ty, false));
        }
        for method in &def.methods {
            let return_type = Self::bound_type(&method.ty, &bindings)?;
            members.push(Self::member(method, return_type, ty, true));
        }
        Ok(members)
    }

    fn supertypes(&self, ty: &TypeDescriptor) -> Result<Vec<TypeDescriptor>> {
        let (def, bindings) = self.resolve(ty)?;
        def.supertypes
            .iter()
            .map(|expr| Self::bound_type(expr, &bindings))
            .collect()
    }

    fn container_item_type(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        match ty {
            TypeDescriptor::Array(element) => Some(element.as_ref().clone()),
            _ => self.type_argument(ty, TypeKind::Container, 0),
        }
    }

    fn map_value_type(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        self.type_argument(ty, TypeKind::Map, 1)
    }

    fn enum_constants(&self, ty: &TypeDescriptor) -> Option<Vec<String>> {
        match ty {
            TypeDescriptor::Named { name, .. } => self
                .types
                .get(name)
                .filter(|def| def.kind == TypeKind::Enum)
                .map(|def| def.constants.clone()),
            _ => None,
        }
    }

    fn type_annotations(&self, ty: &TypeDescriptor) -> Option<&AnnotationMap> {
        match ty {
            TypeDescriptor::Named { name, .. } => self.types.get(name).map(|def| &def.annotations),
            _ => None,
        }
    }
}
