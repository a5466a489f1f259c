//! YAML parser for type graph documents
//!
//! Parses and validates type graph YAML files.

use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::introspect::types::{MemberDefinition, TypeDefinition, TypeGraphDocument, TypeKind};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a type graph document from a file path
pub fn load_type_graph(path: impl AsRef<Path>) -> Result<TypeGraphDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read type graph file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_type_graph_from_str(&content)
}

/// Load a type graph document from a YAML string
pub fn load_type_graph_from_str(yaml: &str) -> Result<TypeGraphDocument> {
    let doc: TypeGraphDocument = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse type graph YAML: {e}")))?;

    validate_document(&doc)?;
    Ok(doc)
}

/// Validate a type graph document
fn validate_document(doc: &TypeGraphDocument) -> Result<()> {
    doc.settings.validate()?;

    let names: HashSet<_> = doc.types.iter().map(|t| t.name.as_str()).collect();
    if names.len() != doc.types.len() {
        return Err(Error::config("Duplicate type names found"));
    }

    for def in &doc.types {
        validate_type(def)?;
    }

    if let Some(root) = &doc.root {
        root.parse::<TypeDescriptor>()
            .map_err(|e| Error::config(format!("Invalid root type: {e}")))?;
    }

    Ok(())
}

/// Validate a single type definition
fn validate_type(def: &TypeDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Type name cannot be empty"));
    }

    match def.kind {
        TypeKind::Enum if def.constants.is_empty() => {
            return Err(Error::config(format!(
                "Enum type '{}' must declare at least one constant",
                def.name
            )));
        }
        TypeKind::Container if def.type_params.len() != 1 => {
            return Err(Error::config(format!(
                "Container type '{}' must declare exactly one type parameter",
                def.name
            )));
        }
        TypeKind::Map if def.type_params.len() != 2 => {
            return Err(Error::config(format!(
                "Map type '{}' must declare exactly two type parameters",
                def.name
            )));
        }
        _ => {}
    }

    for supertype in &def.supertypes {
        supertype.parse::<TypeDescriptor>().map_err(|e| {
            Error::config(format!("Type '{}' has invalid supertype: {e}", def.name))
        })?;
    }

    validate_members(def, &def.fields)?;
    validate_members(def, &def.methods)?;

    Ok(())
}

/// Validate one member list of a type
fn validate_members(owner: &TypeDefinition, members: &[MemberDefinition]) -> Result<()> {
    let mut seen = HashSet::new();
    for member in members {
        validate_member(owner, member)?;
        if !seen.insert(member.name.as_str()) {
            return Err(Error::config(format!(
                "Type '{}' declares member '{}' twice",
                owner.name, member.name
            )));
        }
    }
    Ok(())
}

/// Validate a member definition
fn validate_member(owner: &TypeDefinition, member: &MemberDefinition) -> Result<()> {
    if member.name.is_empty() {
        return Err(Error::config(format!(
            "Type '{}' has a member without name",
            owner.name
        )));
    }

    member.ty.parse::<TypeDescriptor>().map_err(|e| {
        Error::config(format!(
            "Member '{}.{}' has invalid type: {e}",
            owner.name, member.name
        ))
    })?;

    Ok(())
}
