//! Property collection across a type hierarchy

use crate::config::{GeneratorOption, SchemaGeneratorConfig};
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::error::Result;
use crate::introspect::TypeIntrospector;
use crate::members::types::CollectedProperties;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, warn};

/// The type followed by all its supertypes, depth-first, each listed once
pub fn type_hierarchy(
    ty: &TypeDescriptor,
    introspector: &dyn TypeIntrospector,
) -> Result<Vec<TypeDescriptor>> {
    let mut hierarchy = Vec::new();
    let mut seen = HashSet::new();
    let mut pending = vec![ty.clone()];
    while let Some(current) = pending.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        let supertypes = if current == *ty {
            introspector.supertypes(&current)?
        } else {
            match introspector.supertypes(&current) {
                Ok(supertypes) => supertypes,
                Err(e) if e.is_recoverable() => {
                    warn!(supertype = %current, "Skipping supertype: {e}");
                    continue;
                }
                Err(e) => return Err(e),
            }
        };
        hierarchy.push(current);
        // reversed so that the first declared supertype is visited first
        pending.extend(supertypes.into_iter().rev());
    }
    Ok(hierarchy)
}

/// Collect the properties of an object type.
///
/// Instance fields of every hierarchy level come first, then instance
/// methods, then (when enabled) static members level by level. A member whose
/// schema-visible name was already collected is dropped, so subtype members
/// override inherited ones. The required check runs before that drop.
pub fn collect_object_properties(
    ty: &TypeDescriptor,
    config: &SchemaGeneratorConfig,
    introspector: &dyn TypeIntrospector,
) -> Result<CollectedProperties> {
    debug!(%ty, "collecting fields and methods");
    let levels = type_hierarchy(ty, introspector)?
        .iter()
        .map(|level| introspector.declared_members(level))
        .collect::<Result<Vec<_>>>()?;

    let mut collector = PropertyCollector::new(config, introspector);
    for member in levels.iter().flatten().filter(|m| m.is_field() && !m.is_static()) {
        collector.collect(member);
    }
    for member in levels.iter().flatten().filter(|m| m.is_method() && !m.is_static()) {
        collector.collect(member);
    }

    let static_fields = config.has_option(GeneratorOption::StaticFields);
    let static_methods = config.has_option(GeneratorOption::StaticMethods);
    if static_fields || static_methods {
        for members in &levels {
            let statics = members.iter().filter(|m| m.is_static());
            for member in statics.clone().filter(|m| static_fields && m.is_field()) {
                collector.collect(member);
            }
            for member in statics.filter(|m| static_methods && m.is_method()) {
                collector.collect(member);
            }
        }
    }

    Ok(collector.finish())
}

struct PropertyCollector<'a> {
    config: &'a SchemaGeneratorConfig,
    introspector: &'a dyn TypeIntrospector,
    collected: IndexMap<String, MemberDescriptor>,
    required: HashSet<String>,
}

impl<'a> PropertyCollector<'a> {
    fn new(config: &'a SchemaGeneratorConfig, introspector: &'a dyn TypeIntrospector) -> Self {
        Self {
            config,
            introspector,
            collected: IndexMap::new(),
            required: HashSet::new(),
        }
    }

    fn collect(&mut self, member: &MemberDescriptor) {
        let members = self.config.members();
        if members.ignore.any(member, self.introspector) {
            return;
        }
        let renamed = match members.property_name.resolve(member, self.introspector) {
            Some(name) => member.with_overridden_name(name),
            None => member.clone(),
        };
        let name = renamed.schema_property_name().to_string();
        if members.required.any(member, self.introspector) {
            self.required.insert(name.clone());
        }
        if self.collected.contains_key(&name) {
            debug!(member = %member, "ignoring overridden member");
            return;
        }
        self.collected.insert(name, renamed);
    }

    fn finish(self) -> CollectedProperties {
        let config = self.config;
        let mut properties: Vec<MemberDescriptor> = self.collected.into_values().collect();
        properties.sort_by(|a, b| config.sort_properties(a, b));
        CollectedProperties {
            properties,
            required: self.required,
        }
    }
}
