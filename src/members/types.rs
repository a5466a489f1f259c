//! Member collection result

use crate::descriptor::MemberDescriptor;
use std::collections::HashSet;

/// Properties of one object type, ready for schema population
#[derive(Debug, Clone, Default)]
pub struct CollectedProperties {
    /// Surviving members in final property order, names already overridden
    pub properties: Vec<MemberDescriptor>,
    /// Schema-visible names marked as required
    pub required: HashSet<String>,
}

impl CollectedProperties {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Required names in property order; names without a surviving property are dropped
    pub fn required_names(&self) -> Vec<&str> {
        self.properties
            .iter()
            .map(MemberDescriptor::schema_property_name)
            .filter(|name| self.required.contains(*name))
            .collect()
    }
}
