//! Method exclusion

use crate::config::{Module, SchemaGeneratorConfigBuilder};
use crate::descriptor::MemberDescriptor;

/// Ignores every method matching a predicate
#[derive(Debug, Clone, Copy)]
pub struct MethodExclusionModule {
    excluded: fn(&MemberDescriptor) -> bool,
}

impl MethodExclusionModule {
    pub fn new(excluded: fn(&MemberDescriptor) -> bool) -> Self {
        Self { excluded }
    }

    /// Methods without a return value
    pub fn for_void_methods() -> Self {
        Self::new(MemberDescriptor::is_void)
    }

    /// Methods that are not static
    pub fn for_instance_methods() -> Self {
        Self::new(|method| !method.is_static())
    }
}

impl Module for MethodExclusionModule {
    fn apply_to_config(&self, builder: &mut SchemaGeneratorConfigBuilder) {
        let excluded = self.excluded;
        builder
            .members_mut()
            .ignore
            .add(move |member, _| member.is_method() && excluded(member));
    }
}
