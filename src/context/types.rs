//! Generation context types

use crate::config::ProviderMarker;
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use std::fmt;

/// Identity of one schema definition.
///
/// The same type yields separate definitions when looked up with different
/// provider markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionKey {
    pub ty: TypeDescriptor,
    /// Provider after which the lookup started, if any
    pub skip: Option<ProviderMarker>,
}

impl DefinitionKey {
    pub fn new(ty: TypeDescriptor, skip: Option<ProviderMarker>) -> Self {
        Self { ty, skip }
    }

    /// Key of a plain lookup without skipped providers
    pub fn of(ty: TypeDescriptor) -> Self {
        Self::new(ty, None)
    }
}

impl fmt::Display for DefinitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.skip {
            Some(marker) => write!(f, "{} (after {marker})", self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

/// One traversal request: a type plus how it is used at this position
#[derive(Debug, Clone)]
pub(crate) struct TypeDetails<'m> {
    pub ty: TypeDescriptor,
    pub nullable: bool,
    /// Generate into the target even if a definition exists
    pub force_inline: bool,
    pub skip: Option<ProviderMarker>,
    /// Member whose type this is; container items are then populated per member
    pub member: Option<&'m MemberDescriptor>,
}

impl<'m> TypeDetails<'m> {
    pub fn of(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            nullable: false,
            force_inline: false,
            skip: None,
            member: None,
        }
    }

    pub fn key(&self) -> DefinitionKey {
        DefinitionKey::new(self.ty.clone(), self.skip)
    }
}
