//! Descriptor module
//!
//! The data model the generator works on.
//!
//! - `TypeDescriptor` - structural identity of a (possibly generic) type
//! - `MemberDescriptor` - a field or method of a type, renamable and retypable

mod member;
mod types;

pub use member::{MemberDescriptor, MemberKind};
pub use types::{TypeDescriptor, VOID_TYPE_NAME};
