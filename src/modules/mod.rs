//! Rule modules
//!
//! Bundles of resolvers and custom definition providers, installed through
//! [`Module`](crate::config::Module).
//!
//! # Features
//!
//! - **SimpleTypeModule**: inline `{"type": ...}` schemas for scalar names
//! - **EnumModule**: enum constants as a string enumeration
//! - **AdditionalPropertiesModule**: map values or `false` for `additionalProperties`
//! - **MethodExclusionModule**: ignore void or instance methods
//! - **AnnotationModule**: attributes from the markers of a type graph document

pub mod annotations;

mod additional;
mod enums;
mod methods;
mod simple;

pub use additional::AdditionalPropertiesModule;
pub use annotations::AnnotationModule;
pub use enums::EnumModule;
pub use methods::MethodExclusionModule;
pub use simple::SimpleTypeModule;

#[cfg(test)]
mod tests;
