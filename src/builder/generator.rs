//! Public entry point

use crate::builder::finalizer::SchemaBuilder;
use crate::config::SchemaGeneratorConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::introspect::TypeIntrospector;
use crate::types::JsonValue;
use tracing::info;

/// Generates JSON schema documents for the types an introspector knows about.
///
/// The generator itself holds no state between runs; every call to
/// `generate` starts a fresh generation context.
pub struct SchemaGenerator<'a> {
    config: &'a SchemaGeneratorConfig,
    introspector: &'a dyn TypeIntrospector,
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(config: &'a SchemaGeneratorConfig, introspector: &'a dyn TypeIntrospector) -> Self {
        Self { config, introspector }
    }

    pub fn config(&self) -> &'a SchemaGeneratorConfig {
        self.config
    }

    /// Schema document for `root`, including the definitions it needs
    pub fn generate(&self, root: &TypeDescriptor) -> Result<JsonValue> {
        info!(root = %root, version = %self.config.version(), "Generating schema");
        SchemaBuilder::new(self.config, self.introspector).create_schema(root)
    }
}
