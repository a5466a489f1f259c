//! Document-level generator settings
//!
//! The `settings` block of a type-graph document:
//!
//! ```yaml
//! settings:
//!   schema_version: draft2020-12
//!   preset: plain_json
//!   with_options: [definitions_for_all_objects]
//!   without_options: [schema_version_indicator]
//! ```

use crate::config::generator::SchemaGeneratorConfigBuilder;
use crate::config::options::{GeneratorOption, OptionPreset};
use crate::error::{Error, Result};
use crate::keyword::SchemaVersion;
use serde::{Deserialize, Serialize};

/// Version, preset and option switches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub schema_version: SchemaVersion,
    pub preset: OptionPreset,
    /// Options enabled on top of the preset
    pub with_options: Vec<GeneratorOption>,
    /// Options disabled even if the preset enables them
    pub without_options: Vec<GeneratorOption>,
}

impl GeneratorSettings {
    /// Reject options that are both enabled and disabled
    pub fn validate(&self) -> Result<()> {
        let conflicting: Vec<&str> = self
            .with_options
            .iter()
            .filter(|option| self.without_options.contains(option))
            .map(|option| option.name())
            .collect();
        if !conflicting.is_empty() {
            return Err(Error::config(format!(
                "Options both enabled and disabled: {}",
                conflicting.join(", ")
            )));
        }
        Ok(())
    }

    /// Builder seeded with these settings
    pub fn to_builder(&self) -> SchemaGeneratorConfigBuilder {
        let builder = SchemaGeneratorConfigBuilder::new(self.schema_version, self.preset);
        let builder = self
            .with_options
            .iter()
            .fold(builder, |builder, option| builder.with_option(*option));
        self.without_options
            .iter()
            .fold(builder, |builder, option| builder.without_option(*option))
    }
}
