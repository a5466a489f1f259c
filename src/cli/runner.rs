//! CLI runner - executes commands

use crate::builder::SchemaGenerator;
use crate::cli::commands::{Cli, Commands};
use crate::config::{GeneratorOption, GeneratorSettings};
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result, ResultExt};
use crate::introspect::{load_type_graph, TypeGraphDocument, TypeRegistry};
use crate::keyword::{SchemaKeyword, SchemaVersion};
use crate::modules::AnnotationModule;
use crate::types::{JsonObject, JsonValue};
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Generate {
                graph,
                root,
                schema_version,
                options,
                output,
                compact,
            } => {
                let schema = self.generate(graph, root.as_deref(), *schema_version, options)?;
                let text = if *compact {
                    serde_json::to_string(&schema)?
                } else {
                    serde_json::to_string_pretty(&schema)?
                };
                match output {
                    Some(path) => {
                        fs::write(path, format!("{text}\n"))
                            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
                        info!("Wrote schema to {}", path.display());
                    }
                    None => println!("{text}"),
                }
                Ok(())
            }
            Commands::Validate { graph } => self.validate(graph),
            Commands::Keywords { schema_version } => self.keywords(*schema_version),
        }
    }

    /// Load the document and its registry
    fn load(&self, graph: &Path) -> Result<(TypeGraphDocument, TypeRegistry)> {
        let doc = load_type_graph(graph)?;
        let registry = TypeRegistry::from_document(&doc)?;
        debug!(types = doc.types.len(), "Loaded type graph from {}", graph.display());
        Ok((doc, registry))
    }

    /// Generate the schema of the root type, applying command line overrides
    fn generate(
        &self,
        graph: &Path,
        root: Option<&str>,
        schema_version: Option<SchemaVersion>,
        options: &[GeneratorOption],
    ) -> Result<JsonValue> {
        let (doc, registry) = self.load(graph)?;
        let root = root
            .or(doc.root.as_deref())
            .ok_or_else(|| Error::config("Root type not specified (use --root or set `root` in the document)"))?;
        let root: TypeDescriptor = root.parse()?;

        let settings = effective_settings(&doc.settings, schema_version, options);
        settings.validate()?;
        let config = settings.to_builder().with_module(AnnotationModule::new()).build();
        SchemaGenerator::new(&config, &registry).generate(&root)
    }

    /// Validate a type graph document
    fn validate(&self, graph: &Path) -> Result<()> {
        let (doc, registry) = self.load(graph)?;
        // a declared root must also generate
        let definitions = match &doc.root {
            Some(root) => {
                let root: TypeDescriptor = root.parse()?;
                let config = doc.settings.to_builder().with_module(AnnotationModule::new()).build();
                let schema = SchemaGenerator::new(&config, &registry).generate(&root)?;
                schema
                    .get(config.keyword(SchemaKeyword::Definitions))
                    .and_then(JsonValue::as_object)
                    .map_or(0, JsonObject::len)
            }
            None => 0,
        };

        println!(
            "{}",
            json!({
                "valid": true,
                "types": doc.types.len(),
                "root": doc.root,
                "definitions": definitions,
                "schema_version": doc.settings.schema_version.name(),
            })
        );
        Ok(())
    }

    /// Print the literal keyword names for a draft
    fn keywords(&self, version: SchemaVersion) -> Result<()> {
        let mut keywords = JsonObject::new();
        for keyword in SchemaKeyword::ALL {
            keywords.insert(format!("{keyword:?}"), JsonValue::from(keyword.for_version(version)));
        }
        let listing = json!({
            "schema_version": version.name(),
            "identifier": version.identifier(),
            "keywords": keywords,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        Ok(())
    }
}

/// Document settings with the command line's version and extra options on top
pub fn effective_settings(
    settings: &GeneratorSettings,
    schema_version: Option<SchemaVersion>,
    options: &[GeneratorOption],
) -> GeneratorSettings {
    let mut settings = settings.clone();
    if let Some(version) = schema_version {
        settings.schema_version = version;
    }
    settings.without_options.retain(|option| !options.contains(option));
    for option in options {
        if !settings.with_options.contains(option) {
            settings.with_options.push(*option);
        }
    }
    settings
}
