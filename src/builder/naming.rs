//! Definition naming

use crate::context::{DefinitionKey, GenerationContext};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Decides the names under which definitions are emitted.
///
/// Names only need to be unique after `adjust_duplicate_names` ran on each
/// group of equally named definitions.
pub trait DefinitionNamingStrategy {
    /// Base name of the definition for `key`
    fn definition_name(&self, key: &DefinitionKey, context: &GenerationContext<'_>) -> String;

    /// Make the names of a group sharing one base name distinct
    fn adjust_duplicate_names(&self, names: &mut IndexMap<DefinitionKey, String>, _context: &GenerationContext<'_>) {
        for (index, name) in names.values_mut().enumerate() {
            name.push_str(&format!("-{}", index + 1));
        }
    }

    /// Name of the nullable variant of a definition
    fn adjust_nullable_name(&self, _key: &DefinitionKey, name: &str, _context: &GenerationContext<'_>) -> String {
        format!("{name}-nullable")
    }
}

/// Names definitions after the simple description of their type
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamingStrategy;

impl DefinitionNamingStrategy for DefaultNamingStrategy {
    fn definition_name(&self, key: &DefinitionKey, context: &GenerationContext<'_>) -> String {
        context.introspector().simple_type_description(&key.ty)
    }
}

// ============================================================================
// Sanitizing
// ============================================================================

static ARRAY_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\]").expect("valid pattern"));
static GENERIC_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[<>]").expect("valid pattern"));
static NOT_URI_SAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9.\-_$*(),]+").expect("valid pattern"));
static NOT_PLAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9.\-_]+").expect("valid pattern"));

/// Keep array and generic markers as URI-safe punctuation: `List<Item[]>` -> `List(Item*)`
pub fn uri_compatible_key(name: &str) -> String {
    let name = ARRAY_MARKER.replace_all(name, "*");
    let name = name.replace('<', "(").replace('>', ")");
    NOT_URI_SAFE.replace_all(&name, "").into_owned()
}

/// Flatten to letters, digits and `.-_`: `List<Item[]>` -> `List_Item..._`
pub fn plain_key(name: &str) -> String {
    let name = name.replace('$', "-");
    let name = ARRAY_MARKER.replace_all(&name, "...");
    let name = GENERIC_BRACKETS.replace_all(&name, "_");
    let name = name.replace(',', ".");
    NOT_PLAIN.replace_all(&name, "").into_owned()
}

/// Runs every name produced by the wrapped strategy through a sanitizer
pub(crate) struct SanitizingNamingStrategy<'s> {
    strategy: &'s dyn DefinitionNamingStrategy,
    sanitize: fn(&str) -> String,
}

impl<'s> SanitizingNamingStrategy<'s> {
    pub fn new(strategy: &'s dyn DefinitionNamingStrategy, sanitize: fn(&str) -> String) -> Self {
        Self { strategy, sanitize }
    }
}

impl DefinitionNamingStrategy for SanitizingNamingStrategy<'_> {
    fn definition_name(&self, key: &DefinitionKey, context: &GenerationContext<'_>) -> String {
        (self.sanitize)(&self.strategy.definition_name(key, context))
    }

    fn adjust_duplicate_names(&self, names: &mut IndexMap<DefinitionKey, String>, context: &GenerationContext<'_>) {
        self.strategy.adjust_duplicate_names(names, context);
        for name in names.values_mut() {
            *name = (self.sanitize)(name);
        }
    }

    fn adjust_nullable_name(&self, key: &DefinitionKey, name: &str, context: &GenerationContext<'_>) -> String {
        (self.sanitize)(&self.strategy.adjust_nullable_name(key, name, context))
    }
}
