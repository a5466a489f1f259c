//! allOf consolidation

use crate::keyword::{SchemaKeyword, SchemaVersion};
use crate::types::{JsonObject, JsonValue};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::trace;

/// Merges `allOf` parts into their parent where every keyword can be combined
pub(super) struct AllOfMerger {
    version: SchemaVersion,
    keywords: HashMap<&'static str, SchemaKeyword>,
}

impl AllOfMerger {
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            version,
            keywords: SchemaKeyword::reverse_tag_map(version, |_| true),
        }
    }

    fn keyword(&self, keyword: SchemaKeyword) -> &'static str {
        keyword.for_version(self.version)
    }

    /// Dissolve the node's `allOf` (and those of its parts) if no conflict arises
    pub fn merge_all_of_parts(&self, node: &mut JsonObject) {
        let all_of = self.keyword(SchemaKeyword::AllOf);
        let Some(JsonValue::Array(parts)) = node.get_mut(all_of) else {
            return;
        };
        for part in parts.iter_mut() {
            if let JsonValue::Object(part) = part {
                self.merge_all_of_parts(part);
            }
        }

        let merged = match node.get(all_of) {
            Some(JsonValue::Array(parts)) => {
                let parts: Vec<&JsonValue> = parts.iter().collect();
                self.merge_schemas(Some(&*node), &parts)
            }
            _ => None,
        };
        let Some(merged) = merged else {
            trace!("Keeping {all_of}: parts cannot be merged");
            return;
        };
        node.retain(|key, _| key != all_of);
        for (key, value) in merged {
            node.insert(key, value);
        }
    }

    /// Combine the main node (if any) and the given parts into one schema
    fn merge_schemas(&self, main: Option<&JsonObject>, values: &[&JsonValue]) -> Option<JsonObject> {
        let mut parts: Vec<&JsonObject> = main.into_iter().collect();
        for value in values {
            match value {
                JsonValue::Bool(false) => return None,
                JsonValue::Object(part) => parts.push(part),
                _ => {}
            }
        }

        let mut fields: IndexMap<&str, Vec<&JsonValue>> = IndexMap::new();
        for part in &parts {
            for (key, value) in *part {
                fields.entry(key.as_str()).or_default().push(value);
            }
        }
        if self.should_skip(main, parts.len(), &fields) {
            return None;
        }

        let mut unsupported = Vec::new();
        let mut supported: IndexMap<SchemaKeyword, Vec<&JsonValue>> = IndexMap::new();
        for (name, occurrences) in &fields {
            match self.keywords.get(*name) {
                Some(keyword) => supported.entry(*keyword).or_default().extend(occurrences),
                None if occurrences.len() > 1 => return None,
                None => unsupported.push((*name, occurrences[0])),
            }
        }
        if supported.contains_key(&SchemaKeyword::If) {
            // conditionals stay in their own sub-schema
            return None;
        }

        let mut merged = JsonObject::new();
        for (keyword, occurrences) in &supported {
            let mut occurrences = occurrences.as_slice();
            if *keyword == SchemaKeyword::AllOf && main.is_some() {
                if occurrences.len() == 1 {
                    continue;
                }
                // the wrapper being dissolved
                occurrences = &occurrences[1..];
            }
            let value = self.merge_values(*keyword, occurrences)?;
            merged.insert(self.keyword(*keyword).to_string(), value);
        }
        for (name, value) in unsupported {
            merged.insert(name.to_string(), value.clone());
        }
        Some(merged)
    }

    /// Drafts 6 and 7 ignore everything next to a `$ref`
    fn should_skip(&self, main: Option<&JsonObject>, parts: usize, fields: &IndexMap<&str, Vec<&JsonValue>>) -> bool {
        if !self.version.is_legacy() || !fields.contains_key(self.keyword(SchemaKeyword::Ref)) {
            return false;
        }
        match main {
            None => parts > 1,
            Some(main) => main.len() > 1 || parts > 2,
        }
    }

    fn merge_values(&self, keyword: SchemaKeyword, values: &[&JsonValue]) -> Option<JsonValue> {
        if let [single] = values {
            return Some((*single).clone());
        }
        match keyword {
            SchemaKeyword::AllOf | SchemaKeyword::Required => merge_arrays(values),
            SchemaKeyword::Properties => merge_object_properties(values),
            SchemaKeyword::DependentRequired => merge_dependent_required(values),
            SchemaKeyword::DependentSchemas if self.version.is_legacy() => {
                // "dependencies" covers both flavours
                merge_dependent_required(values).or_else(|| merge_object_properties(values))
            }
            SchemaKeyword::DependentSchemas => merge_object_properties(values),
            SchemaKeyword::Items
            | SchemaKeyword::UnevaluatedItems
            | SchemaKeyword::AdditionalProperties
            | SchemaKeyword::UnevaluatedProperties => self.merge_schemas(None, values).map(JsonValue::Object),
            SchemaKeyword::Type => overlap_of_strings(values),
            SchemaKeyword::ItemsMax
            | SchemaKeyword::PropertiesMax
            | SchemaKeyword::Maximum
            | SchemaKeyword::MaximumExclusive
            | SchemaKeyword::LengthMax => pick_numeric(values, |candidate, current| candidate < current),
            SchemaKeyword::ItemsMin
            | SchemaKeyword::PropertiesMin
            | SchemaKeyword::Minimum
            | SchemaKeyword::MinimumExclusive
            | SchemaKeyword::LengthMin => pick_numeric(values, |candidate, current| candidate > current),
            _ => one_if_all_equal(values),
        }
    }
}

// ============================================================================
// Value Merging
// ============================================================================

/// Union of all array items, first occurrence wins
fn merge_arrays(values: &[&JsonValue]) -> Option<JsonValue> {
    let mut items: Vec<JsonValue> = Vec::new();
    for value in values {
        for item in value.as_array()? {
            if !items.contains(item) {
                items.push(item.clone());
            }
        }
    }
    Some(JsonValue::Array(items))
}

/// Union of named sub-schemas; a name with differing schemas aborts
fn merge_object_properties(values: &[&JsonValue]) -> Option<JsonValue> {
    let mut merged = JsonObject::new();
    for value in values {
        for (name, schema) in value.as_object()? {
            match merged.get(name) {
                None => {
                    merged.insert(name.clone(), schema.clone());
                }
                Some(existing) if existing == schema => {}
                Some(_) => return None,
            }
        }
    }
    Some(JsonValue::Object(merged))
}

/// Per lead property, the union of dependent property names
fn merge_dependent_required(values: &[&JsonValue]) -> Option<JsonValue> {
    let mut merged: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for value in values {
        for (lead, dependents) in value.as_object()? {
            let names = merged.entry(lead.as_str()).or_default();
            for dependent in dependents.as_array()? {
                let dependent = dependent.as_str()?;
                if !names.contains(&dependent) {
                    names.push(dependent);
                }
            }
        }
    }
    let merged = merged
        .into_iter()
        .map(|(lead, names)| (lead.to_string(), JsonValue::from(names)))
        .collect();
    Some(JsonValue::Object(merged))
}

/// Type names allowed by every occurrence; no overlap aborts
fn overlap_of_strings(values: &[&JsonValue]) -> Option<JsonValue> {
    let (first, rest) = values.split_first()?;
    let mut remaining = string_or_strings(first)?;
    for value in rest {
        let next = string_or_strings(value)?;
        remaining.retain(|name| next.contains(name));
        if remaining.is_empty() {
            return None;
        }
    }
    match remaining.as_slice() {
        [single] => Some(JsonValue::from(*single)),
        _ => Some(JsonValue::from(remaining)),
    }
}

fn string_or_strings(value: &JsonValue) -> Option<Vec<&str>> {
    match value {
        JsonValue::String(single) => Some(vec![single.as_str()]),
        JsonValue::Array(items) => items.iter().map(JsonValue::as_str).collect(),
        _ => None,
    }
}

/// The numeric value preferred by `replaces`, keeping its original representation
fn pick_numeric(values: &[&JsonValue], replaces: fn(f64, f64) -> bool) -> Option<JsonValue> {
    let mut picked: Option<(f64, &JsonValue)> = None;
    for value in values {
        let number = value.as_f64()?;
        match picked {
            Some((current, _)) if !replaces(number, current) => {}
            _ => picked = Some((number, *value)),
        }
    }
    picked.map(|(_, value)| value.clone())
}

fn one_if_all_equal(values: &[&JsonValue]) -> Option<JsonValue> {
    let (first, rest) = values.split_first()?;
    rest.iter().all(|value| *value == *first).then(|| (*first).clone())
}
