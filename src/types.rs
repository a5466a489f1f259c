//! Common types used throughout Solidafy Schemagen
//!
//! This module contains shared type aliases used across multiple modules.

use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Markers attached to a type or member, keyed by marker name
pub type AnnotationMap = BTreeMap<String, JsonValue>;
