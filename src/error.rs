//! Error types for Solidafy Schemagen
//!
//! One enum covers loading a type graph, configuring a generator and
//! running it. Only [`Error::UnsupportedType`] is recoverable: traversal
//! leaves `{}` at the use site and continues.

use thiserror::Error;

/// The main error type for Solidafy Schemagen
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Type Graph Errors
    // ============================================================================
    #[error("Unsupported type '{type_name}': {message}")]
    UnsupportedType { type_name: String, message: String },

    #[error("Invalid type expression '{input}': {message}")]
    TypeParse { input: String, message: String },

    // ============================================================================
    // Generation Errors
    // ============================================================================
    #[error("Generator misuse: {message}")]
    Misuse { message: String },

    #[error("Circular schema cannot be inlined: {message}")]
    CircularInline { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Context Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Settings or command line arguments that cannot be used
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// A named setting (option, draft, preset) with an unknown value
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a type expression parse error
    pub fn type_parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeParse {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a misuse error
    pub fn misuse(message: impl Into<String>) -> Self {
        Self::Misuse {
            message: message.into(),
        }
    }

    /// Create a circular inline error
    pub fn circular_inline(message: impl Into<String>) -> Self {
        Self::CircularInline {
            message: message.into(),
        }
    }

    /// Whether the traversal may skip the failing subtree and carry on
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnsupportedType { .. })
    }
}

/// Result type alias for Solidafy Schemagen
pub type Result<T> = std::result::Result<T, Error>;

/// Prefixes an error with what was being attempted, e.g. the path being written
pub trait ResultExt<T> {
    /// Prefix with a fixed message
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Prefix with a message built only on failure
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::unsupported_type("T", "unbound type variable");
        assert_eq!(
            err.to_string(),
            "Unsupported type 'T': unbound type variable"
        );

        let err = Error::type_parse("List<", "unexpected end of input");
        assert_eq!(
            err.to_string(),
            "Invalid type expression 'List<': unexpected end of input"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::unsupported_type("T", "unbound").is_recoverable());

        assert!(!Error::config("test").is_recoverable());
        assert!(!Error::misuse("marker out of range").is_recoverable());
        assert!(!Error::circular_inline("Node").is_recoverable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
