//! Error types for descriptor compilation and schema validation

use thiserror::Error;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors raised while compiling a descriptor tree into a schema
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("unsupported rule `{rule}` on {kind} schema")]
    UnsupportedRule { rule: String, kind: &'static str },

    #[error("rule `{rule}` expects {expected}")]
    InvalidArgument { rule: String, expected: &'static str },

    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Violations reported by a compiled schema's validate operation
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{label} is required")]
    Required { label: String },

    #[error("{label} must be {expected}")]
    TypeMismatch { label: String, expected: &'static str },

    #[error("{label} must be one of the allowed values")]
    NotOneOf { label: String },

    #[error("{label} {message}")]
    Constraint { label: String, message: String },

    #[error("{label} failed the `{name}` check: {message}")]
    Test {
        label: String,
        name: String,
        message: String,
    },

    #[error("field \"{key}\": {source}")]
    Field {
        key: String,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Wrap an error with the object key or array index it occurred under
    pub fn in_field(self, key: impl Into<String>) -> Self {
        ValidationError::Field {
            key: key.into(),
            source: Box::new(self),
        }
    }
}
