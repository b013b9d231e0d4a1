//! Error handling module for the signup wizard
//!
//! Errors only exist at the edges of the wizard: the persisted store, the
//! configuration file and textual user input. Step transitions and form-data
//! merges are total and never produce one of these.

use thiserror::Error;

/// Main error type for the signup wizard
#[derive(Error, Debug)]
pub enum WizardError {
    /// IO errors (store files, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A persisted entry exists but cannot be turned back into a snapshot
    #[error("Malformed snapshot entry '{key}': {reason}")]
    MalformedSnapshot { key: String, reason: String },

    /// A form field name that is not part of the signup form
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    /// A value that cannot be assigned to a known field
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Configuration errors (loading, validation)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

impl WizardError {
    /// Create a malformed snapshot error for the given entry key
    pub fn malformed(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedSnapshot {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
