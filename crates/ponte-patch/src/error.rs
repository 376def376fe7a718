//! Error types for ponte-patch.

use thiserror::Error;

/// Errors raised while parsing or compiling a patch description.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Malformed descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate parameter index {0}")]
    DuplicateParameterIndex(usize),

    #[error("Duplicate port tag '{0}'")]
    DuplicatePortTag(String),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, SchemaError>;
