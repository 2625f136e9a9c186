//! Error types for the lowering pass.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while lowering and annotating an API description.
///
/// Missing optional fields never produce an error; they fall back to
/// documented defaults instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The input document is not valid JSON for the expected shape.
    #[error("Failed to parse OpenAPI document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The input document is not valid YAML for the expected shape.
    #[error("Failed to parse OpenAPI document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Option file could not be read or decoded.
    #[error("Invalid generator configuration: {0}")]
    Config(String),

    /// A path placeholder has no matching path parameter (strict mode only).
    #[error("Operation '{operation_id}' references unknown path parameter '{placeholder}'")]
    StructuralInconsistency {
        /// Operation whose path is inconsistent.
        operation_id: String,
        /// Placeholder name that could not be resolved.
        placeholder: String,
    },
}
