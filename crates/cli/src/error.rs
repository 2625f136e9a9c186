//! Errors of the command line layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by the `ngen` command line.
#[derive(Error, Debug)]
pub enum CliError {
    /// Planning failed.
    #[error(transparent)]
    Core(#[from] ngen_core::Error),

    /// An input document, config or template could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A generated file or its directory could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// File that was written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Tera error, flattened with its causes.
    #[error("Template {template} failed: {message}")]
    Template {
        /// Template name.
        template: String,
        /// Error chain joined into one line.
        message: String,
    },

    /// The plan could not be serialized.
    #[error("Failed to serialize generation plan: {0}")]
    Json(#[from] serde_json::Error),
}
