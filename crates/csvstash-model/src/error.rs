//! Error types for settings and job configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// A required setting was not supplied by the job file or the command line.
    #[error("missing required setting: {name}")]
    MissingSetting { name: &'static str },

    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Job file is not valid JSON or has unknown fields.
    #[error("invalid job file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
