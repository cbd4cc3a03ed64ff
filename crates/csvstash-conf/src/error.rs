//! Error types for pipeline generation.

use std::path::PathBuf;
use thiserror::Error;

use csvstash_ingest::IngestError;
use csvstash_model::ModelError;

#[derive(Debug, Error)]
pub enum ConfError {
    /// Normalized file has no header row.
    #[error("CSV file has no header row: {path}")]
    EmptySource { path: PathBuf },

    /// The sniffer could not name an encoding for the normalized file.
    #[error("could not determine the byte encoding of {path}")]
    UnknownEncoding { path: PathBuf },

    /// Document text cannot be written in the sniffed encoding.
    #[error("pipeline for {path} cannot be written as {encoding}")]
    Unencodable {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error(transparent)]
    Settings(#[from] ModelError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, ConfError>;
