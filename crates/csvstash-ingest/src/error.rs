//! Error types for CSV ingestion and normalization.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while detecting, sniffing, or rewriting CSV files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Read or write failure on a specific path.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temp file was written but could not be moved into place.
    #[error("failed to move {temp_path} to {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Encoding Errors ===
    /// None of the candidate encodings parsed the file.
    #[error("could not detect encoding of {path} (tried {})", attempts.join("; "))]
    EncodingDetection {
        path: PathBuf,
        /// One `label: reason` entry per candidate, in the order tried.
        attempts: Vec<String>,
    },

    /// Bytes are not valid in the encoding used to read the file.
    #[error("{path} is not valid {encoding}")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Parsing Errors ===
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no rows at all.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// First row exists but carries no column names.
    #[error("could not detect header row in {path}")]
    NoHeaderDetected { path: PathBuf },
}

impl IngestError {
    /// Map an open/read error, keeping "not found" distinct.
    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                operation: "read",
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
