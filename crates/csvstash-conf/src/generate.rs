//! Pipeline generation from a normalized CSV file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, info_span, warn};

use csvstash_ingest::{IngestError, SniffedEncoding, read_csv_header, sniff, write_atomic};
use csvstash_model::ConnectionSettings;

use crate::document::{PipelineDocument, PipelineOptions};
use crate::error::{ConfError, Result};
use crate::rules::NAME_FIELD;

/// What [`generate`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedConfig {
    pub path: PathBuf,
    /// Encoding of both the CSV header read and the written document.
    pub encoding: SniffedEncoding,
    pub columns: Vec<String>,
}

/// Write a Logstash pipeline for `normalized` to `destination`.
///
/// The byte encoding is sniffed from `normalized`; the header row is read in
/// that encoding and the document is written in it too. An existing file at
/// `destination` is replaced only once the new document is complete.
pub fn generate(
    normalized: &Path,
    settings: &ConnectionSettings,
    destination: &Path,
    options: &PipelineOptions,
) -> Result<GeneratedConfig> {
    let span = info_span!("generate", source = %normalized.display());
    let _guard = span.enter();
    let start = Instant::now();

    settings.validate()?;

    let encoding = match sniff(normalized)? {
        Some(encoding) => encoding,
        None if is_empty(normalized)? => {
            return Err(ConfError::EmptySource {
                path: normalized.to_path_buf(),
            });
        }
        None => {
            return Err(ConfError::UnknownEncoding {
                path: normalized.to_path_buf(),
            });
        }
    };
    info!(encoding = %encoding, "sniffed CSV encoding");

    let headers = read_csv_header(normalized, encoding).map_err(|e| match e {
        IngestError::EmptyCsv { path } | IngestError::NoHeaderDetected { path } => {
            ConfError::EmptySource { path }
        }
        other => ConfError::Ingest(other),
    })?;

    let duplicates = headers.duplicates();
    if !duplicates.is_empty() {
        warn!(columns = ?duplicates, "header has repeated column names");
    }
    if !headers.contains(NAME_FIELD) {
        warn!(
            field = NAME_FIELD,
            "name column not in header; cleanup filter will not match"
        );
    }

    let text = PipelineDocument {
        source: normalized,
        columns: &headers.columns,
        settings,
        options,
    }
    .render();

    let bytes = encoding.encode(&text).ok_or_else(|| ConfError::Unencodable {
        path: destination.to_path_buf(),
        encoding: encoding.label(),
    })?;
    write_atomic(destination, &bytes)?;

    info!(
        destination = %destination.display(),
        columns = headers.len(),
        duration_ms = start.elapsed().as_millis(),
        "wrote Logstash pipeline"
    );

    Ok(GeneratedConfig {
        path: destination.to_path_buf(),
        encoding,
        columns: headers.columns,
    })
}

fn is_empty(path: &Path) -> Result<bool> {
    let metadata = fs::metadata(path).map_err(|e| {
        ConfError::Ingest(IngestError::Io {
            operation: "stat",
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    Ok(metadata.len() == 0)
}
