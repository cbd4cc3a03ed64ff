//! UTF-8 normalization of CSV files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, info_span};

use csvstash_model::SourceEncoding;

use crate::csv::{encode_records, write_atomic};
use crate::detect::detect_encoding;
use crate::error::{IngestError, Result};

/// Marker inserted before the extension of a re-encoded file.
pub const NORMALIZED_MARKER: &str = "_utf8";

/// Result of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOutcome {
    /// File the operator pointed at.
    pub source: PathBuf,
    /// UTF-8 file to use from here on (equal to `source` when reused).
    pub path: PathBuf,
    /// Encoding the source was detected in.
    pub detected: SourceEncoding,
    /// Number of CSV records, header included.
    pub records: usize,
}

impl NormalizeOutcome {
    /// True when a new sibling file was written.
    pub fn rewritten(&self) -> bool {
        self.path != self.source
    }
}

/// Sibling path for the re-encoded copy: `data.csv` becomes `data_utf8.csv`.
pub fn normalized_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{NORMALIZED_MARKER}.{}", ext.to_string_lossy()),
        None => format!("{stem}{NORMALIZED_MARKER}"),
    };
    path.with_file_name(name)
}

/// Make sure the CSV at `path` is readable as UTF-8.
///
/// UTF-8 sources are returned as-is without writing anything. Otherwise the
/// records are rewritten as UTF-8 to [`normalized_path`], replacing any
/// earlier copy.
pub fn normalize(path: &Path) -> Result<NormalizeOutcome> {
    let span = info_span!("normalize", path = %path.display());
    let _guard = span.enter();
    let start = Instant::now();

    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let detection = detect_encoding(path)?;
    let records = detection.records.len();

    if detection.encoding.is_target() {
        info!(encoding = %detection.encoding, "source already UTF-8, reusing it");
        return Ok(NormalizeOutcome {
            source: path.to_path_buf(),
            path: path.to_path_buf(),
            detected: detection.encoding,
            records,
        });
    }

    let target = normalized_path(path);
    let bytes = encode_records(&detection.records).map_err(|e| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_atomic(&target, &bytes)?;

    info!(
        from = %detection.encoding,
        target = %target.display(),
        records,
        duration_ms = start.elapsed().as_millis(),
        "wrote UTF-8 copy"
    );

    Ok(NormalizeOutcome {
        source: path.to_path_buf(),
        path: target,
        detected: detection.encoding,
        records,
    })
}
