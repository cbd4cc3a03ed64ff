//! CSV serialization and atomic file writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{StringRecord, Terminator, WriterBuilder};

use crate::error::{IngestError, Result};

/// Serialize records as UTF-8 CSV with minimal quoting and `\n` line ends.
///
/// Rows keep their own field count. Output depends only on the records, so
/// the same input always yields the same bytes.
pub fn encode_records(records: &[StringRecord]) -> std::result::Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    for record in records {
        writer.write_record(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Write `bytes` to `path` via a temp file in the same directory and a rename.
///
/// A failed write leaves `path` untouched and removes the temp file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, bytes).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| IngestError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let io_error = |operation: &'static str| {
        move |e: std::io::Error| IngestError::Io {
            operation,
            path: temp_path.to_path_buf(),
            source: e,
        }
    };

    let mut file = File::create(temp_path).map_err(io_error("create"))?;
    file.write_all(bytes).map_err(io_error("write"))?;
    file.flush().map_err(io_error("flush"))?;
    file.sync_all().map_err(io_error("sync"))?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
