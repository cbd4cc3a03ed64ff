//! Content-level encoding detection.
//!
//! Each candidate is a pure parse attempt over the raw file bytes: decode
//! without replacement, then parse every record as comma-delimited text.
//! Candidates run in [`SourceEncoding::CANDIDATES`] order and the first
//! success wins.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{EUC_KR, Encoding, UTF_8, UTF_16BE, UTF_16LE};
use tracing::{debug, info};

use csvstash_model::SourceEncoding;

use crate::error::{IngestError, Result};

/// Outcome of a single parse attempt.
pub type AttemptResult = std::result::Result<Vec<StringRecord>, String>;

/// A labelled parse attempt.
#[derive(Clone, Copy)]
pub struct ParseAttempt {
    pub encoding: SourceEncoding,
    pub parse: fn(&[u8]) -> AttemptResult,
}

/// Candidates in [`SourceEncoding::CANDIDATES`] order.
pub const PARSE_ATTEMPTS: [ParseAttempt; 3] = [
    ParseAttempt::for_encoding(SourceEncoding::CANDIDATES[0]),
    ParseAttempt::for_encoding(SourceEncoding::CANDIDATES[1]),
    ParseAttempt::for_encoding(SourceEncoding::CANDIDATES[2]),
];

impl ParseAttempt {
    pub const fn for_encoding(encoding: SourceEncoding) -> Self {
        let parse: fn(&[u8]) -> AttemptResult = match encoding {
            SourceEncoding::Utf8 => parse_utf8,
            SourceEncoding::Cp949 => parse_cp949,
            SourceEncoding::Utf16 => parse_utf16,
        };
        Self { encoding, parse }
    }
}

/// A file whose encoding has been detected, with its parsed records.
#[derive(Debug, Clone)]
pub struct Detection {
    pub encoding: SourceEncoding,
    /// All records including the header row.
    pub records: Vec<StringRecord>,
}

/// Detect the encoding of a CSV file by trying each candidate in order.
pub fn detect_encoding(path: &Path) -> Result<Detection> {
    let bytes = fs::read(path).map_err(|e| IngestError::read(path, e))?;
    detect_with(path, &bytes, &PARSE_ATTEMPTS)
}

/// Run the given attempts over `bytes` until one succeeds.
pub fn detect_with(path: &Path, bytes: &[u8], attempts: &[ParseAttempt]) -> Result<Detection> {
    let mut failures = Vec::with_capacity(attempts.len());

    for attempt in attempts {
        debug!(path = %path.display(), encoding = %attempt.encoding, "trying candidate encoding");
        match (attempt.parse)(bytes) {
            Ok(records) => {
                info!(
                    path = %path.display(),
                    encoding = %attempt.encoding,
                    records = records.len(),
                    "detected source encoding"
                );
                return Ok(Detection {
                    encoding: attempt.encoding,
                    records,
                });
            }
            Err(reason) => {
                debug!(encoding = %attempt.encoding, %reason, "candidate rejected");
                failures.push(format!("{}: {reason}", attempt.encoding));
            }
        }
    }

    Err(IngestError::EncodingDetection {
        path: path.to_path_buf(),
        attempts: failures,
    })
}

fn parse_utf8(bytes: &[u8]) -> AttemptResult {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = decode_strict(body, UTF_8)?;
    parse_records(&text)
}

fn parse_cp949(bytes: &[u8]) -> AttemptResult {
    // encoding_rs implements EUC-KR as the WHATWG superset, which is CP949.
    let text = decode_strict(bytes, EUC_KR)?;
    parse_records(&text)
}

fn parse_utf16(bytes: &[u8]) -> AttemptResult {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == UTF_16LE || encoding == UTF_16BE => {
            (encoding, &bytes[bom_len..])
        }
        _ => (UTF_16LE, bytes),
    };
    let text = decode_strict(body, encoding)?;
    parse_records(&text)
}

fn decode_strict<'a>(
    bytes: &'a [u8],
    encoding: &'static Encoding,
) -> std::result::Result<Cow<'a, str>, String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| format!("malformed {} byte sequence", encoding.name()))
}

/// Parse every record. Short rows are kept as they are; a row with more
/// fields than the header rejects the attempt.
fn parse_records(text: &str) -> AttemptResult {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    if let Some(width) = records.first().map(StringRecord::len) {
        if let Some((idx, record)) = records
            .iter()
            .enumerate()
            .find(|(_, record)| record.len() > width)
        {
            return Err(format!(
                "record {} has {} fields, header has {width}",
                idx + 1,
                record.len()
            ));
        }
    }
    Ok(records)
}
