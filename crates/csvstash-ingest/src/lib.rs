//! CSV encoding detection and normalization.
//!
//! This crate prepares an operator-supplied CSV file for ingestion:
//!
//! - **Detection**: try UTF-8, CP949 and UTF-16 in order and keep the first
//!   encoding that parses the whole file as CSV
//! - **Normalization**: reuse UTF-8 files, re-encode anything else to a
//!   `_utf8` sibling file
//! - **Sniffing**: guess a file's byte encoding from a bounded prefix
//! - **Header Reading**: stream only the first record in a sniffed encoding
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use csvstash_ingest::{normalize, read_csv_header, sniff};
//!
//! let outcome = normalize(Path::new("companies.csv"))?;
//! let encoding = sniff(&outcome.path)?.expect("known encoding");
//! let headers = read_csv_header(&outcome.path, encoding)?;
//! ```

mod csv;
mod detect;
mod error;
mod normalize;
mod sniff;

// === Error Types ===
pub use error::{IngestError, Result};

// === Detection ===
pub use detect::{
    AttemptResult, Detection, PARSE_ATTEMPTS, ParseAttempt, detect_encoding, detect_with,
};

// === Normalization ===
pub use normalize::{NORMALIZED_MARKER, NormalizeOutcome, normalize, normalized_path};

// === Sniffing ===
pub use sniff::{SNIFF_LIMIT, SniffedEncoding, sniff, sniff_bytes};

// === CSV Reading / Writing ===
pub use crate::csv::{CsvHeaders, DecodingReader, encode_records, read_csv_header, write_atomic};
