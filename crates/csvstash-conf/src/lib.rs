//! Logstash pipeline generation.
//!
//! Given a UTF-8 normalized CSV file and connection settings, writes a
//! pipeline with a `file` input reading the CSV from the start, a `csv`
//! filter carrying the header's column names plus a fixed name-cleanup
//! `mutate`, and an `elasticsearch` output.

mod document;
mod error;
mod generate;
pub mod rules;

pub use document::{DEFAULT_SINCEDB_PATH, PipelineDocument, PipelineOptions};
pub use error::{ConfError, Result};
pub use generate::{GeneratedConfig, generate};
pub use rules::{GsubRule, NAME_CLEANUP_RULES, NAME_FIELD};
