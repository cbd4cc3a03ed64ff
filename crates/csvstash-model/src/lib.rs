//! Shared types for the csvstash workspace.

pub mod encoding;
pub mod error;
pub mod settings;

pub use encoding::SourceEncoding;
pub use error::{ModelError, Result};
pub use settings::{ConnectionSettings, DEFAULT_HOSTS, JobConfig};
