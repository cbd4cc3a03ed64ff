//! Connection settings and job configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Default Elasticsearch endpoint when none is configured.
pub const DEFAULT_HOSTS: &str = "http://localhost:9200";

/// Where the generated pipeline delivers records.
///
/// Empty optional fields are omitted from the generated document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Elasticsearch host address.
    pub hosts: String,

    /// Target index name.
    pub index: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Path to a CA certificate bundle.
    #[serde(default)]
    pub ssl_certificate_authorities: String,
}

impl ConnectionSettings {
    /// Creates settings with only the required fields set.
    pub fn new(hosts: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            hosts: hosts.into(),
            index: index.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn with_ssl_certificate_authorities(mut self, path: impl Into<String>) -> Self {
        self.ssl_certificate_authorities = path.into();
        self
    }

    /// Ensure the required fields are present.
    pub fn validate(&self) -> Result<()> {
        if self.hosts.trim().is_empty() {
            return Err(ModelError::MissingSetting { name: "hosts" });
        }
        if self.index.trim().is_empty() {
            return Err(ModelError::MissingSetting { name: "index" });
        }
        Ok(())
    }

    /// Non-empty optional fields, always in the order user, password, CA path.
    pub fn optional_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("user", self.user.as_str()),
            ("password", self.password.as_str()),
            (
                "ssl_certificate_authorities",
                self.ssl_certificate_authorities.as_str(),
            ),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// A job file as written by the operator.
///
/// Every field is optional so that command-line flags can fill the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_file_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logstash_conf_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_certificate_authorities: Option<String>,
}

impl JobConfig {
    /// Load a job file from JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ModelError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| ModelError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: JobConfig) -> Self {
        Self {
            csv_file_path: other.csv_file_path.or(self.csv_file_path),
            logstash_conf_path: other.logstash_conf_path.or(self.logstash_conf_path),
            hosts: other.hosts.or(self.hosts),
            index: other.index.or(self.index),
            user: other.user.or(self.user),
            password: other.password.or(self.password),
            ssl_certificate_authorities: other
                .ssl_certificate_authorities
                .or(self.ssl_certificate_authorities),
        }
    }

    /// Build validated connection settings, defaulting `hosts`.
    pub fn connection_settings(&self) -> Result<ConnectionSettings> {
        let settings = ConnectionSettings {
            hosts: self
                .hosts
                .clone()
                .unwrap_or_else(|| DEFAULT_HOSTS.to_string()),
            index: self.index.clone().unwrap_or_default(),
            user: self.user.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
            ssl_certificate_authorities: self
                .ssl_certificate_authorities
                .clone()
                .unwrap_or_default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn require_csv_file_path(&self) -> Result<&Path> {
        self.csv_file_path
            .as_deref()
            .ok_or(ModelError::MissingSetting {
                name: "csv_file_path",
            })
    }

    pub fn require_logstash_conf_path(&self) -> Result<&Path> {
        self.logstash_conf_path
            .as_deref()
            .ok_or(ModelError::MissingSetting {
                name: "logstash_conf_path",
            })
    }
}
