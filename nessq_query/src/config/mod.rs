//! Configuration module for nessq
//!
//! Preferences come from three layers: built-in defaults (which already
//! honour `NESSQ_*` environment variables), an optional TOML file, and
//! finally whatever the CLI overrides explicitly.

pub mod constants;
pub mod runtime;

use runtime::{IngestPreferences, LoggingPreferences, OutputPreferences};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NessqConfig {
    pub logging: LoggingPreferences,
    pub ingest: IngestPreferences,
    pub output: OutputPreferences,
}

impl NessqConfig {
    /// Load from an optional TOML file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.marker_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output.marker_prefix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.output.portscan_query.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output.portscan_query".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let extension = self.ingest.file_extension.trim();
        if extension.is_empty() || extension.starts_with('.') {
            return Err(ConfigError::Invalid {
                field: "ingest.file_extension".to_string(),
                reason: "must be a bare extension such as 'nessus'".to_string(),
            });
        }

        Ok(())
    }
}
