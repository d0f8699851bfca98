// RUNTIME PREFERENCES (User Experience)

use super::constants::{defaults, no_match_placeholder};
use crate::logging::LogLevel;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Most verbose level that is still emitted
    pub min_log_level: LogLevel,

    /// Emit JSON lines instead of plain text
    pub structured: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: env::var("NESSQ_LOG_LEVEL")
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
            structured: env::var("NESSQ_STRUCTURED_LOGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestPreferences {
    /// Extension (without dot) of files parsed when the input is a directory
    pub file_extension: String,

    /// Whether to derive host names from name-disclosure plugins
    pub resolve_hostnames: bool,
}

impl Default for IngestPreferences {
    fn default() -> Self {
        Self {
            file_extension: env::var("NESSQ_FILE_EXTENSION")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| defaults::FILE_EXTENSION.to_string()),
            resolve_hostnames: env::var("NESSQ_RESOLVE_HOSTNAMES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPreferences {
    /// Prefix of template lines that are substituted by query output
    pub marker_prefix: String,

    /// Query run by the portscan shortcut
    pub portscan_query: String,

    /// Lowest severity reported in the unmatched plugin summary of `write`
    pub unmatched_min_severity: Severity,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            marker_prefix: env::var("NESSQ_MARKER_PREFIX")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| defaults::MARKER_PREFIX.to_string()),
            portscan_query: defaults::PORTSCAN_QUERY.to_string(),
            unmatched_min_severity: Severity::Medium,
        }
    }
}

impl OutputPreferences {
    /// Empty-result placeholder built from the configured marker prefix
    pub fn no_match_placeholder(&self) -> String {
        no_match_placeholder(&self.marker_prefix)
    }
}
