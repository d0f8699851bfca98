// results/error.rs

use std::fmt;
use std::path::PathBuf;

/// Errors raised while resolving the shape of a match result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Content sensitivity needs at least one host as reference
    #[error("No hosts matched query '{query}'")]
    NoMatchedHosts { query: String },

    /// A sorted key points at a host missing from the matched collection
    #[error("Matched host '{ip}' is missing from the result collection")]
    MissingHost { ip: String },
}

impl MatchError {
    pub fn no_matched_hosts(query: &str) -> Self {
        Self::NoMatchedHosts {
            query: query.to_string(),
        }
    }

    pub fn missing_host(ip: &str) -> Self {
        Self::MissingHost { ip: ip.to_string() }
    }
}

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported output format '{requested}'. Supported formats: [{}]", .supported.join(", "))]
    UnsupportedFormat {
        requested: String,
        supported: Vec<String>,
    },

    #[error("Text formatting failed: {0}")]
    Format(#[from] fmt::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output template '{}' cannot be found", .path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Failed to read output template '{}': {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Output template '{}' failed: {source}", .path.display())]
    Template {
        path: PathBuf,
        source: minijinja::Error,
    },
}

impl OutputError {
    pub fn unsupported_format(requested: &str, supported: &[&str]) -> Self {
        Self::UnsupportedFormat {
            requested: requested.to_string(),
            supported: supported.iter().map(|s| s.to_string()).collect(),
        }
    }
}
