//! # Operation Errors

use crate::parser::IngestError;
use crate::results::OutputError;
use nessq_query::ConfigError;
use std::path::PathBuf;

/// Template write errors
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Template file '{}' does not exist", .path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Failed to read template '{}': {source}", .path.display())]
    ReadTemplate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("The custom format header sets list= but is missing table=")]
    MissingTableTemplate,

    #[error("The custom format header sets table= but is missing list=")]
    MissingListTemplate,

    #[error("Failed to load custom format templates: {source}")]
    CustomTemplate { source: OutputError },

    #[error("Failed to render marker '{marker}': {source}")]
    Render {
        marker: String,
        source: OutputError,
    },
}

/// Umbrella error for everything the command line can run into
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_nest() {
        let error: ApiError = WriteError::TemplateNotFound {
            path: PathBuf::from("report.md"),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Write error: Template file 'report.md' does not exist"
        );

        let error: ApiError = OutputError::Io(std::io::Error::other("closed")).into();
        assert_eq!(error.to_string(), "Output error: Failed to write output: closed");
    }
}
