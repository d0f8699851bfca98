// parser/error.rs

use std::path::PathBuf;

/// Ingestion errors
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Input path '{}' does not exist", .path.display())]
    PathNotFound { path: PathBuf },

    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid Nessus XML in '{}': {source}", .path.display())]
    InvalidXml {
        path: PathBuf,
        source: quick_xml::DeError,
    },

    #[error("Failed to walk directory '{}': {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}
