// parser/mod.rs

pub mod error;
pub mod hostname;
pub mod nessus;

pub use error::IngestError;
pub use hostname::resolve_hostname;
pub use nessus::{parse_document, parse_file, parse_path, ParseStats};
