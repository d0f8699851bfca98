//! # Operations API
//!
//! High-level operations used by the command line: run a query and fetch or
//! print its output, the portscan shortcut, plugin listing, and filling a
//! report template.

pub mod errors;
pub mod listing;
pub mod query;
pub mod write;

pub use errors::{ApiError, WriteError};
pub use listing::{format_plugin_line, list_plugins, plugin_diff};
pub use query::{fetch, portscan, portscan_matches, print, print_to, run_query};
pub use write::{render_template, write_template, TemplateStats, WriteReport};
