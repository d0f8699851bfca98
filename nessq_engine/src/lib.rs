//! # nessq engine
//!
//! Ingests Nessus reports into a [`types::Collection`], evaluates queries
//! over it and renders the matched subset as a list or a table.
//!
//! ```no_run
//! use nessq_engine::prelude::*;
//! use std::path::Path;
//!
//! let config = NessqConfig::default();
//! let collection = parse_path(Path::new("scans/"), &config.ingest)?;
//! let mut matches = run_query("sev>=hig and not port=0", &collection);
//! println!("{}", fetch(&mut matches, OutputFormat::Auto)?);
//! # Ok::<(), nessq_engine::ApiError>(())
//! ```

pub mod api;
pub mod execution;
pub mod parser;
pub mod results;
pub mod types;

// Convenience re-exports
pub use api::*;

pub mod prelude {
    pub use crate::api::{
        fetch, format_plugin_line, list_plugins, plugin_diff, portscan, portscan_matches, print,
        print_to, run_query, write_template, ApiError, WriteError, WriteReport,
    };
    pub use crate::execution::{FindingContext, QueryEvaluator};
    pub use crate::parser::{parse_path, IngestError};
    pub use crate::results::{
        CustomTemplate, Header, MatchError, MatchedPlugin, Matches, OutputError, OutputFormat,
        RenderInput, RenderMode, Renderer,
    };
    pub use crate::types::{Collection, Finding, Host, Plugin};

    pub use nessq_query::{NessqConfig, Query, Severity};
}
