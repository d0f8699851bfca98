//! # Nessus Report Ingestion
//!
//! Reads `.nessus` (NessusClientData_v2) documents into a [`Collection`].
//! Only the parts the query engine needs are deserialized:
//!
//! ```text
//! NessusClientData_v2
//! └── Report
//!     └── ReportHost @name
//!         └── ReportItem @port @protocol @severity @pluginID @pluginName
//!             ├── description
//!             └── plugin_output (optional)
//! ```
//!
//! Hosts appearing in several files are merged by IP.

use super::error::IngestError;
use super::hostname::resolve_hostname;
use crate::types::port::port_key;
use crate::types::{Collection, Finding};
use nessq_query::config::runtime::IngestPreferences;
use nessq_query::logging::codes;
use nessq_query::{log_debug, log_error, log_success};
use serde::Deserialize;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Default, Deserialize)]
struct NessusClientData {
    #[serde(rename = "Report", default)]
    reports: Vec<ReportElement>,
}

#[derive(Debug, Default, Deserialize)]
struct ReportElement {
    #[serde(rename = "ReportHost", default)]
    hosts: Vec<ReportHostElement>,
}

#[derive(Debug, Deserialize)]
struct ReportHostElement {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "ReportItem", default)]
    items: Vec<ReportItemElement>,
}

#[derive(Debug, Deserialize)]
struct ReportItemElement {
    #[serde(rename = "@port", default)]
    port: String,
    #[serde(rename = "@protocol", default)]
    protocol: String,
    #[serde(rename = "@severity", default)]
    severity: String,
    #[serde(rename = "@pluginID", default)]
    plugin_id: String,
    #[serde(rename = "@pluginName", default)]
    plugin_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    plugin_output: Option<String>,
}

/// Per-document ingestion statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub hosts: usize,
    pub items: usize,
    pub new_plugins: usize,
}

impl ParseStats {
    fn absorb(&mut self, other: ParseStats) {
        self.hosts += other.hosts;
        self.items += other.items;
        self.new_plugins += other.new_plugins;
    }
}

/// Parse one document into `collection`
pub fn parse_document(
    content: &str,
    collection: &mut Collection,
    preferences: &IngestPreferences,
) -> Result<ParseStats, quick_xml::DeError> {
    let data: NessusClientData = quick_xml::de::from_str(content)?;
    let mut stats = ParseStats::default();

    for host_element in data.reports.into_iter().flat_map(|r| r.hosts) {
        let ip = host_element.name;

        for item in host_element.items {
            if collection.register_plugin(&item.plugin_id, &item.plugin_name, &item.severity) {
                stats.new_plugins += 1;
            }

            let key = port_key(&item.port, &item.protocol);
            let finding = Finding {
                plugin_id: item.plugin_id,
                plugin_name: item.plugin_name,
                severity: item.severity,
                description: item.description.unwrap_or_default(),
                output: item.plugin_output,
            };
            collection.host_entry(&ip).add_finding(&key, finding);
            stats.items += 1;
        }

        // Names are resolved on the merged host so earlier files still count
        let host = collection.host_entry(&ip);
        if preferences.resolve_hostnames {
            if let Some(name) = resolve_hostname(host) {
                host.fqdn = Some(name);
            }
        }
        stats.hosts += 1;
    }

    Ok(stats)
}

/// Parse a single report file into `collection`
pub fn parse_file(
    path: &Path,
    collection: &mut Collection,
    preferences: &IngestPreferences,
) -> Result<ParseStats, IngestError> {
    log_debug!("Processing file", "path" => path.display());

    let content = std::fs::read_to_string(path).map_err(|source| {
        log_error!(codes::ingest::READ_FAILURE, "Failed to read report", "path" => path.display());
        IngestError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let stats = parse_document(&content, collection, preferences).map_err(|source| {
        log_error!(
            codes::ingest::XML_PARSE_FAILURE,
            "Failed to parse report",
            "path" => path.display(),
            "error" => source
        );
        IngestError::InvalidXml {
            path: path.to_path_buf(),
            source,
        }
    })?;

    log_success!(
        codes::success::FILE_PARSED,
        "Parsed report",
        "path" => path.display(),
        "hosts" => stats.hosts,
        "items" => stats.items,
        "new_plugins" => stats.new_plugins
    );

    Ok(stats)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Parse a report file, or every report file below a directory.
///
/// Directory entries are visited in file-name order.
pub fn parse_path(path: &Path, preferences: &IngestPreferences) -> Result<Collection, IngestError> {
    if !path.exists() {
        log_error!(codes::ingest::PATH_NOT_FOUND, "Input path does not exist", "path" => path.display());
        return Err(IngestError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut collection = Collection::new();
    let mut totals = ParseStats::default();
    let mut files = 0usize;

    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|source| IngestError::Walk {
                path: path.to_path_buf(),
                source,
            })?;

            if entry.file_type().is_file()
                && has_extension(entry.path(), &preferences.file_extension)
            {
                totals.absorb(parse_file(entry.path(), &mut collection, preferences)?);
                files += 1;
            }
        }
    } else {
        totals.absorb(parse_file(path, &mut collection, preferences)?);
        files += 1;
    }

    log_debug!("Ingestion finished",
        "files" => files,
        "hosts" => collection.hosts.len(),
        "items" => totals.items,
        "plugins" => collection.all_plugins.len()
    );

    Ok(collection)
}
