//! # Match Aggregator
//!
//! One [`Matches`] value is built per query run. The evaluator feeds it every
//! matching (host, port-key, finding) triple; it keeps a plugin summary that is
//! unique by id and a fresh [`Collection`] holding only matched data.
//! Orderings are applied on demand right before rendering.

use crate::types::address::compare_addresses;
use crate::types::{Collection, Finding, Host};
use chrono::Local;
use nessq_query::Severity;
use serde::{Deserialize, Serialize};

/// Evaluation time format of the result header
pub const CALL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub call_time: String,
    pub query: String,
}

impl Header {
    pub fn new(query: &str) -> Self {
        Self {
            call_time: Local::now().format(CALL_TIME_FORMAT).to_string(),
            query: query.to_string(),
        }
    }
}

/// Entry of the deduplicated plugin summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPlugin {
    pub id: String,
    pub name: String,
    pub severity: Severity,
}

impl From<&Finding> for MatchedPlugin {
    fn from(finding: &Finding) -> Self {
        Self {
            id: finding.plugin_id.clone(),
            name: finding.plugin_name.clone(),
            severity: finding.severity_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matches {
    pub header: Header,
    pub matched_plugins: Vec<MatchedPlugin>,
    pub collection: Collection,
    /// Matched IPs in ascending address order, filled by [`Matches::sort_by_ip`]
    pub sorted_keys: Vec<String>,
    /// Shared port-keys, filled only when every host has the same ports
    pub all_same_ports: Vec<String>,
}

impl Matches {
    pub fn new(query: &str) -> Self {
        Self {
            header: Header::new(query),
            matched_plugins: Vec::new(),
            collection: Collection::new(),
            sorted_keys: Vec::new(),
            all_same_ports: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.header.query
    }

    /// Record one matched finding under its host and port-key
    pub fn add_host_and_finding(&mut self, host: &Host, port_key: &str, finding: &Finding) {
        self.collection.add_finding(
            &host.ip,
            host.fqdn.as_deref(),
            port_key,
            finding.clone(),
        );
    }

    /// Add the finding's plugin to the summary unless its id is already there
    pub fn add_to_matched_plugins(&mut self, finding: &Finding) {
        if self
            .matched_plugins
            .iter()
            .any(|p| p.id == finding.plugin_id)
        {
            return;
        }
        self.matched_plugins.push(MatchedPlugin::from(finding));
    }

    pub fn update_counts(&mut self) {
        self.collection.update_counts();
    }

    pub fn is_empty(&self) -> bool {
        self.collection.count_matched_hosts == 0
    }

    /// Most severe first; equal severities keep their scan order
    pub fn sort_matched_plugins(&mut self) {
        self.matched_plugins
            .sort_by(|a, b| b.severity.cmp(&a.severity));
    }

    pub fn sort_by_ip(&mut self) {
        let mut keys: Vec<String> = self.collection.hosts.keys().cloned().collect();
        keys.sort_by(|a, b| compare_addresses(a, b));
        self.sorted_keys = keys;
    }

    /// Hosts in `sorted_keys` order
    pub fn sorted_hosts(&self) -> impl Iterator<Item = &Host> {
        self.sorted_keys
            .iter()
            .filter_map(|ip| self.collection.host(ip))
    }

    pub fn contains_plugin(&self, id: &str) -> bool {
        self.matched_plugins.iter().any(|p| p.id == id)
    }
}
