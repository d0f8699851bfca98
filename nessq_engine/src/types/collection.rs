//! # Collection Model
//!
//! A [`Collection`] maps host IPs to [`Host`]s, each holding findings grouped
//! by port-key, plus the list of every plugin seen during ingestion. Ordered
//! maps make the scan order (ascending IP string, then ascending port-key)
//! reproducible between runs.

use nessq_query::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plugin as registered in the global plugin list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    pub id: String,
    pub name: String,
    pub severity: Severity,
}

/// Single report item on one port of one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub plugin_id: String,
    pub plugin_name: String,
    /// Raw severity attribute as found in the report
    pub severity: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Finding {
    pub fn new(plugin_id: &str, plugin_name: &str, severity: &str) -> Self {
        Self {
            plugin_id: plugin_id.to_string(),
            plugin_name: plugin_name.to_string(),
            severity: severity.to_string(),
            description: String::new(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: &str) -> Self {
        self.output = Some(output.to_string());
        self
    }

    /// Severity ordinal, `0` when the raw value is not an integer
    pub fn severity_ordinal(&self) -> i64 {
        Severity::parse_report_ordinal(&self.severity)
    }

    pub fn severity_level(&self) -> Severity {
        Severity::from_ordinal_str(self.severity.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Host {
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    pub findings: BTreeMap<String, Vec<Finding>>,
}

impl Host {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            ..Default::default()
        }
    }

    pub fn add_finding(&mut self, port_key: &str, finding: Finding) {
        self.findings
            .entry(port_key.to_string())
            .or_default()
            .push(finding);
    }

    /// `"ip (fqdn)"` when a name is known, otherwise the bare IP
    pub fn display_name(&self) -> String {
        match &self.fqdn {
            Some(fqdn) if !fqdn.is_empty() => format!("{} ({})", self.ip, fqdn),
            _ => self.ip.clone(),
        }
    }

    pub fn port_count(&self) -> usize {
        self.findings.len()
    }

    pub fn finding_count(&self) -> usize {
        self.findings.values().map(Vec::len).sum()
    }

    /// All findings with their port-key, in port-key order
    pub fn iter_findings(&self) -> impl Iterator<Item = (&str, &Finding)> {
        self.findings
            .iter()
            .flat_map(|(port_key, findings)| findings.iter().map(move |f| (port_key.as_str(), f)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Collection {
    pub hosts: BTreeMap<String, Host>,
    pub all_plugins: Vec<Plugin>,
    pub count_matched_hosts: usize,
    pub count_matched_ports: usize,
    pub count_matched_findings: usize,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self, ip: &str) -> Option<&Host> {
        self.hosts.get(ip)
    }

    /// Host for `ip`, created on first use
    pub fn host_entry(&mut self, ip: &str) -> &mut Host {
        self.hosts
            .entry(ip.to_string())
            .or_insert_with(|| Host::new(ip))
    }

    /// Append a finding, creating host and port-key as needed.
    ///
    /// The FQDN is copied only when the host is created.
    pub fn add_finding(&mut self, ip: &str, fqdn: Option<&str>, port_key: &str, finding: Finding) {
        let host = self.hosts.entry(ip.to_string()).or_insert_with(|| Host {
            ip: ip.to_string(),
            fqdn: fqdn.map(str::to_string),
            findings: BTreeMap::new(),
        });
        host.add_finding(port_key, finding);
    }

    /// Register a plugin unless its id is already known.
    ///
    /// Returns whether the plugin was new. The severity label is derived from
    /// the raw report value on first insert.
    pub fn register_plugin(&mut self, id: &str, name: &str, raw_severity: &str) -> bool {
        if self.plugin(id).is_some() {
            return false;
        }

        self.all_plugins.push(Plugin {
            id: id.to_string(),
            name: name.to_string(),
            severity: Severity::from_ordinal_str(raw_severity.trim()),
        });
        true
    }

    pub fn plugin(&self, id: &str) -> Option<&Plugin> {
        self.all_plugins.iter().find(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Recompute the matched counts from the hosts currently held.
    ///
    /// Ports are counted per host, so the same port-key on two hosts counts twice.
    pub fn update_counts(&mut self) {
        self.count_matched_hosts = self.hosts.len();
        self.count_matched_ports = self.hosts.values().map(Host::port_count).sum();
        self.count_matched_findings = self.hosts.values().map(Host::finding_count).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_finding_creates_host_and_port() {
        let mut collection = Collection::new();
        collection.add_finding("10.0.0.1", Some("web"), "80/tcp", Finding::new("1", "a", "2"));
        collection.add_finding("10.0.0.1", None, "80/tcp", Finding::new("2", "b", "3"));
        collection.add_finding("10.0.0.1", None, "443/tcp", Finding::new("3", "c", "0"));

        let host = collection.host("10.0.0.1").unwrap();
        assert_eq!(host.fqdn.as_deref(), Some("web"));
        assert_eq!(host.findings["80/tcp"].len(), 2);
        assert_eq!(host.finding_count(), 3);
        assert_eq!(host.display_name(), "10.0.0.1 (web)");
    }

    #[test]
    fn test_register_plugin_first_seen_wins() {
        let mut collection = Collection::new();
        assert!(collection.register_plugin("100", "First name", "3"));
        assert!(!collection.register_plugin("100", "Second name", "1"));
        assert!(collection.register_plugin("200", "Unknown severity", "9"));

        assert_eq!(collection.all_plugins.len(), 2);
        assert_eq!(collection.plugin("100").unwrap().name, "First name");
        assert_eq!(collection.plugin("100").unwrap().severity, Severity::High);
        assert_eq!(collection.plugin("200").unwrap().severity, Severity::None);
    }

    #[test]
    fn test_counts_are_per_host() {
        let mut collection = Collection::new();
        collection.add_finding("10.0.0.1", None, "80/tcp", Finding::new("1", "a", "1"));
        collection.add_finding("10.0.0.2", None, "80/tcp", Finding::new("1", "a", "1"));
        collection.add_finding("10.0.0.2", None, "80/tcp", Finding::new("2", "b", "1"));
        collection.update_counts();

        assert_eq!(collection.count_matched_hosts, 2);
        assert_eq!(collection.count_matched_ports, 2);
        assert_eq!(collection.count_matched_findings, 3);
    }

    #[test]
    fn test_finding_severity_parse() {
        assert_eq!(Finding::new("1", "a", "4").severity_ordinal(), 4);
        assert_eq!(Finding::new("1", "a", "").severity_ordinal(), 0);
        assert_eq!(Finding::new("1", "a", "x").severity_level(), Severity::None);
    }
}
