//! Content sensitivity: list output when every matched host exposes the same
//! affected ports, table output otherwise.

use super::error::MatchError;
use super::matches::Matches;
use crate::types::port::sorted_port_keys;
use crate::types::Host;
use nessq_query::log_debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RenderMode {
    List { all_same_ports: Vec<String> },
    Table,
}

impl RenderMode {
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List { .. })
    }
}

/// Affected port-keys of a host in numeric port order
pub fn affected_ports(host: &Host) -> Vec<String> {
    sorted_port_keys(host.findings.keys())
}

/// Decide the output shape and publish `all_same_ports` on success.
///
/// The reference is the first host in address order. Sorts hosts first if
/// that has not happened yet.
pub fn resolve_render_mode(matches: &mut Matches) -> Result<RenderMode, MatchError> {
    if matches.sorted_keys.len() != matches.collection.hosts.len() {
        matches.sort_by_ip();
    }

    let reference_ip = matches
        .sorted_keys
        .first()
        .ok_or_else(|| MatchError::no_matched_hosts(matches.query()))?;

    let reference = matches
        .collection
        .host(reference_ip)
        .map(affected_ports)
        .ok_or_else(|| MatchError::missing_host(reference_ip))?;

    for ip in &matches.sorted_keys {
        let host = matches
            .collection
            .host(ip)
            .ok_or_else(|| MatchError::missing_host(ip))?;

        if affected_ports(host) != reference {
            log_debug!("Affected ports differ between hosts, using table output",
                "reference" => reference_ip,
                "host" => ip
            );
            return Ok(RenderMode::Table);
        }
    }

    matches.all_same_ports = reference.clone();
    Ok(RenderMode::List {
        all_same_ports: reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Finding;
    use assert_matches::assert_matches;

    fn matches_with(hosts: &[(&str, Vec<&str>)]) -> Matches {
        let mut matches = Matches::new("q");
        for (ip, ports) in hosts {
            let host = Host::new(ip);
            for port in ports.iter() {
                matches.add_host_and_finding(&host, port, &Finding::new("1", "a", "1"));
            }
        }
        matches.update_counts();
        matches
    }

    #[test]
    fn test_same_ports_any_insertion_order() {
        let mut matches = matches_with(&[
            ("10.0.0.1", vec!["443/tcp", "80/tcp"]),
            ("10.0.0.2", vec!["80/tcp", "443/tcp"]),
        ]);

        let mode = resolve_render_mode(&mut matches).unwrap();
        assert_eq!(
            mode,
            RenderMode::List {
                all_same_ports: vec!["80/tcp".to_string(), "443/tcp".to_string()]
            }
        );
        assert_eq!(matches.all_same_ports, vec!["80/tcp", "443/tcp"]);
    }

    #[test]
    fn test_differing_ports_give_table() {
        let mut matches = matches_with(&[
            ("10.0.0.1", vec!["80/tcp"]),
            ("10.0.0.2", vec!["80/tcp", "8443/tcp"]),
        ]);

        assert_eq!(resolve_render_mode(&mut matches).unwrap(), RenderMode::Table);
        assert!(matches.all_same_ports.is_empty());
    }

    #[test]
    fn test_single_host_is_list() {
        let mut matches = matches_with(&[("10.0.0.1", vec!["22/tcp"])]);
        assert!(resolve_render_mode(&mut matches).unwrap().is_list());
    }

    #[test]
    fn test_empty_matches_is_error() {
        let mut matches = matches_with(&[]);
        assert_matches!(
            resolve_render_mode(&mut matches),
            Err(MatchError::NoMatchedHosts { .. })
        );
    }
}
