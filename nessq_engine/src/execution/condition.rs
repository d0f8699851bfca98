//! # Condition Evaluator
//!
//! One evaluation function per clause key. Each takes the finding and its
//! location and answers for a single atomic condition; value lists are a
//! disjunction. Negation is applied by [`evaluate_clause`].

use crate::types::port::port_segment;
use crate::types::Finding;
use nessq_query::{Clause, Comparison, Condition, Severity};

/// A finding together with where it was reported
#[derive(Debug, Clone, Copy)]
pub struct FindingContext<'a> {
    pub ip: &'a str,
    pub port_key: &'a str,
    pub finding: &'a Finding,
}

impl<'a> FindingContext<'a> {
    pub fn new(ip: &'a str, port_key: &'a str, finding: &'a Finding) -> Self {
        Self {
            ip,
            port_key,
            finding,
        }
    }
}

/// Raw clause result with negation applied
pub fn evaluate_clause(clause: &Clause, context: &FindingContext<'_>) -> bool {
    evaluate_condition(&clause.condition, context) != clause.negated
}

pub fn evaluate_condition(condition: &Condition, context: &FindingContext<'_>) -> bool {
    match condition {
        Condition::PluginId(ids) => has_plugin_id(ids, context.finding),
        Condition::PluginName(names) => has_plugin_name(names, context.finding),
        Condition::Severity { comparison, levels } => {
            has_severity(*comparison, levels, context.finding)
        }
        Condition::Port(ports) => is_port(ports, context.port_key),
        Condition::Ip(ips) => is_ip(ips, context.ip),
        Condition::Unsupported(_) => false,
    }
}

pub fn has_plugin_id(ids: &[String], finding: &Finding) -> bool {
    ids.iter()
        .any(|id| id.eq_ignore_ascii_case(finding.plugin_id.trim()))
}

/// Case-insensitive substring containment
pub fn has_plugin_name(names: &[String], finding: &Finding) -> bool {
    let plugin_name = finding.plugin_name.to_lowercase();
    names
        .iter()
        .any(|name| plugin_name.contains(&name.to_lowercase()))
}

/// Compare the finding's ordinal against any of the requested levels
pub fn has_severity(comparison: Comparison, levels: &[Severity], finding: &Finding) -> bool {
    let actual = finding.severity_ordinal();
    levels
        .iter()
        .any(|level| comparison.compare(actual, level.ordinal()))
}

/// Match against the leading port of the port-key
pub fn is_port(ports: &[String], port_key: &str) -> bool {
    let port = port_segment(port_key);
    ports.iter().any(|p| p == port)
}

pub fn is_ip(ips: &[String], ip: &str) -> bool {
    ips.iter().any(|i| i.eq_ignore_ascii_case(ip))
}
