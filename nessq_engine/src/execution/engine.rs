//! # Query Evaluator
//!
//! Runs a parsed [`Query`] over every (host, port-key, finding) triple of a
//! [`Collection`] and aggregates the matches. The collection is only borrowed,
//! so several evaluations can share it.

use super::condition::{evaluate_clause, FindingContext};
use crate::results::Matches;
use crate::types::Collection;
use nessq_query::logging::codes;
use nessq_query::{log_debug, log_success, OrGroup, Query};

pub struct QueryEvaluator<'q> {
    query: &'q Query,
}

impl<'q> QueryEvaluator<'q> {
    pub fn new(query: &'q Query) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &Query {
        self.query
    }

    /// True iff any or-group holds for the finding
    pub fn matches_finding(&self, context: &FindingContext<'_>) -> bool {
        self.query
            .or_groups
            .iter()
            .any(|group| Self::group_holds(group, context))
    }

    fn group_holds(group: &OrGroup, context: &FindingContext<'_>) -> bool {
        group
            .clauses
            .iter()
            .all(|clause| evaluate_clause(clause, context))
    }

    /// Evaluate against the whole collection
    pub fn evaluate(&self, collection: &Collection) -> Matches {
        let mut matches = Matches::new(&self.query.text);

        for host in collection.hosts.values() {
            for (port_key, finding) in host.iter_findings() {
                let context = FindingContext::new(&host.ip, port_key, finding);
                if self.matches_finding(&context) {
                    matches.add_host_and_finding(host, port_key, finding);
                    matches.add_to_matched_plugins(finding);
                }
            }
        }

        matches.update_counts();

        log_debug!("Matched hosts", "count" => matches.collection.count_matched_hosts);
        log_debug!("Matched ports", "count" => matches.collection.count_matched_ports);
        log_debug!("Matched findings", "count" => matches.collection.count_matched_findings);
        log_success!(
            codes::success::QUERY_COMPLETED,
            "Query evaluated",
            "query" => self.query.text,
            "hosts" => matches.collection.count_matched_hosts,
            "plugins" => matches.matched_plugins.len()
        );

        matches
    }
}
