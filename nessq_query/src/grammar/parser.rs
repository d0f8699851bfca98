//! Query parser
//!
//! Parsing never fails. Clauses that cannot be understood are kept as
//! [`Condition::Unsupported`] so the evaluator treats them as never matching,
//! which mirrors how the query language has always behaved for typos.

use super::ast::{Clause, ClauseKey, Comparison, Condition, OrGroup, Query, UnsupportedReason};
use crate::lexical;
use crate::logging::codes;
use crate::severity::Severity;

/// Parse a full query string
pub fn parse_query(text: &str) -> Query {
    if lexical::has_grouping_syntax(text) {
        log_warning!(
            code = codes::query::UNSUPPORTED_SYNTAX,
            "Parentheses are not grouping operators and are matched literally",
            "query" => text
        );
    }

    let or_groups: Vec<OrGroup> = lexical::split_query(text)
        .into_iter()
        .enumerate()
        .map(|(group_index, clause_texts)| {
            log_debug!("Or-group",
                "index" => group_index + 1,
                "text" => clause_texts.join(lexical::AND_SEPARATOR)
            );
            OrGroup {
                clauses: clause_texts.into_iter().map(parse_clause).collect(),
            }
        })
        .collect();

    let query = Query {
        text: text.to_string(),
        or_groups,
    };

    for clause in query.unsupported_clauses() {
        if let Condition::Unsupported(reason) = &clause.condition {
            let code = match reason {
                UnsupportedReason::UnknownKey(_) => codes::query::UNKNOWN_KEY,
                _ => codes::query::MALFORMED_CLAUSE,
            };
            log_warning!(
                code = code,
                "Clause can never match",
                "clause" => clause.text,
                "reason" => reason
            );
        }
    }

    query
}

/// Parse a single clause, including an optional `not ` prefix
pub fn parse_clause(text: &str) -> Clause {
    let trimmed = text.trim();
    let (negated, body) = lexical::strip_negation(trimmed);
    let condition = parse_condition(body.trim());

    log_debug!("Clause",
        "text" => trimmed,
        "negated" => negated,
        "supported" => condition.is_supported()
    );

    Clause {
        negated,
        condition,
        text: trimmed.to_string(),
    }
}

fn parse_condition(body: &str) -> Condition {
    let Some((key, comparison, value)) = lexical::split_operator(body) else {
        return Condition::Unsupported(UnsupportedReason::MissingOperator);
    };

    let keyword = key.trim().to_lowercase();
    let Some(clause_key) = ClauseKey::from_keyword(&keyword) else {
        return Condition::Unsupported(UnsupportedReason::UnknownKey(keyword));
    };

    if comparison.is_ordinal() {
        // Ordinal operators take a single severity code
        return match clause_key {
            ClauseKey::Severity => Condition::Severity {
                comparison,
                levels: vec![Severity::from_code(value.trim())],
            },
            key => Condition::Unsupported(UnsupportedReason::OrdinalOperator { key, comparison }),
        };
    }

    let values = lexical::split_values(value);
    match clause_key {
        ClauseKey::PluginId => Condition::PluginId(values),
        ClauseKey::PluginName => Condition::PluginName(values),
        ClauseKey::Port => Condition::Port(values),
        ClauseKey::Ip => Condition::Ip(values),
        ClauseKey::Severity => Condition::Severity {
            comparison: Comparison::Equals,
            levels: values.iter().map(|v| Severity::from_code(v)).collect(),
        },
    }
}
