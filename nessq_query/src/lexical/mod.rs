//! Lexical splitting of query strings
//!
//! A query is cut into or-groups on the literal `" or "`, each or-group into
//! clauses on the literal `" and "`. Separators are matched verbatim (lower
//! case, single spaces) and there is no grouping syntax.

use crate::grammar::ast::Comparison;

/// Separator between or-groups
pub const OR_SEPARATOR: &str = " or ";

/// Separator between clauses of one or-group
pub const AND_SEPARATOR: &str = " and ";

/// Prefix negating a clause
pub const NOT_PREFIX: &str = "not ";

/// Separator between alternative values of one clause
pub const VALUE_SEPARATOR: char = ',';

/// Operators in detection order. Two-character operators come first so that
/// `<=` and `>=` are never split on the bare `<` or `>`.
pub const OPERATORS: [(&str, Comparison); 5] = [
    ("<=", Comparison::LessThanOrEqual),
    (">=", Comparison::GreaterThanOrEqual),
    ("<", Comparison::LessThan),
    (">", Comparison::GreaterThan),
    ("=", Comparison::Equals),
];

/// Split a query into or-groups, each being a list of raw clause texts
pub fn split_query(query: &str) -> Vec<Vec<&str>> {
    query
        .split(OR_SEPARATOR)
        .map(|group| group.split(AND_SEPARATOR).collect())
        .collect()
}

/// Strip a leading `not ` and report whether it was present
pub fn strip_negation(clause: &str) -> (bool, &str) {
    match clause.strip_prefix(NOT_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, clause),
    }
}

/// Split a clause body into key, operator and value.
///
/// Returns `None` when the body contains none of the operators.
pub fn split_operator(body: &str) -> Option<(&str, Comparison, &str)> {
    OPERATORS.iter().find_map(|(token, comparison)| {
        body.split_once(token)
            .map(|(key, value)| (key, *comparison, value))
    })
}

/// Split a value list on commas
pub fn split_values(value: &str) -> Vec<String> {
    value
        .split(VALUE_SEPARATOR)
        .map(|v| v.trim().to_lowercase())
        .collect()
}

/// Whether the query uses characters the grammar gives no meaning to
pub fn has_grouping_syntax(query: &str) -> bool {
    query.contains('(') || query.contains(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_query_structure() {
        let groups = split_query("pluginid=1 and port=80 or sev>=hig");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], vec!["pluginid=1", "port=80"]);
        assert_eq!(groups[1], vec!["sev>=hig"]);
    }

    #[test]
    fn test_separators_are_literal() {
        // Upper case keywords are not separators
        let groups = split_query("pluginname=a OR pluginname=b");
        assert_eq!(groups, vec![vec!["pluginname=a OR pluginname=b"]]);

        // Words containing "or" are untouched
        let groups = split_query("pluginname=vendor and port=443");
        assert_eq!(groups, vec![vec!["pluginname=vendor", "port=443"]]);
    }

    #[test]
    fn test_operator_detection_order() {
        assert_eq!(
            split_operator("sev<=med"),
            Some(("sev", Comparison::LessThanOrEqual, "med"))
        );
        assert_eq!(
            split_operator("sev>=med"),
            Some(("sev", Comparison::GreaterThanOrEqual, "med"))
        );
        assert_eq!(
            split_operator("sev>low"),
            Some(("sev", Comparison::GreaterThan, "low"))
        );
        assert_eq!(
            split_operator("pluginid=1,2"),
            Some(("pluginid", Comparison::Equals, "1,2"))
        );
        assert_eq!(split_operator("pluginid"), None);
    }

    #[test]
    fn test_strip_negation() {
        assert_eq!(strip_negation("not sev=non"), (true, "sev=non"));
        assert_eq!(strip_negation("sev=non"), (false, "sev=non"));
        assert_eq!(strip_negation("nothing=1"), (false, "nothing=1"));
    }

    #[test]
    fn test_split_values_lowercases() {
        assert_eq!(split_values("SSL, TLS"), vec!["ssl", "tls"]);
    }
}
