//! Query operations: evaluate, then fetch output as a string or print it

use crate::execution::QueryEvaluator;
use crate::results::{Matches, OutputError, Renderer};
use crate::types::Collection;
use nessq_query::config::constants::{defaults, no_match_placeholder};
use nessq_query::config::runtime::OutputPreferences;
use nessq_query::logging::codes;
use nessq_query::{log_debug, log_warning, parse_query};
use std::io::{self, Write};

/// Parse and evaluate `query` against `collection`
pub fn run_query(query: &str, collection: &Collection) -> Matches {
    let parsed = parse_query(query);
    log_debug!("Running query",
        "query" => query,
        "or_groups" => parsed.or_groups.len(),
        "clauses" => parsed.clause_count()
    );
    QueryEvaluator::new(&parsed).evaluate(collection)
}

/// Rendered output, or the no-match placeholder line when nothing matched.
///
/// `renderer` is an [`OutputFormat`](crate::results::OutputFormat) or a
/// [`CustomTemplate`](crate::results::CustomTemplate).
pub fn fetch<'t>(
    matches: &mut Matches,
    renderer: impl Into<Renderer<'t>>,
) -> Result<String, OutputError> {
    if matches.is_empty() {
        return Ok(no_match_placeholder(defaults::MARKER_PREFIX));
    }
    renderer.into().render(matches)
}

/// Write rendered output to `writer`; nothing is written when nothing matched
pub fn print_to<'t, W: Write>(
    matches: &mut Matches,
    renderer: impl Into<Renderer<'t>>,
    writer: &mut W,
) -> Result<(), OutputError> {
    if matches.is_empty() {
        log_warning!(
            code = codes::matching::NO_MATCHED_HOSTS,
            "No hosts matched the query",
            "query" => matches.query()
        );
        return Ok(());
    }

    let output = renderer.into().render(matches)?;
    writer.write_all(output.as_bytes())?;
    writer.flush()?;
    Ok(())
}

pub fn print<'t>(matches: &mut Matches, renderer: impl Into<Renderer<'t>>) -> Result<(), OutputError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    print_to(matches, renderer, &mut handle)
}

/// Evaluate the configured portscan query
pub fn portscan_matches(collection: &Collection, preferences: &OutputPreferences) -> Matches {
    run_query(&preferences.portscan_query, collection)
}

/// Fetch the output of the portscan query; the placeholder uses the configured marker prefix
pub fn portscan<'t>(
    collection: &Collection,
    preferences: &OutputPreferences,
    renderer: impl Into<Renderer<'t>>,
) -> Result<String, OutputError> {
    let mut matches = portscan_matches(collection, preferences);
    if matches.is_empty() {
        return Ok(preferences.no_match_placeholder());
    }
    renderer.into().render(&mut matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{CustomTemplate, OutputFormat};
    use crate::types::Finding;
    use nessq_query::logging::init_global_memory_logging;

    fn scan_collection() -> Collection {
        let mut collection = Collection::new();
        for (ip, port, id, severity) in [
            ("10.0.0.1", "22/tcp", "11219", "0"),
            ("10.0.0.1", "0/tcp", "11219", "0"),
            ("10.0.0.1", "443/tcp", "10335", "0"),
            ("10.0.0.1", "443/tcp", "42873", "2"),
            ("10.0.0.2", "53/udp", "34277", "0"),
        ] {
            collection.register_plugin(id, "plugin", severity);
            collection.add_finding(ip, None, port, Finding::new(id, "plugin", severity));
        }
        collection
    }

    fn preferences() -> OutputPreferences {
        OutputPreferences {
            marker_prefix: defaults::MARKER_PREFIX.to_string(),
            portscan_query: defaults::PORTSCAN_QUERY.to_string(),
            unmatched_min_severity: nessq_query::Severity::Medium,
        }
    }

    #[test]
    fn test_fetch_placeholder_when_empty() {
        let mut matches = run_query("pluginid=1", &scan_collection());
        assert_eq!(
            fetch(&mut matches, OutputFormat::Auto).unwrap(),
            "%%%NESSQ: no hosts matched!!"
        );
    }

    #[test]
    fn test_print_to_writes_nothing_when_empty() {
        let mut matches = run_query("pluginid=1", &scan_collection());
        let mut buffer = Vec::new();
        print_to(&mut matches, OutputFormat::Auto, &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_print_to_writes_output() {
        let mut matches = run_query("pluginid=42873", &scan_collection());
        let mut buffer = Vec::new();
        print_to(&mut matches, OutputFormat::List, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Query: pluginid=42873"));
        assert!(text.contains("- 10.0.0.1"));
    }

    #[test]
    fn test_portscan_skips_port_zero() {
        let matches = portscan_matches(&scan_collection(), &preferences());

        let host = matches.collection.host("10.0.0.1").unwrap();
        assert!(!host.findings.contains_key("0/tcp"));
        assert_eq!(host.findings.len(), 2);
        assert!(matches.collection.host("10.0.0.2").is_some());
        assert!(!matches.contains_plugin("42873"));
    }

    #[test]
    fn test_portscan_output_is_table_for_mixed_ports() {
        let output = portscan(&scan_collection(), &preferences(), OutputFormat::Auto).unwrap();
        assert!(output.contains("| 10.0.0.1 | 22/tcp, 443/tcp | 22/tcp:11219\\|443/tcp:10335 |"));
        assert!(output.contains("| 10.0.0.2 | 53/udp | 53/udp:34277 |"));
    }

    #[test]
    fn test_print_to_warns_when_empty() {
        let memory = init_global_memory_logging();
        let mut matches = run_query("pluginid=424242", &scan_collection());
        print_to(&mut matches, OutputFormat::Auto, &mut Vec::new()).unwrap();

        let warnings = memory.events_with_context(
            codes::matching::NO_MATCHED_HOSTS,
            "query",
            "pluginid=424242",
        );
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_print_to_custom_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.txt");
        std::fs::write(&path, "{% for line in finding_lines %}{{ line.host }} {{ line.affected_ports }}\n{% endfor %}").unwrap();
        let template = CustomTemplate::single(&path).unwrap();

        let mut matches = run_query("pluginid=11219,34277", &scan_collection());
        let mut buffer = Vec::new();
        print_to(&mut matches, &template, &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "10.0.0.1 0/tcp, 22/tcp\n10.0.0.2 53/udp\n"
        );
    }

    #[test]
    fn test_portscan_placeholder_uses_marker_prefix() {
        let preferences = OutputPreferences {
            marker_prefix: "@@report:".to_string(),
            ..preferences()
        };
        let output = portscan(&Collection::new(), &preferences, OutputFormat::Auto).unwrap();
        assert_eq!(output, "@@report: no hosts matched!!");
    }
}
