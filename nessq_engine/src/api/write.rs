//! # Template Write
//!
//! Copies a report template line by line. A line starting with the marker
//! prefix (`%%%NESSQ:` by default) is replaced by the output of the query
//! that follows the prefix; a marker body containing `portscan` runs the
//! portscan query instead. Afterwards the plugins that no marker matched are
//! reported so the author can see what the template does not cover yet.
//!
//! Plugins matched by a portscan marker count as covered. They are the
//! scanner plugins, which report at severity `non` and would stay below the
//! default reporting threshold anyway.
//!
//! A first line of the form `%%%NESSQ:list=<path>,table=<path>` swaps the
//! built-in list and table output for custom templates (see
//! [`CustomTemplate`]). It must name both files and is not copied to the
//! output.

use super::errors::WriteError;
use super::listing::plugin_diff;
use super::query::{fetch, portscan_matches, run_query};
use crate::results::{CustomTemplate, MatchedPlugin, OutputFormat, Renderer};
use crate::types::{Collection, Plugin};
use nessq_query::config::constants::defaults;
use nessq_query::config::runtime::OutputPreferences;
use nessq_query::logging::codes;
use nessq_query::{log_debug, log_error, log_success, log_warning};
use std::fs;
use std::path::{Path, PathBuf};

/// What [`render_template`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateStats {
    pub lines: usize,
    pub markers: usize,
    /// Plugins matched by any marker, unique by id in first-seen order
    pub matched_plugins: Vec<MatchedPlugin>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub output_path: PathBuf,
    pub lines_written: usize,
    pub markers_replaced: usize,
    pub matched_plugins: Vec<MatchedPlugin>,
    /// Never-matched plugins at or above the configured severity, most severe first
    pub unmatched_plugins: Vec<Plugin>,
}

fn merge_plugins(into: &mut Vec<MatchedPlugin>, plugins: Vec<MatchedPlugin>) {
    for plugin in plugins {
        if !into.iter().any(|p| p.id == plugin.id) {
            into.push(plugin);
        }
    }
}

/// Read the custom format header from a marker body, if it is one
fn parse_format_header(body: &str) -> Result<Option<CustomTemplate>, WriteError> {
    let mut list = None;
    let mut table = None;

    for part in body.split(',') {
        match part.split_once('=') {
            Some((key, path)) if key.trim() == "list" => list = Some(PathBuf::from(path.trim())),
            Some((key, path)) if key.trim() == "table" => table = Some(PathBuf::from(path.trim())),
            _ => {}
        }
    }

    match (list, table) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(WriteError::MissingTableTemplate),
        (None, Some(_)) => Err(WriteError::MissingListTemplate),
        (Some(list), Some(table)) => {
            log_debug!("Custom format header",
                "list" => list.display(),
                "table" => table.display()
            );
            CustomTemplate::by_mode(&list, &table)
                .map(Some)
                .map_err(|source| WriteError::CustomTemplate { source })
        }
    }
}

/// Expand every marker line of `template`
pub fn render_template(
    template: &str,
    collection: &Collection,
    preferences: &OutputPreferences,
) -> Result<(String, TemplateStats), WriteError> {
    let mut output = String::with_capacity(template.len());
    let mut stats = TemplateStats::default();
    let mut lines = template.lines().peekable();

    let custom = match lines
        .peek()
        .and_then(|first| first.strip_prefix(preferences.marker_prefix.as_str()))
    {
        Some(body) => parse_format_header(body.trim())?,
        None => None,
    };
    if custom.is_some() {
        lines.next();
        stats.lines += 1;
    }

    let renderer = match &custom {
        Some(template) => Renderer::Custom(template),
        None => Renderer::Builtin(OutputFormat::Auto),
    };

    for line in lines {
        stats.lines += 1;

        let Some(body) = line.strip_prefix(preferences.marker_prefix.as_str()) else {
            output.push_str(line);
            output.push('\n');
            continue;
        };

        let body = body.trim();
        log_debug!("Expanding marker", "line" => stats.lines, "marker" => body);

        let mut matches = if body.contains(defaults::PORTSCAN_MARKER) {
            portscan_matches(collection, preferences)
        } else {
            run_query(body, collection)
        };

        let rendered = if matches.is_empty() {
            preferences.no_match_placeholder()
        } else {
            fetch(&mut matches, renderer).map_err(|source| WriteError::Render {
                marker: body.to_string(),
                source,
            })?
        };

        output.push_str(rendered.trim_end_matches('\n'));
        output.push('\n');
        merge_plugins(&mut stats.matched_plugins, matches.matched_plugins);
        stats.markers += 1;
    }

    Ok((output, stats))
}

/// Fill `template` and write the result to `output_path`
pub fn write_template(
    template: &Path,
    output_path: &Path,
    collection: &Collection,
    preferences: &OutputPreferences,
) -> Result<WriteReport, WriteError> {
    if !template.is_file() {
        log_error!(
            codes::output::TEMPLATE_FAILURE,
            "Template file does not exist",
            "path" => template.display()
        );
        return Err(WriteError::TemplateNotFound {
            path: template.to_path_buf(),
        });
    }

    let content = fs::read_to_string(template).map_err(|source| WriteError::ReadTemplate {
        path: template.to_path_buf(),
        source,
    })?;

    let (rendered, stats) = render_template(&content, collection, preferences)?;

    fs::write(output_path, rendered).map_err(|source| {
        log_error!(
            codes::output::WRITE_FAILURE,
            "Failed to write output file",
            "path" => output_path.display()
        );
        WriteError::WriteOutput {
            path: output_path.to_path_buf(),
            source,
        }
    })?;

    log_success!(
        codes::success::TEMPLATE_WRITTEN,
        "Template written",
        "path" => output_path.display(),
        "markers" => stats.markers
    );

    let unmatched_plugins: Vec<Plugin> = plugin_diff(&stats.matched_plugins, &collection.all_plugins)
        .into_iter()
        .filter(|p| p.severity >= preferences.unmatched_min_severity)
        .collect();

    if !unmatched_plugins.is_empty() {
        log_warning!(
            code = codes::output::UNMATCHED_PLUGINS,
            "Template leaves plugins unmatched",
            "count" => unmatched_plugins.len(),
            "min_severity" => preferences.unmatched_min_severity
        );
    }

    Ok(WriteReport {
        output_path: output_path.to_path_buf(),
        lines_written: stats.lines,
        markers_replaced: stats.markers,
        matched_plugins: stats.matched_plugins,
        unmatched_plugins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::OutputError;
    use crate::types::Finding;
    use assert_matches::assert_matches;
    use nessq_query::Severity;

    fn collection() -> Collection {
        let mut collection = Collection::new();
        for (ip, port, id, name, severity) in [
            ("10.0.0.1", "445/tcp", "57608", "SMB Signing not required", "2"),
            ("10.0.0.2", "445/tcp", "57608", "SMB Signing not required", "2"),
            ("10.0.0.1", "443/tcp", "104743", "TLS Version 1.0 Protocol Detection", "2"),
            ("10.0.0.1", "80/tcp", "85582", "Web Application Potentially Vulnerable to Clickjacking", "2"),
            ("10.0.0.1", "22/tcp", "11219", "Nessus SYN scanner", "0"),
            ("10.0.0.2", "3389/tcp", "18405", "RDP Server Man-in-the-Middle Weakness", "3"),
            ("10.0.0.2", "0/tcp", "19506", "Nessus Scan Information", "0"),
        ] {
            collection.register_plugin(id, name, severity);
            collection.add_finding(ip, None, port, Finding::new(id, name, severity));
        }
        collection
    }

    fn preferences() -> OutputPreferences {
        OutputPreferences {
            marker_prefix: "%%%NESSQ:".to_string(),
            portscan_query: defaults::PORTSCAN_QUERY.to_string(),
            unmatched_min_severity: Severity::Medium,
        }
    }

    #[test]
    fn test_markers_replaced_and_text_kept() {
        let template = "# Findings\n\n## SMB\n%%%NESSQ:pluginid=57608\n\n## Ports\n%%%NESSQ:portscan\n";
        let (output, stats) = render_template(template, &collection(), &preferences()).unwrap();

        assert_eq!(stats.markers, 2);
        assert_eq!(stats.lines, 7);
        assert!(output.starts_with("# Findings\n\n## SMB\nQuery: pluginid=57608\n"));
        assert!(output.contains("Affected ports: 445/tcp"));
        assert!(output.contains("- [Non] 11219 - Nessus SYN scanner"));
        assert!(!output.contains("%%%NESSQ:"));
    }

    #[test]
    fn test_marker_without_match_gives_placeholder() {
        let (output, stats) =
            render_template("%%%NESSQ:pluginid=1\n", &collection(), &preferences()).unwrap();

        assert_eq!(output, "%%%NESSQ: no hosts matched!!\n");
        assert!(stats.matched_plugins.is_empty());
    }

    #[test]
    fn test_write_template_reports_unmatched() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("report.md");
        let output = dir.path().join("out.md");
        fs::write(&template, "%%%NESSQ:pluginname=smb or pluginname=tls\n").unwrap();

        let report = write_template(&template, &output, &collection(), &preferences()).unwrap();

        assert_eq!(report.markers_replaced, 1);
        let unmatched: Vec<&str> = report.unmatched_plugins.iter().map(|p| p.id.as_str()).collect();
        // Info level plugins are filtered, higher severities first
        assert_eq!(unmatched, vec!["18405", "85582"]);
        assert!(fs::read_to_string(&output).unwrap().contains("57608"));
    }

    #[test]
    fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_template(
            &dir.path().join("missing.md"),
            &dir.path().join("out.md"),
            &collection(),
            &preferences(),
        );
        assert_matches!(result, Err(WriteError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("report.md");
        fs::write(&template, "plain text\n").unwrap();

        let result = write_template(
            &template,
            &dir.path().join("no-such-dir").join("out.md"),
            &collection(),
            &preferences(),
        );
        assert_matches!(result, Err(WriteError::WriteOutput { .. }));
    }

    fn custom_format_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("list.tmpl"),
            "LIST {{ all_same_ports }}:{% for line in finding_lines %} {{ line.host }}{% endfor %}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("table.tmpl"),
            "{% for line in finding_lines %}TABLE {{ line.host }} {{ line.comment }}\n{% endfor %}",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_custom_format_header() {
        let dir = custom_format_dir();
        let template = format!(
            "%%%NESSQ:list={},table={}\n# Findings\n%%%NESSQ:pluginid=57608\n%%%NESSQ:pluginname=tls or pluginid=18405\n",
            dir.path().join("list.tmpl").display(),
            dir.path().join("table.tmpl").display()
        );

        let (output, stats) = render_template(&template, &collection(), &preferences()).unwrap();

        assert_eq!(
            output,
            "# Findings\n\
LIST 445/tcp: 10.0.0.1 10.0.0.2\n\
TABLE 10.0.0.1 443/tcp:104743\n\
TABLE 10.0.0.2 3389/tcp:18405\n"
        );
        assert_eq!(stats.markers, 2);
        assert_eq!(stats.lines, 4);
    }

    #[test]
    fn test_custom_format_header_needs_both_templates() {
        let dir = custom_format_dir();
        let list_only = format!(
            "%%%NESSQ:list={}\n%%%NESSQ:pluginid=57608\n",
            dir.path().join("list.tmpl").display()
        );
        assert_matches!(
            render_template(&list_only, &collection(), &preferences()),
            Err(WriteError::MissingTableTemplate)
        );

        let table_only = format!(
            "%%%NESSQ:table={}\n",
            dir.path().join("table.tmpl").display()
        );
        assert_matches!(
            render_template(&table_only, &collection(), &preferences()),
            Err(WriteError::MissingListTemplate)
        );
    }

    #[test]
    fn test_custom_format_header_with_missing_file() {
        let dir = custom_format_dir();
        let template = format!(
            "%%%NESSQ:list={},table={}\n",
            dir.path().join("list.tmpl").display(),
            dir.path().join("absent.tmpl").display()
        );
        assert_matches!(
            render_template(&template, &collection(), &preferences()),
            Err(WriteError::CustomTemplate {
                source: OutputError::TemplateNotFound { .. }
            })
        );
    }

    #[test]
    fn test_custom_format_header_only_on_first_line() {
        let dir = custom_format_dir();
        let template = format!(
            "# Findings\n%%%NESSQ:list={},table={}\n",
            dir.path().join("list.tmpl").display(),
            dir.path().join("table.tmpl").display()
        );

        // Later on it is an ordinary marker whose query matches nothing
        let (output, _) = render_template(&template, &collection(), &preferences()).unwrap();
        assert_eq!(output, "# Findings\n%%%NESSQ: no hosts matched!!\n");
    }

    #[test]
    fn test_placeholder_uses_configured_prefix() {
        let preferences = OutputPreferences {
            marker_prefix: "<!-- nessq:".to_string(),
            ..preferences()
        };
        let (output, _) =
            render_template("<!-- nessq:pluginid=1\n", &collection(), &preferences).unwrap();
        assert_eq!(output, "<!-- nessq: no hosts matched!!\n");
    }

    #[test]
    fn test_portscan_marker_plugins_count_as_covered() {
        let (_, stats) =
            render_template("%%%NESSQ: portscan\n", &collection(), &preferences()).unwrap();

        let ids: Vec<&str> = stats.matched_plugins.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["11219"]);
        assert_eq!(stats.matched_plugins[0].severity, Severity::None);
    }
}
