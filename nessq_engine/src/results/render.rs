//! # Rendering
//!
//! Turns a sorted [`Matches`] into renderer rows ([`RenderInput`]) and from
//! there into one of the built-in output shapes:
//!
//! - **list**: plugin summary, the shared affected ports, one bullet per host
//! - **table**: Markdown table of host, affected ports and plugins per port
//! - **json**: the [`RenderInput`] itself
//!
//! [`OutputFormat::Auto`] chooses between list and table through
//! [`resolve_render_mode`]. [`Renderer`] also admits a custom template in
//! place of the built-in shapes.

use super::content::{affected_ports, resolve_render_mode, RenderMode};
use super::error::OutputError;
use super::matches::{Header, MatchedPlugin, Matches};
use super::template::{render_custom, CustomTemplate};
use crate::types::Host;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

const PORT_JOIN: &str = ", ";

/// One output row per matched host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingLine {
    /// `"ip (fqdn)"` or `"ip"`
    pub host: String,
    /// Affected port-keys in numeric order, joined with `", "`
    pub affected_ports: String,
    /// Plugin ids per port, e.g. `"80/tcp:1,2|443/tcp:3"`
    pub comment: String,
}

impl FindingLine {
    pub fn from_host(host: &Host) -> Self {
        let ports = affected_ports(host);

        let comment = ports
            .iter()
            .map(|port_key| {
                let ids: Vec<&str> = host
                    .findings
                    .get(port_key)
                    .map(|findings| findings.iter().map(|f| f.plugin_id.as_str()).collect())
                    .unwrap_or_default();
                format!("{}:{}", port_key, ids.join(","))
            })
            .collect::<Vec<_>>()
            .join("|");

        Self {
            host: host.display_name(),
            affected_ports: ports.join(PORT_JOIN),
            comment,
        }
    }
}

/// Everything a renderer needs, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderInput {
    pub header: Header,
    pub matched_plugins: Vec<MatchedPlugin>,
    /// Shared affected ports joined with `", "`, empty unless in list mode
    pub all_same_ports: String,
    pub finding_lines: Vec<FindingLine>,
}

impl RenderInput {
    /// Build rows from a [`Matches`] whose orderings have been applied
    pub fn from_matches(matches: &Matches) -> Self {
        Self {
            header: matches.header.clone(),
            matched_plugins: matches.matched_plugins.clone(),
            all_same_ports: matches.all_same_ports.join(PORT_JOIN),
            finding_lines: matches.sorted_hosts().map(FindingLine::from_host).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// List when all hosts share their affected ports, table otherwise
    #[default]
    Auto,
    List,
    Table,
    Json,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 4] = ["auto", "list", "table", "json"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::List => "list",
            Self::Table => "table",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "list" => Ok(Self::List),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(OutputError::unsupported_format(other, &Self::NAMES)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn write_header(out: &mut String, input: &RenderInput) -> fmt::Result {
    writeln!(out, "Query: {}", input.header.query)?;
    writeln!(out, "Time:  {}", input.header.call_time)?;
    writeln!(out)
}

fn write_plugins(out: &mut String, input: &RenderInput) -> fmt::Result {
    writeln!(out, "Plugins:")?;
    for plugin in &input.matched_plugins {
        writeln!(out, "- [{}] {} - {}", plugin.severity.label(), plugin.id, plugin.name)?;
    }
    writeln!(out)
}

pub fn render_list(input: &RenderInput) -> Result<String, OutputError> {
    let mut out = String::new();
    write_header(&mut out, input)?;
    write_plugins(&mut out, input)?;

    if input.all_same_ports.is_empty() {
        // Forced list output without a shared port set
        writeln!(out, "Hosts:")?;
        for line in &input.finding_lines {
            writeln!(out, "- {} ({})", line.host, line.affected_ports)?;
        }
    } else {
        writeln!(out, "Affected ports: {}", input.all_same_ports)?;
        writeln!(out)?;
        writeln!(out, "Hosts:")?;
        for line in &input.finding_lines {
            writeln!(out, "- {}", line.host)?;
        }
    }

    Ok(out)
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

pub fn render_table(input: &RenderInput) -> Result<String, OutputError> {
    let mut out = String::new();
    write_header(&mut out, input)?;
    write_plugins(&mut out, input)?;

    writeln!(out, "| Host | Affected Ports | Plugins |")?;
    writeln!(out, "|------|----------------|---------|")?;
    for line in &input.finding_lines {
        writeln!(
            out,
            "| {} | {} | {} |",
            table_cell(&line.host),
            table_cell(&line.affected_ports),
            table_cell(&line.comment)
        )?;
    }

    Ok(out)
}

pub fn render_json(input: &RenderInput) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(input)?)
}

/// Sort, decide the output shape and render.
///
/// Fails with [`MatchError::NoMatchedHosts`](super::MatchError::NoMatchedHosts)
/// when nothing matched; callers that want a placeholder check first.
pub fn render(matches: &mut Matches, format: OutputFormat) -> Result<String, OutputError> {
    matches.sort_matched_plugins();
    matches.sort_by_ip();
    let mode = resolve_render_mode(matches)?;

    let input = RenderInput::from_matches(matches);
    match (format, mode) {
        (OutputFormat::Json, _) => render_json(&input),
        (OutputFormat::List, _) | (OutputFormat::Auto, RenderMode::List { .. }) => {
            render_list(&input)
        }
        (OutputFormat::Table, _) | (OutputFormat::Auto, RenderMode::Table) => render_table(&input),
    }
}

/// Built-in output shape or custom template
#[derive(Debug, Clone, Copy)]
pub enum Renderer<'t> {
    Builtin(OutputFormat),
    Custom(&'t CustomTemplate),
}

impl Renderer<'_> {
    pub fn render(self, matches: &mut Matches) -> Result<String, OutputError> {
        match self {
            Renderer::Builtin(format) => render(matches, format),
            Renderer::Custom(template) => render_custom(matches, template),
        }
    }
}

impl From<OutputFormat> for Renderer<'_> {
    fn from(format: OutputFormat) -> Self {
        Renderer::Builtin(format)
    }
}

impl<'t> From<&'t CustomTemplate> for Renderer<'t> {
    fn from(template: &'t CustomTemplate) -> Self {
        Renderer::Custom(template)
    }
}
