//! Host name resolution from name-disclosure plugins
//!
//! | Plugin | Source | Output shape |
//! |--------|--------|--------------|
//! | 12053 | FQDN resolution | `10.0.0.5 resolves as host.example.com.` |
//! | 10150 | NetBIOS / SMB | `HOSTNAME = Computer name` table |
//! | 42410 | NTLMSSP | same table as 10150 |
//! | 53513 | LLMNR | `... the name of the remote host is 'HOSTNAME'.` |
//! | 55472 | Device hostname | `Hostname : HOSTNAME` |
//!
//! 12053 wins whenever it yields a name. Otherwise the first finding (in
//! port-key order) from the other plugins that yields a name is used.

use crate::types::Host;
use nessq_query::logging::codes;
use nessq_query::{log_debug, log_error};
use regex::Regex;
use std::sync::OnceLock;

pub const FQDN_RESOLUTION: &str = "12053";
pub const NETBIOS_NAMES: &str = "10150";
pub const NTLMSSP_NAMES: &str = "42410";
pub const LLMNR_DETECTION: &str = "53513";
pub const DEVICE_HOSTNAME: &str = "55472";

static LAST_WORD: OnceLock<Option<Regex>> = OnceLock::new();
static NETBIOS_LINE: OnceLock<Option<Regex>> = OnceLock::new();
static QUOTED: OnceLock<Option<Regex>> = OnceLock::new();
static KEY_VALUE: OnceLock<Option<Regex>> = OnceLock::new();

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log_error!(
                codes::system::INTERNAL_ERROR,
                "Invalid hostname pattern",
                "pattern" => pattern,
                "error" => e
            );
            None
        }
    })
    .as_ref()
}

fn non_empty(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// 12053: last word of the output without its trailing dot
pub fn parse_fqdn_resolution(output: &str) -> Option<String> {
    let regex = cached(&LAST_WORD, r"(?m)\S+$")?;
    let word = regex.find(output.trim_end_matches('\n'))?.as_str();
    non_empty(word.strip_suffix('.').unwrap_or(word))
}

/// 10150 / 42410: first token of the first `NAME = two words` line
pub fn parse_netbios_names(output: &str) -> Option<String> {
    let regex = cached(&NETBIOS_LINE, r"\S*[ ]*=\S*(?:\s\S+){2}")?;
    let line = regex.find(output)?.as_str();
    line.split(' ').next().and_then(non_empty)
}

/// 53513: text between single quotes
pub fn parse_llmnr(output: &str) -> Option<String> {
    let regex = cached(&QUOTED, r"'(.*)'")?;
    let quoted = regex.captures(output)?.get(1)?.as_str();
    non_empty(&quoted.replace('\'', ""))
}

/// 55472: value of the first `key:value` line, spaces ignored
pub fn parse_device_hostname(output: &str) -> Option<String> {
    let regex = cached(&KEY_VALUE, r"\W*\w*:(\W*\w*).*")?;
    let compact = output.replace(' ', "");
    let line = regex.find(&compact)?.as_str();
    line.split(':').nth(1).and_then(non_empty)
}

fn parse_for_plugin(plugin_id: &str, output: &str) -> Option<String> {
    match plugin_id {
        FQDN_RESOLUTION => parse_fqdn_resolution(output),
        NETBIOS_NAMES | NTLMSSP_NAMES => parse_netbios_names(output),
        LLMNR_DETECTION => parse_llmnr(output),
        DEVICE_HOSTNAME => parse_device_hostname(output),
        _ => None,
    }
}

/// Derive a host name from the host's findings
pub fn resolve_hostname(host: &Host) -> Option<String> {
    let outputs = || {
        host.iter_findings()
            .filter_map(|(_, f)| f.output.as_deref().map(|o| (f.plugin_id.as_str(), o)))
    };

    let resolved = outputs()
        .filter(|(id, _)| *id == FQDN_RESOLUTION)
        .find_map(|(id, output)| parse_for_plugin(id, output))
        .or_else(|| {
            outputs()
                .filter(|(id, _)| *id != FQDN_RESOLUTION)
                .find_map(|(id, output)| parse_for_plugin(id, output))
        });

    match &resolved {
        Some(name) => log_debug!("Resolved host name", "ip" => host.ip, "name" => name),
        None => log_debug!("No host name found", "ip" => host.ip),
    }

    resolved
}
