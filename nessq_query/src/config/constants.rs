//! Built-in defaults used when neither the config file nor the environment
//! provides a value.

pub mod defaults {
    /// Extension of report files picked up when walking a directory
    pub const FILE_EXTENSION: &str = "nessus";

    /// Prefix marking a template line that is replaced by query output
    pub const MARKER_PREFIX: &str = "%%%NESSQ:";

    /// Marker body selecting the portscan shortcut instead of a query
    pub const PORTSCAN_MARKER: &str = "portscan";

    /// Nessus SYN scanner (11219), UDP scanner (34277) and service detection (10335).
    /// `port=0` entries are host-level results and carry no service.
    pub const PORTSCAN_QUERY: &str = "pluginid=11219,34277,10335 and not port=0";

    /// Appended to the marker prefix in place of a report when nothing matched
    pub const NO_MATCH_MESSAGE: &str = "no hosts matched!!";
}

/// Placeholder line for an empty result, e.g. `%%%NESSQ: no hosts matched!!`
pub fn no_match_placeholder(marker_prefix: &str) -> String {
    format!("{} {}", marker_prefix, defaults::NO_MATCH_MESSAGE)
}
