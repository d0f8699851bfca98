//! Port-keys of the form `"<port>/<protocol>"`

use std::cmp::Ordering;

pub fn port_key(port: &str, protocol: &str) -> String {
    format!("{}/{}", port, protocol)
}

/// Text before the first `/`
pub fn port_segment(key: &str) -> &str {
    key.split_once('/').map(|(port, _)| port).unwrap_or(key)
}

/// Leading port number, `0` when it is not numeric
pub fn port_number(key: &str) -> u32 {
    port_segment(key).trim().parse().unwrap_or(0)
}

/// Numeric order on the leading port, ties broken by the full key
pub fn compare_port_keys(a: &str, b: &str) -> Ordering {
    port_number(a)
        .cmp(&port_number(b))
        .then_with(|| a.cmp(b))
}

/// Port-keys sorted by [`compare_port_keys`]
pub fn sorted_port_keys<'a, I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut keys: Vec<String> = keys.into_iter().cloned().collect();
    keys.sort_by(|a, b| compare_port_keys(a, b));
    keys
}
