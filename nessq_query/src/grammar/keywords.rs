//! Clause keywords recognized by the query language

pub const PLUGIN_ID: &str = "pluginid";
pub const PLUGIN_NAME: &str = "pluginname";
pub const SEVERITY: &str = "sev";
pub const PORT: &str = "port";
pub const IP: &str = "ip";
