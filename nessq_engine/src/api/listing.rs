//! Plugin listing and the matched/unmatched plugin diff

use crate::results::MatchedPlugin;
use crate::types::{Collection, Plugin};
use std::collections::HashSet;

/// Every plugin seen during ingestion, most severe first (stable)
pub fn list_plugins(collection: &Collection) -> Vec<Plugin> {
    let mut plugins = collection.all_plugins.clone();
    plugins.sort_by(|a, b| b.severity.cmp(&a.severity));
    plugins
}

/// `"<id>:\t(<Sev>)\t<name>"`
pub fn format_plugin_line(plugin: &Plugin) -> String {
    format!("{}:\t({})\t{}", plugin.id, plugin.severity.label(), plugin.name)
}

/// Plugins of `all` that were never matched, most severe first
pub fn plugin_diff(matched: &[MatchedPlugin], all: &[Plugin]) -> Vec<Plugin> {
    let matched_ids: HashSet<&str> = matched.iter().map(|p| p.id.as_str()).collect();

    let mut unmatched: Vec<Plugin> = all
        .iter()
        .filter(|p| !matched_ids.contains(p.id.as_str()))
        .cloned()
        .collect();
    unmatched.sort_by(|a, b| b.severity.cmp(&a.severity));
    unmatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use nessq_query::Severity;

    fn collection() -> Collection {
        let mut collection = Collection::new();
        collection.register_plugin("10", "Low one", "1");
        collection.register_plugin("20", "Critical one", "4");
        collection.register_plugin("30", "Info", "0");
        collection.register_plugin("40", "Another low", "1");
        collection
    }

    #[test]
    fn test_list_plugins_sorted_stable() {
        let ids: Vec<String> = list_plugins(&collection()).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["20", "10", "40", "30"]);
    }

    #[test]
    fn test_format_plugin_line() {
        let plugin = Plugin {
            id: "57608".to_string(),
            name: "SMB Signing not required".to_string(),
            severity: Severity::Medium,
        };
        assert_eq!(format_plugin_line(&plugin), "57608:\t(Med)\tSMB Signing not required");
    }

    #[test]
    fn test_plugin_diff() {
        let matched = vec![MatchedPlugin {
            id: "20".to_string(),
            name: "Critical one".to_string(),
            severity: Severity::Critical,
        }];
        let collection = collection();
        let unmatched = plugin_diff(&matched, &collection.all_plugins);

        let ids: Vec<&str> = unmatched.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "40", "30"]);
    }
}
