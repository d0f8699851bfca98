//! Parse a report from disk, query it and render the result

use assert_matches::assert_matches;
use nessq_engine::prelude::*;
use std::fs;

const REPORT: &str = r#"<?xml version="1.0" ?>
<NessusClientData_v2>
  <Report name="quarterly">
    <ReportHost name="10.0.0.10">
      <ReportItem port="0" protocol="tcp" severity="0" pluginID="12053" pluginName="Host Fully Qualified Domain Name (FQDN) Resolution">
        <description>FQDN</description>
        <plugin_output>10.0.0.10 resolves as app.corp.local.</plugin_output>
      </ReportItem>
      <ReportItem port="443" protocol="tcp" severity="2" pluginID="104743" pluginName="TLS Version 1.0 Protocol Detection">
        <description>TLS 1.0</description>
      </ReportItem>
      <ReportItem port="8443" protocol="tcp" severity="2" pluginID="104743" pluginName="TLS Version 1.0 Protocol Detection">
        <description>TLS 1.0</description>
      </ReportItem>
      <ReportItem port="443" protocol="tcp" severity="0" pluginID="11219" pluginName="Nessus SYN scanner">
        <description>Port scan</description>
      </ReportItem>
    </ReportHost>
    <ReportHost name="10.0.0.2">
      <ReportItem port="5355" protocol="udp" severity="0" pluginID="53513" pluginName="Link-Local Multicast Name Resolution (LLMNR) Detection">
        <description>LLMNR</description>
        <plugin_output>According to LLMNR, the name of the remote host is 'WKS02'.</plugin_output>
      </ReportItem>
      <ReportItem port="443" protocol="tcp" severity="3" pluginID="104743" pluginName="TLS Version 1.0 Protocol Detection">
        <description>TLS 1.0</description>
      </ReportItem>
      <ReportItem port="8443" protocol="tcp" severity="2" pluginID="104743" pluginName="TLS Version 1.0 Protocol Detection">
        <description>TLS 1.0</description>
      </ReportItem>
      <ReportItem port="3389" protocol="tcp" severity="4" pluginID="18405" pluginName="RDP Server Man-in-the-Middle Weakness">
        <description>RDP</description>
      </ReportItem>
    </ReportHost>
  </Report>
</NessusClientData_v2>
"#;

fn load() -> Collection {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("quarterly.nessus"), REPORT).unwrap();
    parse_path(dir.path(), &NessqConfig::default().ingest).unwrap()
}

#[test]
fn test_uniform_ports_render_as_list() {
    let collection = load();
    let mut matches = run_query("pluginname=tls", &collection);

    assert_eq!(matches.collection.count_matched_hosts, 2);
    assert_eq!(matches.collection.count_matched_ports, 4);
    assert_eq!(matches.matched_plugins.len(), 1);

    let output = fetch(&mut matches, OutputFormat::Auto).unwrap();
    assert!(output.contains("Affected ports: 443/tcp, 8443/tcp"));

    // Numeric address order: .2 before .10
    let first = output.find("- 10.0.0.2 (WKS02)").unwrap();
    let second = output.find("- 10.0.0.10 (app.corp.local)").unwrap();
    assert!(first < second);
}

#[test]
fn test_mixed_ports_render_as_table() {
    let collection = load();
    let mut matches = run_query("sev>=med", &collection);

    assert_eq!(matches.matched_plugins[0].id, "104743");
    let output = fetch(&mut matches, OutputFormat::Auto).unwrap();

    assert!(output.contains("| 10.0.0.2 (WKS02) | 443/tcp, 3389/tcp, 8443/tcp |"));
    assert!(output.contains("| 10.0.0.10 (app.corp.local) | 443/tcp, 8443/tcp |"));
    // After sorting the critical plugin leads the summary
    assert_eq!(matches.matched_plugins[0].id, "18405");
}

#[test]
fn test_json_output_round_trips_rows() {
    let collection = load();
    let mut matches = run_query("ip=10.0.0.2 and not sev=non", &collection);
    let json = fetch(&mut matches, OutputFormat::Json).unwrap();

    let input: RenderInput = serde_json::from_str(&json).unwrap();
    assert_eq!(input.finding_lines.len(), 1);
    assert_eq!(input.finding_lines[0].comment, "443/tcp:104743|3389/tcp:18405|8443/tcp:104743");
}

#[test]
fn test_no_match() {
    let collection = load();
    let mut matches = run_query("pluginid=99999", &collection);

    assert_eq!(matches.collection.count_matched_hosts, 0);
    assert_eq!(
        fetch(&mut matches, OutputFormat::Auto).unwrap(),
        "%%%NESSQ: no hosts matched!!"
    );
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_path(&dir.path().join("absent"), &NessqConfig::default().ingest);
    assert_matches!(result, Err(IngestError::PathNotFound { .. }));
}
