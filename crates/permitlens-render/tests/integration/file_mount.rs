//! Integration tests for rendering into a spec file.

use permitlens_render::MountPoint;
use permitlens_spec::{SelectionGraph, ViewSpec};

use crate::common::TestHarness;

#[test]
fn test_file_session_replaces_spec_on_each_render() {
    let harness = TestHarness::new();
    let mut session = harness.file_session("dashboard.vl.json");

    session.render().unwrap();
    session.on_year_change("2022").unwrap();
    assert_eq!(session.mount().child_count(), 1);

    let text = std::fs::read_to_string(harness.path("dashboard.vl.json")).unwrap();
    assert!(text.contains("year(datum.ISSUE_DATE) == 2022"));

    let spec: ViewSpec = serde_json::from_str(&text).unwrap();
    let graph = SelectionGraph::from_spec(&spec).unwrap();
    assert_eq!(graph.panel_count(), 5);
}

#[test]
fn test_file_session_creates_parent_directories() {
    let harness = TestHarness::new();
    let mut session = harness.file_session("nested/out/dashboard.vl.json");
    session.render().unwrap();
    assert!(harness.path("nested/out/dashboard.vl.json").is_file());
}
