//! Integration tests for the command functions with a config file on disk.

use permitlens_cli::commands;
use permitlens_cli::config_handlers::{cmd_config_init, cmd_config_set};
use permitlens_core::{ConfigManager, DashboardConfig};

use crate::common::TestHarness;

#[test]
fn test_config_file_drives_spec_output() {
    let harness = TestHarness::new();
    let path = harness.dir.path().join("config.toml");
    let path_str = path.to_str().unwrap();

    cmd_config_init::<DashboardConfig>(Some(path_str), false).unwrap();
    cmd_config_set::<DashboardConfig>(Some(path_str), "cost.max_cost", "250000").unwrap();
    cmd_config_set::<DashboardConfig>(Some(path_str), "layout.scatter_width", "640").unwrap();

    let config = DashboardConfig::load(Some(path_str)).unwrap();
    let json = commands::spec_json(&config, Some("2020"), true).unwrap();
    assert!(json.contains("datum.COST <= 250000"));
    assert!(json.contains("\"width\":640"));
}

#[test]
fn test_page_and_render_outputs() {
    let harness = TestHarness::new();
    let page = harness.dir.path().join("index.html");
    let spec = harness.dir.path().join("out/dashboard.vl.json");

    commands::write_page(&harness.config, None, &page).unwrap();
    let report = commands::render_to_file(&harness.config, Some("2023"), &spec).unwrap();

    assert!(std::fs::read_to_string(&page).unwrap().contains("const SPECS"));
    assert_eq!(report.render_count, 1);

    let summary = commands::validate(&harness.config, Some(&spec)).unwrap();
    assert_eq!(summary.order, report.interaction_order);
}
