//! Integration tests for render and year change in memory.

use permitlens_core::SelectionPolicy;
use permitlens_render::MountPoint;
use permitlens_spec::Selection;
use permitlens_spec::builder::panels;
use serde_json::json;

use crate::common::TestHarness;

#[test]
fn test_year_change_then_all_leaves_one_child() {
    let harness = TestHarness::new();
    let mut session = harness.memory_session();

    session.on_year_change("2020").unwrap();
    let report = session.on_year_change("all").unwrap();

    assert_eq!(report.render_count, 2);
    assert_eq!(session.mount().child_count(), 1);

    let spec = &session.mount().current().unwrap().spec;
    let cost = spec.panel(panels::COST_HISTOGRAM).unwrap();
    assert_eq!(cost.params.len(), 1);
    assert_eq!(cost.params[0].name, Selection::Cost.name());
    assert_eq!(cost.params[0].value, None);
}

#[test]
fn test_all_year_uses_match_all_predicate() {
    let harness = TestHarness::new();
    let mut session = harness.memory_session();
    session.on_year_change("").unwrap();

    let spec = &session.mount().current().unwrap().spec;
    for panel in spec.panels() {
        assert!(
            panel
                .expression_filters()
                .all(|expr| !expr.contains("year(datum.ISSUE_DATE)")),
            "{} still filters by year",
            panel.label()
        );
    }
}

#[test]
fn test_every_render_sees_five_panels_in_interaction_order() {
    let harness = TestHarness::new();
    let mut session = harness.memory_session();
    for year in ["2018", "2019", "all", "2023"] {
        let report = session.on_year_change(year).unwrap();
        assert_eq!(
            report.interaction_order,
            [
                panels::SCATTER,
                panels::PERMIT_TYPES,
                panels::COST_HISTOGRAM,
                panels::TIME_SERIES,
                panels::COMMUNITY_MAP,
            ]
        );
        assert_eq!(session.mount().child_count(), 1);
    }
    assert_eq!(session.render_count(), 4);
}

#[test]
fn test_retain_policy_survives_year_change() {
    let harness = TestHarness::with_policy(SelectionPolicy::Retain);
    let mut session = harness.memory_session();
    let interval = json!({"x": [1000, 25000]});
    session.record_selection(Selection::Cost, interval.clone());

    session.on_year_change("2021").unwrap();
    session.on_year_change("all").unwrap();

    let spec = &session.mount().current().unwrap().spec;
    let cost = spec.panel(panels::COST_HISTOGRAM).unwrap();
    assert_eq!(cost.params[0].value, Some(interval));
}
