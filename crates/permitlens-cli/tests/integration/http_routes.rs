//! Integration tests for the HTTP routes.

use axum::http::{StatusCode, header};
use permitlens_spec::{SelectionGraph, ViewSpec};

use crate::common::{SAMPLE_CSV, TestHarness};

#[tokio::test]
async fn test_index_serves_live_page() {
    let harness = TestHarness::new();
    let (status, html) = harness.get_text("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<select id=\"yearSelector\">"));
    assert!(html.contains("fetch(\"/api/spec\""));
}

#[tokio::test]
async fn test_index_marks_requested_year() {
    let harness = TestHarness::new();
    let (status, html) = harness.get_text("/?year=2021").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<option value=\"2021\" selected>2021</option>"));
}

#[tokio::test]
async fn test_spec_endpoint_builds_for_year() {
    let harness = TestHarness::new();
    let (status, body) = harness.get_json("/api/spec?year=2019").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["$schema"], "https://vega.github.io/schema/vega-lite/v5.json");

    let text = body.to_string();
    assert!(text.contains("year(datum.ISSUE_DATE) == 2019"));

    let spec: ViewSpec = serde_json::from_value(body).unwrap();
    assert_eq!(SelectionGraph::from_spec(&spec).unwrap().panel_count(), 5);
}

#[tokio::test]
async fn test_spec_endpoint_defaults_to_all_years() {
    let harness = TestHarness::new();
    let (status, body) = harness.get_json("/api/spec").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.to_string().contains("year(datum.ISSUE_DATE)"));

    let (_, explicit) = harness.get_json("/api/spec?year=all").await;
    assert_eq!(body, explicit);
}

#[tokio::test]
async fn test_spec_endpoint_rejects_bad_year() {
    let harness = TestHarness::new();
    let (status, body) = harness.get_json("/api/spec?year=1;drop").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("year"));
}

#[tokio::test]
async fn test_health() {
    let harness = TestHarness::new();
    let (status, body) = harness.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_data_file_served_with_content_type() {
    let harness = TestHarness::new();
    let response = harness.get("/embeddings_2d_pca_sample.csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/csv"), "{content_type}");

    let (_, text) = harness.get_text("/embeddings_2d_pca_sample.csv").await;
    assert_eq!(text, SAMPLE_CSV);
}

#[tokio::test]
async fn test_missing_data_file_is_404() {
    let harness = TestHarness::new();
    let (status, _) = harness.get_text("/ChicagoNeighborhoods.geojson").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_percent_encoded_data_file_is_decoded() {
    let harness = TestHarness::new();
    std::fs::write(harness.dir.path().join("permits 2024.csv"), SAMPLE_CSV).unwrap();

    let (status, text) = harness.get_text("/permits%202024.csv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, SAMPLE_CSV);
}

#[tokio::test]
async fn test_nested_data_file_is_served() {
    let harness = TestHarness::new();
    let geo = harness.dir.path().join("geo");
    std::fs::create_dir(&geo).unwrap();
    std::fs::write(geo.join("areas.geojson"), "{\"type\":\"FeatureCollection\"}").unwrap();

    let (status, body) = harness.get_json("/geo/areas.geojson").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let harness = TestHarness::new();
    let (status, _) = harness.get_text("/../Cargo.toml").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = harness.get_text("/%2e%2e/Cargo.toml").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
