//! Common test utilities for permitlens-cli integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use permitlens_cli::serve::{AppState, router};
use permitlens_core::DashboardConfig;
use tempfile::TempDir;
use tower::ServiceExt;

/// Records file contents used by the harness.
pub const SAMPLE_CSV: &str = "RECORD_ID,PERMIT_TYPE,WORK_TYPE,COMMUNITY_AREA_NAME,COMMUNITY_UPPER,REPORTED_COST,ISSUE_DATE,x,y\n\
1,PERMIT - NEW CONSTRUCTION,New,Hyde Park,HYDE PARK,125000,2019-04-02,0.1,-0.3\n";

/// Test harness: a data directory plus a router serving it.
pub struct TestHarness {
    /// Scratch data directory.
    pub dir: TempDir,
    /// Configuration the router was built with.
    pub config: DashboardConfig,
}

impl TestHarness {
    /// Harness with the default config and a sample records file.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let config = DashboardConfig::default();
        std::fs::write(dir.path().join(&config.data.records_url), SAMPLE_CSV)
            .expect("write records");
        Self { dir, config }
    }

    /// A fresh router over the harness state.
    pub fn router(&self) -> Router {
        let state = AppState::new(self.config.clone(), self.dir.path()).expect("valid config");
        router(state)
    }

    /// Send a GET request and return the response.
    pub async fn get(&self, uri: &str) -> Response<axum::body::Body> {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("build request");
        self.router().oneshot(request).await.expect("infallible")
    }

    /// Send a GET request and return status and body text.
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let response = self.get(uri).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
    }

    /// Send a GET request and parse the body as JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, text) = self.get_text(uri).await;
        (status, serde_json::from_str(&text).expect("json body"))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
