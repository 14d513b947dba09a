//! HTTP server for the live dashboard.
//!
//! Routes:
//!
//! - `GET /` - the live page, `?year=` picks the initial selection
//! - `GET /api/spec?year=Y` - the spec, rebuilt on every request
//! - `GET /health` - liveness
//! - anything else - a file from the data directory via
//!   [`ServeDir`], so the relative data URLs in the spec resolve
//!
//! Configuration is immutable and shared; requests never touch shared
//! mutable state.

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use permitlens_core::{DashboardConfig, Error, YearSelection};
use permitlens_render::build_live_page;
use permitlens_spec::{SpecBuilder, ViewSpec};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Path of the spec endpoint.
pub const SPEC_ENDPOINT: &str = "/api/spec";

/// Shared, read-only server state.
#[derive(Debug)]
pub struct AppState {
    config: DashboardConfig,
    data_dir: PathBuf,
}

impl AppState {
    /// State serving `data_dir` with `config`.
    pub fn new(config: DashboardConfig, data_dir: impl Into<PathBuf>) -> permitlens_core::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            data_dir: data_dir.into(),
        })
    }
}

/// `?year=` query.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    /// Year or "all".
    pub year: Option<String>,
}

impl YearQuery {
    fn selection(&self) -> Result<YearSelection, ApiError> {
        match self.year.as_deref() {
            Some(raw) => Ok(YearSelection::parse_strict(raw)?),
            None => Ok(YearSelection::All),
        }
    }
}

/// Error response: status plus `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        } else {
            tracing::debug!(status = %self.status, error = %self.message, "request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let data_files = ServeDir::new(&state.data_dir);
    Router::new()
        .route("/", get(index))
        .route(SPEC_ENDPOINT, get(spec))
        .route("/health", get(health))
        .fallback_service(data_files)
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn run(state: AppState, addr: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    let data_dir = state.data_dir.display().to_string();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr, data_dir = %data_dir, "serving dashboard");
    axum::serve(listener, router(state))
        .await
        .context("server error")
}

async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearQuery>,
) -> Result<Html<String>, ApiError> {
    let year = query.selection()?;
    Ok(Html(build_live_page(&state.config, &year, SPEC_ENDPOINT)?))
}

async fn spec(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearQuery>,
) -> Result<Json<ViewSpec>, ApiError> {
    let year = query.selection()?;
    let (spec, graph) = SpecBuilder::new(&state.config)
        .with_year(year.clone())
        .build_validated()?;
    tracing::debug!(year = %year, panels = graph.panel_count(), "served spec");
    Ok(Json(spec))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
