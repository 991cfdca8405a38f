//! Web server module for the Storage Box exporter.
//!
//! Serves the Prometheus scrape endpoint, a liveness probe and an HTML
//! landing page.

use std::sync::Arc;

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use crate::build_info;
use crate::collector::Collector;
use crate::config::HEALTH_PATH;
use crate::metrics::{Measurement, TEXT_CONTENT_TYPE, encode_text};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<dyn Collector>,
    pub metrics_path: String,
}

impl AppState {
    pub fn new(collector: Arc<dyn Collector>, metrics_path: impl Into<String>) -> Self {
        Self {
            collector,
            metrics_path: metrics_path.into(),
        }
    }
}

/// One row of the metric list on the landing page.
struct MetricRow {
    name: &'static str,
    kind: &'static str,
    help: &'static str,
}

/// Landing page template.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    version: &'static str,
    git_commit: &'static str,
    build_date: &'static str,
    metrics_path: String,
    health_path: &'static str,
    metrics: Vec<MetricRow>,
}

/// Wrapper to render Askama templates as Axum responses.
struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(rendered) => Html(rendered).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Template render failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let metrics_path = state.metrics_path.clone();
    let app_state = Arc::new(state);

    Router::new()
        .route("/", get(index_handler))
        .route(HEALTH_PATH, get(health_handler))
        .route(&metrics_path, get(metrics_handler))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(app_state)
}

/// Landing page handler.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = state
        .collector
        .describe()
        .into_iter()
        .map(|desc| MetricRow {
            name: desc.name,
            kind: desc.kind.as_str(),
            help: desc.help,
        })
        .collect();

    HtmlTemplate(IndexTemplate {
        version: build_info::VERSION,
        git_commit: build_info::GIT_COMMIT,
        build_date: build_info::BUILD_DATE,
        metrics_path: state.metrics_path.clone(),
        health_path: HEALTH_PATH,
        metrics,
    })
}

/// Liveness probe.
async fn health_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "OK")
}

/// Scrape endpoint: one collection pass per request.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut measurements: Vec<Measurement> = Vec::new();
    state.collector.collect(&mut measurements).await;

    match encode_text(&measurements) {
        Ok(body) => ([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, count = measurements.len(), "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error: {}", err),
            )
                .into_response()
        }
    }
}
