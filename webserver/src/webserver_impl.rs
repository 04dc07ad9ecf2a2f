//! Main webserver implementation
//!
//! The WebServer struct wires the injected services into an axum router:
//! static page, analyze/result JSON endpoints, the chart SVG endpoint, and
//! the two file exports. Service dependencies come in through the trait
//! generics so tests can run the full router against mocks.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::core::{DispatchOutcome, QueryDispatcher};
use crate::error::{WebServerError, WebServerResult};
use crate::services::{ExportFile, chart, export};
use crate::state::WebServerState;
use crate::traits::{AnalysisBackend, StaticFileServer};
use crate::types::{AnalyzeBody, ChartQuery, ResultDto};

/// Main webserver struct with dependency injection
pub struct WebServer<B, S>
where
    B: AnalysisBackend,
    S: StaticFileServer,
{
    state: Arc<WebServerState>,
    dispatcher: Arc<QueryDispatcher<B>>,
    static_files: S,
}

impl<B, S> Clone for WebServer<B, S>
where
    B: AnalysisBackend,
    S: StaticFileServer + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            dispatcher: self.dispatcher.clone(),
            static_files: self.static_files.clone(),
        }
    }
}

impl<B, S> WebServer<B, S>
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    /// Create a new webserver with injected services. The dispatcher shares
    /// the state's result store.
    pub fn new(state: WebServerState, backend: B, static_files: S) -> Self {
        let state = Arc::new(state);
        let dispatcher = Arc::new(QueryDispatcher::new(backend, state.store.clone()));

        Self {
            state,
            dispatcher,
            static_files,
        }
    }

    pub fn state(&self) -> &Arc<WebServerState> {
        &self.state
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            // Static page routes
            .route("/", get(serve_index))
            .route("/static/*path", get(serve_static))
            // API routes
            .route("/api/analyze", post(analyze_handler))
            .route("/api/result", get(result_handler))
            .route("/api/chart.svg", get(chart_handler))
            .route("/api/export/spreadsheet", get(export_spreadsheet_handler))
            .route("/api/export/document", get(export_document_handler))
            .route("/api/status", get(status_handler))
            // Health check
            .route("/health", get(health_check))
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()).into_inner())
            .with_state(self.clone())
    }

    /// Start the webserver
    pub async fn run(&self, bind_address: SocketAddr) -> WebServerResult<()> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(bind_address).await.map_err(|e| {
            WebServerError::ServerStartup(format!("Failed to bind to {bind_address}: {e}"))
        })?;

        tracing::info!("🌐 Web server listening on http://{}", bind_address);
        tracing::info!("📊 Analysis page available at http://{}/", bind_address);
        tracing::info!("🔗 Analysis backend: {}", self.state.backend_url);

        tokio::select! {
            result = axum::serve(listener, router) => {
                result.map_err(|e| WebServerError::ServerStartup(e.to_string()))?;
            }
            _ = tokio::signal::ctrl_c() => {
                shared::logging::log_shutdown("Received Ctrl+C signal");
            }
        }

        Ok(())
    }
}

// HTTP Handlers

fn static_response(file: crate::traits::StaticFileResponse) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type);
    if let Some(cache) = file.cache_control {
        builder = builder.header(header::CACHE_CONTROL, cache);
    }
    builder
        .body(Body::from(file.content))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Serve the main analysis page
async fn serve_index<B, S>(State(webserver): State<WebServer<B, S>>) -> Response
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    match webserver.static_files.serve_file("index.html").await {
        Ok(file) => static_response(file),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load analysis page").into_response(),
    }
}

/// Serve static assets
async fn serve_static<B, S>(
    axum::extract::Path(path): axum::extract::Path<String>,
    State(webserver): State<WebServer<B, S>>,
) -> Response
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    match webserver.static_files.serve_file(&path).await {
        Ok(file) => static_response(file),
        Err(_) => (StatusCode::NOT_FOUND, "File not found").into_response(),
    }
}

/// Submit a query to the analysis backend
async fn analyze_handler<B, S>(
    State(webserver): State<WebServer<B, S>>,
    Json(body): Json<AnalyzeBody>,
) -> Response
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    match webserver.dispatcher.submit(&body.query).await {
        Ok(DispatchOutcome::Ignored) => StatusCode::NO_CONTENT.into_response(),
        Ok(DispatchOutcome::Completed(result)) => Json(json!({
            "status": "ok",
            "result": ResultDto::from(result.as_ref()),
        }))
        .into_response(),
        Ok(DispatchOutcome::Superseded) => Json(json!({"status": "superseded"})).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"status": "error", "message": e.to_string()})),
        )
            .into_response(),
    }
}

/// Return the currently stored result, if any
async fn result_handler<B, S>(State(webserver): State<WebServer<B, S>>) -> Response
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    match webserver.state.store.current().await {
        Some(result) => Json(json!({
            "status": "ok",
            "result": ResultDto::from(result.as_ref()),
        }))
        .into_response(),
        None => Json(json!({"status": "empty"})).into_response(),
    }
}

/// Render the chart for the stored result: the flat chart in single mode, or
/// one named area's chart in compare mode
async fn chart_handler<B, S>(
    Query(query): Query<ChartQuery>,
    State(webserver): State<WebServer<B, S>>,
) -> Response
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    let Some(result) = webserver.state.store.current().await else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let points = match &query.area {
        None => match result.view.single_chart() {
            Some(points) => points,
            None => {
                return (StatusCode::NOT_FOUND, "Compare results need ?area=<name>").into_response();
            }
        },
        Some(name) => match result.view.compare_areas() {
            None => {
                return (StatusCode::NOT_FOUND, "Single results have no per-area charts").into_response();
            }
            Some(groups) => match groups.iter().find(|g| &g.name == name) {
                Some(group) => group.chart.as_slice(),
                None => return (StatusCode::NOT_FOUND, "Unknown area").into_response(),
            },
        },
    };

    match chart::render_price_demand_svg(points) {
        Ok(Some(svg)) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            shared::logging::log_error("Chart rendering", &e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn export_response(export_result: WebServerResult<Option<ExportFile>>) -> Response {
    match export_result {
        // Nothing to export is a silent no-op, not an error
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Ok(Some(file)) => {
            tracing::info!("📥 Export produced {} ({} bytes)", file.filename, file.bytes.len());
            (
                [
                    (header::CONTENT_TYPE, file.content_type),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file.filename),
                    ),
                ],
                file.bytes,
            )
                .into_response()
        }
        Err(e) => {
            shared::logging::log_error("Export", &e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Download the stored result as a spreadsheet
async fn export_spreadsheet_handler<B, S>(State(webserver): State<WebServer<B, S>>) -> Response
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    match webserver.state.store.current().await {
        Some(result) => export_response(export::spreadsheet(&result)),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Download the stored result as a document
async fn export_document_handler<B, S>(State(webserver): State<WebServer<B, S>>) -> Response
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    match webserver.state.store.current().await {
        Some(result) => export_response(export::document(&result)),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Get server status
async fn status_handler<B, S>(State(webserver): State<WebServer<B, S>>) -> Json<serde_json::Value>
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    let has_result = webserver.state.store.current().await.is_some();

    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": webserver.state.uptime_seconds(),
        "backend_url": webserver.state.backend_url,
        "has_result": has_result,
    }))
}

/// Health check endpoint
async fn health_check<B, S>(State(webserver): State<WebServer<B, S>>) -> Json<serde_json::Value>
where
    B: AnalysisBackend + 'static,
    S: StaticFileServer + Clone + 'static,
{
    Json(json!({
        "status": "healthy",
        "uptime": webserver.state.uptime_seconds(),
    }))
}
