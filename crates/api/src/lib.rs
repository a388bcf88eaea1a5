//! Resolution Estimator API Server
//!
//! HTTP boundary between the incident form and the prediction service.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use inference_engine::{PipelineLoadError, PredictionService};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod settings;
mod error;
mod routes;

pub use settings::Settings;
pub use error::{ApiError, FieldError};
pub use routes::predictions::PredictionResponse;

/// Errors that abort startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid log level {0:?}")]
    LogLevel(String),
    #[error("Failed to set tracing subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error(transparent)]
    Pipeline(#[from] PipelineLoadError),
    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] BuildError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state shared across handlers. Read-only after startup.
pub struct AppState {
    /// Prediction service owning the loaded pipeline
    pub service: PredictionService,
    /// Prometheus render handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(service: PredictionService, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            service,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub pipeline: String,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/schema", get(routes::schema::get_schema))
        .route("/api/v1/predictions", post(routes::predictions::create_prediction))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        // The state only exists once the pipeline has loaded
        pipeline: "loaded".to_string(),
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(level: &str, json: bool) -> Result<(), StartupError> {
    let level: Level = level
        .parse()
        .map_err(|_| StartupError::LogLevel(level.to_string()))?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Load the pipeline and run the server until shutdown.
///
/// A pipeline that fails to load aborts startup; there is no degraded mode.
pub async fn run_server(settings: Settings) -> Result<(), StartupError> {
    let service = PredictionService::load(&settings.pipeline_path)?;
    let metrics = PrometheusBuilder::new().install_recorder()?;

    let state = Arc::new(AppState::new(service, Some(metrics)));
    let app = create_router(state);

    info!("Starting API server on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
