//! Pothole Report API Server
//!
//! Accepts geotagged road images, records whether a pothole was detected,
//! and answers list and proximity queries over the recorded observations.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod routes;
pub mod staging;

use crate::config::{AppConfig, LoggingConfig};
use crate::error::StartupError;
use crate::staging::ImageStaging;
use data_validator::Validator;
use detection::{PotholeDetector, StubDetector};
use storage::ObservationStore;

/// Application state shared across handlers
pub struct AppState {
    /// Observation store
    pub store: ObservationStore,
    /// Image classifier
    pub detector: Arc<dyn PotholeDetector>,
    /// Coordinate and radius parsing
    pub validator: Validator,
    /// Scratch directory for uploads
    pub staging: ImageStaging,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Prometheus handle, when the exporter is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(
        store: ObservationStore,
        detector: Arc<dyn PotholeDetector>,
        validator: Validator,
        staging: ImageStaging,
    ) -> Self {
        Self {
            store,
            detector,
            validator,
            staging,
            max_upload_bytes: config::ServerConfig::default().max_upload_bytes,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Build state from loaded configuration, using the stub detector
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let store = config.store.build()?;
        let staging = ImageStaging::new(config.images.dir.clone(), config.images.retain);
        let mut state = Self::new(
            store,
            Arc::new(StubDetector::new()),
            Validator::new(config.validation.clone()),
            staging,
        );
        state.max_upload_bytes = config.server.max_upload_bytes;
        Ok(state)
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: String,
    pub detector: String,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/upload", post(routes::upload::upload_image))
        .route("/potholes", get(routes::potholes::get_potholes))
        .route("/nearby", get(routes::nearby::get_nearby))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        store: state.store.backend_name().to_string(),
        detector: state.detector.name().to_string(),
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), StartupError> {
    let level: Level = config.level.parse().map_err(|e| {
        StartupError::Logging(format!("invalid log level '{}': {}", config.level, e))
    })?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}

/// Install the Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, StartupError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| StartupError::Metrics(e.to_string()))
}

/// Run the server
pub async fn run_server(config: AppConfig) -> Result<(), StartupError> {
    let mut state = AppState::from_config(&config)?;
    state.staging.prepare().await?;
    if config.metrics.enabled {
        state = state.with_metrics(init_metrics()?);
    }

    info!(
        "Store backend: {}, image dir: {}",
        state.store.backend_name(),
        state.staging.dir().display()
    );

    let app = create_router(Arc::new(state));
    let addr = config.server.bind_addr();

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
