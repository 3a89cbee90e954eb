//! Error Types
//!
//! [`ApiError`] covers request failures and renders as a JSON body of the
//! form `{"error": "<message>"}`. [`StartupError`] covers everything that
//! can stop the server from coming up.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use data_validator::ValidationError;
use detection::DetectionError;
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Request-level failures
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required upload field is absent
    #[error("Invalid input")]
    MissingInput,

    /// A field is present but unusable
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The multipart body could not be read
    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    /// The detector could not classify the image
    #[error("Detection failed: {0}")]
    Detection(#[from] DetectionError),

    /// A stored record lacks the fields a query needs
    #[error("Malformed stored observation: {0}")]
    MalformedRecord(String),

    /// The observation store failed
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// The transient image could not be written
    #[error("Failed to stage image: {0}")]
    Staging(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingInput | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::Detection(_) | Self::MalformedRecord(_) | Self::Staging(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            if matches!(self, Self::Storage(_)) {
                metrics::counter!("pothole_store_errors_total").increment(1);
            }
            error!("Request failed with {}: {}", status, message);
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Failures while starting the server
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Storage setup failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Metrics setup failed: {0}")]
    Metrics(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
