//! Server Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `pothole.toml` (or the file named by `POTHOLE_CONFIG`), then
//! `POTHOLE__<SECTION>__<KEY>` environment variables.

use crate::error::StartupError;
use data_validator::ValidationConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use storage::{FirebaseConfig, FirebaseStore, MemoryStore, ObservationStore};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub images: ImageConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// Listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, image included
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which backend holds observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Firebase,
}

/// Observation store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Realtime Database root URL (firebase backend only)
    pub database_url: Option<String>,
    /// Reference path of the collection
    pub collection: String,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            database_url: None,
            collection: "potholes".to_string(),
            auth_token: None,
            timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    /// Construct the configured store
    pub fn build(&self) -> Result<ObservationStore, StartupError> {
        match self.backend {
            StoreBackend::Memory => Ok(MemoryStore::new().into()),
            StoreBackend::Firebase => {
                let database_url = self.database_url.clone().ok_or_else(|| {
                    StartupError::InvalidConfig(
                        "store.database_url is required for the firebase backend".to_string(),
                    )
                })?;
                let store = FirebaseStore::new(FirebaseConfig {
                    database_url,
                    collection: self.collection.clone(),
                    auth_token: self.auth_token.clone(),
                    timeout: Duration::from_secs(self.timeout_secs),
                })?;
                Ok(store.into())
            }
        }
    }
}

/// Transient image directory settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub dir: PathBuf,
    /// Keep uploaded images after the request completes
    pub retain: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("temp_images"),
            retain: false,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    /// Load from `POTHOLE_CONFIG` (default `pothole.toml`) and the environment
    pub fn load() -> Result<Self, StartupError> {
        let path = std::env::var("POTHOLE_CONFIG").unwrap_or_else(|_| "pothole.toml".to_owned());
        Self::load_from(&path)
    }

    /// Load from a specific file (which may be absent) and the environment
    pub fn load_from(path: &str) -> Result<Self, StartupError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("POTHOLE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
