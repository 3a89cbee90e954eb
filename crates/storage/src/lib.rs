//! Storage Layer
//!
//! Append-only observation collection. Production deployments talk to a
//! Firebase Realtime Database over its REST API; tests and local runs use
//! the in-memory backend.

mod firebase;
mod memory;
mod record;
mod repository;

pub use firebase::{FirebaseConfig, FirebaseStore};
pub use memory::MemoryStore;
pub use record::{NewObservation, ObservationFields, StoredRecord};
pub use repository::ObservationStore;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Store request failed: {0}")]
    Request(String),
    #[error("Store rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
