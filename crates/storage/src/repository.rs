//! Store Dispatch

use crate::{FirebaseStore, MemoryStore, NewObservation, StorageError, StoredRecord};
use std::collections::BTreeMap;

/// The observation collection, whichever backend holds it.
///
/// Dispatched by enum since the operations are async.
pub enum ObservationStore {
    /// Firebase Realtime Database over REST
    Firebase(FirebaseStore),
    /// In-process map
    Memory(MemoryStore),
}

impl ObservationStore {
    /// Append an observation; the store generates and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write does not reach the store or
    /// the store refuses it. Nothing is retried.
    pub async fn add(
        &self,
        latitude: f64,
        longitude: f64,
        pothole_detected: bool,
    ) -> Result<String, StorageError> {
        let record = NewObservation {
            latitude,
            longitude,
            pothole_detected,
        };
        match self {
            Self::Firebase(store) => store.add(&record).await,
            Self::Memory(store) => store.add(record),
        }
    }

    /// Every stored observation keyed by id, empty when the collection is.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the read fails or the payload is not a
    /// keyed collection of records.
    pub async fn list_all(&self) -> Result<BTreeMap<String, StoredRecord>, StorageError> {
        match self {
            Self::Firebase(store) => store.list_all().await,
            Self::Memory(store) => store.list_all(),
        }
    }

    /// Backend name for logging and health output
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Firebase(_) => "firebase",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<MemoryStore> for ObservationStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<FirebaseStore> for ObservationStore {
    fn from(store: FirebaseStore) -> Self {
        Self::Firebase(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_dispatch() {
        let store = ObservationStore::from(MemoryStore::new());
        assert_eq!(store.backend_name(), "memory");

        store.add(1.0, 2.0, true).await.unwrap();
        store.add(3.0, 4.0, false).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        let flags: Vec<Option<bool>> = all
            .values()
            .map(|record| record["pothole_detected"].as_bool())
            .collect();
        assert_eq!(flags, vec![Some(true), Some(false)]);
    }
}
