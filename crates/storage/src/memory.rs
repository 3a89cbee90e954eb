//! In-memory Backend

use crate::{NewObservation, StorageError, StoredRecord};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// In-process observation collection.
///
/// Ids are zero-padded sequence numbers so key order is insertion order,
/// mirroring the chronological push ids of the remote store.
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, StoredRecord>>,
    next_id: Mutex<u64>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        info!("Creating in-memory observation store");
        Self {
            records: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Append a record and return its generated id
    pub fn add(&self, record: NewObservation) -> Result<String, StorageError> {
        let mut records = self.records.lock().map_err(|e| {
            StorageError::DatabaseError(format!("Lock error: {}", e))
        })?;
        let mut next_id = self.next_id.lock().map_err(|e| {
            StorageError::DatabaseError(format!("Lock error: {}", e))
        })?;

        let body = serde_json::to_value(record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        let id = format!("mem-{:010}", *next_id);
        *next_id += 1;

        records.insert(id.clone(), body);
        debug!("Inserted observation {}", id);

        Ok(id)
    }

    /// Snapshot of every record keyed by id
    pub fn list_all(&self) -> Result<BTreeMap<String, StoredRecord>, StorageError> {
        let records = self.records.lock().map_err(|e| {
            StorageError::DatabaseError(format!("Lock error: {}", e))
        })?;

        Ok(records.clone())
    }

    /// Insert a record under a caller-chosen id, bypassing id generation.
    ///
    /// Lets tests seed records the remote store could hold but this system
    /// never writes, such as ones with missing or mistyped fields.
    pub fn seed(&self, id: &str, record: StoredRecord) -> Result<(), StorageError> {
        let mut records = self.records.lock().map_err(|e| {
            StorageError::DatabaseError(format!("Lock error: {}", e))
        })?;
        records.insert(id.to_string(), record);
        Ok(())
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
