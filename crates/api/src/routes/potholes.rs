//! Observation Listing

use axum::{extract::State, Json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use storage::StoredRecord;

/// Every observation keyed by id, exactly as stored, or `null` when none exist
pub async fn get_potholes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<BTreeMap<String, StoredRecord>>>, ApiError> {
    let records = state.store.list_all().await?;
    debug!("Listing {} observations", records.len());

    if records.is_empty() {
        return Ok(Json(None));
    }
    Ok(Json(Some(records)))
}
