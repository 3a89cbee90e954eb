//! Proximity Query

use axum::{
    extract::{Query, State},
    Json,
};
use geo_distance::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use serde_json::Value;
use storage::{ObservationFields, StoredRecord};

/// Search radius when the client gives none, in miles
pub const DEFAULT_RADIUS_MILES: f64 = 5.0;

/// Query parameters for the nearby endpoint.
///
/// Kept as raw strings so parse failures get our error body rather than
/// the extractor's.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius: Option<String>,
}

/// One observation inside the radius
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyPothole {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Passed through from the stored record, `null` when absent
    pub pothole_detected: Value,
}

/// Response for nearby endpoint
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub nearby_potholes: Vec<NearbyPothole>,
}

/// Observations within `radius` miles of the query point
pub async fn get_nearby(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyQuery>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let point = state
        .validator
        .point(params.latitude.as_deref(), params.longitude.as_deref())?;
    let radius = state
        .validator
        .radius(params.radius.as_deref(), DEFAULT_RADIUS_MILES)?;
    debug!(
        "Nearby query at ({}, {}) within {} miles",
        point.latitude, point.longitude, radius
    );
    metrics::counter!("pothole_nearby_queries_total").increment(1);

    let records = state.store.list_all().await?;
    let origin = Coordinate::new(point.latitude, point.longitude);
    let nearby_potholes = find_nearby(&records, origin, radius)?;

    debug!(
        "{} of {} observations within radius",
        nearby_potholes.len(),
        records.len()
    );
    Ok(Json(NearbyResponse { nearby_potholes }))
}

/// Linear scan in store order. A record without numeric coordinates fails
/// the whole query, naming that record.
pub fn find_nearby(
    records: &BTreeMap<String, StoredRecord>,
    origin: Coordinate,
    radius_miles: f64,
) -> Result<Vec<NearbyPothole>, ApiError> {
    let mut nearby = Vec::new();

    for (id, record) in records {
        let (latitude, longitude) = ObservationFields::from_stored(record)
            .coordinates()
            .ok_or_else(|| {
                ApiError::MalformedRecord(format!(
                    "{id} has no numeric latitude and longitude"
                ))
            })?;

        if origin.is_within(&Coordinate::new(latitude, longitude), radius_miles) {
            nearby.push(NearbyPothole {
                id: id.clone(),
                latitude,
                longitude,
                pothole_detected: record.get("pothole_detected").cloned().unwrap_or(Value::Null),
            });
        }
    }

    Ok(nearby)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(latitude: f64, longitude: f64) -> StoredRecord {
        json!({"latitude": latitude, "longitude": longitude, "pothole_detected": true})
    }

    #[test]
    fn test_keeps_store_order() {
        let mut records = BTreeMap::new();
        records.insert("a".to_string(), fields(0.0, 0.5));
        records.insert("b".to_string(), fields(0.0, 0.0));
        records.insert("c".to_string(), fields(10.0, 10.0));

        let found = find_nearby(&records, Coordinate::new(0.0, 0.0), 50.0).unwrap();
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        // "a" is farther than "b" but comes first in the store
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_radius_boundary_inclusive() {
        let mut records = BTreeMap::new();
        records.insert("here".to_string(), fields(51.5, -0.12));

        let found = find_nearby(&records, Coordinate::new(51.5, -0.12), 0.0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].latitude, 51.5);
    }

    #[test]
    fn test_missing_coordinates_fail_query() {
        let mut records = BTreeMap::new();
        records.insert("ok".to_string(), fields(0.0, 0.0));
        records.insert(
            "broken".to_string(),
            json!({"latitude": 1.0, "pothole_detected": true}),
        );

        let err = find_nearby(&records, Coordinate::new(0.0, 0.0), 5.0).unwrap_err();
        assert!(matches!(err, ApiError::MalformedRecord(ref msg) if msg.contains("broken")));
    }

    #[test]
    fn test_string_coordinate_fails_query() {
        let mut records = BTreeMap::new();
        records.insert(
            "-Nb".to_string(),
            json!({"latitude": "3.0", "longitude": 4.0}),
        );

        let err = find_nearby(&records, Coordinate::new(0.0, 0.0), 5.0).unwrap_err();
        assert!(matches!(err, ApiError::MalformedRecord(ref msg) if msg.contains("-Nb")));
    }

    #[test]
    fn test_detection_flag_passed_through() {
        let mut records = BTreeMap::new();
        records.insert("-Na".to_string(), json!({"latitude": 0.0, "longitude": 0.0}));

        let found = find_nearby(&records, Coordinate::new(0.0, 0.0), 1.0).unwrap();
        assert_eq!(found[0].pothole_detected, Value::Null);
    }
}
