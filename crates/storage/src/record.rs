//! Observation Records

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body written to the store for a new observation.
///
/// The store assigns the id; it never appears in the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewObservation {
    pub latitude: f64,
    pub longitude: f64,
    pub pothole_detected: bool,
}

/// A child of the collection exactly as the store returned it.
///
/// The remote collection is schemaless, so nothing about its shape is
/// assumed when reading; [`ObservationFields::from_stored`] gives a typed view.
pub type StoredRecord = Value;

/// Typed view of a stored record.
///
/// A field that is absent or of the wrong type reads as `None`; callers
/// decide how to treat a record with holes in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationFields {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub pothole_detected: Option<bool>,
}

impl ObservationFields {
    /// Read the known fields out of a stored record
    pub fn from_stored(record: &StoredRecord) -> Self {
        Self {
            latitude: record.get("latitude").and_then(Value::as_f64),
            longitude: record.get("longitude").and_then(Value::as_f64),
            pothole_detected: record.get("pothole_detected").and_then(Value::as_bool),
        }
    }

    /// Latitude and longitude, if both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let record = NewObservation {
            latitude: 40.5,
            longitude: -74.25,
            pothole_detected: true,
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            json!({"latitude": 40.5, "longitude": -74.25, "pothole_detected": true})
        );
    }

    #[test]
    fn test_complete_record() {
        let fields = ObservationFields::from_stored(
            &json!({"latitude": 1.5, "longitude": 2, "pothole_detected": false, "note": "extra"}),
        );
        assert_eq!(fields.coordinates(), Some((1.5, 2.0)));
        assert_eq!(fields.pothole_detected, Some(false));
    }

    #[test]
    fn test_holes_read_as_none() {
        let fields = ObservationFields::from_stored(&json!({"latitude": "3.0", "longitude": 4.0}));
        assert_eq!(fields.latitude, None);
        assert_eq!(fields.longitude, Some(4.0));
        assert_eq!(fields.coordinates(), None);

        let fields = ObservationFields::from_stored(&json!("not an object"));
        assert_eq!(fields, ObservationFields::default());
    }
}
