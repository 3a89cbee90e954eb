//! Great-circle Distance
//!
//! Haversine distance between two points given in degrees, in statute miles.
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//!
//! Inputs outside those ranges still compute but the result has no
//! geodesic meaning. Range checks belong to the caller.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Earth's mean radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Haversine distance in miles between `(lat1, lon1)` and `(lat2, lon2)`.
///
/// # Example
///
/// ```
/// use geo_distance::distance_miles;
///
/// // One degree of longitude along the equator
/// let d = distance_miles(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 69.17).abs() < 0.01);
/// ```
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
    let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// A point on the Earth's surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Distance to another coordinate in miles
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_miles(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Whether `other` lies within `radius_miles` (inclusive)
    pub fn is_within(&self, other: &Coordinate, radius_miles: f64) -> bool {
        self.distance_to(other) <= radius_miles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_miles(40.7128, -74.0060, 40.7128, -74.0060), 0.0);
    }

    #[test]
    fn test_one_degree_longitude_at_equator() {
        let d = distance_miles(0.0, 0.0, 0.0, 1.0);
        let expected = EARTH_RADIUS_MILES * PI / 180.0;
        assert!((d - expected).abs() < 1e-9);
        assert!((d - 69.17).abs() < 0.01);
    }

    #[test]
    fn test_known_city_pair() {
        // New York to Los Angeles, roughly 2445 miles
        let d = distance_miles(40.7128, -74.0060, 34.0522, -118.2437);
        assert!((d - 2445.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn test_antipodal_points() {
        let d = distance_miles(0.0, 0.0, 0.0, 180.0);
        assert!((d - EARTH_RADIUS_MILES * PI).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_within_radius() {
        let origin = Coordinate::new(0.0, 0.0);
        let east = Coordinate::new(0.0, 1.0);
        assert!(origin.is_within(&origin, 0.0));
        assert!(origin.is_within(&east, 70.0));
        assert!(!origin.is_within(&east, 69.0));
    }
}
