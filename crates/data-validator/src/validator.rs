//! Field Parsing and Range Checking

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject coordinates outside the latitude/longitude ranges
    pub enforce_ranges: bool,
    /// Latitude valid range (degrees)
    pub latitude_range: (f64, f64),
    /// Longitude valid range (degrees)
    pub longitude_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enforce_ranges: true,
            latitude_range: (-90.0, 90.0),
            longitude_range: (-180.0, 180.0),
        }
    }
}

impl ValidationConfig {
    /// Accept any finite coordinate
    pub fn lenient() -> Self {
        Self {
            enforce_ranges: false,
            ..Default::default()
        }
    }
}

/// A parsed and checked latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Validator for client-supplied location fields
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Parse a required floating-point field.
    ///
    /// Surrounding whitespace is ignored; NaN and infinities are rejected.
    pub fn parse_number(
        &self,
        field: &'static str,
        raw: Option<&str>,
    ) -> Result<f64, ValidationError> {
        let raw = raw.ok_or(ValidationError::MissingField(field))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField(field));
        }

        let value: f64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
            field,
            raw: raw.to_string(),
        })?;

        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }

        Ok(value)
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate latitude (no-op when range enforcement is off)
    pub fn validate_latitude(&self, latitude: f64) -> Result<(), ValidationError> {
        if !self.config.enforce_ranges {
            return Ok(());
        }
        self.validate_range("latitude", latitude, self.config.latitude_range)
    }

    /// Validate longitude (no-op when range enforcement is off)
    pub fn validate_longitude(&self, longitude: f64) -> Result<(), ValidationError> {
        if !self.config.enforce_ranges {
            return Ok(());
        }
        self.validate_range("longitude", longitude, self.config.longitude_range)
    }

    /// Parse and check a latitude/longitude pair
    pub fn point(
        &self,
        latitude: Option<&str>,
        longitude: Option<&str>,
    ) -> Result<ValidatedPoint, ValidationError> {
        let latitude = self.parse_number("latitude", latitude)?;
        let longitude = self.parse_number("longitude", longitude)?;
        self.validate_latitude(latitude)?;
        self.validate_longitude(longitude)?;

        debug!("Validated point ({}, {})", latitude, longitude);
        Ok(ValidatedPoint { latitude, longitude })
    }

    /// Parse an optional search radius in miles, falling back to `default`
    pub fn radius(&self, raw: Option<&str>, default: f64) -> Result<f64, ValidationError> {
        let radius = match raw {
            None => return Ok(default),
            Some(raw) => self.parse_number("radius", Some(raw))?,
        };
        self.validate_range("radius", radius, (0.0, f64::MAX))?;
        Ok(radius)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let validator = Validator::default();
        let point = validator.point(Some("37.7749"), Some(" -122.4194 ")).unwrap();
        assert_eq!(point.latitude, 37.7749);
        assert_eq!(point.longitude, -122.4194);
    }

    #[test]
    fn test_missing_fields() {
        let validator = Validator::default();
        assert_eq!(
            validator.point(None, Some("1.0")),
            Err(ValidationError::MissingField("latitude"))
        );
        assert_eq!(
            validator.point(Some("1.0"), Some("")),
            Err(ValidationError::MissingField("longitude"))
        );
    }

    #[test]
    fn test_not_a_number() {
        let validator = Validator::default();
        let err = validator.point(Some("north"), Some("1.0")).unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { field: "latitude", .. }));
        assert_eq!(
            err.to_string(),
            "Invalid latitude: could not convert 'north' to float"
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let validator = Validator::default();
        assert_eq!(
            validator.point(Some("NaN"), Some("1.0")),
            Err(ValidationError::NotFinite { field: "latitude" })
        );
        assert_eq!(
            validator.point(Some("1.0"), Some("inf")),
            Err(ValidationError::NotFinite { field: "longitude" })
        );
    }

    #[test]
    fn test_latitude_longitude_ranges() {
        let validator = Validator::default();
        assert!(validator.point(Some("90"), Some("180")).is_ok());
        assert!(validator.point(Some("-90"), Some("-180")).is_ok());
        assert!(validator.point(Some("90.5"), Some("0")).is_err());
        assert!(validator.point(Some("0"), Some("-180.5")).is_err());
    }

    #[test]
    fn test_lenient_accepts_out_of_range() {
        let validator = Validator::new(ValidationConfig::lenient());
        let point = validator.point(Some("123.0"), Some("400")).unwrap();
        assert_eq!(point.latitude, 123.0);
    }

    #[test]
    fn test_radius_default_and_bounds() {
        let validator = Validator::default();
        assert_eq!(validator.radius(None, 5.0).unwrap(), 5.0);
        assert_eq!(validator.radius(Some("0"), 5.0).unwrap(), 0.0);
        assert_eq!(validator.radius(Some("12.5"), 5.0).unwrap(), 12.5);
        assert!(validator.radius(Some("-1"), 5.0).is_err());
        assert!(validator.radius(Some("far"), 5.0).is_err());
    }
}
