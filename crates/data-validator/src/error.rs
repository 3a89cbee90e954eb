//! Validation Error Types

use thiserror::Error;

/// Errors during input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Field present but not a number
    #[error("Invalid {field}: could not convert '{raw}' to float")]
    NotANumber { field: &'static str, raw: String },

    /// NaN or infinite value
    #[error("Invalid {field}: value must be finite")]
    NotFinite { field: &'static str },

    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
