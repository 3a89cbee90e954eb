//! Pothole Detection
//!
//! A single capability, [`PotholeDetector`], answers whether an uploaded
//! image shows a pothole. The shipped [`StubDetector`] stands in until a
//! trained model is wired up.

mod detector;

pub use detector::{PotholeDetector, StubDetector};

use thiserror::Error;

/// Errors during detection
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Classifier failed: {0}")]
    ClassifierFailed(String),
}
