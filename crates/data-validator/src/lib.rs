//! Input Validation
//!
//! Parses the textual coordinate and radius fields clients send and
//! checks them against geographic ranges.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidatedPoint, ValidationConfig, Validator};
