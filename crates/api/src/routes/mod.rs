//! HTTP Route Handlers

pub mod nearby;
pub mod potholes;
pub mod upload;
