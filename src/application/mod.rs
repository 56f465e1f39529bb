//! Application layer: use-case facades over the service layer.

pub mod assessment;

pub use assessment::AssessmentEngine;
