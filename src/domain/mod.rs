//! Domain layer: pure models, errors, and port contracts for assessment
//! orchestration.

pub mod error;
pub mod models;
pub mod ports;

pub use error::AssessmentError;
