//! Command implementations for the admin CLI.

pub mod applicant;
pub mod question;
