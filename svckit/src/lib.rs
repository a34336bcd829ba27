// svckit/src/lib.rs
//
// Shared kit for the sentiment dashboard: domain types, errors, configuration

pub mod config;
pub mod errors;
pub mod types;

pub use config::ClientConfig;
pub use errors::{ApiError, ValidationError};
