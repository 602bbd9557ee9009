//! Pictor Core Library
//!
//! Domain models, error types, configuration and constants shared by every Pictor crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{compose_database_url, BaseConfig, Config, LogFormat, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
