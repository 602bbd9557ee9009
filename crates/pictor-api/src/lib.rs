//! Pictor API Library
//!
//! HTTP transport for the image ingestion service: handlers, error mapping, application
//! setup and telemetry.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
