//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use pictor_core::Config;
use pictor_db::PgImageRepository;
use pictor_services::ImageService;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let repository = Arc::new(PgImageRepository::new(pool));

    let pipeline = storage::setup_pipeline(&config, repository).await?;
    let images = ImageService::new(pipeline, config.max_upload_size_bytes());
    let state = AppState::new(config.clone(), images);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
