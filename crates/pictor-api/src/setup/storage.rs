//! Storage setup and initialization

use anyhow::{Context, Result};
use pictor_core::Config;
use pictor_db::ImageRepository;
use pictor_services::Pipeline;
use std::sync::Arc;

/// Create the upload and thumbnail directories and wire the ingestion pipeline to them.
pub async fn setup_pipeline(
    config: &Config,
    repository: Arc<dyn ImageRepository>,
) -> Result<Pipeline> {
    tracing::info!("Initializing local storage...");
    let pipeline = Pipeline::local(config, repository)
        .await
        .context("Failed to initialize storage")?;

    tracing::info!(
        derivation_timeout_secs = config.derivation_timeout_secs(),
        thumbnail_width = config.thumbnail_width(),
        "Ingestion pipeline ready"
    );

    Ok(pipeline)
}
