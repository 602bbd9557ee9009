//! Postgres pool and schema.

use anyhow::{Context, Result};
use pictor_core::constants::{DB_IDLE_TIMEOUT_SECS, DB_MAX_LIFETIME_SECS};
use pictor_core::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Open the pool and bring the schema up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let max_connections = config.db_max_connections();
    tracing::info!(max_connections, "Opening image store pool");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(DB_IDLE_TIMEOUT_SECS))
        .max_lifetime(Duration::from_secs(DB_MAX_LIFETIME_SECS))
        .connect(config.database_url())
        .await
        .context("Failed to connect to the image store")?;

    pictor_db::migrate(&pool)
        .await
        .context("Failed to apply image store migrations")?;

    tracing::info!(pool_size = pool.size(), "Image store ready");
    Ok(pool)
}
