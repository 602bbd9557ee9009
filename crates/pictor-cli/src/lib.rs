//! Operational commands for the image service.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use sqlx::migrate::{Migrate, Migrator};
use sqlx::PgPool;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Read the migration scripts under `path`.
pub async fn load_migrator(path: &Path) -> anyhow::Result<Migrator> {
    Migrator::new(path)
        .await
        .with_context(|| format!("Failed to read migrations from {}", path.display()))
}

/// Migrations known to `migrator` whose versions are not in `applied`, in version order.
pub fn pending_migrations(migrator: &Migrator, applied: &[i64]) -> Vec<(i64, String)> {
    let applied: HashSet<i64> = applied.iter().copied().collect();
    let mut pending: Vec<(i64, String)> = migrator
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .filter(|m| !applied.contains(&m.version))
        .map(|m| (m.version, m.description.to_string()))
        .collect();
    pending.sort_by_key(|(version, _)| *version);
    pending
}

/// Apply every pending migration and return the ones that ran.
pub async fn run_migrations(
    pool: &PgPool,
    migrator: &Migrator,
) -> anyhow::Result<Vec<(i64, String)>> {
    let applied: Vec<i64> = {
        let mut conn = pool.acquire().await.context("Failed to acquire connection")?;
        conn.ensure_migrations_table()
            .await
            .context("Failed to create migrations table")?;
        conn.list_applied_migrations()
            .await
            .context("Failed to list applied migrations")?
            .into_iter()
            .map(|m| m.version)
            .collect()
    };

    let pending = pending_migrations(migrator, &applied);
    if pending.is_empty() {
        tracing::info!("no migration to apply");
        return Ok(pending);
    }

    for (version, description) in &pending {
        tracing::info!(version = version, description = %description, "Applying migration");
    }
    migrator.run(pool).await.context("Failed to run migrations")?;
    tracing::info!(count = pending.len(), "Migrations applied");

    Ok(pending)
}
