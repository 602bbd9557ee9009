//! Persistence for image records.

pub mod db;

pub use db::image::{ImageRepository, ImageRow, PgImageRepository};
pub use db::transaction::TransactionGuard;

#[cfg(any(test, feature = "test-helpers"))]
pub use db::test_helpers::InMemoryImageRepository;

use pictor_core::AppError;
use sqlx::PgPool;

/// Migrations under the workspace `migrations/` directory, embedded at compile time.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Apply pending migrations to `pool`.
pub async fn migrate(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::Database(e.into()))?;
    tracing::info!("Database migrations applied");
    Ok(())
}
