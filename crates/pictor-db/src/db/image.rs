//! Image repository: CRUD for the images table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pictor_core::models::{ImageRecord, NewImageRecord};
use pictor_core::AppError;
use sqlx::{PgPool, Postgres};

use super::transaction::TransactionGuard;

/// Persistence for image records.
///
/// The repository stores what it is given and derives nothing. Identifiers are assigned on
/// create and never reused.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Insert a record and return its identifier
    async fn create(&self, image: NewImageRecord) -> Result<i64, AppError>;

    /// All records, newest first
    async fn list(&self) -> Result<Vec<ImageRecord>, AppError>;

    /// Fails with `AppError::NotFound` when no record has this id
    async fn get(&self, id: i64) -> Result<ImageRecord, AppError>;

    /// Remove a record.
    ///
    /// Fails with `AppError::NotFound` when the record does not exist. Returns `false` when
    /// the record disappeared between the existence check and the delete, which happens
    /// when two deletes of the same id race.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Connectivity check for health checks
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Row type for the images table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct ImageRow {
    pub id: i64,
    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub width: i32,
    pub height: i32,
    pub file_path: String,
    pub thumbnail_path: String,
    pub image_format: String,
    pub tags: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImageRow {
    pub fn into_record(self) -> ImageRecord {
        ImageRecord {
            id: self.id,
            filename: self.filename,
            file_size: self.file_size,
            mime_type: self.mime_type,
            width: self.width,
            height: self.height,
            file_path: self.file_path,
            thumbnail_path: self.thumbnail_path,
            image_format: self.image_format,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const IMAGE_COLUMNS: &str = "id, filename, file_size, mime_type, width, height, file_path, \
     thumbnail_path, image_format, tags, created_at, updated_at";

/// Postgres-backed image repository.
#[derive(Clone)]
pub struct PgImageRepository {
    pool: PgPool,
}

impl PgImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    #[tracing::instrument(skip(self, image), fields(db.table = "images", db.operation = "insert"))]
    async fn create(&self, image: NewImageRecord) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar::<Postgres, i64>(
            r#"
            INSERT INTO images (
                filename, file_size, mime_type, width, height,
                file_path, thumbnail_path, image_format, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&image.filename)
        .bind(image.file_size)
        .bind(&image.mime_type)
        .bind(image.width)
        .bind(image.height)
        .bind(&image.file_path)
        .bind(&image.thumbnail_path)
        .bind(&image.image_format)
        .bind(&image.tags)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(image_id = id, "Image record created");
        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<ImageRecord>, AppError> {
        let rows: Vec<ImageRow> = sqlx::query_as::<Postgres, ImageRow>(&format!(
            "SELECT {} FROM images ORDER BY created_at DESC, id DESC",
            IMAGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ImageRow::into_record).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select", db.record_id = id))]
    async fn get(&self, id: i64) -> Result<ImageRecord, AppError> {
        let row: Option<ImageRow> = sqlx::query_as::<Postgres, ImageRow>(&format!(
            "SELECT {} FROM images WHERE id = $1",
            IMAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ImageRow::into_record)
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "delete", db.record_id = id))]
    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let existing: Option<i64> =
            sqlx::query_scalar::<Postgres, i64>("SELECT id FROM images WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        if existing.is_none() {
            return Err(AppError::NotFound(format!("Image {} not found", id)));
        }

        let mut tx = TransactionGuard::begin(&self.pool).await?;
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(tx.connection()?)
            .await;

        let rows_affected = match result {
            Ok(result) => result.rows_affected(),
            Err(e) => return Err(tx.rollback_with(e.into()).await),
        };

        if rows_affected > 1 {
            let error = AppError::Internal(format!(
                "Delete of image {} affected {} rows",
                id, rows_affected
            ));
            return Err(tx.rollback_with(error).await);
        }

        tx.commit().await?;

        if rows_affected == 0 {
            tracing::info!(image_id = id, "Image already removed by a concurrent delete");
        }

        Ok(rows_affected == 1)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
