//! Deletion orchestration: remove an image's files, then its record.

use pictor_core::models::ImageRecord;
use pictor_core::AppError;
use std::path::Path;

use crate::cleanup::{remove_files, CleanupReport};
use crate::pipeline::Pipeline;

pub struct DeletionOrchestrator {
    pipeline: Pipeline,
}

impl DeletionOrchestrator {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Delete image `id`.
    ///
    /// Fails with `AppError::NotFound` for an unknown id. File removal is best-effort and
    /// never fails the call; the record is deleted regardless and the repository's result
    /// is returned.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let record = self.pipeline.repository.get(id).await?;

        let report = self.remove_files(&record).await;
        report.log("image deletion");

        let deleted = self.pipeline.repository.delete(id).await?;
        tracing::info!(
            image_id = id,
            deleted = deleted,
            cleanup_failures = report.failures.len(),
            "Image deleted"
        );
        Ok(deleted)
    }

    /// Remove both files at the paths the record holds, whichever store root they sit
    /// under now.
    async fn remove_files(&self, record: &ImageRecord) -> CleanupReport {
        let thumbnail = record
            .has_thumbnail()
            .then(|| Path::new(&record.thumbnail_path));

        remove_files(
            &self.pipeline.uploads,
            Path::new(&record.file_path),
            &self.pipeline.thumbnails,
            thumbnail,
        )
        .await
    }
}
