//! Transport-agnostic image operations.
//!
//! Validates requests before any I/O and delegates to the orchestrators. The HTTP layer
//! maps requests onto these calls one-to-one.

use bytes::Bytes;
use pictor_core::models::ImageRecord;
use pictor_core::AppError;
use pictor_db::ImageRepository;
use pictor_storage::Storage;
use std::path::Path;
use std::sync::Arc;

use crate::deletion::DeletionOrchestrator;
use crate::pipeline::Pipeline;
use crate::upload::UploadOrchestrator;

pub struct ImageService {
    uploads: UploadOrchestrator,
    deletions: DeletionOrchestrator,
    storage: Arc<dyn Storage>,
    repository: Arc<dyn ImageRepository>,
    max_upload_bytes: usize,
}

impl ImageService {
    pub fn new(pipeline: Pipeline, max_upload_bytes: usize) -> Self {
        Self {
            storage: pipeline.uploads.clone(),
            repository: pipeline.repository.clone(),
            deletions: DeletionOrchestrator::new(pipeline.clone()),
            uploads: UploadOrchestrator::new(pipeline),
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Ingest an image and return its id.
    pub async fn upload(&self, data: Bytes, filename: &str) -> Result<i64, AppError> {
        if data.is_empty() {
            return Err(AppError::InvalidInput("Image data is empty".to_string()));
        }
        if filename.trim().is_empty() {
            return Err(AppError::InvalidInput("Filename is empty".to_string()));
        }
        if data.len() > self.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Image is {} bytes, the limit is {} bytes",
                data.len(),
                self.max_upload_bytes
            )));
        }

        self.uploads.upload(data, filename).await
    }

    /// All images, newest first.
    pub async fn list(&self) -> Result<Vec<ImageRecord>, AppError> {
        self.repository.list().await
    }

    /// Metadata of image `id`
    pub async fn metadata(&self, id: i64) -> Result<ImageRecord, AppError> {
        validate_id(id)?;
        self.repository.get(id).await
    }

    /// Stored bytes of image `id` together with its record.
    ///
    /// The file is read from the path on the record. Fails with `AppError::NotFound` when
    /// either the record or the stored file is gone.
    pub async fn get(&self, id: i64) -> Result<(Vec<u8>, ImageRecord), AppError> {
        let record = self.metadata(id).await?;
        let data = self.storage.read(Path::new(&record.file_path)).await?;
        Ok((data, record))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        validate_id(id)?;
        self.deletions.delete(id).await
    }

    /// Check that the repository is reachable
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn validate_id(id: i64) -> Result<(), AppError> {
    if id <= 0 {
        return Err(AppError::InvalidInput(format!("Invalid image id: {}", id)));
    }
    Ok(())
}
