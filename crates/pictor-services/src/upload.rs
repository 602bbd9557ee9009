//! Upload orchestration
//!
//! Turns raw bytes into a stored, fully described image record:
//! store → (extract ∥ thumbnail) → persist. Nothing is persisted unless every step
//! succeeds, and files written by a failed upload are removed best-effort.

use bytes::Bytes;
use pictor_core::models::NewImageRecord;
use pictor_core::AppError;
use pictor_processing::ExtractedMetadata;
use pictor_storage::{thumbnail_name, unique_filename};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cleanup::remove_files;
use crate::pipeline::Pipeline;

pub struct UploadOrchestrator {
    pipeline: Pipeline,
}

impl UploadOrchestrator {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Store `data`, derive its metadata and thumbnail concurrently, then persist the
    /// record. Returns the new record's id.
    ///
    /// The first failure wins: a storage write failure aborts before any derivation, a
    /// derivation failure (decode, timeout, I/O) or a repository failure removes the files
    /// written so far and is returned unchanged.
    pub async fn upload(&self, data: Bytes, original_filename: &str) -> Result<i64, AppError> {
        let start = Instant::now();
        let key = unique_filename(original_filename);
        let size_bytes = data.len();

        tracing::info!(
            key = %key,
            original_filename = %original_filename,
            size_bytes = size_bytes,
            "Processing upload"
        );

        let file_path = self.pipeline.uploads.upload(&key, data).await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to write upload to storage");
            AppError::from(e)
        })?;

        let (metadata, thumbnail_path) = match self.derive(&file_path, original_filename).await {
            Ok(derived) => derived,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key = %key,
                    "Derivation failed, discarding stored upload"
                );
                self.discard(&file_path, &key).await;
                return Err(e);
            }
        };

        let record = match new_record(metadata, &thumbnail_path) {
            Ok(record) => record,
            Err(e) => {
                self.discard(&file_path, &key).await;
                return Err(e);
            }
        };

        match self.pipeline.repository.create(record).await {
            Ok(id) => {
                tracing::info!(
                    image_id = id,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload completed"
                );
                Ok(id)
            }
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Failed to persist image record");
                self.discard(&file_path, &key).await;
                Err(e)
            }
        }
    }

    /// Run both derivation units concurrently, each under its own deadline.
    async fn derive(
        &self,
        file_path: &Path,
        display_name: &str,
    ) -> Result<(ExtractedMetadata, PathBuf), AppError> {
        let deadline = self.pipeline.derivation_timeout;
        tokio::try_join!(
            self.pipeline
                .extractor
                .extract(file_path, display_name, deadline),
            self.pipeline.thumbnailer.generate(file_path, deadline),
        )
    }

    /// Remove the primary file and any thumbnail written for it.
    async fn discard(&self, file_path: &Path, key: &str) {
        let thumbnail = self.pipeline.thumbnails.root().join(thumbnail_name(key));
        remove_files(
            &self.pipeline.uploads,
            file_path,
            &self.pipeline.thumbnails,
            Some(&thumbnail),
        )
        .await
        .log("upload rollback");
    }
}

fn new_record(metadata: ExtractedMetadata, thumbnail_path: &Path) -> Result<NewImageRecord, AppError> {
    let out_of_range =
        |field: &str| AppError::Internal(format!("Image {} does not fit the record", field));

    Ok(NewImageRecord {
        file_size: i64::try_from(metadata.file_size).map_err(|_| out_of_range("size"))?,
        width: i32::try_from(metadata.width).map_err(|_| out_of_range("width"))?,
        height: i32::try_from(metadata.height).map_err(|_| out_of_range("height"))?,
        filename: metadata.filename,
        mime_type: metadata.mime_type,
        file_path: metadata.file_path,
        thumbnail_path: thumbnail_path.display().to_string(),
        image_format: metadata.image_format,
        tags: metadata.tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        encoded, png_bytes, FailingThumbnailer, SlowStorage, StalledExtractor, TestPipeline,
    };
    use pictor_processing::ThumbnailGenerator;
    use pictor_storage::{LocalStorage, Storage};
    use image::ImageFormat;
    use pictor_db::ImageRepository;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_upload_persists_full_record() {
        let t = TestPipeline::new().await;
        let orchestrator = UploadOrchestrator::new(t.pipeline.clone());

        let data = png_bytes(1600, 900);
        let id = orchestrator.upload(data.clone(), "sunset.png").await.unwrap();

        let record = t.repository.get(id).await.unwrap();
        assert!(id > 0);
        assert_eq!(record.filename, "sunset.png");
        assert_eq!(record.file_size, data.len() as i64);
        assert_eq!(record.mime_type, "image/png");
        assert_eq!((record.width, record.height), (1600, 900));
        assert_eq!(record.image_format, "png");
        assert_eq!(record.tags, "landscape medium");

        let stored = std::fs::read(&record.file_path).unwrap();
        assert_eq!(stored, data.to_vec());
        assert!(record.has_thumbnail());
        let thumb = image::open(&record.thumbnail_path).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (200, 113));
    }

    #[tokio::test]
    async fn test_stored_name_keeps_stem_and_extension() {
        let t = TestPipeline::new().await;
        let orchestrator = UploadOrchestrator::new(t.pipeline.clone());

        let id = orchestrator
            .upload(encoded(64, 64, ImageFormat::Jpeg), "holiday photo.jpg")
            .await
            .unwrap();

        let record = t.repository.get(id).await.unwrap();
        let key = Path::new(&record.file_path)
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(key.starts_with("holiday_photo_"));
        assert!(key.ends_with(".jpg"));
        assert!(record.thumbnail_path.ends_with(&format!("thumb_{}", key)));
    }

    #[tokio::test]
    async fn test_non_image_leaves_no_files() {
        let t = TestPipeline::new().await;
        let orchestrator = UploadOrchestrator::new(t.pipeline.clone());

        let result = orchestrator
            .upload(Bytes::from_static(&[1, 2, 3, 4, 5]), "noise.png")
            .await;

        assert!(matches!(result, Err(AppError::ImageDecode(_))));
        assert!(TestPipeline::files_in(&t.upload_dir()).is_empty());
        assert!(TestPipeline::files_in(&t.thumbnail_dir()).is_empty());
        assert!(t.repository.is_empty());
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_timeout() {
        let t = TestPipeline::new().await;
        let mut pipeline = t.pipeline.clone();
        pipeline.extractor = Arc::new(StalledExtractor);
        pipeline.derivation_timeout = Duration::from_millis(50);
        let orchestrator = UploadOrchestrator::new(pipeline);

        let result = orchestrator.upload(png_bytes(32, 32), "slow.png").await;

        assert!(matches!(result, Err(AppError::Timeout { .. })));
        assert!(TestPipeline::files_in(&t.upload_dir()).is_empty());
        assert!(TestPipeline::files_in(&t.thumbnail_dir()).is_empty());
        assert!(t.repository.is_empty());
    }

    #[tokio::test]
    async fn test_slow_thumbnail_write_times_out_and_leaves_no_files() {
        let t = TestPipeline::new().await;
        let slow: Arc<dyn Storage> = Arc::new(SlowStorage {
            inner: LocalStorage::new(t.thumbnail_dir()).await.unwrap(),
            delay: Duration::from_millis(300),
        });
        let mut pipeline = t.pipeline.clone();
        pipeline.thumbnails = slow.clone();
        pipeline.thumbnailer = Arc::new(ThumbnailGenerator::new(slow, 200));
        pipeline.derivation_timeout = Duration::from_millis(100);
        let orchestrator = UploadOrchestrator::new(pipeline);

        let result = orchestrator.upload(png_bytes(32, 32), "slow.png").await;

        assert!(matches!(result, Err(AppError::Timeout { .. })));
        assert!(TestPipeline::files_in(&t.upload_dir()).is_empty());
        assert!(t.repository.is_empty());

        // The render task outlives the deadline; give it time to finish its write.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(TestPipeline::files_in(&t.thumbnail_dir()).is_empty());
    }

    #[tokio::test]
    async fn test_thumbnail_failure_aborts_upload() {
        let t = TestPipeline::new().await;
        let mut pipeline = t.pipeline.clone();
        pipeline.thumbnailer = Arc::new(FailingThumbnailer);
        let orchestrator = UploadOrchestrator::new(pipeline);

        let result = orchestrator.upload(png_bytes(32, 32), "a.png").await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(TestPipeline::files_in(&t.upload_dir()).is_empty());
        assert!(t.repository.is_empty());
    }

    #[tokio::test]
    async fn test_repository_failure_removes_files() {
        let t = TestPipeline::new().await;
        t.repository.set_fail_creates(true);
        let orchestrator = UploadOrchestrator::new(t.pipeline.clone());

        let result = orchestrator.upload(png_bytes(32, 32), "a.png").await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(TestPipeline::files_in(&t.upload_dir()).is_empty());
        assert!(TestPipeline::files_in(&t.thumbnail_dir()).is_empty());
    }

    #[tokio::test]
    async fn test_same_filename_gets_distinct_keys() {
        let t = TestPipeline::new().await;
        let orchestrator = Arc::new(UploadOrchestrator::new(t.pipeline.clone()));

        let a = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.upload(png_bytes(16, 16), "same.png").await })
        };
        let b = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.upload(png_bytes(16, 16), "same.png").await })
        };
        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();

        assert_ne!(first, second);
        let first = t.repository.get(first).await.unwrap();
        let second = t.repository.get(second).await.unwrap();
        assert_ne!(first.file_path, second.file_path);
        assert_eq!(TestPipeline::files_in(&t.upload_dir()).len(), 2);
    }
}
