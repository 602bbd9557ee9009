//! Fixtures shared by the service tests.

use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, Rgb, RgbImage};
use pictor_core::AppError;
use pictor_db::InMemoryImageRepository;
use pictor_processing::{
    ExtractedMetadata, MetadataExtraction, MetadataExtractor, ThumbnailGeneration,
    ThumbnailGenerator,
};
use pictor_storage::{LocalStorage, Storage, StorageResult};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use crate::pipeline::Pipeline;

pub struct TestPipeline {
    pub pipeline: Pipeline,
    pub repository: InMemoryImageRepository,
    pub dir: TempDir,
}

impl TestPipeline {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let uploads: Arc<dyn Storage> =
            Arc::new(LocalStorage::new(dir.path().join("images")).await.unwrap());
        let thumbnails: Arc<dyn Storage> =
            Arc::new(LocalStorage::new(dir.path().join("thumbnails")).await.unwrap());
        let repository = InMemoryImageRepository::new();

        let pipeline = Pipeline {
            thumbnailer: Arc::new(ThumbnailGenerator::new(thumbnails.clone(), 200)),
            extractor: Arc::new(MetadataExtractor::new()),
            uploads,
            thumbnails,
            repository: Arc::new(repository.clone()),
            derivation_timeout: Duration::from_secs(5),
        };

        Self {
            pipeline,
            repository,
            dir,
        }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("images")
    }

    pub fn thumbnail_dir(&self) -> PathBuf {
        self.dir.path().join("thumbnails")
    }

    /// Names of the files currently in `dir`
    pub fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn png_bytes(width: u32, height: u32) -> Bytes {
    encoded(width, height, ImageFormat::Png)
}

pub fn encoded(width: u32, height: u32, format: ImageFormat) -> Bytes {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    Bytes::from(buffer)
}

/// Extractor that sleeps longer than any deadline the tests use, honouring the deadline
/// the way the real extractor does.
pub struct StalledExtractor;

#[async_trait]
impl MetadataExtraction for StalledExtractor {
    async fn extract(
        &self,
        _file_path: &Path,
        _display_name: &str,
        deadline: Duration,
    ) -> Result<ExtractedMetadata, AppError> {
        pictor_processing::with_deadline("metadata extraction", deadline, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(AppError::Internal("unreachable".to_string()))
        })
        .await
    }
}

/// Thumbnailer that always fails after writing nothing.
pub struct FailingThumbnailer;

#[async_trait]
impl ThumbnailGeneration for FailingThumbnailer {
    async fn generate(&self, _file_path: &Path, _deadline: Duration) -> Result<PathBuf, AppError> {
        Err(AppError::Storage("thumbnail store unavailable".to_string()))
    }
}

/// Store whose writes finish only after `delay`, standing in for a slow disk.
pub struct SlowStorage {
    pub inner: LocalStorage,
    pub delay: Duration,
}

#[async_trait]
impl Storage for SlowStorage {
    async fn upload(&self, key: &str, data: Bytes) -> StorageResult<PathBuf> {
        tokio::time::sleep(self.delay).await;
        self.inner.upload(key, data).await
    }

    async fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        self.inner.read(path).await
    }

    async fn remove(&self, path: &Path) -> StorageResult<()> {
        self.inner.remove(path).await
    }

    fn root(&self) -> &Path {
        self.inner.root()
    }
}
