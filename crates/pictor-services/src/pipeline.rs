//! Dependencies shared by the upload and deletion paths.

use pictor_core::{AppError, Config};
use pictor_db::ImageRepository;
use pictor_processing::{
    MetadataExtraction, MetadataExtractor, ThumbnailGeneration, ThumbnailGenerator,
};
use pictor_storage::{LocalStorage, Storage};
use std::sync::Arc;
use std::time::Duration;

/// Everything the orchestrators need, held behind trait objects so tests can swap any
/// piece.
#[derive(Clone)]
pub struct Pipeline {
    /// Primary image store
    pub uploads: Arc<dyn Storage>,
    /// Thumbnail store, rooted in a different directory than `uploads`
    pub thumbnails: Arc<dyn Storage>,
    pub extractor: Arc<dyn MetadataExtraction>,
    pub thumbnailer: Arc<dyn ThumbnailGeneration>,
    pub repository: Arc<dyn ImageRepository>,
    /// Deadline applied to each derivation unit independently
    pub derivation_timeout: Duration,
}

impl Pipeline {
    /// Filesystem-backed pipeline rooted at the configured directories.
    ///
    /// Creates both directories if they do not exist yet.
    pub async fn local(
        config: &Config,
        repository: Arc<dyn ImageRepository>,
    ) -> Result<Self, AppError> {
        let uploads: Arc<dyn Storage> = Arc::new(LocalStorage::new(config.upload_dir()).await?);
        let thumbnails: Arc<dyn Storage> =
            Arc::new(LocalStorage::new(config.thumbnail_dir()).await?);

        tracing::info!(
            upload_dir = %uploads.root().display(),
            thumbnail_dir = %thumbnails.root().display(),
            "Local storage initialized"
        );

        Ok(Self {
            thumbnailer: Arc::new(ThumbnailGenerator::new(
                thumbnails.clone(),
                config.thumbnail_width(),
            )),
            extractor: Arc::new(MetadataExtractor::new()),
            uploads,
            thumbnails,
            repository,
            derivation_timeout: Duration::from_secs(config.derivation_timeout_secs()),
        })
    }
}
