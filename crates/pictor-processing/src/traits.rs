use async_trait::async_trait;
use pictor_core::AppError;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::metadata::ExtractedMetadata;

/// Derives descriptive metadata from a stored file.
#[async_trait]
pub trait MetadataExtraction: Send + Sync {
    /// Fails with `AppError::ImageDecode` for undecodable files and `AppError::Timeout`
    /// once `deadline` elapses.
    async fn extract(
        &self,
        file_path: &Path,
        display_name: &str,
        deadline: Duration,
    ) -> Result<ExtractedMetadata, AppError>;
}

/// Produces a resized derivative of a stored file and returns where it was written.
#[async_trait]
pub trait ThumbnailGeneration: Send + Sync {
    /// The thumbnail is written under `pictor_storage::thumbnail_name` of the source's key,
    /// so callers can locate it without the returned path. A generation its caller stopped
    /// waiting on must not leave a file behind.
    async fn generate(&self, file_path: &Path, deadline: Duration) -> Result<PathBuf, AppError>;
}
