//! Storage abstraction trait
//!
//! This module defines the Storage trait that blob backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use pictor_core::AppError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("File not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Blob store for image files.
///
/// Files are written under a key and addressed afterwards by the path `upload` returned,
/// which is what image records persist. Implementations hold no business logic: the
/// upload and deletion orchestrators decide when each call happens and which failures
/// are fatal.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `key` and return the path of the stored file.
    async fn upload(&self, key: &str, data: Bytes) -> StorageResult<PathBuf>;

    /// Read the whole file at a path previously returned by `upload`.
    ///
    /// The path is taken as recorded, so files written before the store moved to another
    /// directory stay readable.
    async fn read(&self, path: &Path) -> StorageResult<Vec<u8>>;

    /// Remove the file at a recorded path. Removing a missing file succeeds.
    async fn remove(&self, path: &Path) -> StorageResult<()>;

    /// Directory new files are written into
    fn root(&self) -> &Path;
}
