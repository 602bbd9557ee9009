//! Best-effort file removal.
//!
//! Cleanup never fails the operation that triggered it: every failure is collected into a
//! `CleanupReport` and logged.

use pictor_storage::{Storage, StorageResult};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    pub path: String,
    pub error: String,
}

/// Outcome of a best-effort cleanup.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<String>,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn record(&mut self, path: &Path, result: StorageResult<()>) {
        let path = path.display().to_string();
        match result {
            Ok(()) => self.removed.push(path),
            Err(e) => self.failures.push(CleanupFailure {
                path,
                error: e.to_string(),
            }),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Emit one warning per failure. `context` names the operation that triggered cleanup.
    pub fn log(&self, context: &str) {
        for failure in &self.failures {
            tracing::warn!(
                context = context,
                path = %failure.path,
                error = %failure.error,
                "Failed to remove file during cleanup"
            );
        }
        if self.is_clean() {
            tracing::debug!(context = context, removed = self.removed.len(), "Cleanup finished");
        }
    }
}

/// Remove `primary` through `uploads` and, when given, `thumbnail` through `thumbnails`,
/// concurrently. A failure on one file never stops the other removal.
pub async fn remove_files(
    uploads: &Arc<dyn Storage>,
    primary: &Path,
    thumbnails: &Arc<dyn Storage>,
    thumbnail: Option<&Path>,
) -> CleanupReport {
    let remove_thumbnail = async {
        match thumbnail {
            Some(path) => Some(thumbnails.remove(path).await),
            None => None,
        }
    };

    let (primary_result, thumbnail_result) =
        tokio::join!(uploads.remove(primary), remove_thumbnail);

    let mut report = CleanupReport::default();
    report.record(primary, primary_result);
    if let (Some(path), Some(result)) = (thumbnail, thumbnail_result) {
        report.record(path, result);
    }
    report
}
