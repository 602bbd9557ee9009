//! Metadata extraction for stored images

use async_trait::async_trait;
use image::GenericImageView;
use pictor_core::constants::SNIFF_LEN;
use pictor_core::AppError;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs;

use crate::deadline::{run_blocking, with_deadline};
use crate::decode::decode_image;
use crate::metadata::{classify_tags, image_format_from_name, ExtractedMetadata};
use crate::sniff::sniff_mime_type;
use crate::traits::MetadataExtraction;

const OPERATION: &str = "metadata extraction";

/// Reads a stored file back and describes it.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        MetadataExtractor
    }

    async fn describe(
        &self,
        file_path: &Path,
        display_name: &str,
    ) -> Result<ExtractedMetadata, AppError> {
        let start = Instant::now();

        let file_size = fs::metadata(file_path)
            .await
            .map_err(|e| {
                AppError::Storage(format!("Failed to stat {}: {}", file_path.display(), e))
            })?
            .len();

        let data = fs::read(file_path).await.map_err(|e| {
            AppError::Storage(format!("Failed to read {}: {}", file_path.display(), e))
        })?;

        let mime_type = sniff_mime_type(&data[..data.len().min(SNIFF_LEN)]).to_string();

        let (width, height) = run_blocking(OPERATION, move || {
            decode_image(&data).map(|img| img.dimensions())
        })
        .await?;

        let metadata = ExtractedMetadata {
            filename: display_name.to_string(),
            file_size,
            mime_type,
            width,
            height,
            file_path: file_path.display().to_string(),
            image_format: image_format_from_name(display_name),
            tags: classify_tags(width, height),
        };

        tracing::debug!(
            path = %file_path.display(),
            width = metadata.width,
            height = metadata.height,
            mime_type = %metadata.mime_type,
            tags = %metadata.tags,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Metadata extracted"
        );

        Ok(metadata)
    }
}

#[async_trait]
impl MetadataExtraction for MetadataExtractor {
    async fn extract(
        &self,
        file_path: &Path,
        display_name: &str,
        deadline: Duration,
    ) -> Result<ExtractedMetadata, AppError> {
        with_deadline(OPERATION, deadline, self.describe(file_path, display_name)).await
    }
}
