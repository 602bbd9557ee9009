//! Thumbnail generation for stored images

use async_trait::async_trait;
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use pictor_core::AppError;
use pictor_storage::{key_from_path, thumbnail_name, Storage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs;

use crate::deadline::{run_blocking, with_deadline};
use crate::decode::decode_image;
use crate::traits::ThumbnailGeneration;

const OPERATION: &str = "thumbnail generation";

/// Resizes stored images to a fixed width and writes the result to the thumbnail store.
#[derive(Clone)]
pub struct ThumbnailGenerator {
    storage: Arc<dyn Storage>,
    target_width: u32,
}

impl ThumbnailGenerator {
    pub fn new(storage: Arc<dyn Storage>, target_width: u32) -> Self {
        Self {
            storage,
            target_width,
        }
    }
}

#[async_trait]
impl ThumbnailGeneration for ThumbnailGenerator {
    /// Rendering runs as its own task so a missed deadline cannot cut a write in half.
    /// When the caller stops waiting, the task removes whatever it writes afterwards.
    async fn generate(&self, file_path: &Path, deadline: Duration) -> Result<PathBuf, AppError> {
        let abandoned = Arc::new(AtomicBool::new(false));
        let guard = AbandonOnDrop(Some(abandoned.clone()));

        let job = tokio::spawn(render(
            self.storage.clone(),
            self.target_width,
            file_path.to_path_buf(),
            abandoned,
        ));
        let result = with_deadline(OPERATION, deadline, async move {
            job.await
                .map_err(|e| AppError::Internal(format!("{} task failed: {}", OPERATION, e)))?
        })
        .await;

        if result.is_ok() {
            guard.disarm();
        }
        result
    }
}

/// Flags a render as abandoned unless its result was handed back to the caller.
struct AbandonOnDrop(Option<Arc<AtomicBool>>);

impl AbandonOnDrop {
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        if let Some(flag) = self.0.take() {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

async fn render(
    storage: Arc<dyn Storage>,
    target_width: u32,
    file_path: PathBuf,
    abandoned: Arc<AtomicBool>,
) -> Result<PathBuf, AppError> {
    let start = Instant::now();
    let key = thumbnail_name(&key_from_path(&file_path)?);

    let data = fs::read(&file_path).await.map_err(|e| {
        AppError::Storage(format!("Failed to read {}: {}", file_path.display(), e))
    })?;

    let format = output_format(&file_path);
    let (encoded, width, height) = run_blocking(OPERATION, move || {
        let img = decode_image(&data)?;
        let thumb = resize_to_width(&img, target_width);
        let (width, height) = thumb.dimensions();
        Ok((encode(thumb, format)?, width, height))
    })
    .await?;

    let path = storage.upload(&key, Bytes::from(encoded)).await?;

    // Set once the caller stopped waiting; its cleanup may already have run.
    if abandoned.load(Ordering::SeqCst) {
        tracing::debug!(thumbnail = %path.display(), "Removing thumbnail nobody waited for");
        if let Err(e) = storage.remove(&path).await {
            tracing::warn!(error = %e, thumbnail = %path.display(), "Failed to remove late thumbnail");
        }
        return Err(AppError::Internal(format!("{} was abandoned", OPERATION)));
    }

    tracing::debug!(
        source = %file_path.display(),
        thumbnail = %path.display(),
        width,
        height,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Thumbnail generated"
    );

    Ok(path)
}

/// Resize to `target_width`, deriving the height from the source aspect ratio.
fn resize_to_width(img: &DynamicImage, target_width: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let target_height = ((height as u64 * target_width as u64 + width as u64 / 2) / width as u64)
        .clamp(1, u32::MAX as u64) as u32;
    img.resize_exact(target_width, target_height, FilterType::Lanczos3)
}

/// Thumbnails keep the source format where the encoder supports it, PNG otherwise.
fn output_format(source: &Path) -> ImageFormat {
    match ImageFormat::from_path(source) {
        Ok(
            format @ (ImageFormat::Jpeg
            | ImageFormat::Png
            | ImageFormat::Gif
            | ImageFormat::WebP
            | ImageFormat::Bmp
            | ImageFormat::Tiff),
        ) => format,
        _ => ImageFormat::Png,
    }
}

fn encode(thumb: DynamicImage, format: ImageFormat) -> Result<Vec<u8>, AppError> {
    // JPEG has no alpha channel.
    let normalized = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(thumb.to_rgb8()),
        _ => DynamicImage::ImageRgba8(thumb.to_rgba8()),
    };

    let mut buffer = Vec::new();
    normalized
        .write_to(&mut Cursor::new(&mut buffer), format)
        .map_err(|e| AppError::Internal(format!("Failed to encode thumbnail: {}", e)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use pictor_storage::LocalStorage;
    use tempfile::tempdir;

    fn write_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 255) as u8, (y % 255) as u8, 90]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        std::fs::write(path, buffer).unwrap();
    }

    async fn generator(dir: &Path) -> ThumbnailGenerator {
        let storage = LocalStorage::new(dir.join("thumbnails")).await.unwrap();
        ThumbnailGenerator::new(Arc::new(storage), 200)
    }

    #[tokio::test]
    async fn test_thumbnail_preserves_aspect_ratio() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("wide.png");
        write_image(&source, 800, 400, ImageFormat::Png);

        let path = generator(dir.path())
            .await
            .generate(&source, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("thumbnails").join("thumb_wide.png"));
        let thumb = image::open(&path).unwrap();
        assert_eq!(thumb.dimensions(), (200, 100));
    }

    #[tokio::test]
    async fn test_thumbnail_keeps_jpeg_format() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        write_image(&source, 1000, 1500, ImageFormat::Jpeg);

        let path = generator(dir.path())
            .await
            .generate(&source, Duration::from_secs(5))
            .await
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
        let thumb = image::load_from_memory(&bytes).unwrap();
        assert_eq!(thumb.dimensions(), (200, 300));
    }

    #[tokio::test]
    async fn test_small_sources_are_scaled_to_target_width() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("tiny.png");
        write_image(&source, 2, 1, ImageFormat::Png);

        let path = generator(dir.path())
            .await
            .generate(&source, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(image::open(&path).unwrap().dimensions(), (200, 100));
    }

    #[tokio::test]
    async fn test_extreme_aspect_ratio_keeps_one_pixel_height() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("strip.png");
        write_image(&source, 4000, 1, ImageFormat::Png);

        let path = generator(dir.path())
            .await
            .generate(&source, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(image::open(&path).unwrap().dimensions(), (200, 1));
    }

    #[tokio::test]
    async fn test_non_image_writes_no_thumbnail() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("noise.png");
        std::fs::write(&source, b"definitely not an image").unwrap();

        let result = generator(dir.path())
            .await
            .generate(&source, Duration::from_secs(5))
            .await;

        assert!(matches!(result, Err(AppError::ImageDecode(_))));
        assert!(!dir.path().join("thumbnails").join("thumb_noise.png").exists());
    }

    #[test]
    fn test_output_format_falls_back_to_png() {
        assert_eq!(output_format(Path::new("a.jpeg")), ImageFormat::Jpeg);
        assert_eq!(output_format(Path::new("a.ico")), ImageFormat::Png);
        assert_eq!(output_format(Path::new("a")), ImageFormat::Png);
    }
}
