use image::{DynamicImage, GenericImageView, ImageReader};
use pictor_core::AppError;
use std::io::Cursor;

/// Decode `data` into an image, rejecting anything the decoder cannot identify.
pub(crate) fn decode_image(data: &[u8]) -> Result<DynamicImage, AppError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AppError::ImageDecode(format!("Unable to read image: {}", e)))?;

    if reader.format().is_none() {
        return Err(AppError::ImageDecode(
            "File is not a recognized image format".to_string(),
        ));
    }

    let img = reader
        .decode()
        .map_err(|e| AppError::ImageDecode(format!("Failed to decode image: {}", e)))?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(AppError::ImageDecode(format!(
            "Image has empty bounds ({}x{})",
            width, height
        )));
    }

    Ok(img)
}
