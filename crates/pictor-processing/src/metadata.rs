//! Extracted image metadata and the dimension-based tag classifier

use std::fmt;
use std::path::Path;

/// Descriptive metadata derived from a stored image file.
///
/// The thumbnail path is not part of it: extraction knows nothing about thumbnails and
/// the upload orchestrator attaches it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMetadata {
    pub filename: String,
    /// Size reported by the filesystem, not the length of the uploaded payload.
    pub file_size: u64,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub file_path: String,
    pub image_format: String,
    pub tags: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn of(width: u32, height: u32) -> Self {
        match width.cmp(&height) {
            std::cmp::Ordering::Greater => Orientation::Landscape,
            std::cmp::Ordering::Less => Orientation::Portrait,
            std::cmp::Ordering::Equal => Orientation::Square,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    const SMALL_MAX_WIDTH: u32 = 800;
    const SMALL_MAX_HEIGHT: u32 = 600;
    const LARGE_MIN_WIDTH: u32 = 1920;
    const LARGE_MIN_HEIGHT: u32 = 1080;

    /// Medium is the half-open band [800, 1920) x [600, 1080); an image falling short on
    /// either axis is small, one reaching both large thresholds is large.
    pub fn of(width: u32, height: u32) -> Self {
        if width < Self::SMALL_MAX_WIDTH || height < Self::SMALL_MAX_HEIGHT {
            SizeClass::Small
        } else if width >= Self::LARGE_MIN_WIDTH && height >= Self::LARGE_MIN_HEIGHT {
            SizeClass::Large
        } else {
            SizeClass::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Space-joined tags for an image of the given size: orientation first, then size class.
pub fn classify_tags(width: u32, height: u32) -> String {
    format!(
        "{} {}",
        Orientation::of(width, height),
        SizeClass::of(width, height)
    )
}

/// Lower-cased extension of `name` without the dot; empty when there is none.
pub fn image_format_from_name(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}
