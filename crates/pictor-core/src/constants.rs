//! Shared constants

/// Directory for primary uploads when `UPLOAD_DIR` is unset.
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads/images";

/// Directory for thumbnails when `THUMBNAIL_DIR` is unset.
pub const DEFAULT_THUMBNAIL_DIR: &str = "./uploads/thumbnails";

/// Per-unit deadline for metadata extraction and thumbnail generation.
pub const DEFAULT_DERIVATION_TIMEOUT_SECS: u64 = 5;

/// Target thumbnail width in pixels; height follows the aspect ratio.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 200;

pub const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 4;

pub const THUMBNAIL_PREFIX: &str = "thumb_";

/// Number of leading bytes inspected when sniffing a MIME type.
pub const SNIFF_LEN: usize = 512;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Idle connections are closed after this long.
pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;

pub const DB_MAX_LIFETIME_SECS: u64 = 1800;
