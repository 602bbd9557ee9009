use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored image and its derived metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub width: i32,
    pub height: i32,
    pub file_path: String,
    /// Empty when no thumbnail exists.
    pub thumbnail_path: String,
    pub image_format: String,
    pub tags: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImageRecord {
    pub fn has_thumbnail(&self) -> bool {
        !self.thumbnail_path.is_empty()
    }
}

/// Insert payload for a fully ingested image. Identifier and timestamps are assigned by
/// the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImageRecord {
    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub width: i32,
    pub height: i32,
    pub file_path: String,
    pub thumbnail_path: String,
    pub image_format: String,
    pub tags: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageResponse {
    pub id: i64,
    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub width: i32,
    pub height: i32,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    pub image_format: String,
    pub tags: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ImageRecord> for ImageResponse {
    fn from(record: ImageRecord) -> Self {
        let thumbnail_path = if record.has_thumbnail() {
            Some(record.thumbnail_path)
        } else {
            None
        };
        ImageResponse {
            id: record.id,
            filename: record.filename,
            file_size: record.file_size,
            mime_type: record.mime_type,
            width: record.width,
            height: record.height,
            file_path: record.file_path,
            thumbnail_path,
            image_format: record.image_format,
            tags: record.tags,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
