//! Storage key generation.
//!
//! Primary uploads are stored as `{stem}_{YYYYMMDD_HHMMSS_nnnnnnnnn}_{suffix}.{ext}`: the
//! sanitised stem of the original filename, a nanosecond-resolution UTC timestamp and
//! eight hex characters of a random UUID. The original extension is kept so the stored
//! file still carries its format hint.

use chrono::{DateTime, Utc};
use pictor_core::constants::THUMBNAIL_PREFIX;
use std::path::Path;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

const FALLBACK_STEM: &str = "image";

/// Generate a collision-resistant storage key for `original` using the current time.
pub fn unique_filename(original: &str) -> String {
    unique_filename_at(original, Utc::now())
}

/// Same as [`unique_filename`] with an explicit timestamp.
pub fn unique_filename_at(original: &str, now: DateTime<Utc>) -> String {
    let (stem, extension) = split_name(original);
    let suffix = Uuid::new_v4().simple().to_string();

    let mut name = format!(
        "{}_{}_{}",
        stem,
        now.format("%Y%m%d_%H%M%S_%9f"),
        &suffix[..8]
    );
    if let Some(ext) = extension {
        name.push('.');
        name.push_str(&ext);
    }
    name
}

/// Deterministic thumbnail key for a stored source key.
pub fn thumbnail_name(source_key: &str) -> String {
    format!("{}{}", THUMBNAIL_PREFIX, source_key)
}

/// Extract the storage key (the final path component) from a stored path.
pub fn key_from_path(path: impl AsRef<Path>) -> StorageResult<String> {
    let path = path.as_ref();
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            StorageError::InvalidKey(format!("Path has no file name: {}", path.display()))
        })
}

/// Split a user-supplied filename into a sanitised stem and extension.
fn split_name(original: &str) -> (String, Option<String>) {
    // Only the last component matters; clients sometimes send full paths.
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let (stem, extension) = match base.rfind('.') {
        Some(idx) if idx + 1 < base.len() => (&base[..idx], Some(&base[idx + 1..])),
        _ => (base, None),
    };

    let stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.trim_matches('_').is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    };

    let extension = extension
        .map(|ext| {
            ext.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|ext| !ext.is_empty());

    (stem, extension)
}
