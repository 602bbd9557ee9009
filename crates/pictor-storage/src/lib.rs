//! Pictor Storage Library
//!
//! Blob storage for uploaded images and their thumbnails. A [`Storage`] instance is rooted
//! at one directory and addresses files by flat filename keys; the service keeps one
//! instance for primary uploads and a second one for thumbnails.
//!
//! Keys must be a single path component: no `/`, `\` or `..`. Unique key generation lives
//! in [`naming`] so every writer produces collision-free names the same way.

pub mod local;
pub mod naming;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use naming::{key_from_path, thumbnail_name, unique_filename};
pub use traits::{Storage, StorageError, StorageResult};
