//! Pictor Services Layer
//!
//! Business orchestration for the ingestion pipeline: the upload path that turns raw bytes
//! into a stored, fully described image record, the symmetric deletion path, and the
//! `ImageService` facade the transport layer calls. HTTP concerns stay in pictor-api.

pub mod cleanup;
pub mod deletion;
pub mod image_service;
pub mod pipeline;
pub mod upload;

pub use cleanup::{CleanupFailure, CleanupReport};
pub use deletion::DeletionOrchestrator;
pub use image_service::ImageService;
pub use pipeline::Pipeline;
pub use upload::UploadOrchestrator;

pub use pictor_db::ImageRepository;
#[cfg(feature = "test-helpers")]
pub use pictor_db::InMemoryImageRepository;
pub use pictor_processing::{
    MetadataExtraction, MetadataExtractor, ThumbnailGeneration, ThumbnailGenerator,
};
pub use pictor_storage::{LocalStorage, Storage, StorageError, StorageResult};

#[cfg(test)]
pub(crate) mod test_support;
