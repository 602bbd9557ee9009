//! In-memory repository used by service and API tests.

use async_trait::async_trait;
use chrono::Utc;
use pictor_core::models::{ImageRecord, NewImageRecord};
use pictor_core::AppError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::image::ImageRepository;

/// `ImageRepository` backed by a map, with the same ordering and error contract as the
/// Postgres implementation.
#[derive(Clone, Default)]
pub struct InMemoryImageRepository {
    images: Arc<Mutex<BTreeMap<i64, ImageRecord>>>,
    next_id: Arc<AtomicI64>,
    fail_creates: Arc<AtomicBool>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create` fail with a database error.
    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<i64, ImageRecord>> {
        self.images.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn create(&self, image: NewImageRecord) -> Result<i64, AppError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let record = ImageRecord {
            id,
            filename: image.filename,
            file_size: image.file_size,
            mime_type: image.mime_type,
            width: image.width,
            height: image.height,
            file_path: image.file_path,
            thumbnail_path: image.thumbnail_path,
            image_format: image.image_format,
            tags: image.tags,
            created_at: now,
            updated_at: now,
        };
        self.lock().insert(id, record);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<ImageRecord>, AppError> {
        let mut records: Vec<ImageRecord> = self.lock().values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn get(&self, id: i64) -> Result<ImageRecord, AppError> {
        self.lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        match self.lock().remove(&id) {
            Some(_) => Ok(true),
            None => Err(AppError::NotFound(format!("Image {} not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_image(name: &str) -> NewImageRecord {
        NewImageRecord {
            filename: name.to_string(),
            file_size: 1024,
            mime_type: "image/png".to_string(),
            width: 640,
            height: 480,
            file_path: format!("/tmp/uploads/{}", name),
            thumbnail_path: format!("/tmp/thumbnails/thumb_{}", name),
            image_format: "png".to_string(),
            tags: "landscape small".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = InMemoryImageRepository::new();
        let first = repo.create(new_image("a.png")).await.unwrap();
        let second = repo.create(new_image("b.png")).await.unwrap();

        assert!(first > 0);
        assert!(second > first);
        assert_eq!(repo.get(second).await.unwrap().filename, "b.png");
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryImageRepository::new();
        for name in ["a.png", "b.png", "c.png"] {
            repo.create(new_image(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(names, vec!["c.png", "b.png", "a.png"]);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let repo = InMemoryImageRepository::new();
        let id = repo.create(new_image("a.png")).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(matches!(repo.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.delete(id).await, Err(AppError::NotFound(_))));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let repo = InMemoryImageRepository::new();
        let id = repo.create(new_image("a.png")).await.unwrap();
        repo.delete(id).await.unwrap();

        let next = repo.create(new_image("b.png")).await.unwrap();
        assert_ne!(id, next);
    }

    #[tokio::test]
    async fn test_failing_creates() {
        let repo = InMemoryImageRepository::new();
        repo.set_fail_creates(true);
        assert!(matches!(
            repo.create(new_image("a.png")).await,
            Err(AppError::Database(_))
        ));
        assert_eq!(repo.len(), 0);
    }
}
