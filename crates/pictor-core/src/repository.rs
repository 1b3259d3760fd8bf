//! Image metadata store
//!
//! The pipeline does not own persistence of metadata records; it only needs
//! the narrow [`ImageRepository`] interface. [`InMemoryImageRepository`] is the
//! implementation used by the CLI and the test suites.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{EntityType, ImageMetadata, ImageUpdate};

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, record: ImageMetadata) -> Result<ImageMetadata, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<ImageMetadata>, AppError>;

    /// Apply `update` and return the updated record, `None` if it does not exist.
    async fn update(&self, id: Uuid, update: ImageUpdate)
        -> Result<Option<ImageMetadata>, AppError>;

    /// Remove the record and return it, `None` if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<Option<ImageMetadata>, AppError>;

    async fn list_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> Result<Vec<ImageMetadata>, AppError>;
}

#[derive(Default)]
pub struct InMemoryImageRepository {
    images: RwLock<HashMap<Uuid, ImageMetadata>>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn create(&self, record: ImageMetadata) -> Result<ImageMetadata, AppError> {
        let mut images = self.images.write().await;
        if images.contains_key(&record.id) {
            return Err(AppError::Metadata(format!(
                "Image {} already exists",
                record.id
            )));
        }
        images.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ImageMetadata>, AppError> {
        Ok(self.images.read().await.get(&id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        update: ImageUpdate,
    ) -> Result<Option<ImageMetadata>, AppError> {
        let mut images = self.images.write().await;
        Ok(images.get_mut(&id).map(|record| {
            record.apply(update);
            record.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<ImageMetadata>, AppError> {
        Ok(self.images.write().await.remove(&id))
    }

    async fn list_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> Result<Vec<ImageMetadata>, AppError> {
        let images = self.images.read().await;
        let mut found: Vec<ImageMetadata> = images
            .values()
            .filter(|img| img.entity_type == entity_type && img.entity_id == entity_id)
            .cloned()
            .collect();
        found.sort_by_key(|img| img.created_at);
        Ok(found)
    }
}
