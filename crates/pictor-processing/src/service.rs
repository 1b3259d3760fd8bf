//! Image lifecycle: ownership check, ingestion, metadata record and removal.

use pictor_core::models::{EntityType, ImageMetadata, ImageUpdate, UploadFields};
use pictor_core::{AppError, ImageRepository, OwnershipRegistry};
use std::io::{Read, Seek};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::remover::Remover;
use crate::upload::{ImagePipeline, UploadRequest};

/// Result of deleting an image.
///
/// The record is gone once this is returned; `warnings` lists derivative
/// files that could not be removed.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub record: ImageMetadata,
    pub warnings: Vec<String>,
}

pub struct ImageService {
    pipeline: ImagePipeline,
    remover: Remover,
    repository: Arc<dyn ImageRepository>,
    ownership: OwnershipRegistry,
}

impl ImageService {
    pub fn new(
        pipeline: ImagePipeline,
        repository: Arc<dyn ImageRepository>,
        ownership: OwnershipRegistry,
    ) -> Self {
        let remover = Remover::new(
            pipeline.storage().clone(),
            pipeline.config().public_url_prefix.clone(),
        );
        Self {
            pipeline,
            remover,
            repository,
            ownership,
        }
    }

    pub fn pipeline(&self) -> &ImagePipeline {
        &self.pipeline
    }

    /// Ingest an upload and record it against the target entity.
    ///
    /// If the record cannot be written the fresh derivatives are removed again.
    pub async fn upload<R>(
        &self,
        owner_id: Uuid,
        fields: UploadFields,
        request: UploadRequest<R>,
    ) -> Result<ImageMetadata, AppError>
    where
        R: Read + Seek + Send + 'static,
    {
        fields.validate()?;
        self.ownership
            .verify(fields.entity_type, fields.entity_id, owner_id)
            .await?;

        let file_name = request.file_name.clone();
        let processed = self.pipeline.ingest(request).await?;

        let record = ImageMetadata::new(owner_id, file_name, processed.clone(), fields);
        match self.repository.create(record).await {
            Ok(record) => {
                tracing::info!(
                    image_id = %record.id,
                    entity_type = %record.entity_type,
                    entity_id = %record.entity_id,
                    "Image record created"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    original_url = %processed.original_url,
                    "Failed to record image, removing derivatives"
                );
                if let Err(cleanup) = self
                    .remover
                    .remove(&processed.original_url, &processed.thumbnail_url)
                    .await
                {
                    tracing::warn!(error = %cleanup, "Derivative cleanup after record failure failed");
                }
                Err(e)
            }
        }
    }

    /// Fetch an image owned by `owner_id`.
    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<ImageMetadata, AppError> {
        let record = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))?;

        if record.owner_id != owner_id {
            return Err(AppError::Forbidden("You do not own this image".to_string()));
        }
        Ok(record)
    }

    pub async fn list_for_entity(
        &self,
        owner_id: Uuid,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> Result<Vec<ImageMetadata>, AppError> {
        self.ownership
            .verify(entity_type, entity_id, owner_id)
            .await?;
        self.repository.list_for_entity(entity_type, entity_id).await
    }

    /// Update `alt`, `is_main` or `type`. Derivatives never change.
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        update: ImageUpdate,
    ) -> Result<ImageMetadata, AppError> {
        update.validate()?;
        self.get(owner_id, id).await?;

        self.repository
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))
    }

    /// Delete the record, then remove its derivatives on a best-effort basis.
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<DeleteOutcome, AppError> {
        self.get(owner_id, id).await?;

        let record = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))?;

        let mut warnings = Vec::new();
        if let Err(e) = self
            .remover
            .remove(&record.url, &record.thumbnail_url)
            .await
        {
            tracing::warn!(
                error = %e,
                image_id = %record.id,
                "Image record deleted but derivative removal failed"
            );
            warnings.push(e.to_string());
        }

        Ok(DeleteOutcome { record, warnings })
    }
}
