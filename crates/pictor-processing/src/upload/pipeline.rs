//! Upload pipeline: validate → allocate → decode → optimize → store original →
//! fit thumbnail → store thumbnail.
//!
//! Validation happens before a name is allocated, so rejected uploads never
//! touch storage. Any failure after allocation removes both derivatives of the
//! allocated name before the error is returned.

use bytes::Bytes;
use image::DynamicImage;
use pictor_core::models::ProcessedImage;
use pictor_core::{AppError, PipelineConfig};
use pictor_storage::{derivative_key, public_url, DerivativeKind, Storage};
use std::io::{Read, Seek};
use std::sync::Arc;
use tokio::task::JoinError;

use super::rollback::{DiagnosticSink, RollbackController, TracingDiagnostics};
use super::types::{UploadProgress, UploadRequest, UploadState};
use crate::compression::{output_mime_type, ImageCompressor};
use crate::image::{FormatTag, ImageProcessor, ImageResize};
use crate::naming::NameAllocator;
use crate::validator::UploadValidator;

fn join_error(e: JoinError) -> AppError {
    AppError::Internal(format!("Image processing task failed: {}", e))
}

/// Image ingestion pipeline.
///
/// Cheap to clone; clones share configuration and storage.
#[derive(Clone)]
pub struct ImagePipeline {
    config: Arc<PipelineConfig>,
    validator: UploadValidator,
    allocator: NameAllocator,
    storage: Arc<dyn Storage>,
    rollback: RollbackController,
}

impl ImagePipeline {
    pub fn new(config: PipelineConfig, storage: Arc<dyn Storage>) -> Self {
        Self::with_diagnostics(config, storage, Arc::new(TracingDiagnostics))
    }

    pub fn with_diagnostics(
        config: PipelineConfig,
        storage: Arc<dyn Storage>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            validator: UploadValidator::from_config(&config),
            allocator: NameAllocator,
            rollback: RollbackController::new(storage.clone(), sink),
            config: Arc::new(config),
            storage,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Run one upload through the pipeline.
    pub async fn ingest<R>(&self, request: UploadRequest<R>) -> Result<ProcessedImage, AppError>
    where
        R: Read + Seek + Send + 'static,
    {
        let mut progress = UploadProgress::new();
        let UploadRequest {
            mut stream,
            declared_size,
            content_type,
            file_name,
        } = request;

        let validator = self.validator.clone();
        let validated = tokio::task::spawn_blocking(move || {
            validator
                .validate_all(&mut stream, declared_size, &content_type)
                .map(|_| stream)
        })
        .await
        .map_err(join_error)?;

        let stream = match validated {
            Ok(stream) => stream,
            Err(e) => {
                progress.advance(UploadState::Failed);
                tracing::info!(
                    upload_id = %progress.upload_id(),
                    error = %e,
                    "Upload rejected"
                );
                return Err(e.into());
            }
        };
        progress.advance(UploadState::Validated);

        let name = self.allocator.allocate(&file_name);
        progress.advance(UploadState::Allocated);

        match self.process(&mut progress, &name, stream).await {
            Ok(format) => {
                progress.advance(UploadState::Complete);

                let processed = ProcessedImage {
                    original_url: public_url(
                        &self.config.public_url_prefix,
                        &derivative_key(DerivativeKind::Original, &name),
                    ),
                    thumbnail_url: public_url(
                        &self.config.public_url_prefix,
                        &derivative_key(DerivativeKind::Thumbnail, &name),
                    ),
                    file_size: declared_size,
                    mime_type: output_mime_type(format).to_string(),
                };

                tracing::info!(
                    upload_id = %progress.upload_id(),
                    original_url = %processed.original_url,
                    thumbnail_url = %processed.thumbnail_url,
                    size_bytes = declared_size,
                    "Image ingested"
                );
                Ok(processed)
            }
            Err(e) => {
                let failed_in = progress.state();
                tracing::warn!(
                    upload_id = %progress.upload_id(),
                    name = %name,
                    state = %failed_in,
                    error = %e,
                    "Image ingestion failed, rolling back"
                );

                if failed_in.requires_rollback() {
                    self.rollback.rollback(&name).await;
                    progress.advance(UploadState::RolledBack);
                }
                progress.advance(UploadState::Failed);
                Err(e)
            }
        }
    }

    async fn process<R>(
        &self,
        progress: &mut UploadProgress,
        name: &str,
        stream: R,
    ) -> Result<FormatTag, AppError>
    where
        R: Read + Seek + Send + 'static,
    {
        let max_width = self.config.max_image_width;
        let thumbnail_size = self.config.thumbnail_size;
        let quality = self.config.jpeg_quality;

        let decoded = tokio::task::spawn_blocking(move || ImageProcessor::decode(stream))
            .await
            .map_err(join_error)??;
        let format = decoded.format;
        progress.advance(UploadState::Decoded);

        let (optimized, original_bytes) = tokio::task::spawn_blocking(move || {
            let optimized = ImageResize::optimize(decoded.image, max_width);
            let bytes = ImageCompressor::compress(&optimized, format, quality)?;
            Ok::<(DynamicImage, Bytes), AppError>((optimized, bytes))
        })
        .await
        .map_err(join_error)??;
        progress.advance(UploadState::Optimized);

        self.persist(DerivativeKind::Original, name, original_bytes)
            .await?;
        progress.advance(UploadState::OriginalPersisted);

        let thumbnail_bytes = tokio::task::spawn_blocking(move || {
            let thumbnail = ImageResize::fit_thumbnail(&optimized, thumbnail_size);
            ImageCompressor::compress(&thumbnail, format, quality)
        })
        .await
        .map_err(join_error)??;

        self.persist(DerivativeKind::Thumbnail, name, thumbnail_bytes)
            .await?;
        progress.advance(UploadState::ThumbnailPersisted);

        Ok(format)
    }

    async fn persist(&self, kind: DerivativeKind, name: &str, data: Bytes) -> Result<(), AppError> {
        let key = derivative_key(kind, name);
        self.storage.put(&key, data).await?;
        Ok(())
    }
}
