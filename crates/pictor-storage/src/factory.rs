use crate::{LocalStorage, Storage, StorageResult};
use pictor_core::PipelineConfig;
use std::sync::Arc;

/// Create the storage backend for a pipeline configuration
pub async fn create_storage(config: &PipelineConfig) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.storage_root.clone()).await?;

    tracing::debug!(
        root = %config.storage_root.display(),
        "Local storage backend ready"
    );

    Ok(Arc::new(storage))
}
