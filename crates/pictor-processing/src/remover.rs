//! Removal of both derivatives of a stored image.

use pictor_core::AppError;
use pictor_storage::{key_from_public_url, Storage};
use std::sync::Arc;

/// Deletes derivatives by their public references.
///
/// Both references are always attempted. Removing something that is already
/// gone succeeds, so calling twice is safe.
#[derive(Clone)]
pub struct Remover {
    storage: Arc<dyn Storage>,
    public_url_prefix: String,
}

impl Remover {
    pub fn new(storage: Arc<dyn Storage>, public_url_prefix: impl Into<String>) -> Self {
        Self {
            storage,
            public_url_prefix: public_url_prefix.into(),
        }
    }

    /// Remove the original and the thumbnail; returns the first hard error.
    pub async fn remove(&self, original_url: &str, thumbnail_url: &str) -> Result<(), AppError> {
        let (original, thumbnail) = futures::future::join(
            self.remove_one(original_url),
            self.remove_one(thumbnail_url),
        )
        .await;

        original.and(thumbnail)
    }

    async fn remove_one(&self, url: &str) -> Result<(), AppError> {
        let key = key_from_public_url(&self.public_url_prefix, url).ok_or_else(|| {
            tracing::warn!(url = %url, prefix = %self.public_url_prefix, "Reference outside public prefix");
            AppError::InvalidReference(url.to_string())
        })?;

        self.storage.delete(&key).await.map_err(|e| {
            tracing::error!(
                error = %e,
                storage_key = %key,
                "Failed to delete derivative from storage"
            );
            AppError::from(e)
        })
    }
}
