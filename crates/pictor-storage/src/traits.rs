//! Storage abstraction trait
//!
//! This module defines the Storage trait that derivative backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use pictor_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(key) => AppError::InvalidReference(key),
            other => AppError::Io(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// The pipeline only ever addresses derivatives by key, see the crate root
/// for the key layout.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` at `key`, creating intermediate directories as needed and
    /// replacing any existing object.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Delete the object stored at `key`.
    ///
    /// Deleting a missing object succeeds, so the call is idempotent.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;
}
