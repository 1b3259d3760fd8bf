use async_trait::async_trait;
use bytes::Bytes;
use pictor_storage::{LocalStorage, Storage, StorageError, StorageResult};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test storage root.
pub struct TestStorage {
    pub temp_dir: TempDir,
    pub base_path: PathBuf,
}

impl TestStorage {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let base_path = temp_dir.path().join("uploads");
        Self {
            temp_dir,
            base_path,
        }
    }

    pub async fn local(&self) -> LocalStorage {
        LocalStorage::new(&self.base_path)
            .await
            .expect("Failed to create local storage")
    }

    /// Number of files under `images/<dir>`.
    pub fn count_files(&self, dir: &str) -> usize {
        count_files(&self.base_path.join("images").join(dir))
    }
}

impl Default for TestStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}

/// Local storage that refuses to write under a given key prefix.
pub struct FailingStorage {
    inner: LocalStorage,
    fail_prefix: String,
}

impl FailingStorage {
    pub fn new(inner: LocalStorage, fail_prefix: impl Into<String>) -> Self {
        Self {
            inner,
            fail_prefix: fail_prefix.into(),
        }
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        if key.starts_with(&self.fail_prefix) {
            return Err(StorageError::WriteFailed(format!("injected failure for {}", key)));
        }
        self.inner.put(key, data).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }
}
