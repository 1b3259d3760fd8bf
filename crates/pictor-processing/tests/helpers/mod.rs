//! Test helpers: pipeline/service construction over a temporary storage root.
//!
//! Run from workspace root: `cargo test -p pictor-processing`.
#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use image::GenericImageView;
use pictor_core::models::ProcessedImage;
use pictor_core::PipelineConfig;
use pictor_processing::{DiagnosticSink, ImagePipeline, RollbackFailure, UploadRequest};
use pictor_storage::{key_from_public_url, Storage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use storage::TestStorage;

pub fn test_config(storage: &TestStorage) -> PipelineConfig {
    PipelineConfig::with_storage_root(&storage.base_path)
}

pub async fn setup_pipeline() -> (TestStorage, ImagePipeline) {
    let storage = TestStorage::new();
    let backend: Arc<dyn Storage> = Arc::new(storage.local().await);
    let pipeline = ImagePipeline::new(test_config(&storage), backend);
    (storage, pipeline)
}

pub fn request(data: Vec<u8>, content_type: &str, file_name: &str) -> UploadRequest<Cursor<Vec<u8>>> {
    let size = data.len() as u64;
    UploadRequest::new(Cursor::new(data), size, content_type, file_name)
}

/// Dimensions of the stored file behind a public reference.
pub fn stored_dimensions(storage: &TestStorage, url: &str) -> (u32, u32) {
    let key = key_from_public_url("/uploads", url).expect("reference under /uploads");
    image::open(storage.base_path.join(key))
        .expect("stored derivative decodes")
        .dimensions()
}

pub fn stored_exists(storage: &TestStorage, url: &str) -> bool {
    key_from_public_url("/uploads", url)
        .map(|key| storage.base_path.join(key).is_file())
        .unwrap_or(false)
}

pub fn assert_processed_pair(processed: &ProcessedImage) {
    let original_name = processed
        .original_url
        .strip_prefix("/uploads/images/original/")
        .expect("original under /uploads/images/original/");
    let thumbnail_name = processed
        .thumbnail_url
        .strip_prefix("/uploads/images/thumbnail/")
        .expect("thumbnail under /uploads/images/thumbnail/");
    assert_eq!(original_name, thumbnail_name);
}

/// Diagnostic sink that keeps every reported failure.
#[derive(Default)]
pub struct RecordingSink {
    pub failures: Mutex<Vec<RollbackFailure>>,
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, failure: &RollbackFailure) {
        self.failures.lock().unwrap().push(failure.clone());
    }
}
