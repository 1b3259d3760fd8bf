//! Image service integration tests: ownership, metadata records, deletion.
//!
//! Run with: `cargo test -p pictor-processing --test service_test`

mod helpers;

use async_trait::async_trait;
use helpers::fixtures::create_test_png;
use helpers::storage::TestStorage;
use helpers::{request, stored_exists, test_config};
use pictor_core::models::{
    EntityType, ImageKind, ImageMetadata, ImageUpdate, UploadFields,
};
use pictor_core::{
    AppError, ImageRepository, InMemoryImageRepository, OwnershipRegistry, StaticOwnership,
};
use pictor_processing::{ImagePipeline, ImageService};
use std::sync::Arc;
use uuid::Uuid;

struct Fixture {
    storage: TestStorage,
    service: ImageService,
    repository: Arc<InMemoryImageRepository>,
    owner: Uuid,
    project: Uuid,
}

async fn setup() -> Fixture {
    let storage = TestStorage::new();
    let pipeline = ImagePipeline::new(test_config(&storage), Arc::new(storage.local().await));

    let owner = Uuid::new_v4();
    let project = Uuid::new_v4();
    let ownership = OwnershipRegistry::new()
        .register(Arc::new(
            StaticOwnership::new(EntityType::Project).with_entity(project, owner),
        ))
        .register(Arc::new(StaticOwnership::new(EntityType::Portfolio)));

    let repository = Arc::new(InMemoryImageRepository::new());
    let service = ImageService::new(pipeline, repository.clone(), ownership);

    Fixture {
        storage,
        service,
        repository,
        owner,
        project,
    }
}

fn fields(entity_type: EntityType, entity_id: Uuid) -> UploadFields {
    UploadFields {
        entity_type,
        entity_id,
        kind: ImageKind::Banner,
        alt: "A banner".to_string(),
        is_main: true,
    }
}

#[tokio::test]
async fn test_upload_creates_record() {
    let fx = setup().await;

    let record = fx
        .service
        .upload(
            fx.owner,
            fields(EntityType::Project, fx.project),
            request(create_test_png(120, 80), "image/png", "My Banner.png"),
        )
        .await
        .unwrap();

    assert_eq!(record.file_name, "My Banner.png");
    assert_eq!(record.owner_id, fx.owner);
    assert_eq!(record.entity_type, EntityType::Project);
    assert_eq!(record.entity_id, fx.project);
    assert_eq!(record.kind, ImageKind::Banner);
    assert_eq!(record.mime_type, "image/png");
    assert!(record.is_main);
    assert!(stored_exists(&fx.storage, &record.url));
    assert!(stored_exists(&fx.storage, &record.thumbnail_url));

    let listed = fx
        .service
        .list_for_entity(fx.owner, EntityType::Project, fx.project)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
}

#[tokio::test]
async fn test_upload_to_foreign_entity_is_forbidden() {
    let fx = setup().await;

    let result = fx
        .service
        .upload(
            Uuid::new_v4(),
            fields(EntityType::Project, fx.project),
            request(create_test_png(10, 10), "image/png", "x.png"),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(fx.storage.count_files("original"), 0);
}

#[tokio::test]
async fn test_upload_to_missing_entity() {
    let fx = setup().await;

    let result = fx
        .service
        .upload(
            fx.owner,
            fields(EntityType::Portfolio, Uuid::new_v4()),
            request(create_test_png(10, 10), "image/png", "x.png"),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_alt_text_is_limited() {
    let fx = setup().await;
    let mut upload_fields = fields(EntityType::Project, fx.project);
    upload_fields.alt = "x".repeat(256);

    let result = fx
        .service
        .upload(
            fx.owner,
            upload_fields,
            request(create_test_png(10, 10), "image/png", "x.png"),
        )
        .await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    assert_eq!(fx.storage.count_files("original"), 0);
}

#[tokio::test]
async fn test_update_changes_only_mutable_fields() {
    let fx = setup().await;
    let record = fx
        .service
        .upload(
            fx.owner,
            fields(EntityType::Project, fx.project),
            request(create_test_png(30, 30), "image/png", "a.png"),
        )
        .await
        .unwrap();

    let updated = fx
        .service
        .update(
            fx.owner,
            record.id,
            ImageUpdate {
                alt: Some("New alt".to_string()),
                is_main: Some(false),
                kind: Some(ImageKind::Logo),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.alt, "New alt");
    assert!(!updated.is_main);
    assert_eq!(updated.kind, ImageKind::Logo);
    assert_eq!(updated.url, record.url);
    assert_eq!(updated.thumbnail_url, record.thumbnail_url);

    let result = fx
        .service
        .update(Uuid::new_v4(), record.id, ImageUpdate::default())
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_delete_removes_record_and_files() {
    let fx = setup().await;
    let record = fx
        .service
        .upload(
            fx.owner,
            fields(EntityType::Project, fx.project),
            request(create_test_png(30, 30), "image/png", "a.png"),
        )
        .await
        .unwrap();

    let outcome = fx.service.delete(fx.owner, record.id).await.unwrap();
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.record.id, record.id);
    assert!(!stored_exists(&fx.storage, &record.url));
    assert!(!stored_exists(&fx.storage, &record.thumbnail_url));
    assert!(fx.repository.get(record.id).await.unwrap().is_none());

    let again = fx.service.delete(fx.owner, record.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_with_missing_files_still_succeeds() {
    let fx = setup().await;
    let record = fx
        .service
        .upload(
            fx.owner,
            fields(EntityType::Project, fx.project),
            request(create_test_png(30, 30), "image/png", "a.png"),
        )
        .await
        .unwrap();

    std::fs::remove_dir_all(fx.storage.base_path.join("images")).unwrap();

    let outcome = fx.service.delete(fx.owner, record.id).await.unwrap();
    assert!(outcome.warnings.is_empty());
}

/// Metadata store that accepts nothing.
struct RejectingRepository;

#[async_trait]
impl ImageRepository for RejectingRepository {
    async fn create(&self, _record: ImageMetadata) -> Result<ImageMetadata, AppError> {
        Err(AppError::Metadata("store unavailable".to_string()))
    }
    async fn get(&self, _id: Uuid) -> Result<Option<ImageMetadata>, AppError> {
        Ok(None)
    }
    async fn update(
        &self,
        _id: Uuid,
        _update: ImageUpdate,
    ) -> Result<Option<ImageMetadata>, AppError> {
        Ok(None)
    }
    async fn delete(&self, _id: Uuid) -> Result<Option<ImageMetadata>, AppError> {
        Ok(None)
    }
    async fn list_for_entity(
        &self,
        _entity_type: EntityType,
        _entity_id: Uuid,
    ) -> Result<Vec<ImageMetadata>, AppError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_record_failure_removes_derivatives() {
    let storage = TestStorage::new();
    let pipeline = ImagePipeline::new(test_config(&storage), Arc::new(storage.local().await));
    let owner = Uuid::new_v4();
    let section = Uuid::new_v4();
    let ownership = OwnershipRegistry::new().register(Arc::new(
        StaticOwnership::new(EntityType::Section).with_entity(section, owner),
    ));
    let service = ImageService::new(pipeline, Arc::new(RejectingRepository), ownership);

    let result = service
        .upload(
            owner,
            fields(EntityType::Section, section),
            request(create_test_png(50, 50), "image/png", "a.png"),
        )
        .await;

    assert!(matches!(result, Err(AppError::Metadata(_))));
    assert_eq!(storage.count_files("original"), 0);
    assert_eq!(storage.count_files("thumbnail"), 0);
}
