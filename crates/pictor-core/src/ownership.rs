//! Entity ownership resolution
//!
//! Images hang off one of several unrelated record kinds. Each kind gets its
//! own [`EntityOwnership`] implementation; the [`OwnershipRegistry`] picks the
//! right one from the [`EntityType`] of the upload.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::EntityType;

/// Ownership lookup for one kind of entity.
#[async_trait]
pub trait EntityOwnership: Send + Sync {
    /// Kind of entity this resolver answers for.
    fn entity_type(&self) -> EntityType;

    /// Returns `Ok(None)` when the entity does not exist, otherwise its owner.
    async fn owner_of(&self, entity_id: Uuid) -> Result<Option<Uuid>, AppError>;
}

/// Registry of ownership resolvers keyed by entity kind.
#[derive(Clone, Default)]
pub struct OwnershipRegistry {
    resolvers: HashMap<EntityType, Arc<dyn EntityOwnership>>,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver, replacing any previous one for the same kind.
    pub fn register(mut self, resolver: Arc<dyn EntityOwnership>) -> Self {
        self.resolvers.insert(resolver.entity_type(), resolver);
        self
    }

    pub fn resolver(&self, entity_type: EntityType) -> Option<&Arc<dyn EntityOwnership>> {
        self.resolvers.get(&entity_type)
    }

    /// Verify `user_id` owns the referenced entity.
    pub async fn verify(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let resolver = self.resolver(entity_type).ok_or_else(|| {
            AppError::Internal(format!(
                "No ownership resolver registered for {}",
                entity_type
            ))
        })?;

        match resolver.owner_of(entity_id).await? {
            None => Err(AppError::NotFound(format!(
                "{} {} not found",
                entity_type, entity_id
            ))),
            Some(owner) if owner != user_id => {
                tracing::debug!(
                    entity_type = %entity_type,
                    entity_id = %entity_id,
                    user_id = %user_id,
                    "Ownership check failed"
                );
                Err(AppError::Forbidden(format!(
                    "You do not own this {}",
                    entity_type
                )))
            }
            Some(_) => Ok(()),
        }
    }
}

/// Fixed owner table for one entity kind. Backs the CLI and tests.
pub struct StaticOwnership {
    entity_type: EntityType,
    owners: HashMap<Uuid, Uuid>,
}

impl StaticOwnership {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            owners: HashMap::new(),
        }
    }

    pub fn with_entity(mut self, entity_id: Uuid, owner_id: Uuid) -> Self {
        self.owners.insert(entity_id, owner_id);
        self
    }
}

#[async_trait]
impl EntityOwnership for StaticOwnership {
    fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    async fn owner_of(&self, entity_id: Uuid) -> Result<Option<Uuid>, AppError> {
        Ok(self.owners.get(&entity_id).copied())
    }
}
