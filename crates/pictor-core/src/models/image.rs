use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Role of an image within its owning entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Photo,
    #[default]
    Image,
    Icon,
    Logo,
    Banner,
    Avatar,
    Background,
}

impl FromStr for ImageKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "photo" => Ok(ImageKind::Photo),
            "image" => Ok(ImageKind::Image),
            "icon" => Ok(ImageKind::Icon),
            "logo" => Ok(ImageKind::Logo),
            "banner" => Ok(ImageKind::Banner),
            "avatar" => Ok(ImageKind::Avatar),
            "background" => Ok(ImageKind::Background),
            _ => Err(AppError::InvalidInput(format!("Invalid image type: {}", s))),
        }
    }
}

impl Display for ImageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            ImageKind::Photo => "photo",
            ImageKind::Image => "image",
            ImageKind::Icon => "icon",
            ImageKind::Logo => "logo",
            ImageKind::Banner => "banner",
            ImageKind::Avatar => "avatar",
            ImageKind::Background => "background",
        };
        write!(f, "{}", s)
    }
}

/// Kind of record an image is attached to.
///
/// The `(entity_type, entity_id)` pair is a polymorphic reference; there is no
/// foreign key behind it, ownership is resolved through
/// [`OwnershipRegistry`](crate::ownership::OwnershipRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Project,
    Portfolio,
    Section,
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "project" => Ok(EntityType::Project),
            "portfolio" => Ok(EntityType::Portfolio),
            "section" => Ok(EntityType::Section),
            _ => Err(AppError::InvalidInput(format!("Invalid entity type: {}", s))),
        }
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EntityType::Project => write!(f, "project"),
            EntityType::Portfolio => write!(f, "portfolio"),
            EntityType::Section => write!(f, "section"),
        }
    }
}

/// Result of a successful pipeline run, handed to the metadata layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedImage {
    /// Root-relative reference to the optimized original.
    pub original_url: String,
    /// Root-relative reference to the thumbnail.
    pub thumbnail_url: String,
    pub file_size: u64,
    /// Type of the stored bytes, not the declared upload type.
    pub mime_type: String,
}

/// Sidecar fields sent with an upload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UploadFields {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    #[serde(rename = "type", default)]
    pub kind: ImageKind,
    #[serde(default)]
    #[validate(length(max = 255, message = "Alt text must be at most 255 characters"))]
    pub alt: String,
    #[serde(default)]
    pub is_main: bool,
}

/// Persisted image metadata record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub id: Uuid,
    pub url: String,
    pub thumbnail_url: String,
    /// Client-supplied filename, stored as received.
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub alt: String,
    pub owner_id: Uuid,
    #[serde(rename = "type")]
    pub kind: ImageKind,
    pub entity_id: Uuid,
    pub entity_type: EntityType,
    pub is_main: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImageMetadata {
    pub fn new(
        owner_id: Uuid,
        file_name: impl Into<String>,
        processed: ProcessedImage,
        fields: UploadFields,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            url: processed.original_url,
            thumbnail_url: processed.thumbnail_url,
            file_name: file_name.into(),
            file_size: processed.file_size,
            mime_type: processed.mime_type,
            alt: fields.alt,
            owner_id,
            kind: fields.kind,
            entity_id: fields.entity_id,
            entity_type: fields.entity_type,
            is_main: fields.is_main,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the mutable fields of `update`. Derivatives are never touched.
    pub fn apply(&mut self, update: ImageUpdate) {
        if let Some(alt) = update.alt {
            self.alt = alt;
        }
        if let Some(is_main) = update.is_main {
            self.is_main = is_main;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update of an image record.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ImageUpdate {
    #[validate(length(max = 255, message = "Alt text must be at most 255 characters"))]
    pub alt: Option<String>,
    pub is_main: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<ImageKind>,
}
