//! Configuration module
//!
//! Limits, storage root and public URL prefix for the ingestion pipeline.
//! The configuration is a plain value handed to the pipeline at construction;
//! nothing in the workspace reads it from global state.

use std::env;
use std::path::PathBuf;

const MAX_FILE_SIZE_MB: u64 = 10;
const MAX_IMAGE_WIDTH: u32 = 1920;
const THUMBNAIL_SIZE: u32 = 400;
const JPEG_QUALITY: u8 = 85;
const STORAGE_ROOT: &str = "./uploads";
const PUBLIC_URL_PREFIX: &str = "/uploads";
const ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png,image/webp";

/// Pipeline configuration
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Largest accepted declared upload size, inclusive.
    pub max_file_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
    /// Width bound applied to the optimized original.
    pub max_image_width: u32,
    /// Square box the thumbnail is fitted into.
    pub thumbnail_size: u32,
    pub jpeg_quality: u8,
    /// Filesystem directory holding `images/original` and `images/thumbnail`.
    pub storage_root: PathBuf,
    /// Prefix of the references handed to the metadata layer, e.g. `/uploads`.
    pub public_url_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_content_types: split_list(ALLOWED_CONTENT_TYPES),
            max_image_width: MAX_IMAGE_WIDTH,
            thumbnail_size: THUMBNAIL_SIZE,
            jpeg_quality: JPEG_QUALITY,
            storage_root: PathBuf::from(STORAGE_ROOT),
            public_url_prefix: PUBLIC_URL_PREFIX.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Build a configuration rooted at `storage_root`, all other values default.
    pub fn with_storage_root(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_content_types = split_list(
            &env::var("ALLOWED_CONTENT_TYPES").unwrap_or_else(|_| ALLOWED_CONTENT_TYPES.to_string()),
        );

        let config = PipelineConfig {
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_content_types,
            max_image_width: env::var("MAX_IMAGE_WIDTH")
                .unwrap_or_else(|_| MAX_IMAGE_WIDTH.to_string())
                .parse()
                .unwrap_or(MAX_IMAGE_WIDTH),
            thumbnail_size: env::var("THUMBNAIL_SIZE")
                .unwrap_or_else(|_| THUMBNAIL_SIZE.to_string())
                .parse()
                .unwrap_or(THUMBNAIL_SIZE),
            jpeg_quality: env::var("JPEG_QUALITY")
                .unwrap_or_else(|_| JPEG_QUALITY.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("JPEG_QUALITY must be a number between 1 and 100"))?,
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(STORAGE_ROOT)),
            public_url_prefix: env::var("PUBLIC_URL_PREFIX")
                .unwrap_or_else(|_| PUBLIC_URL_PREFIX.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.max_image_width == 0 || self.thumbnail_size == 0 {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_WIDTH and THUMBNAIL_SIZE must be greater than zero"
            ));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES must not be empty"));
        }

        if !self.public_url_prefix.starts_with('/') {
            return Err(anyhow::anyhow!(
                "PUBLIC_URL_PREFIX must be root-relative (start with '/')"
            ));
        }

        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
