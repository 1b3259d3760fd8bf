//! Pictor Core Library
//!
//! Domain models, error taxonomy, configuration and the metadata / ownership
//! interfaces shared by the storage and processing crates.

pub mod config;
pub mod error;
pub mod models;
pub mod ownership;
pub mod repository;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use ownership::{EntityOwnership, OwnershipRegistry, StaticOwnership};
pub use repository::{ImageRepository, InMemoryImageRepository};
