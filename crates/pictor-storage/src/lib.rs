//! Pictor Storage Library
//!
//! Storage abstraction for image derivatives and its local filesystem backend.
//!
//! # Storage key format
//!
//! Both derivatives of one upload share an allocated filename and live under
//! fixed prefixes:
//!
//! - **Original**: `images/original/{name}`
//! - **Thumbnail**: `images/thumbnail/{name}`
//!
//! Keys must not contain `..` or a leading `/`. Public references are the key
//! joined to the configured URL prefix (`/uploads/images/original/{name}`) and
//! never depend on where the storage root lives on disk. Key and reference
//! mapping is centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{derivative_key, key_from_public_url, public_url, DerivativeKind};
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
