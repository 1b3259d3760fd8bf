//! Pictor Processing Library
//!
//! Image ingestion: upload validation, derivative naming, decoding, resizing,
//! encoding, persistence with rollback, removal, and the `ImageService` that
//! ties the pipeline to ownership checks and the metadata store.

pub mod compression;
pub mod image;
pub mod naming;
pub mod remover;
pub mod service;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use compression::{output_mime_type, ImageCompressor};
pub use self::image::{DecodedImage, FormatTag, ImageProcessor, ImageResize};
pub use naming::NameAllocator;
pub use remover::Remover;
pub use service::{DeleteOutcome, ImageService};
pub use upload::{
    DiagnosticSink, ImagePipeline, RollbackController, RollbackFailure, TracingDiagnostics,
    UploadRequest, UploadState,
};
pub use self::validator::{UploadValidator, ValidationError};
