//! Upload flow: request types, the ingestion pipeline and its rollback.

pub mod pipeline;
pub mod rollback;
pub mod types;

pub use pipeline::ImagePipeline;
pub use rollback::{DiagnosticSink, RollbackController, RollbackFailure, TracingDiagnostics};
pub use types::{UploadRequest, UploadState};
