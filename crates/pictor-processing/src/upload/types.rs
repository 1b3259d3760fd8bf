//! Types for the upload pipeline.

use std::fmt;
use std::io::{Read, Seek};

/// One upload as handed to the pipeline.
#[derive(Debug)]
pub struct UploadRequest<R> {
    /// Uploaded bytes. Must be seekable so the header probe can rewind it.
    pub stream: R,
    pub declared_size: u64,
    pub content_type: String,
    /// Client-supplied filename. Only its extension reaches storage.
    pub file_name: String,
}

impl<R: Read + Seek> UploadRequest<R> {
    pub fn new(
        stream: R,
        declared_size: u64,
        content_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            stream,
            declared_size,
            content_type: content_type.into(),
            file_name: file_name.into(),
        }
    }
}

/// Progress of a single upload through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Received,
    Validated,
    Allocated,
    Decoded,
    Optimized,
    OriginalPersisted,
    ThumbnailPersisted,
    Complete,
    RolledBack,
    Failed,
}

impl UploadState {
    /// Whether a failure in this state leaves derivatives to clean up.
    pub fn requires_rollback(&self) -> bool {
        matches!(
            self,
            UploadState::Allocated
                | UploadState::Decoded
                | UploadState::Optimized
                | UploadState::OriginalPersisted
                | UploadState::ThumbnailPersisted
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Complete | UploadState::Failed)
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadState::Received => "received",
            UploadState::Validated => "validated",
            UploadState::Allocated => "allocated",
            UploadState::Decoded => "decoded",
            UploadState::Optimized => "optimized",
            UploadState::OriginalPersisted => "original_persisted",
            UploadState::ThumbnailPersisted => "thumbnail_persisted",
            UploadState::Complete => "complete",
            UploadState::RolledBack => "rolled_back",
            UploadState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Tracks and logs the state of one upload.
#[derive(Debug)]
pub(crate) struct UploadProgress {
    upload_id: uuid::Uuid,
    state: UploadState,
}

impl UploadProgress {
    pub(crate) fn new() -> Self {
        let progress = Self {
            upload_id: uuid::Uuid::new_v4(),
            state: UploadState::Received,
        };
        tracing::debug!(upload_id = %progress.upload_id, state = %progress.state, "Upload state");
        progress
    }

    pub(crate) fn upload_id(&self) -> uuid::Uuid {
        self.upload_id
    }

    pub(crate) fn state(&self) -> UploadState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: UploadState) {
        tracing::debug!(
            upload_id = %self.upload_id,
            from = %self.state,
            to = %next,
            "Upload state"
        );
        self.state = next;
    }
}
