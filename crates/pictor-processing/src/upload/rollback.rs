//! Cleanup of partially written derivatives.

use pictor_storage::{derivative_key, DerivativeKind, Storage};
use std::sync::Arc;

/// A derivative that could not be removed during rollback.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Rollback failed for {key}: {reason}")]
pub struct RollbackFailure {
    pub key: String,
    pub reason: String,
}

/// Receives rollback failures. Rollback never returns them to the caller.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, failure: &RollbackFailure);
}

/// Forwards rollback failures to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, failure: &RollbackFailure) {
        tracing::warn!(
            storage_key = %failure.key,
            error = %failure.reason,
            "Failed to remove derivative during rollback"
        );
    }
}

#[derive(Clone)]
pub struct RollbackController {
    storage: Arc<dyn Storage>,
    sink: Arc<dyn DiagnosticSink>,
}

impl RollbackController {
    pub fn new(storage: Arc<dyn Storage>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { storage, sink }
    }

    /// Remove both derivatives of `name`. Missing files are not failures.
    pub async fn rollback(&self, name: &str) {
        for kind in [DerivativeKind::Original, DerivativeKind::Thumbnail] {
            let key = derivative_key(kind, name);
            if let Err(e) = self.storage.delete(&key).await {
                self.sink.report(&RollbackFailure {
                    key,
                    reason: e.to_string(),
                });
            }
        }

        tracing::info!(name = %name, "Rolled back derivatives");
    }
}
