//! Helpers shared by the handlers.

use rolebot_core::RolebotError;
use storage::{AuditEntry, AuditSink, StorageError};
use tracing::error;

pub(crate) fn storage_error(e: StorageError) -> RolebotError {
    RolebotError::Storage(e.to_string())
}

/// Appends an audit entry; failures are logged only.
pub(crate) async fn audit(sink: &dyn AuditSink, user_id: i64, action: &str, details: String) {
    if let Err(e) = sink
        .append(&AuditEntry::new(user_id, action, Some(details)))
        .await
    {
        error!(user_id, action, error = %e, "Failed to write audit entry");
    }
}
