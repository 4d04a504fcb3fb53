//! Audit log entry, stored in the `logs` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub log_id: i64,
    pub user_id: i64,
    pub action: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates an unsaved entry stamped now; `log_id` is assigned on insert.
    pub fn new(user_id: i64, action: impl Into<String>, details: Option<String>) -> Self {
        Self {
            log_id: 0,
            user_id,
            action: action.into(),
            details,
            created_at: Utc::now(),
        }
    }
}
