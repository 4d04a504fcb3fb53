//! Role history: one entry per assignment interval, in the `role_history` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleHistoryEntry {
    pub history_id: i64,
    pub user_id: i64,
    /// Nickname at assignment time.
    pub role_name: String,
    pub assigned_at: DateTime<Utc>,
    pub removed_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

impl RoleHistoryEntry {
    /// An open entry marks the role as currently active.
    pub fn is_open(&self) -> bool {
        self.removed_at.is_none()
    }
}

/// Why a role was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    Inactivity,
    LeftChat,
    Manual,
}

impl RemovalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalReason::Inactivity => "inactivity",
            RemovalReason::LeftChat => "left_chat",
            RemovalReason::Manual => "manual",
        }
    }
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovalReason {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inactivity" => Ok(RemovalReason::Inactivity),
            "left_chat" => Ok(RemovalReason::LeftChat),
            "manual" => Ok(RemovalReason::Manual),
            other => Err(StorageError::InvalidValue(format!(
                "unknown removal reason: {}",
                other
            ))),
        }
    }
}
