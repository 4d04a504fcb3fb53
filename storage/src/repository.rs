//! Storage contracts used by the role service and handlers.
//!
//! SQLite implementations live in this crate; tests may substitute their own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::models::{AuditEntry, RemovalReason, RoleHistoryEntry, UserRecord};

/// Durable user records keyed by user id.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError>;

    /// Inserts or fully replaces the record.
    async fn put(&self, record: &UserRecord) -> Result<(), StorageError>;

    /// Inserts the record unless one exists. Returns true when inserted.
    async fn create_if_absent(&self, record: &UserRecord) -> Result<bool, StorageError>;

    /// Stamps `last_activity` (and optionally moves the user to `chat_id`) without touching role columns.
    /// Returns false when the user does not exist.
    async fn touch_activity(
        &self,
        user_id: i64,
        chat_id: Option<i64>,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Increments `warnings_count` and returns the new value (0 when the user does not exist).
    async fn increment_warnings(&self, user_id: i64) -> Result<i64, StorageError>;

    /// Clears `is_blocked` and resets `warnings_count`. Returns false when the user does not exist.
    async fn unblock(&self, user_id: i64) -> Result<bool, StorageError>;

    /// Users holding a role whose last activity is older than `cutoff`.
    async fn list_expired(&self, cutoff: DateTime<Utc>) -> Result<Vec<UserRecord>, StorageError>;

    /// Users of one chat (all chats when `None`), most recently active first.
    async fn list_by_chat(&self, chat_id: Option<i64>) -> Result<Vec<UserRecord>, StorageError>;

    /// Number of users in a chat, optionally filtered by role flag.
    async fn count_by_chat(
        &self,
        chat_id: i64,
        role_assigned: Option<bool>,
    ) -> Result<i64, StorageError>;
}

/// Role assignment intervals.
#[async_trait]
pub trait RoleHistoryLog: Send + Sync {
    /// Opens a new interval and returns its id.
    async fn open_entry(
        &self,
        user_id: i64,
        role_name: &str,
        at: DateTime<Utc>,
    ) -> Result<i64, StorageError>;

    /// Closes every open interval of the user. Returns how many were closed (normally 0 or 1).
    async fn close_open_entries(
        &self,
        user_id: i64,
        at: DateTime<Utc>,
        reason: RemovalReason,
    ) -> Result<u64, StorageError>;

    /// All intervals of the user, most recent first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<RoleHistoryEntry>, StorageError>;
}

/// Append-only audit log.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StorageError>;
}

/// Disallowed words for the message filter.
#[async_trait]
pub trait ProfanityWordStore: Send + Sync {
    /// Every word, sorted.
    async fn all_words(&self) -> Result<Vec<String>, StorageError>;

    /// Adds a word; returns false when it already existed.
    async fn add_word(&self, word: &str) -> Result<bool, StorageError>;

    async fn delete_word(&self, word: &str) -> Result<bool, StorageError>;

    async fn clear_all(&self) -> Result<u64, StorageError>;
}
