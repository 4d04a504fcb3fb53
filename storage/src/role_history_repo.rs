//! Role history repository: the `role_history` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::StorageError;
use crate::models::{RemovalReason, RoleHistoryEntry};
use crate::repository::RoleHistoryLog;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct RoleHistoryRepository {
    pool_manager: SqlitePoolManager,
}

impl RoleHistoryRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }
}

#[async_trait]
impl RoleHistoryLog for RoleHistoryRepository {
    async fn open_entry(
        &self,
        user_id: i64,
        role_name: &str,
        at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO role_history (user_id, role_name, assigned_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(role_name)
        .bind(at)
        .execute(self.pool_manager.pool())
        .await?;

        let history_id = result.last_insert_rowid();
        info!(user_id, history_id, role_name = %role_name, "Opened role history entry");
        Ok(history_id)
    }

    async fn close_open_entries(
        &self,
        user_id: i64,
        at: DateTime<Utc>,
        reason: RemovalReason,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE role_history
            SET removed_at = ?, reason = ?
            WHERE user_id = ? AND removed_at IS NULL
            "#,
        )
        .bind(at)
        .bind(reason.as_str())
        .bind(user_id)
        .execute(self.pool_manager.pool())
        .await?;

        let closed = result.rows_affected();
        info!(user_id, closed, reason = %reason, "Closed role history entries");
        Ok(closed)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<RoleHistoryEntry>, StorageError> {
        let entries = sqlx::query_as::<_, RoleHistoryEntry>(
            r#"
            SELECT * FROM role_history
            WHERE user_id = ?
            ORDER BY assigned_at DESC, history_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(entries)
    }
}
