//! Audit log repository: the `logs` table.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::AuditEntry;
use crate::repository::AuditSink;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct AuditLogRepository {
    pool_manager: SqlitePoolManager,
}

impl AuditLogRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Latest entries of one user, newest first.
    pub async fn recent_for_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, StorageError> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM logs WHERE user_id = ? ORDER BY created_at DESC, log_id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(entries)
    }

    /// Latest entries across all users, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditEntry>, StorageError> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM logs ORDER BY created_at DESC, log_id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(entries)
    }
}

#[async_trait]
impl AuditSink for AuditLogRepository {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO logs (user_id, action, details, created_at) VALUES (?, ?, ?, ?)")
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(&entry.details)
            .bind(entry.created_at)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }
}
