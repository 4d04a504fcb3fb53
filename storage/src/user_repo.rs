//! User repository: the `users` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::repository::UserStore;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct UserRepository {
    pool_manager: SqlitePoolManager,
}

impl UserRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn get(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError> {
        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(record)
    }

    async fn put(&self, record: &UserRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, chat_id, username, first_name, last_name,
                nickname, role_assigned, is_blocked,
                last_activity, warnings_count, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                chat_id = excluded.chat_id,
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                nickname = excluded.nickname,
                role_assigned = excluded.role_assigned,
                is_blocked = excluded.is_blocked,
                last_activity = excluded.last_activity,
                warnings_count = excluded.warnings_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(record.user_id)
        .bind(record.chat_id)
        .bind(&record.username)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.nickname)
        .bind(record.role_assigned)
        .bind(record.is_blocked)
        .bind(record.last_activity)
        .bind(record.warnings_count)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(
            user_id = record.user_id,
            role_assigned = record.role_assigned,
            "Saved user record"
        );
        Ok(())
    }

    async fn create_if_absent(&self, record: &UserRecord) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                user_id, chat_id, username, first_name, last_name,
                nickname, role_assigned, is_blocked,
                last_activity, warnings_count, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(record.user_id)
        .bind(record.chat_id)
        .bind(&record.username)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.nickname)
        .bind(record.role_assigned)
        .bind(record.is_blocked)
        .bind(record.last_activity)
        .bind(record.warnings_count)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(self.pool_manager.pool())
        .await?;

        let created = result.rows_affected() > 0;
        if created {
            info!(user_id = record.user_id, chat_id = record.chat_id, "Created user record");
        }
        Ok(created)
    }

    async fn touch_activity(
        &self,
        user_id: i64,
        chat_id: Option<i64>,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_activity = ?, chat_id = COALESCE(?, chat_id), updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(at)
        .bind(chat_id)
        .bind(Utc::now())
        .bind(user_id)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_warnings(&self, user_id: i64) -> Result<i64, StorageError> {
        let count: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE users
            SET warnings_count = warnings_count + 1, updated_at = ?
            WHERE user_id = ?
            RETURNING warnings_count
            "#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(count.map(|c| c.0).unwrap_or(0))
    }

    async fn unblock(&self, user_id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE users SET is_blocked = 0, warnings_count = 0, updated_at = ? WHERE user_id = ?",
        )
        .bind(Utc::now())
        .bind(user_id)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_expired(&self, cutoff: DateTime<Utc>) -> Result<Vec<UserRecord>, StorageError> {
        let records = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT * FROM users
            WHERE role_assigned = 1 AND last_activity IS NOT NULL AND last_activity < ?
            ORDER BY last_activity ASC
            "#,
        )
        .bind(cutoff)
        .fetch_all(self.pool_manager.pool())
        .await?;

        debug!(count = records.len(), cutoff = %cutoff, "Listed expired roles");
        Ok(records)
    }

    async fn list_by_chat(&self, chat_id: Option<i64>) -> Result<Vec<UserRecord>, StorageError> {
        let records = match chat_id {
            Some(chat_id) => {
                sqlx::query_as::<_, UserRecord>(
                    "SELECT * FROM users WHERE chat_id = ? ORDER BY last_activity DESC",
                )
                .bind(chat_id)
                .fetch_all(self.pool_manager.pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, UserRecord>("SELECT * FROM users ORDER BY last_activity DESC")
                    .fetch_all(self.pool_manager.pool())
                    .await?
            }
        };
        Ok(records)
    }

    async fn count_by_chat(
        &self,
        chat_id: i64,
        role_assigned: Option<bool>,
    ) -> Result<i64, StorageError> {
        let count: (i64,) = match role_assigned {
            Some(flag) => {
                sqlx::query_as("SELECT COUNT(*) FROM users WHERE chat_id = ? AND role_assigned = ?")
                    .bind(chat_id)
                    .bind(flag)
                    .fetch_one(self.pool_manager.pool())
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM users WHERE chat_id = ?")
                    .bind(chat_id)
                    .fetch_one(self.pool_manager.pool())
                    .await?
            }
        };
        Ok(count.0)
    }
}
