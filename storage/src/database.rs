//! Opens the pool, runs migrations and hands out repositories sharing it.

use crate::audit_repo::AuditLogRepository;
use crate::error::StorageError;
use crate::profanity_repo::ProfanityWordRepository;
use crate::role_history_repo::RoleHistoryRepository;
use crate::schema::run_migrations;
use crate::sqlite_pool::SqlitePoolManager;
use crate::user_repo::UserRepository;

/// Every repository over one pool.
#[derive(Clone)]
pub struct Database {
    pub users: UserRepository,
    pub history: RoleHistoryRepository,
    pub audit: AuditLogRepository,
    pub words: ProfanityWordRepository,
}

impl Database {
    /// Connects to `database_url` and creates the schema if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        run_migrations(pool_manager.pool()).await?;
        Ok(Self {
            users: UserRepository::new(pool_manager.clone()),
            history: RoleHistoryRepository::new(pool_manager.clone()),
            audit: AuditLogRepository::new(pool_manager.clone()),
            words: ProfanityWordRepository::new(pool_manager),
        })
    }
}
