//! Storage crate: user records, role history, audit log and word list over SQLite.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserRecord, RoleHistoryEntry, AuditEntry, RemovalReason
//! - [`repository`] – UserStore, RoleHistoryLog, AuditSink, ProfanityWordStore traits
//! - [`database`] – Database (pool + migrations + repositories)
//! - [`sqlite_pool`] – SqlitePoolManager

mod audit_repo;
mod database;
mod error;
mod models;
mod profanity_repo;
mod repository;
mod role_history_repo;
mod schema;
mod sqlite_pool;
mod user_repo;

pub use audit_repo::AuditLogRepository;
pub use database::Database;
pub use error::StorageError;
pub use models::{AuditEntry, RemovalReason, RoleHistoryEntry, RoleState, UserRecord};
pub use profanity_repo::ProfanityWordRepository;
pub use repository::{AuditSink, ProfanityWordStore, RoleHistoryLog, UserStore};
pub use role_history_repo::RoleHistoryRepository;
pub use schema::run_migrations;
pub use sqlite_pool::SqlitePoolManager;
pub use user_repo::UserRepository;
