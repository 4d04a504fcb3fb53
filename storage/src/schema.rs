//! Table and index creation. Idempotent; run once per pool at start-up.

use sqlx::SqlitePool;
use tracing::info;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    chat_id INTEGER NOT NULL,
    username TEXT,
    first_name TEXT,
    last_name TEXT,
    nickname TEXT,
    role_assigned BOOLEAN NOT NULL DEFAULT 0,
    is_blocked BOOLEAN NOT NULL DEFAULT 0,
    last_activity TEXT,
    warnings_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

const CREATE_ROLE_HISTORY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS role_history (
    history_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    role_name TEXT NOT NULL,
    assigned_at TEXT NOT NULL,
    removed_at TEXT,
    reason TEXT
)
"#;

const CREATE_LOGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS logs (
    log_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    action TEXT NOT NULL,
    details TEXT,
    created_at TEXT NOT NULL
)
"#;

const CREATE_PROFANITY_WORDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS profanity_words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
)
"#;

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_users_chat_id ON users(chat_id)",
    "CREATE INDEX IF NOT EXISTS idx_users_role_assigned ON users(role_assigned)",
    "CREATE INDEX IF NOT EXISTS idx_users_is_blocked ON users(is_blocked)",
    "CREATE INDEX IF NOT EXISTS idx_logs_user_id ON logs(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_logs_created_at ON logs(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_role_history_user_id ON role_history(user_id)",
];

/// Creates every table and index if they do not exist yet.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Creating database tables if not exist");

    for statement in [
        CREATE_USERS_TABLE,
        CREATE_ROLE_HISTORY_TABLE,
        CREATE_LOGS_TABLE,
        CREATE_PROFANITY_WORDS_TABLE,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    for statement in CREATE_INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database tables created successfully");
    Ok(())
}
