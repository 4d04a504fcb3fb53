//! Offline maintenance commands: word list and user table.

use anyhow::{Context, Result};
use std::path::Path;
use storage::{Database, ProfanityWordStore, RoleState, UserRecord, UserStore};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordLoadReport {
    pub cleared: u64,
    pub read: usize,
    pub added: usize,
}

/// Loads one word per line (blank lines and `#` comments skipped).
pub async fn load_words_file(db: &Database, path: &Path, clear: bool) -> Result<WordLoadReport> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let words: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let cleared = if clear { db.words.clear_all().await? } else { 0 };
    let added = db.words.add_words(&words).await?;
    info!(file = %path.display(), cleared, read = words.len(), added, "Words loaded");

    Ok(WordLoadReport {
        cleared,
        read: words.len(),
        added,
    })
}

pub async fn add_words(db: &Database, words: &[String]) -> Result<usize> {
    Ok(db.words.add_words(words).await?)
}

pub async fn list_words(db: &Database) -> Result<Vec<String>> {
    Ok(db.words.all_words().await?)
}

pub async fn list_users(db: &Database, chat_id: Option<i64>) -> Result<Vec<UserRecord>> {
    Ok(db.users.list_by_chat(chat_id).await?)
}

/// Fixed-width table for `rolebot users`.
pub fn format_user_table(users: &[UserRecord]) -> String {
    let mut out = format!(
        "{:<12} {:<16} {:<20} {:<18} {:<8} {:<8} {}\n",
        "user_id", "chat_id", "username", "title", "role", "blocked", "warnings"
    );
    out.push_str(&"-".repeat(100));
    out.push('\n');
    for user in users {
        out.push_str(&format!(
            "{:<12} {:<16} {:<20} {:<18} {:<8} {:<8} {}\n",
            user.user_id,
            user.chat_id,
            user.username.as_deref().unwrap_or("-"),
            user.nickname.as_deref().unwrap_or("-"),
            role_label(user),
            if user.is_blocked { "yes" } else { "no" },
            user.warnings_count
        ));
    }
    out
}

fn role_label(user: &UserRecord) -> &'static str {
    match user.role_state() {
        RoleState::Active => "active",
        RoleState::Degraded => "pending",
        RoleState::None => "-",
    }
}
