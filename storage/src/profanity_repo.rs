//! Profanity word repository: the `profanity_words` table.

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StorageError;
use crate::repository::ProfanityWordStore;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct ProfanityWordRepository {
    pool_manager: SqlitePoolManager,
}

impl ProfanityWordRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Adds every non-blank word (trimmed, lowercased). Returns how many were new.
    pub async fn add_words<I, S>(&self, words: I) -> Result<usize, StorageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for word in words {
            if self.add_word(word.as_ref()).await? {
                added += 1;
            }
        }
        Ok(added)
    }
}

fn normalize(word: &str) -> Option<String> {
    let word = word.trim().to_lowercase();
    (!word.is_empty()).then_some(word)
}

#[async_trait]
impl ProfanityWordStore for ProfanityWordRepository {
    async fn all_words(&self) -> Result<Vec<String>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT word FROM profanity_words ORDER BY word")
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn add_word(&self, word: &str) -> Result<bool, StorageError> {
        let Some(word) = normalize(word) else {
            return Ok(false);
        };
        let result = sqlx::query(
            "INSERT INTO profanity_words (word, created_at) VALUES (?, ?) ON CONFLICT (word) DO NOTHING",
        )
        .bind(&word)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_word(&self, word: &str) -> Result<bool, StorageError> {
        let Some(word) = normalize(word) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM profanity_words WHERE word = ?")
            .bind(&word)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_all(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM profanity_words")
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
