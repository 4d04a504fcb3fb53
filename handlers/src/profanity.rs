//! Word-list message filter and the handler that enforces it.

use crate::support::{audit, storage_error};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use rolebot_core::{parse_message_id, ChatGateway, Handler, HandlerResponse, Message, Result};
use role_service::MessageJanitor;
use std::sync::{Arc, RwLock};
use storage::{AuditSink, ProfanityWordStore, StorageError, UserStore};
use tracing::{debug, error, info, instrument, warn};

/// Case-insensitive whole-word matcher over a word list.
#[derive(Default)]
pub struct ProfanityFilter {
    pattern: RwLock<Option<Regex>>,
}

impl ProfanityFilter {
    pub fn new(words: &[String]) -> Self {
        let filter = Self::default();
        filter.set_words(words);
        filter
    }

    /// Builds a filter from every word in `store`.
    pub async fn load(store: &dyn ProfanityWordStore) -> std::result::Result<Self, StorageError> {
        let filter = Self::default();
        filter.reload(store).await?;
        Ok(filter)
    }

    /// Replaces the word list with the current content of `store`.
    pub async fn reload(&self, store: &dyn ProfanityWordStore) -> std::result::Result<usize, StorageError> {
        let words = store.all_words().await?;
        self.set_words(&words);
        Ok(words.len())
    }

    /// Replaces the word list. An empty list disables the filter.
    pub fn set_words(&self, words: &[String]) {
        let pattern = build_pattern(words);
        match self.pattern.write() {
            Ok(mut guard) => *guard = pattern,
            Err(poisoned) => *poisoned.into_inner() = pattern,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.with_pattern(|p| p.is_some())
    }

    pub fn contains_profanity(&self, text: &str) -> bool {
        self.with_pattern(|p| p.is_some_and(|p| p.is_match(text)))
    }

    pub fn count_matches(&self, text: &str) -> usize {
        self.with_pattern(|p| p.map_or(0, |p| p.find_iter(text).count()))
    }

    fn with_pattern<T>(&self, f: impl FnOnce(Option<&Regex>) -> T) -> T {
        match self.pattern.read() {
            Ok(guard) => f(guard.as_ref()),
            Err(poisoned) => f(poisoned.into_inner().as_ref()),
        }
    }
}

fn build_pattern(words: &[String]) -> Option<Regex> {
    let escaped: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        warn!("No profanity words loaded, filter disabled");
        return None;
    }

    match RegexBuilder::new(&format!(r"\b(?:{})\b", escaped.join("|")))
        .case_insensitive(true)
        .size_limit(1 << 25)
        .build()
    {
        Ok(regex) => {
            info!(words = escaped.len(), "Profanity filter loaded");
            Some(regex)
        }
        Err(e) => {
            error!(error = %e, "Failed to build profanity pattern, filter disabled");
            None
        }
    }
}

/// Deletes matching messages, counts a warning and posts a short-lived notice. Stops the chain.
pub struct ProfanityHandler {
    filter: Arc<ProfanityFilter>,
    users: Arc<dyn UserStore>,
    audit: Arc<dyn AuditSink>,
    gateway: Arc<dyn ChatGateway>,
    janitor: MessageJanitor,
}

impl ProfanityHandler {
    pub fn new(
        filter: Arc<ProfanityFilter>,
        users: Arc<dyn UserStore>,
        audit: Arc<dyn AuditSink>,
        gateway: Arc<dyn ChatGateway>,
        janitor: MessageJanitor,
    ) -> Self {
        Self {
            filter,
            users,
            audit,
            gateway,
            janitor,
        }
    }
}

#[async_trait]
impl Handler for ProfanityHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.is_command() || !self.filter.contains_profanity(&message.content) {
            return Ok(HandlerResponse::Continue);
        }

        let user_id = message.user.id;
        let chat_id = message.chat.id;
        info!(
            user_id,
            chat_id,
            matches = self.filter.count_matches(&message.content),
            "Profanity detected"
        );

        match parse_message_id(&message.id) {
            Ok(message_id) => {
                if let Err(e) = self.gateway.delete_message(chat_id, message_id).await {
                    error!(user_id, error = %e, "Failed to delete message");
                }
            }
            Err(e) => error!(user_id, error = %e, "Cannot delete message"),
        }

        let warnings = self
            .users
            .increment_warnings(user_id)
            .await
            .map_err(storage_error)?;
        debug!(user_id, warnings, "Warning counted");

        let notice = format!(
            "⚠️ {}, please do not use profanity!",
            message.user.display_name()
        );
        if let Err(e) = self.janitor.send_ephemeral(chat_id, &notice).await {
            error!(user_id, error = %e, "Failed to send profanity warning");
        }

        audit(
            self.audit.as_ref(),
            user_id,
            "profanity_warning",
            format!(
                "Message contained profanity: {}",
                message.content.chars().take(100).collect::<String>()
            ),
        )
        .await;

        Ok(HandlerResponse::Stop)
    }
}
