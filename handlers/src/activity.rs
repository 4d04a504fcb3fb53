//! Activity tracking and opportunistic role restore.

use async_trait::async_trait;
use chrono::Utc;
use rolebot_core::{Handler, Message, Result};
use role_service::{AssignOutcome, RoleLifecycleManager};
use std::sync::Arc;
use storage::{UserRecord, UserStore};
use tracing::{error, info, instrument, warn};

/// Stamps `last_activity` for every message (creating the record on first sight) and retries a
/// pending role on plain text. Never stops the chain.
pub struct ActivityHandler {
    users: Arc<dyn UserStore>,
    lifecycle: Arc<RoleLifecycleManager>,
}

impl ActivityHandler {
    pub fn new(users: Arc<dyn UserStore>, lifecycle: Arc<RoleLifecycleManager>) -> Self {
        Self { users, lifecycle }
    }
}

#[async_trait]
impl Handler for ActivityHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let user = &message.user;
        let chat_id = message.chat.id;
        if user.is_bot {
            return Ok(true);
        }

        let record = UserRecord::new(
            user.id,
            chat_id,
            user.username.clone(),
            user.first_name.clone(),
            user.last_name.clone(),
        );
        match self.users.create_if_absent(&record).await {
            Ok(true) => {
                info!(user_id = user.id, chat_id, "Created user record");
                return Ok(true);
            }
            Ok(false) => {}
            Err(e) => {
                error!(user_id = user.id, error = %e, "Failed to create user record");
                return Ok(true);
            }
        }

        if let Err(e) = self
            .users
            .touch_activity(user.id, Some(chat_id), Utc::now())
            .await
        {
            error!(user_id = user.id, error = %e, "Failed to update activity");
        }

        // Commands carry their own role request.
        if message.is_command() {
            return Ok(true);
        }

        match self.lifecycle.restore(user.id, chat_id).await {
            Ok(AssignOutcome::Unchanged) => {}
            Ok(AssignOutcome::Deferred(reason)) => {
                warn!(user_id = user.id, reason = ?reason, "Could not restore role, check bot rights")
            }
            Ok(outcome) => info!(user_id = user.id, outcome = ?outcome, "Role restored"),
            Err(e) => error!(user_id = user.id, error = %e, "Role restore failed"),
        }

        Ok(true)
    }
}
