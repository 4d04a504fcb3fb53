//! Chat administration commands for configured admin ids.

use crate::command::Command;
use crate::support::storage_error;
use async_trait::async_trait;
use rolebot_core::{ChatGateway, Handler, HandlerResponse, Message, Result};
use role_service::{RemoveOutcome, RoleLifecycleManager};
use std::sync::Arc;
use storage::{RemovalReason, UserStore};
use tracing::{error, info, instrument};

/// `/stats`, `/unblock <user_id>`, `/revoke <user_id>`. Ignored for anyone not in `admin_ids`.
pub struct AdminCommandHandler {
    admin_ids: Vec<i64>,
    users: Arc<dyn UserStore>,
    lifecycle: Arc<RoleLifecycleManager>,
    gateway: Arc<dyn ChatGateway>,
    inactivity_timeout_minutes: u64,
    bot_username: Option<String>,
}

impl AdminCommandHandler {
    pub fn new(
        admin_ids: Vec<i64>,
        users: Arc<dyn UserStore>,
        lifecycle: Arc<RoleLifecycleManager>,
        gateway: Arc<dyn ChatGateway>,
        inactivity_timeout_minutes: u64,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            admin_ids,
            users,
            lifecycle,
            gateway,
            inactivity_timeout_minutes,
            bot_username,
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.gateway.send_message(chat_id, text).await {
            error!(chat_id, error = %e, "Failed to send reply");
        }
    }

    async fn stats(&self, chat_id: i64) -> Result<()> {
        let total = self
            .users
            .count_by_chat(chat_id, None)
            .await
            .map_err(storage_error)?;
        let with_role = self
            .users
            .count_by_chat(chat_id, Some(true))
            .await
            .map_err(storage_error)?;
        self.reply(
            chat_id,
            &format!(
                "📊 Stats:\n\n👥 Users: {}\n🎭 Active titles: {}\n⏱️ Inactivity timeout: {} min",
                total, with_role, self.inactivity_timeout_minutes
            ),
        )
        .await;
        Ok(())
    }

    /// Parses the target id, replying with usage or an error when it is missing or malformed.
    async fn target_id(&self, chat_id: i64, command: &Command<'_>) -> Option<i64> {
        let Some(arg) = command.first_arg() else {
            self.reply(chat_id, &format!("Usage: /{} <user_id>", command.name))
                .await;
            return None;
        };
        if arg.starts_with('@') {
            self.reply(chat_id, "Please use the numeric user id.").await;
            return None;
        }
        match arg.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                self.reply(chat_id, "❌ Invalid user id.").await;
                None
            }
        }
    }

    async fn unblock(&self, chat_id: i64, target: i64) -> Result<()> {
        if let Err(e) = self.gateway.lift_restrictions(chat_id, target).await {
            error!(target, error = %e, "Failed to lift restrictions");
            self.reply(chat_id, "❌ Could not lift restrictions.").await;
            return Ok(());
        }
        let known = self.users.unblock(target).await.map_err(storage_error)?;
        info!(target, known, "User unblocked");
        self.reply(chat_id, &format!("✅ User {} unblocked.", target))
            .await;
        Ok(())
    }

    async fn revoke(&self, chat_id: i64, target: i64) {
        let text = match self
            .lifecycle
            .remove(target, chat_id, RemovalReason::Manual)
            .await
        {
            Ok(RemoveOutcome::Removed) => format!("✅ Title revoked for {}.", target),
            Ok(RemoveOutcome::UserNotFound) => format!("User {} is unknown.", target),
            Ok(_) => format!("User {} holds no title.", target),
            Err(e) => {
                error!(target, error = %e, "Revoke failed");
                "❌ Could not revoke the title.".to_string()
            }
        };
        self.reply(chat_id, &text).await;
    }
}

#[async_trait]
impl Handler for AdminCommandHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(command) = Command::parse(&message.content, self.bot_username.as_deref()) else {
            return Ok(HandlerResponse::Continue);
        };
        if !matches!(command.name.as_str(), "stats" | "unblock" | "revoke") {
            return Ok(HandlerResponse::Continue);
        }
        if !self.is_admin(message.user.id) {
            return Ok(HandlerResponse::Ignore);
        }

        let chat_id = message.chat.id;
        info!(admin_id = message.user.id, command = %command.name, "Admin command");
        match command.name.as_str() {
            "stats" => self.stats(chat_id).await?,
            "unblock" => {
                if let Some(target) = self.target_id(chat_id, &command).await {
                    self.unblock(chat_id, target).await?;
                }
            }
            _ => {
                if let Some(target) = self.target_id(chat_id, &command).await {
                    self.revoke(chat_id, target).await;
                }
            }
        }
        Ok(HandlerResponse::Stop)
    }
}
