//! `/changenick` (`/cn`) and `/start`.

use crate::command::Command;
use crate::support::storage_error;
use async_trait::async_trait;
use rolebot_core::{Handler, HandlerResponse, Message, Result};
use role_service::{
    AssignOutcome, MessageJanitor, Nickname, RoleLifecycleManager, MAX_TITLE_CHARS,
};
use std::sync::Arc;
use storage::{UserRecord, UserStore};
use tracing::{error, info, instrument, warn};

pub(crate) const USAGE: &str = "Usage: /changenick <new title>\nExample: /changenick Senior_Scout";

pub(crate) const HELP: &str = "Hi! Set your title in this chat with /changenick <title> (or /cn).\n\
Titles are at most 16 characters. The title is removed after a period of inactivity \
and restored when you write again.";

/// Handles title requests from members. Replies are ephemeral.
pub struct NicknameCommandHandler {
    users: Arc<dyn UserStore>,
    lifecycle: Arc<RoleLifecycleManager>,
    janitor: MessageJanitor,
    bot_username: Option<String>,
}

impl NicknameCommandHandler {
    pub fn new(
        users: Arc<dyn UserStore>,
        lifecycle: Arc<RoleLifecycleManager>,
        janitor: MessageJanitor,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            users,
            lifecycle,
            janitor,
            bot_username,
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.janitor.send_ephemeral(chat_id, text).await {
            error!(chat_id, error = %e, "Failed to send reply");
        }
    }

    async fn change_nickname(&self, message: &Message, requested: &str) -> Result<()> {
        let user = &message.user;
        let chat_id = message.chat.id;
        info!(user_id = user.id, chat_id, "Nickname change requested");

        if !Nickname::fits(requested) {
            self.reply(
                chat_id,
                &format!("❌ Title is too long (at most {} characters).", MAX_TITLE_CHARS),
            )
            .await;
            return Ok(());
        }
        let Ok(nickname) = Nickname::parse(requested) else {
            self.reply(chat_id, USAGE).await;
            return Ok(());
        };

        let record = UserRecord::new(
            user.id,
            chat_id,
            user.username.clone(),
            user.first_name.clone(),
            user.last_name.clone(),
        );
        if let Err(e) = self.users.create_if_absent(&record).await {
            error!(user_id = user.id, error = %e, "Failed to create user record");
            self.reply(chat_id, "❌ Could not save the title, try again later.")
                .await;
            return Err(storage_error(e));
        }

        match self
            .lifecycle
            .assign(user.id, chat_id, nickname.as_str())
            .await
        {
            Ok(outcome) => {
                if let AssignOutcome::Deferred(reason) = outcome {
                    warn!(user_id = user.id, reason = ?reason, "Title stored, role deferred");
                }
                self.reply(
                    chat_id,
                    &format!("✅ Title '{}' set for {}", nickname, user.display_name()),
                )
                .await;
            }
            Err(e) => {
                error!(user_id = user.id, error = %e, "Title change failed");
                self.reply(chat_id, "❌ Could not save the title, try again later.")
                    .await;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Handler for NicknameCommandHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(command) = Command::parse(&message.content, self.bot_username.as_deref()) else {
            return Ok(HandlerResponse::Continue);
        };

        match command.name.as_str() {
            "changenick" | "cn" => {
                self.change_nickname(message, command.args).await?;
                Ok(HandlerResponse::Stop)
            }
            "start" => {
                self.reply(message.chat.id, HELP).await;
                Ok(HandlerResponse::Stop)
            }
            _ => Ok(HandlerResponse::Continue),
        }
    }
}
