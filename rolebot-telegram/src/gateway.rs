//! [`ChatGateway`] over teloxide. Platform error descriptions are classified into [`GatewayError`].

use crate::adapters::member_status;
use async_trait::async_trait;
use rolebot_core::{AdminPermissions, BotRights, ChatGateway, GatewayError, MemberStatus};
use teloxide::prelude::*;
use teloxide::types::{ChatPermissions, MessageId, UserId};
use teloxide::RequestError;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

/// Telegram implementation of [`ChatGateway`]. The bot's own id is fetched once and cached.
pub struct TelegramGateway {
    bot: teloxide::Bot,
    bot_id: OnceCell<UserId>,
}

impl TelegramGateway {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self {
            bot,
            bot_id: OnceCell::new(),
        }
    }

    async fn bot_id(&self) -> Result<UserId, GatewayError> {
        self.bot_id
            .get_or_try_init(|| async {
                let me = self.bot.get_me().await.map_err(map_request_error)?;
                Ok::<_, GatewayError>(me.user.id)
            })
            .await
            .copied()
    }
}

/// Maps a teloxide request error to the gateway taxonomy.
pub fn map_request_error(err: RequestError) -> GatewayError {
    match err {
        RequestError::Api(api) => GatewayError::classify(api.to_string()),
        RequestError::Network(e) => GatewayError::Transport(e.to_string()),
        RequestError::Io(e) => GatewayError::Transport(e.to_string()),
        other => GatewayError::Api(other.to_string()),
    }
}

fn user_id(id: i64) -> UserId {
    UserId(id as u64)
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    #[instrument(skip(self))]
    async fn bot_rights(&self, chat_id: i64) -> Result<BotRights, GatewayError> {
        let me = self.bot_id().await?;
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), me)
            .await
            .map_err(map_request_error)?;
        Ok(BotRights {
            status: member_status(&member.kind),
            can_promote_members: member.kind.can_promote_members(),
        })
    }

    #[instrument(skip(self))]
    async fn member_status(&self, chat_id: i64, user: i64) -> Result<MemberStatus, GatewayError> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), user_id(user))
            .await
            .map_err(map_request_error)?;
        let status = member_status(&member.kind);
        debug!(chat_id, user_id = user, status = status.as_str(), "Member status");
        Ok(status)
    }

    #[instrument(skip(self, permissions))]
    async fn promote(
        &self,
        chat_id: i64,
        user: i64,
        permissions: &AdminPermissions,
    ) -> Result<(), GatewayError> {
        self.bot
            .promote_chat_member(ChatId(chat_id), user_id(user))
            .is_anonymous(permissions.is_anonymous)
            .can_manage_chat(permissions.can_manage_chat)
            .can_post_messages(permissions.can_post_messages)
            .can_edit_messages(permissions.can_edit_messages)
            .can_delete_messages(permissions.can_delete_messages)
            .can_manage_video_chats(permissions.can_manage_video_chats)
            .can_restrict_members(permissions.can_restrict_members)
            .can_promote_members(permissions.can_promote_members)
            .can_change_info(permissions.can_change_info)
            .can_invite_users(permissions.can_invite_users)
            .can_pin_messages(permissions.can_pin_messages)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_custom_title(&self, chat_id: i64, user: i64, title: &str) -> Result<(), GatewayError> {
        self.bot
            .set_chat_administrator_custom_title(ChatId(chat_id), user_id(user), title)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i32, GatewayError> {
        let sent = self
            .bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(map_request_error)?;
        Ok(sent.id.0)
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), GatewayError> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn lift_restrictions(&self, chat_id: i64, user: i64) -> Result<(), GatewayError> {
        self.bot
            .restrict_chat_member(ChatId(chat_id), user_id(user), ChatPermissions::all())
            .await
            .map_err(map_request_error)?;
        Ok(())
    }
}
