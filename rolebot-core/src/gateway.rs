//! Chat platform gateway: the remote calls the role lifecycle depends on.
//!
//! [`ChatGateway`] is transport-agnostic; the teloxide implementation lives in `rolebot-telegram`.
//! Calls may fail, time out, or report stale membership state.

use crate::error::{GatewayError, HandlerError};
use crate::types::MemberStatus;
use async_trait::async_trait;

/// Administrator permission set sent with a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdminPermissions {
    pub can_post_messages: bool,
    pub can_edit_messages: bool,
    pub can_delete_messages: bool,
    pub can_restrict_members: bool,
    pub can_promote_members: bool,
    pub can_change_info: bool,
    pub can_pin_messages: bool,
    pub can_manage_chat: bool,
    pub can_manage_video_chats: bool,
    pub can_invite_users: bool,
    pub is_anonymous: bool,
}

impl AdminPermissions {
    /// Minimal set for a role that only carries a custom title.
    pub fn title_only() -> Self {
        Self {
            can_post_messages: true,
            ..Self::default()
        }
    }

    /// Everything revoked; promoting with this demotes the member.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }
}

/// The bot's own standing in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotRights {
    pub status: MemberStatus,
    pub can_promote_members: bool,
}

impl BotRights {
    /// Administrator (or creator) holding the promote right.
    pub fn can_assign_roles(&self) -> bool {
        self.status.is_privileged() && self.can_promote_members
    }
}

/// Remote chat platform operations. Implementations must be safe for concurrent use.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Status and promote right of the bot itself in `chat_id`.
    async fn bot_rights(&self, chat_id: i64) -> Result<BotRights, GatewayError>;

    /// Membership status of `user_id` in `chat_id`.
    async fn member_status(&self, chat_id: i64, user_id: i64) -> Result<MemberStatus, GatewayError>;

    /// Promotes `user_id` with exactly `permissions`.
    async fn promote(
        &self,
        chat_id: i64,
        user_id: i64,
        permissions: &AdminPermissions,
    ) -> Result<(), GatewayError>;

    /// Revokes every administrator right of `user_id`.
    async fn demote(&self, chat_id: i64, user_id: i64) -> Result<(), GatewayError> {
        self.promote(chat_id, user_id, &AdminPermissions::none()).await
    }

    /// Sets the administrator custom title (at most 16 characters).
    async fn set_custom_title(
        &self,
        chat_id: i64,
        user_id: i64,
        title: &str,
    ) -> Result<(), GatewayError>;

    /// Sends a text message and returns its id.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i32, GatewayError>;

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), GatewayError>;

    /// Lifts every restriction on `user_id`.
    async fn lift_restrictions(&self, chat_id: i64, user_id: i64) -> Result<(), GatewayError>;
}

/// Parses a message id string into an i32.
pub fn parse_message_id(s: &str) -> Result<i32, HandlerError> {
    s.parse()
        .map_err(|_| HandlerError::InvalidMessageId(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_id_valid() {
        assert_eq!(parse_message_id("123").unwrap(), 123);
        assert_eq!(parse_message_id("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_message_id_invalid() {
        assert!(parse_message_id("").is_err());
        assert!(parse_message_id("abc").is_err());
        assert!(parse_message_id("12.3").is_err());
    }

    #[test]
    fn test_title_only_permissions() {
        let perms = AdminPermissions::title_only();
        assert!(perms.can_post_messages);
        assert!(!perms.can_promote_members);
        assert!(!perms.can_delete_messages);
        assert!(!perms.is_anonymous);
        assert!(!perms.is_empty());
        assert!(AdminPermissions::none().is_empty());
    }

    #[test]
    fn test_bot_rights() {
        let admin = BotRights {
            status: MemberStatus::Administrator,
            can_promote_members: true,
        };
        assert!(admin.can_assign_roles());

        let no_right = BotRights {
            can_promote_members: false,
            ..admin
        };
        assert!(!no_right.can_assign_roles());

        let member = BotRights {
            status: MemberStatus::Member,
            can_promote_members: true,
        };
        assert!(!member.can_assign_roles());
    }
}
