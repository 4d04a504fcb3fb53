//! Core types: user, chat, message, member status, handler response, and the handler traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_bot: bool,
}

impl User {
    /// Name for log lines and notifications: username, else first name, else the id.
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .or_else(|| self.first_name.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// Chat identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

impl Chat {
    /// Group or supergroup.
    pub fn is_group(&self) -> bool {
        matches!(self.chat_type.as_str(), "group" | "supergroup")
    }
}

/// A single inbound text message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Transport message id (Telegram numeric string).
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// True when the text starts with a bot command (`/name`).
    pub fn is_command(&self) -> bool {
        self.content.trim_start().starts_with('/')
    }
}

/// Membership status of a user in a chat as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    Member,
    Administrator,
    Creator,
    Restricted,
    Left,
    Kicked,
    /// The status query failed.
    Unknown,
}

impl MemberStatus {
    /// Administrator or creator.
    pub fn is_privileged(&self) -> bool {
        matches!(self, MemberStatus::Administrator | MemberStatus::Creator)
    }

    /// Still part of the chat in some form.
    pub fn is_present(&self) -> bool {
        matches!(
            self,
            MemberStatus::Member
                | MemberStatus::Administrator
                | MemberStatus::Creator
                | MemberStatus::Restricted
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Member => "member",
            MemberStatus::Administrator => "administrator",
            MemberStatus::Creator => "creator",
            MemberStatus::Restricted => "restricted",
            MemberStatus::Left => "left",
            MemberStatus::Kicked => "kicked",
            MemberStatus::Unknown => "unknown",
        }
    }
}

/// A membership change of one user in one chat.
#[derive(Debug, Clone)]
pub struct MemberUpdate {
    pub chat: Chat,
    pub user: User,
    pub old_status: MemberStatus,
    pub new_status: MemberStatus,
}

impl MemberUpdate {
    /// A user who was outside the chat became a member. Demotions (`administrator -> member`)
    /// and lifted restrictions are not joins.
    pub fn is_join(&self) -> bool {
        self.new_status == MemberStatus::Member
            && matches!(self.old_status, MemberStatus::Left | MemberStatus::Kicked)
    }

    /// A user who was present left or was removed.
    pub fn is_leave(&self) -> bool {
        matches!(self.new_status, MemberStatus::Left | MemberStatus::Kicked)
            && self.old_status.is_present()
            && self.old_status != MemberStatus::Creator
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain.
    Stop,
    /// Skip this handler, try next.
    Ignore,
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &Message,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

/// Receives membership changes (join, leave, promotion seen by the platform).
#[async_trait]
pub trait MemberEventHandler: Send + Sync {
    async fn on_member_update(&self, update: &MemberUpdate) -> crate::error::Result<()>;
}
