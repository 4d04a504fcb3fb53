//! Adapters from Telegram (teloxide) types to rolebot_core types.

use rolebot_core::{Chat, MemberStatus, MemberUpdate, Message, ToCoreMessage, ToCoreUser, User};
use teloxide::types::{ChatMemberKind, ChatMemberUpdated};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
            is_bot: self.0.is_bot,
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                    is_bot: false,
                }),
            chat: core_chat(&self.0.chat),
            content: self.0.text().unwrap_or("").to_string(),
            created_at: self.0.date,
        }
    }
}

/// Converts a chat-member update into a core [`MemberUpdate`].
pub fn to_member_update(update: &ChatMemberUpdated) -> MemberUpdate {
    MemberUpdate {
        chat: core_chat(&update.chat),
        user: TelegramUserWrapper(&update.new_chat_member.user).to_core(),
        old_status: member_status(&update.old_chat_member.kind),
        new_status: member_status(&update.new_chat_member.kind),
    }
}

pub fn member_status(kind: &ChatMemberKind) -> MemberStatus {
    if kind.is_owner() {
        MemberStatus::Creator
    } else if kind.is_administrator() {
        MemberStatus::Administrator
    } else if kind.is_restricted() {
        MemberStatus::Restricted
    } else if kind.is_left() {
        MemberStatus::Left
    } else if kind.is_banned() {
        MemberStatus::Kicked
    } else {
        MemberStatus::Member
    }
}

fn core_chat(chat: &teloxide::types::Chat) -> Chat {
    let chat_type = if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else if chat.is_channel() {
        "channel"
    } else {
        "private"
    };
    Chat {
        id: chat.id.0,
        chat_type: chat_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telegram_user(is_bot: bool) -> teloxide::types::User {
        teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        }
    }

    /// **Test: TelegramUserWrapper converts id, names and the bot flag.**
    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = telegram_user(false);
        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
        assert!(!core_user.is_bot);

        assert!(TelegramUserWrapper(&telegram_user(true)).to_core().is_bot);
    }

    /// **Test: member kinds map to core statuses.**
    #[test]
    fn test_member_status_mapping() {
        assert_eq!(member_status(&ChatMemberKind::Left), MemberStatus::Left);
    }
}
