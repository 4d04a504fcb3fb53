//! Recording fake gateway and a wired set of services for handler tests.

use async_trait::async_trait;
use chrono::Utc;
use rolebot_core::{
    AdminPermissions, BotRights, Chat, ChatGateway, GatewayError, MemberStatus, Message, User,
};
use role_service::{LifecycleConfig, MessageJanitor, RetryPolicy, RoleLifecycleManager};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage::Database;

pub const CHAT_ID: i64 = -1002;
pub const BOT_ID: i64 = 999;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Promote(i64, bool),
    SetTitle(i64, String),
    Send(String),
    Delete(i32),
    LiftRestrictions(i64),
}

pub struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    can_promote: Mutex<bool>,
    statuses: Mutex<HashMap<i64, MemberStatus>>,
    next_message_id: AtomicI32,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            can_promote: Mutex::new(true),
            statuses: Mutex::new(HashMap::new()),
            next_message_id: AtomicI32::new(500),
        })
    }

    pub fn revoke_bot_rights(&self) {
        *self.can_promote.lock().unwrap() = false;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn promotions(&self, user_id: i64) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == Call::Promote(user_id, true))
            .count()
    }

    pub fn demotions(&self, user_id: i64) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == Call::Promote(user_id, false))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatGateway for FakeGateway {
    async fn bot_rights(&self, _chat_id: i64) -> Result<BotRights, GatewayError> {
        Ok(BotRights {
            status: MemberStatus::Administrator,
            can_promote_members: *self.can_promote.lock().unwrap(),
        })
    }

    async fn member_status(&self, _chat_id: i64, user_id: i64) -> Result<MemberStatus, GatewayError> {
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .unwrap_or(MemberStatus::Member))
    }

    async fn promote(
        &self,
        _chat_id: i64,
        user_id: i64,
        permissions: &AdminPermissions,
    ) -> Result<(), GatewayError> {
        let granting = !permissions.is_empty();
        self.record(Call::Promote(user_id, granting));
        let status = if granting {
            MemberStatus::Administrator
        } else {
            MemberStatus::Member
        };
        self.statuses.lock().unwrap().insert(user_id, status);
        Ok(())
    }

    async fn set_custom_title(&self, _chat_id: i64, user_id: i64, title: &str) -> Result<(), GatewayError> {
        self.record(Call::SetTitle(user_id, title.to_string()));
        Ok(())
    }

    async fn send_message(&self, _chat_id: i64, text: &str) -> Result<i32, GatewayError> {
        self.record(Call::Send(text.to_string()));
        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn delete_message(&self, _chat_id: i64, message_id: i32) -> Result<(), GatewayError> {
        self.record(Call::Delete(message_id));
        Ok(())
    }

    async fn lift_restrictions(&self, _chat_id: i64, user_id: i64) -> Result<(), GatewayError> {
        self.record(Call::LiftRestrictions(user_id));
        Ok(())
    }
}

pub struct Services {
    pub db: Database,
    pub gateway: Arc<FakeGateway>,
    pub lifecycle: Arc<RoleLifecycleManager>,
    pub janitor: MessageJanitor,
}

pub async fn services() -> Services {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open database");
    let gateway = FakeGateway::new();
    let lifecycle = Arc::new(RoleLifecycleManager::new(
        Arc::new(db.users.clone()),
        Arc::new(db.history.clone()),
        Arc::new(db.audit.clone()),
        gateway.clone(),
        LifecycleConfig {
            settle_delay: Duration::from_millis(5),
            title_retry: RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(5),
            },
        },
    ));
    let janitor = MessageJanitor::new(gateway.clone(), Duration::from_secs(5));
    Services {
        db,
        gateway,
        lifecycle,
        janitor,
    }
}

pub fn user(id: i64) -> User {
    User {
        id,
        username: Some(format!("user{}", id)),
        first_name: Some("Test".to_string()),
        last_name: None,
        is_bot: false,
    }
}

pub fn message(user_id: i64, content: &str) -> Message {
    Message {
        id: "77".to_string(),
        user: user(user_id),
        chat: Chat {
            id: CHAT_ID,
            chat_type: "supergroup".to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}
