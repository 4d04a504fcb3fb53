//! Shared fixtures: a recording fake [`ChatGateway`] and a lifecycle manager over in-memory SQLite.

#![allow(dead_code)]

use async_trait::async_trait;
use rolebot_core::{AdminPermissions, BotRights, ChatGateway, GatewayError, MemberStatus};
use role_service::{LifecycleConfig, RetryPolicy, RoleLifecycleManager};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage::{Database, UserRecord, UserStore};
use tokio::sync::Notify;

pub const CHAT_ID: i64 = -1001;

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BotRights,
    MemberStatus(i64),
    Promote(i64, AdminPermissions),
    SetTitle(i64, String),
    Send(String),
    Delete(i32),
    LiftRestrictions(i64),
}

/// Fake platform: keeps member statuses in memory, records every call, and fails on demand.
pub struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    rights: Mutex<Result<BotRights, GatewayError>>,
    statuses: Mutex<HashMap<i64, MemberStatus>>,
    promote_error: Mutex<Option<GatewayError>>,
    /// When false a successful promotion is not reflected in later status reads.
    promotion_visible: Mutex<bool>,
    title_errors: Mutex<VecDeque<GatewayError>>,
    delete_error: Mutex<Option<GatewayError>>,
    status_gate: Mutex<Option<StatusGate>>,
    next_message_id: AtomicI32,
}

/// Parks the next status read until released.
#[derive(Clone)]
pub struct StatusGate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl FakeGateway {
    /// Bot is an administrator with the promote right; every user is a plain member.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            rights: Mutex::new(Ok(BotRights {
                status: MemberStatus::Administrator,
                can_promote_members: true,
            })),
            statuses: Mutex::new(HashMap::new()),
            promote_error: Mutex::new(None),
            promotion_visible: Mutex::new(true),
            title_errors: Mutex::new(VecDeque::new()),
            delete_error: Mutex::new(None),
            status_gate: Mutex::new(None),
            next_message_id: AtomicI32::new(100),
        })
    }

    pub fn set_rights(&self, rights: Result<BotRights, GatewayError>) {
        *self.rights.lock().unwrap() = rights;
    }

    pub fn set_status(&self, user_id: i64, status: MemberStatus) {
        self.statuses.lock().unwrap().insert(user_id, status);
    }

    pub fn status_of(&self, user_id: i64) -> MemberStatus {
        self.statuses
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .unwrap_or(MemberStatus::Member)
    }

    pub fn fail_promotion(&self, error: GatewayError) {
        *self.promote_error.lock().unwrap() = Some(error);
    }

    pub fn hide_promotions(&self) {
        *self.promotion_visible.lock().unwrap() = false;
    }

    /// Queues errors returned by the next title calls, in order.
    pub fn queue_title_errors(&self, errors: impl IntoIterator<Item = GatewayError>) {
        self.title_errors.lock().unwrap().extend(errors);
    }

    pub fn fail_deletes(&self, error: GatewayError) {
        *self.delete_error.lock().unwrap() = Some(error);
    }

    /// The next `member_status` call signals `entered` and waits for `release`.
    pub fn park_next_status_read(&self) -> StatusGate {
        let gate = StatusGate {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        *self.status_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Promotions granting rights (demotions excluded).
    pub fn promotions(&self, user_id: i64) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Promote(id, perms) if *id == user_id && !perms.is_empty()))
            .count()
    }

    pub fn demotions(&self, user_id: i64) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Promote(id, perms) if *id == user_id && perms.is_empty()))
            .count()
    }

    pub fn title_calls(&self, user_id: i64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetTitle(id, title) if id == user_id => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<i32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatGateway for FakeGateway {
    async fn bot_rights(&self, _chat_id: i64) -> Result<BotRights, GatewayError> {
        self.record(Call::BotRights);
        self.rights.lock().unwrap().clone()
    }

    async fn member_status(&self, _chat_id: i64, user_id: i64) -> Result<MemberStatus, GatewayError> {
        self.record(Call::MemberStatus(user_id));
        let gate = self.status_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        Ok(self.status_of(user_id))
    }

    async fn promote(
        &self,
        _chat_id: i64,
        user_id: i64,
        permissions: &AdminPermissions,
    ) -> Result<(), GatewayError> {
        self.record(Call::Promote(user_id, *permissions));
        if permissions.is_empty() {
            self.set_status(user_id, MemberStatus::Member);
            return Ok(());
        }
        if let Some(e) = self.promote_error.lock().unwrap().clone() {
            return Err(e);
        }
        if *self.promotion_visible.lock().unwrap() {
            self.set_status(user_id, MemberStatus::Administrator);
        }
        Ok(())
    }

    async fn set_custom_title(&self, _chat_id: i64, user_id: i64, title: &str) -> Result<(), GatewayError> {
        self.record(Call::SetTitle(user_id, title.to_string()));
        match self.title_errors.lock().unwrap().pop_front() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn send_message(&self, _chat_id: i64, text: &str) -> Result<i32, GatewayError> {
        self.record(Call::Send(text.to_string()));
        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn delete_message(&self, _chat_id: i64, message_id: i32) -> Result<(), GatewayError> {
        self.record(Call::Delete(message_id));
        match self.delete_error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn lift_restrictions(&self, _chat_id: i64, user_id: i64) -> Result<(), GatewayError> {
        self.record(Call::LiftRestrictions(user_id));
        Ok(())
    }
}

/// Short delays so lifecycle tests run in real time.
pub fn fast_config() -> LifecycleConfig {
    LifecycleConfig {
        settle_delay: Duration::from_millis(10),
        title_retry: RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        },
    }
}

pub struct Fixture {
    pub db: Database,
    pub gateway: Arc<FakeGateway>,
    pub manager: Arc<RoleLifecycleManager>,
}

pub async fn fixture() -> Fixture {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open database");
    let gateway = FakeGateway::new();
    let manager = Arc::new(RoleLifecycleManager::new(
        Arc::new(db.users.clone()),
        Arc::new(db.history.clone()),
        Arc::new(db.audit.clone()),
        gateway.clone(),
        fast_config(),
    ));
    Fixture {
        db,
        gateway,
        manager,
    }
}

impl Fixture {
    pub async fn add_user(&self, user_id: i64) -> UserRecord {
        let record = UserRecord::new(user_id, CHAT_ID, Some(format!("user{}", user_id)), None, None);
        self.db.users.put(&record).await.unwrap();
        record
    }

    pub async fn user(&self, user_id: i64) -> UserRecord {
        self.db.users.get(user_id).await.unwrap().expect("user exists")
    }
}
