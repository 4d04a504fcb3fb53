//! Wiring tests: components built over in-memory SQLite and a stub gateway.

use async_trait::async_trait;
use chrono::Utc;
use rolebot_cli::components::{
    build_bot_components, build_handler_chain, build_member_handler, build_sweeper,
};
use rolebot_cli::{BotConfig, BotIdentity};
use rolebot_core::{
    AdminPermissions, BotRights, Chat, ChatGateway, GatewayError, HandlerResponse, MemberStatus,
    MemberUpdate, Message, User,
};
use std::sync::{Arc, Mutex};
use storage::{Database, ProfanityWordStore, UserStore};

const CHAT_ID: i64 = -1003;

#[derive(Default)]
struct StubGateway {
    deleted: Mutex<Vec<i32>>,
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatGateway for StubGateway {
    async fn bot_rights(&self, _chat_id: i64) -> Result<BotRights, GatewayError> {
        Ok(BotRights {
            status: MemberStatus::Administrator,
            can_promote_members: true,
        })
    }

    async fn member_status(&self, _chat_id: i64, _user_id: i64) -> Result<MemberStatus, GatewayError> {
        Ok(MemberStatus::Member)
    }

    async fn promote(
        &self,
        _chat_id: i64,
        _user_id: i64,
        _permissions: &AdminPermissions,
    ) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn set_custom_title(
        &self,
        _chat_id: i64,
        _user_id: i64,
        _title: &str,
    ) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn send_message(&self, _chat_id: i64, text: &str) -> Result<i32, GatewayError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(text.to_string());
        Ok(1000 + sent.len() as i32)
    }

    async fn delete_message(&self, _chat_id: i64, message_id: i32) -> Result<(), GatewayError> {
        self.deleted.lock().unwrap().push(message_id);
        Ok(())
    }

    async fn lift_restrictions(&self, _chat_id: i64, _user_id: i64) -> Result<(), GatewayError> {
        Ok(())
    }
}

fn config() -> BotConfig {
    BotConfig {
        bot_token: "42:secret".to_string(),
        telegram_api_url: None,
        database_url: "sqlite::memory:".to_string(),
        log_file: "logs/test.log".to_string(),
        admin_ids: vec![7],
        chat_id: None,
        activity_timeout_minutes: 5,
        sweep_interval_secs: 60,
        message_delete_delay_secs: 0,
        promotion_settle_secs: 0,
        title_retry_attempts: 1,
        title_retry_delay_secs: 0,
    }
}

fn user(id: i64) -> User {
    User {
        id,
        username: Some(format!("user{}", id)),
        first_name: None,
        last_name: None,
        is_bot: false,
    }
}

fn chat() -> Chat {
    Chat {
        id: CHAT_ID,
        chat_type: "supergroup".to_string(),
    }
}

async fn setup() -> (Database, Arc<StubGateway>, rolebot_cli::BotComponents) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.words.add_word("darn").await.unwrap();
    let gateway = Arc::new(StubGateway::default());
    let components = build_bot_components(
        &config(),
        db.clone(),
        gateway.clone(),
        BotIdentity {
            id: 42,
            username: Some("role_bot".to_string()),
        },
    )
    .await
    .unwrap();
    (db, gateway, components)
}

/// **Test: the chain holds five handlers and the word list is loaded at build time.**
#[tokio::test]
async fn test_build_components_loads_words() {
    let (_db, _gateway, components) = setup().await;

    assert!(components.filter.is_loaded());
    assert!(components.filter.contains_profanity("well DARN it"));
    assert_eq!(build_handler_chain(&components, &config()).len(), 5);
}

/// **Test: a profane group message is deleted, warned about and counted through the wired chain.**
#[tokio::test]
async fn test_wired_chain_filters_profanity() {
    let (db, gateway, components) = setup().await;
    let chain = build_handler_chain(&components, &config());

    let message = Message {
        id: "55".to_string(),
        user: user(5),
        chat: chat(),
        content: "darn this".to_string(),
        created_at: Utc::now(),
    };
    let response = chain.handle(&message).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert!(gateway.deleted.lock().unwrap().contains(&55));
    assert_eq!(gateway.sent.lock().unwrap().len(), 1);
    let record = db.users.get(5).await.unwrap().expect("record created");
    assert_eq!(record.warnings_count, 1);
}

/// **Test: the member handler creates a record for a joining user; the bot itself is skipped.**
#[tokio::test]
async fn test_wired_member_handler() {
    let (db, _gateway, components) = setup().await;
    let handler = build_member_handler(&components);

    for id in [42, 8] {
        handler
            .on_member_update(&MemberUpdate {
                chat: chat(),
                user: user(id),
                old_status: MemberStatus::Left,
                new_status: MemberStatus::Member,
            })
            .await
            .unwrap();
    }

    assert!(db.users.get(42).await.unwrap().is_none());
    assert!(db.users.get(8).await.unwrap().is_some());
}

/// **Test: the sweeper built from config starts once and stops cleanly.**
#[tokio::test]
async fn test_sweeper_lifecycle() {
    let (_db, _gateway, components) = setup().await;
    let sweeper = build_sweeper(&components, &config());

    assert!(sweeper.start().await);
    assert!(!sweeper.start().await);
    assert!(sweeper.stop().await);
    assert!(!sweeper.is_running().await);
}
