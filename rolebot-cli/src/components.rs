//! Component factory: builds every long-lived service from config. Isolates assembly from the runner.

use crate::config::BotConfig;
use anyhow::{Context, Result};
use handler_chain::HandlerChain;
use handlers::{
    ActivityHandler, AdminCommandHandler, LoggingHandler, MembershipHandler,
    NicknameCommandHandler, ProfanityFilter, ProfanityHandler,
};
use role_service::{InactivitySweeper, MessageJanitor, RoleLifecycleManager};
use rolebot_core::{ChatGateway, MemberEventHandler};
use rolebot_telegram::TelegramGateway;
use std::sync::Arc;
use storage::{AuditSink, Database, RoleHistoryLog, UserStore};
use tracing::{info, instrument, warn};

/// The bot's own account.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub id: i64,
    pub username: Option<String>,
}

/// Shared services produced by [`build_bot_components`].
#[derive(Clone)]
pub struct BotComponents {
    pub db: Database,
    pub users: Arc<dyn UserStore>,
    pub audit: Arc<dyn AuditSink>,
    pub gateway: Arc<dyn ChatGateway>,
    pub lifecycle: Arc<RoleLifecycleManager>,
    pub janitor: MessageJanitor,
    pub filter: Arc<ProfanityFilter>,
    pub identity: BotIdentity,
}

#[instrument(skip(config, db, gateway))]
pub async fn build_bot_components(
    config: &BotConfig,
    db: Database,
    gateway: Arc<dyn ChatGateway>,
    identity: BotIdentity,
) -> Result<BotComponents> {
    let users: Arc<dyn UserStore> = Arc::new(db.users.clone());
    let history: Arc<dyn RoleHistoryLog> = Arc::new(db.history.clone());
    let audit: Arc<dyn AuditSink> = Arc::new(db.audit.clone());

    let lifecycle = Arc::new(RoleLifecycleManager::new(
        users.clone(),
        history,
        audit.clone(),
        gateway.clone(),
        config.lifecycle_config(),
    ));
    let janitor = MessageJanitor::new(gateway.clone(), config.ephemeral_delay());

    let filter = ProfanityFilter::load(&db.words)
        .await
        .context("Failed to load profanity words")?;
    if !filter.is_loaded() {
        warn!("Profanity word list is empty; run `rolebot words load <file>` to fill it");
    }

    info!(
        bot_id = identity.id,
        admins = config.admin_ids.len(),
        "step: components built"
    );

    Ok(BotComponents {
        db,
        users,
        audit,
        gateway,
        lifecycle,
        janitor,
        filter: Arc::new(filter),
        identity,
    })
}

/// Chain order: logging, activity, profanity, nickname commands, admin commands.
pub fn build_handler_chain(components: &BotComponents, config: &BotConfig) -> HandlerChain {
    let username = components.identity.username.clone();
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(ActivityHandler::new(
            components.users.clone(),
            components.lifecycle.clone(),
        )))
        .add_handler(Arc::new(ProfanityHandler::new(
            components.filter.clone(),
            components.users.clone(),
            components.audit.clone(),
            components.gateway.clone(),
            components.janitor.clone(),
        )))
        .add_handler(Arc::new(NicknameCommandHandler::new(
            components.users.clone(),
            components.lifecycle.clone(),
            components.janitor.clone(),
            username.clone(),
        )))
        .add_handler(Arc::new(AdminCommandHandler::new(
            config.admin_ids.clone(),
            components.users.clone(),
            components.lifecycle.clone(),
            components.gateway.clone(),
            config.activity_timeout_minutes,
            username,
        )))
}

pub fn build_member_handler(components: &BotComponents) -> Arc<dyn MemberEventHandler> {
    Arc::new(MembershipHandler::new(
        components.identity.id,
        components.users.clone(),
        components.audit.clone(),
        components.lifecycle.clone(),
        components.janitor.clone(),
    ))
}

pub fn build_sweeper(components: &BotComponents, config: &BotConfig) -> InactivitySweeper {
    InactivitySweeper::new(
        components.users.clone(),
        components.lifecycle.clone(),
        config.sweeper_config(),
    )
}

/// Convenience for the runner: the Telegram gateway as the trait object the services use.
pub fn telegram_gateway(bot: teloxide::Bot) -> Arc<dyn ChatGateway> {
    Arc::new(TelegramGateway::new(bot))
}
