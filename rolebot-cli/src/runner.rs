use crate::components::{
    build_bot_components, build_handler_chain, build_member_handler, build_sweeper,
    telegram_gateway, BotIdentity,
};
use crate::config::BotConfig;
use anyhow::{Context, Result};
use rolebot_core::{init_tracing, ChatGateway};
use rolebot_telegram::run_dispatcher;
use storage::Database;
use teloxide::prelude::Requester;
use tracing::{info, instrument, warn};

/// Main entry: validate config, init logging, build components, start the sweeper, then poll
/// updates until Ctrl-C. The sweeper is stopped (in-flight sweep awaited) before returning.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        timeout_minutes = config.activity_timeout_minutes,
        sweep_interval_secs = config.sweep_interval_secs,
        "Initializing bot"
    );

    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    let bot = config.telegram().build_bot()?;
    let identity = resolve_identity(&bot, &config).await;
    let gateway = telegram_gateway(bot.clone());

    if let Some(chat_id) = config.chat_id {
        log_chat_rights(gateway.as_ref(), chat_id).await;
    }

    let components = build_bot_components(&config, db, gateway, identity).await?;
    let handler_chain = build_handler_chain(&components, &config);
    let member_handler = build_member_handler(&components);
    let sweeper = build_sweeper(&components, &config);

    sweeper.start().await;
    info!("Bot started successfully");

    run_dispatcher(bot, handler_chain, member_handler).await;

    info!("step: shutting down");
    sweeper.stop().await;
    info!("Bot stopped");
    Ok(())
}

/// Falls back to the id in the token prefix when `getMe` fails.
async fn resolve_identity(bot: &teloxide::Bot, config: &BotConfig) -> BotIdentity {
    match bot.get_me().await {
        Ok(me) => {
            let identity = BotIdentity {
                id: me.user.id.0 as i64,
                username: me.user.username.clone(),
            };
            info!(
                bot_id = identity.id,
                username = %identity.username.as_deref().unwrap_or("unknown"),
                "Bot identity"
            );
            identity
        }
        Err(e) => {
            let id = config.token_bot_id().unwrap_or_default();
            warn!(error = %e, bot_id = id, "getMe failed, using the id from the token");
            BotIdentity { id, username: None }
        }
    }
}

async fn log_chat_rights(gateway: &dyn ChatGateway, chat_id: i64) {
    match gateway.bot_rights(chat_id).await {
        Ok(rights) if rights.can_assign_roles() => info!(
            chat_id,
            status = rights.status.as_str(),
            "Bot can promote members in the home chat"
        ),
        Ok(rights) => warn!(
            chat_id,
            status = rights.status.as_str(),
            can_promote_members = rights.can_promote_members,
            "Bot cannot promote members in the home chat; titles will stay pending"
        ),
        Err(e) => warn!(chat_id, error = %e, "Failed to read bot rights in the home chat"),
    }
}
