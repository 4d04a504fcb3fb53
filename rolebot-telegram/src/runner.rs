//! Update dispatcher: group text messages go through the [`HandlerChain`], chat-member updates
//! go to the [`MemberEventHandler`].

use crate::adapters::{to_member_update, TelegramMessageWrapper};
use handler_chain::HandlerChain;
use rolebot_core::{MemberEventHandler, ToCoreMessage};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ChatMemberUpdated;
use tracing::{debug, error, info, instrument};

/// Runs long polling until Ctrl-C.
#[instrument(skip(bot, handler_chain, member_handler))]
pub async fn run_dispatcher(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    member_handler: Arc<dyn MemberEventHandler>,
) {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_chat_member().endpoint(on_chat_member));

    info!("step: dispatcher starting");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![handler_chain, member_handler])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    info!("step: dispatcher stopped");
}

async fn on_message(msg: Message, chain: HandlerChain) -> ResponseResult<()> {
    let core_msg = TelegramMessageWrapper(&msg).to_core();
    if msg.text().is_none() || !core_msg.chat.is_group() {
        debug!(
            chat_id = core_msg.chat.id,
            chat_type = %core_msg.chat.chat_type,
            "Skipping non-text or non-group message"
        );
        return Ok(());
    }

    tokio::spawn(async move {
        info!(
            user_id = core_msg.user.id,
            chat_id = core_msg.chat.id,
            message_id = %core_msg.id,
            "step: processing message (handler chain started)"
        );
        if let Err(e) = chain.handle(&core_msg).await {
            error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
        }
    });
    Ok(())
}

async fn on_chat_member(
    update: ChatMemberUpdated,
    member_handler: Arc<dyn MemberEventHandler>,
) -> ResponseResult<()> {
    let core_update = to_member_update(&update);
    info!(
        user_id = core_update.user.id,
        chat_id = core_update.chat.id,
        old = core_update.old_status.as_str(),
        new = core_update.new_status.as_str(),
        "Chat member update"
    );
    tokio::spawn(async move {
        if let Err(e) = member_handler.on_member_update(&core_update).await {
            error!(error = %e, user_id = core_update.user.id, "Member update failed");
        }
    });
    Ok(())
}
