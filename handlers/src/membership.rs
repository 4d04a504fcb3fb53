//! Join and leave events.

use crate::support::{audit, storage_error};
use async_trait::async_trait;
use chrono::Utc;
use rolebot_core::{MemberEventHandler, MemberUpdate, Result};
use role_service::{MessageJanitor, RoleLifecycleManager};
use std::sync::Arc;
use storage::{AuditSink, RemovalReason, UserRecord, UserStore};
use tracing::{debug, error, info, instrument};

/// Creates records for newcomers, restores pending roles on rejoin and removes roles on leave.
pub struct MembershipHandler {
    bot_id: i64,
    users: Arc<dyn UserStore>,
    audit: Arc<dyn AuditSink>,
    lifecycle: Arc<RoleLifecycleManager>,
    janitor: MessageJanitor,
}

impl MembershipHandler {
    pub fn new(
        bot_id: i64,
        users: Arc<dyn UserStore>,
        audit: Arc<dyn AuditSink>,
        lifecycle: Arc<RoleLifecycleManager>,
        janitor: MessageJanitor,
    ) -> Self {
        Self {
            bot_id,
            users,
            audit,
            lifecycle,
            janitor,
        }
    }

    async fn on_join(&self, update: &MemberUpdate) -> Result<()> {
        let user = &update.user;
        let chat_id = update.chat.id;

        let existing = self.users.get(user.id).await.map_err(storage_error)?;
        if existing.is_some() {
            info!(user_id = user.id, chat_id, "Known user rejoined");
            self.users
                .touch_activity(user.id, Some(chat_id), Utc::now())
                .await
                .map_err(storage_error)?;
            match self.lifecycle.restore(user.id, chat_id).await {
                Ok(outcome) => debug!(user_id = user.id, outcome = ?outcome, "Restore on rejoin"),
                Err(e) => error!(user_id = user.id, error = %e, "Restore on rejoin failed"),
            }
            return Ok(());
        }

        info!(user_id = user.id, chat_id, name = %user.display_name(), "New member joined");
        let record = UserRecord::new(
            user.id,
            chat_id,
            user.username.clone(),
            user.first_name.clone(),
            user.last_name.clone(),
        );
        self.users
            .create_if_absent(&record)
            .await
            .map_err(storage_error)?;

        if let Err(e) = self
            .janitor
            .send_ephemeral(chat_id, &format!("🖐 Welcome, {}!", user.display_name()))
            .await
        {
            error!(user_id = user.id, error = %e, "Failed to send welcome message");
        }

        audit(
            self.audit.as_ref(),
            user.id,
            "new_member",
            "User joined the chat".to_string(),
        )
        .await;
        Ok(())
    }

    async fn on_leave(&self, update: &MemberUpdate) -> Result<()> {
        let user_id = update.user.id;
        let chat_id = update.chat.id;
        info!(user_id, chat_id, status = update.new_status.as_str(), "Member left");

        match self
            .lifecycle
            .remove(user_id, chat_id, RemovalReason::LeftChat)
            .await
        {
            Ok(outcome) => debug!(user_id, outcome = ?outcome, "Remove on leave"),
            Err(e) => error!(user_id, error = %e, "Remove on leave failed"),
        }

        audit(
            self.audit.as_ref(),
            user_id,
            "member_left",
            "User left the chat".to_string(),
        )
        .await;
        Ok(())
    }
}

#[async_trait]
impl MemberEventHandler for MembershipHandler {
    #[instrument(skip(self, update), fields(user_id = update.user.id, chat_id = update.chat.id))]
    async fn on_member_update(&self, update: &MemberUpdate) -> Result<()> {
        if update.user.id == self.bot_id {
            return Ok(());
        }
        if update.is_join() {
            self.on_join(update).await
        } else if update.is_leave() {
            self.on_leave(update).await
        } else {
            debug!(
                old = update.old_status.as_str(),
                new = update.new_status.as_str(),
                "Membership change ignored"
            );
            Ok(())
        }
    }
}
