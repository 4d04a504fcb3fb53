//! Role lifecycle: assign, restore and remove the administrator title of a chat member.
//!
//! Every transition of one user runs under that user's lock. Platform failures never reach the
//! caller; they degrade the record (role requested, not confirmed) and the next observed activity
//! retries through [`RoleLifecycleManager::restore`]. Only user store failures are surfaced.

use crate::config::LifecycleConfig;
use crate::error::LifecycleError;
use crate::locks::UserLocks;
use crate::nickname::Nickname;
use crate::retry::retry_with;
use chrono::{DateTime, Utc};
use rolebot_core::{AdminPermissions, ChatGateway, GatewayError, MemberStatus};
use std::sync::Arc;
use storage::{AuditEntry, AuditSink, RemovalReason, RoleHistoryLog, UserRecord, UserStore};
use tracing::{error, info, instrument, warn};

/// Why an assignment was accepted but not applied on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferReason {
    /// The bot is not an administrator with the promote right, or its rights could not be read.
    MissingRights,
    /// The promotion call failed.
    PromotionFailed,
    /// The promotion succeeded but the member is still not shown as administrator.
    NotConfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    /// Promotion confirmed and a new history interval opened.
    Active { title_applied: bool },
    /// Role already held; only the title changed.
    Retitled { title_applied: bool },
    /// Nickname stored, role pending until the next retry.
    Deferred(DeferReason),
    /// Nothing to do.
    Unchanged,
}

impl AssignOutcome {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            AssignOutcome::Active { .. } | AssignOutcome::Retitled { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The record held no role.
    AlreadyRemoved,
    /// Inactivity removal skipped: the user was active after the cutoff.
    StillActive,
    UserNotFound,
}

/// Owns every role transition. Collaborators are injected at construction.
pub struct RoleLifecycleManager {
    users: Arc<dyn UserStore>,
    history: Arc<dyn RoleHistoryLog>,
    audit: Arc<dyn AuditSink>,
    gateway: Arc<dyn ChatGateway>,
    config: LifecycleConfig,
    locks: UserLocks,
}

impl RoleLifecycleManager {
    pub fn new(
        users: Arc<dyn UserStore>,
        history: Arc<dyn RoleHistoryLog>,
        audit: Arc<dyn AuditSink>,
        gateway: Arc<dyn ChatGateway>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            users,
            history,
            audit,
            gateway,
            config,
            locks: UserLocks::new(),
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Requests the role with title `nickname` for an existing user record.
    ///
    /// Titles longer than the platform limit are truncated; the truncated value is what gets stored.
    #[instrument(skip(self))]
    pub async fn assign(
        &self,
        user_id: i64,
        chat_id: i64,
        nickname: &str,
    ) -> Result<AssignOutcome, LifecycleError> {
        let nickname = Nickname::parse(nickname)?;
        let _guard = self.locks.lock(user_id).await;

        let record = self
            .users
            .get(user_id)
            .await?
            .ok_or(LifecycleError::UserNotFound(user_id))?;
        self.assign_locked(record, chat_id, &nickname).await
    }

    /// Retries a pending role with the stored nickname. No-op unless the record has a nickname,
    /// no role and is not blocked.
    #[instrument(skip(self))]
    pub async fn restore(
        &self,
        user_id: i64,
        chat_id: i64,
    ) -> Result<AssignOutcome, LifecycleError> {
        let _guard = self.locks.lock(user_id).await;

        let Some(record) = self.users.get(user_id).await? else {
            return Ok(AssignOutcome::Unchanged);
        };
        if !record.needs_role_restore() {
            return Ok(AssignOutcome::Unchanged);
        }
        let Some(nickname) = record
            .nickname
            .as_deref()
            .and_then(|n| Nickname::parse(n).ok())
        else {
            return Ok(AssignOutcome::Unchanged);
        };

        info!(user_id, chat_id, nickname = %nickname, "step: restoring pending role");
        self.assign_locked(record, chat_id, &nickname).await
    }

    /// Revokes the role. Idempotent: a record without a role is left untouched.
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        user_id: i64,
        chat_id: i64,
        reason: RemovalReason,
    ) -> Result<RemoveOutcome, LifecycleError> {
        let _guard = self.locks.lock(user_id).await;

        let Some(record) = self.users.get(user_id).await? else {
            warn!(user_id, "Remove requested for unknown user");
            return Ok(RemoveOutcome::UserNotFound);
        };
        self.remove_locked(record, chat_id, reason).await
    }

    /// Inactivity removal: re-checks under the lock that the user is still silent since before
    /// `cutoff`, so a message arriving mid-sweep keeps the role.
    #[instrument(skip(self))]
    pub async fn remove_if_inactive(
        &self,
        user_id: i64,
        cutoff: DateTime<Utc>,
    ) -> Result<RemoveOutcome, LifecycleError> {
        let _guard = self.locks.lock(user_id).await;

        let Some(record) = self.users.get(user_id).await? else {
            return Ok(RemoveOutcome::UserNotFound);
        };
        let still_inactive = record.last_activity.is_some_and(|at| at < cutoff);
        if !still_inactive {
            info!(user_id, "User became active during sweep, keeping role");
            return Ok(RemoveOutcome::StillActive);
        }
        let chat_id = record.chat_id;
        self.remove_locked(record, chat_id, RemovalReason::Inactivity)
            .await
    }

    async fn assign_locked(
        &self,
        mut record: UserRecord,
        chat_id: i64,
        nickname: &Nickname,
    ) -> Result<AssignOutcome, LifecycleError> {
        let user_id = record.user_id;
        record.chat_id = chat_id;

        if record.role_assigned {
            record.nickname = Some(nickname.to_string());
            self.users.put(&record).await?;
            let title_applied = self.apply_title(chat_id, user_id, nickname).await;
            self.audit(
                user_id,
                "nickname_updated",
                format!("Nickname changed to '{}'", nickname),
            )
            .await;
            info!(user_id, chat_id, nickname = %nickname, title_applied, "step: role retitled");
            return Ok(AssignOutcome::Retitled { title_applied });
        }

        match self.gateway.bot_rights(chat_id).await {
            Ok(rights) if rights.can_assign_roles() => {}
            Ok(rights) => {
                warn!(
                    chat_id,
                    status = rights.status.as_str(),
                    can_promote_members = rights.can_promote_members,
                    "Bot cannot promote members, deferring role"
                );
                return self
                    .defer(record, nickname, DeferReason::MissingRights)
                    .await;
            }
            Err(e) => {
                warn!(chat_id, error = %e, "Failed to read bot rights, deferring role");
                return self
                    .defer(record, nickname, DeferReason::MissingRights)
                    .await;
            }
        }

        if !self.member_status(chat_id, user_id).await.is_privileged() {
            if let Err(e) = self
                .gateway
                .promote(chat_id, user_id, &AdminPermissions::title_only())
                .await
            {
                warn!(user_id, chat_id, error = %e, "Promotion failed, deferring role");
                return self
                    .defer(record, nickname, DeferReason::PromotionFailed)
                    .await;
            }

            tokio::time::sleep(self.config.settle_delay).await;

            let status = self.member_status(chat_id, user_id).await;
            if !status.is_privileged() {
                warn!(
                    user_id,
                    chat_id,
                    status = status.as_str(),
                    "Promotion not confirmed after settle delay"
                );
                return self
                    .defer(record, nickname, DeferReason::NotConfirmed)
                    .await;
            }
        }

        record.nickname = Some(nickname.to_string());
        record.role_assigned = true;
        self.users.put(&record).await?;

        let title_applied = self.apply_title(chat_id, user_id, nickname).await;

        self.audit(
            user_id,
            "role_assigned",
            format!("Role '{}' assigned", nickname),
        )
        .await;
        if let Err(e) = self
            .history
            .open_entry(user_id, nickname.as_str(), Utc::now())
            .await
        {
            error!(user_id, error = %e, "Failed to open role history entry");
        }

        info!(user_id, chat_id, nickname = %nickname, title_applied, "step: role assigned");
        Ok(AssignOutcome::Active { title_applied })
    }

    async fn defer(
        &self,
        mut record: UserRecord,
        nickname: &Nickname,
        reason: DeferReason,
    ) -> Result<AssignOutcome, LifecycleError> {
        record.nickname = Some(nickname.to_string());
        record.role_assigned = false;
        self.users.put(&record).await?;
        info!(
            user_id = record.user_id,
            chat_id = record.chat_id,
            reason = ?reason,
            "step: role deferred"
        );
        Ok(AssignOutcome::Deferred(reason))
    }

    async fn remove_locked(
        &self,
        mut record: UserRecord,
        chat_id: i64,
        reason: RemovalReason,
    ) -> Result<RemoveOutcome, LifecycleError> {
        let user_id = record.user_id;
        if !record.role_assigned {
            return Ok(RemoveOutcome::AlreadyRemoved);
        }

        // Creators cannot be demoted; plain members have nothing to revoke.
        if self.member_status(chat_id, user_id).await == MemberStatus::Administrator {
            if let Err(e) = self.gateway.demote(chat_id, user_id).await {
                warn!(user_id, chat_id, error = %e, "Demotion failed, clearing role locally");
            }
        }

        record.role_assigned = false;
        self.users.put(&record).await?;

        match self
            .history
            .close_open_entries(user_id, Utc::now(), reason)
            .await
        {
            Ok(0) => warn!(user_id, "Role removed but no open history entry was found"),
            Ok(1) => {}
            Ok(closed) => warn!(user_id, closed, "Closed several open history entries"),
            Err(e) => error!(user_id, error = %e, "Failed to close role history entry"),
        }

        self.audit(user_id, "role_removed", format!("Role removed: {}", reason))
            .await;
        info!(user_id, chat_id, reason = %reason, "step: role removed");
        Ok(RemoveOutcome::Removed)
    }

    /// Sets the custom title, retrying only while the member is not yet visible as administrator.
    async fn apply_title(&self, chat_id: i64, user_id: i64, nickname: &Nickname) -> bool {
        let gateway = self.gateway.as_ref();
        let title = nickname.as_str();
        let result = retry_with(
            &self.config.title_retry,
            "set_custom_title",
            move || gateway.set_custom_title(chat_id, user_id, title),
            GatewayError::is_not_yet_admin,
        )
        .await;
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(user_id, chat_id, error = %e, "Custom title not applied");
                false
            }
        }
    }

    async fn member_status(&self, chat_id: i64, user_id: i64) -> MemberStatus {
        match self.gateway.member_status(chat_id, user_id).await {
            Ok(status) => status,
            Err(e) => {
                warn!(user_id, chat_id, error = %e, "Failed to read member status");
                MemberStatus::Unknown
            }
        }
    }

    async fn audit(&self, user_id: i64, action: &str, details: String) {
        if let Err(e) = self
            .audit
            .append(&AuditEntry::new(user_id, action, Some(details)))
            .await
        {
            error!(user_id, action, error = %e, "Failed to write audit entry");
        }
    }
}
