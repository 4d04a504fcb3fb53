//! User record model for persistence.
//!
//! Maps to the `users` table; one row per platform user, scoped to the chat stored in `chat_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub user_id: i64,
    pub chat_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Last requested custom title; kept while the role is pending re-confirmation.
    pub nickname: Option<String>,
    /// True only after the platform confirmed administrator status.
    pub role_assigned: bool,
    pub is_blocked: bool,
    pub last_activity: Option<DateTime<Utc>>,
    pub warnings_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role state derived from a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
    /// No nickname, no role.
    None,
    /// Platform confirmed the role.
    Active,
    /// Nickname requested but the role is not confirmed; retried when the user is next active.
    Degraded,
}

impl UserRecord {
    /// Creates a record first seen now, with no nickname and no role.
    pub fn new(
        user_id: i64,
        chat_id: i64,
        username: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            chat_id,
            username,
            first_name,
            last_name,
            nickname: None,
            role_assigned: false,
            is_blocked: false,
            last_activity: Some(now),
            warnings_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role_state(&self) -> RoleState {
        match (self.role_assigned, self.nickname.is_some()) {
            (true, _) => RoleState::Active,
            (false, true) => RoleState::Degraded,
            (false, false) => RoleState::None,
        }
    }

    /// Whether the next observed activity should retry the role assignment.
    pub fn needs_role_restore(&self) -> bool {
        self.role_state() == RoleState::Degraded && !self.is_blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_state() {
        let mut record = UserRecord::new(1, -100, None, Some("Ann".into()), None);
        assert_eq!(record.role_state(), RoleState::None);
        assert!(!record.needs_role_restore());

        record.nickname = Some("Scout".into());
        assert_eq!(record.role_state(), RoleState::Degraded);
        assert!(record.needs_role_restore());

        record.is_blocked = true;
        assert!(!record.needs_role_restore());

        record.role_assigned = true;
        assert_eq!(record.role_state(), RoleState::Active);
    }
}
