use thiserror::Error;

#[derive(Error, Debug)]
pub enum RolebotError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Role lifecycle error: {0}")]
    Lifecycle(String),
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Invalid message id: {0}")]
    InvalidMessageId(String),
}

/// Failure of a remote chat platform call, classified by how callers should react.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Target is not (yet) visible as an administrator. Title changes are retried on this.
    #[error("user is not an administrator: {0}")]
    NotAdministrator(String),

    /// The bot lacks the rights needed for the call.
    #[error("not enough rights: {0}")]
    Forbidden(String),

    /// Any other rejection by the platform.
    #[error("platform rejected request: {0}")]
    Api(String),

    /// Network failure or timeout.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Classifies a platform error description.
    pub fn classify(description: impl Into<String>) -> Self {
        let description = description.into();
        let lower = description.to_lowercase();
        if lower.contains("not an administrator") || lower.contains("user_not_admin") {
            GatewayError::NotAdministrator(description)
        } else if lower.contains("not enough rights")
            || lower.contains("chat_admin_required")
            || lower.contains("forbidden")
            || lower.contains("can't promote")
        {
            GatewayError::Forbidden(description)
        } else {
            GatewayError::Api(description)
        }
    }

    /// True when the call may succeed once promotion propagates.
    pub fn is_not_yet_admin(&self) -> bool {
        matches!(self, GatewayError::NotAdministrator(_))
    }
}

pub type Result<T> = std::result::Result<T, RolebotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_not_administrator() {
        let err = GatewayError::classify("Bad Request: user is not an administrator");
        assert!(err.is_not_yet_admin());

        let err = GatewayError::classify("Bad Request: USER_NOT_ADMIN");
        assert!(err.is_not_yet_admin());
    }

    #[test]
    fn test_classify_forbidden_and_other() {
        assert!(matches!(
            GatewayError::classify("Bad Request: not enough rights"),
            GatewayError::Forbidden(_)
        ));
        assert!(matches!(
            GatewayError::classify("Bad Request: chat not found"),
            GatewayError::Api(_)
        ));
        assert!(!GatewayError::Transport("timeout".into()).is_not_yet_admin());
    }
}
