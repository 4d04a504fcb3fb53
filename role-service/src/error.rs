use storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the role lifecycle. Gateway, history and audit failures are absorbed.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Invalid nickname: {0}")]
    InvalidNickname(String),

    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("User store unavailable: {0}")]
    Store(#[from] StorageError),
}

impl From<LifecycleError> for rolebot_core::RolebotError {
    fn from(err: LifecycleError) -> Self {
        rolebot_core::RolebotError::Lifecycle(err.to_string())
    }
}
