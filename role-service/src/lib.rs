//! # role-service
//!
//! Role lifecycle for chat members: [`RoleLifecycleManager`] assigns, restores and removes the
//! administrator title; [`InactivitySweeper`] removes it from silent users on a timer;
//! [`MessageJanitor`] deletes transient notifications after a delay.

mod config;
mod error;
mod janitor;
mod lifecycle;
mod locks;
mod nickname;
mod retry;
mod sweeper;

pub use config::{LifecycleConfig, SweeperConfig, DEFAULT_EPHEMERAL_DELAY};
pub use error::LifecycleError;
pub use janitor::MessageJanitor;
pub use lifecycle::{AssignOutcome, DeferReason, RemoveOutcome, RoleLifecycleManager};
pub use locks::{UserLockGuard, UserLocks};
pub use nickname::{Nickname, MAX_TITLE_CHARS};
pub use retry::{retry_with, RetryPolicy};
pub use sweeper::{InactivitySweeper, SweepReport};
