//! Timing settings for the lifecycle manager, sweeper and janitor.

use crate::retry::RetryPolicy;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Pause after a promotion before its status is re-read.
    pub settle_delay: Duration,
    /// Custom title retries while the promotion is not yet visible.
    pub title_retry: RetryPolicy,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(2),
            title_retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweeperConfig {
    /// Time between sweeps.
    pub period: Duration,
    /// Role holders silent for longer than this lose the role.
    pub inactivity_timeout: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(60),
            inactivity_timeout: Duration::from_secs(5 * 60),
        }
    }
}

/// Default delay before an ephemeral notification is deleted.
pub const DEFAULT_EPHEMERAL_DELAY: Duration = Duration::from_secs(5);
