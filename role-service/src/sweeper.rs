//! Inactivity sweeper: a background loop removing roles of silent users.
//!
//! Each tick lists role holders whose last activity is older than the timeout and removes them
//! one after another through [`RoleLifecycleManager::remove_if_inactive`]. Stopping waits for the
//! tick in progress to finish.

use crate::config::SweeperConfig;
use crate::lifecycle::{RemoveOutcome, RoleLifecycleManager};
use chrono::Utc;
use std::sync::Arc;
use storage::UserStore;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

/// Result of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Expired role holders found.
    pub expired: usize,
    pub removed: usize,
    pub failed: usize,
}

struct Running {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
struct SweepContext {
    users: Arc<dyn UserStore>,
    lifecycle: Arc<RoleLifecycleManager>,
    inactivity_timeout: chrono::Duration,
}

impl SweepContext {
    async fn sweep_once(&self) -> SweepReport {
        let cutoff = Utc::now() - self.inactivity_timeout;
        let mut report = SweepReport::default();

        let expired = match self.users.list_expired(cutoff).await {
            Ok(expired) => expired,
            Err(e) => {
                error!(error = %e, "Failed to list inactive users");
                return report;
            }
        };
        report.expired = expired.len();

        for record in expired {
            match self
                .lifecycle
                .remove_if_inactive(record.user_id, cutoff)
                .await
            {
                Ok(RemoveOutcome::Removed) => {
                    info!(
                        user_id = record.user_id,
                        chat_id = record.chat_id,
                        "Removed role for inactivity"
                    );
                    report.removed += 1;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(user_id = record.user_id, error = %e, "Inactivity removal failed");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Periodic inactivity scan. `STOPPED -> RUNNING` on [`start`](Self::start), back on [`stop`](Self::stop).
pub struct InactivitySweeper {
    context: SweepContext,
    period: std::time::Duration,
    running: Mutex<Option<Running>>,
}

impl InactivitySweeper {
    pub fn new(
        users: Arc<dyn UserStore>,
        lifecycle: Arc<RoleLifecycleManager>,
        config: SweeperConfig,
    ) -> Self {
        let inactivity_timeout = chrono::Duration::from_std(config.inactivity_timeout)
            .unwrap_or_else(|_| chrono::Duration::days(365));
        Self {
            context: SweepContext {
                users,
                lifecycle,
                inactivity_timeout,
            },
            period: config.period,
            running: Mutex::new(None),
        }
    }

    /// Spawns the loop. Returns false (and does nothing) when already running.
    pub async fn start(&self) -> bool {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return false;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let context = self.context.clone();
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), "step: sweeper started");

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        let report = context.sweep_once().await;
                        if report.expired > 0 {
                            info!(
                                expired = report.expired,
                                removed = report.removed,
                                failed = report.failed,
                                "step: sweep finished"
                            );
                        }
                    }
                }
            }

            info!("step: sweeper stopped");
        });

        *running = Some(Running { shutdown, handle });
        true
    }

    /// Signals the loop and waits for it to exit, including a sweep in progress.
    /// Returns false when it was not running.
    pub async fn stop(&self) -> bool {
        let Some(Running { shutdown, handle }) = self.running.lock().await.take() else {
            return false;
        };
        let _ = shutdown.send(true);
        if let Err(e) = handle.await {
            error!(error = %e, "Sweeper task ended abnormally");
        }
        true
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Runs one sweep now, independent of the loop.
    #[instrument(skip(self))]
    pub async fn sweep_once(&self) -> SweepReport {
        self.context.sweep_once().await
    }
}
