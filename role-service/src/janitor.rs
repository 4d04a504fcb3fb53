//! Delayed deletion of transient notifications.

use rolebot_core::{ChatGateway, GatewayError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Deletes bot notifications after a fixed delay. Each deletion is its own task; pending
/// deletions are dropped on shutdown.
#[derive(Clone)]
pub struct MessageJanitor {
    gateway: Arc<dyn ChatGateway>,
    delay: Duration,
}

impl MessageJanitor {
    pub fn new(gateway: Arc<dyn ChatGateway>, delay: Duration) -> Self {
        Self { gateway, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Deletes `message_id` once after the delay. Failures are logged and dropped.
    pub fn schedule_delete(&self, chat_id: i64, message_id: i32) -> JoinHandle<()> {
        let gateway = self.gateway.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match gateway.delete_message(chat_id, message_id).await {
                Ok(()) => debug!(chat_id, message_id, "Ephemeral message deleted"),
                Err(e) => warn!(chat_id, message_id, error = %e, "Failed to delete ephemeral message"),
            }
        })
    }

    /// Sends `text` and schedules its deletion. Returns the sent message id.
    pub async fn send_ephemeral(&self, chat_id: i64, text: &str) -> Result<i32, GatewayError> {
        let message_id = self.gateway.send_message(chat_id, text).await?;
        self.schedule_delete(chat_id, message_id);
        Ok(message_id)
    }
}
