//! Per-user async mutexes serializing role transitions.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<i64, Arc<Mutex<()>>>;

/// Lock table keyed by user id. An entry lives while a guard or a waiter holds it and is evicted
/// when the last guard drops, so the table only holds users with a transition in flight.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<LockTable>,
}

/// Holds one user's lock. Dropping it releases the lock and evicts the idle entry.
pub struct UserLockGuard {
    user_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<LockTable>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and holds the lock of `user_id` until the guard drops.
    pub async fn lock(&self, user_id: i64) -> UserLockGuard {
        // Cloned under the shard lock, so eviction never sees a count of 1 while we wait.
        let mutex = self.inner.entry(user_id).or_default().value().clone();
        let guard = mutex.lock_owned().await;
        UserLockGuard {
            user_id,
            guard: Some(guard),
            table: self.inner.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        // The guard owns one reference to the mutex; release it before checking the count.
        drop(self.guard.take());
        self.table
            .remove_if(&self.user_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let locks = UserLocks::new();
        let guard = locks.lock(1).await;

        let other = locks.clone();
        let waiter = tokio::spawn(async move {
            let _g = other.lock(1).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_users_do_not_block() {
        let locks = UserLocks::new();
        let _first = locks.lock(1).await;
        let _second = locks.lock(2).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_entries_are_evicted() {
        let locks = UserLocks::new();
        for user_id in 0..100 {
            let _guard = locks.lock(user_id).await;
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_kept_while_a_waiter_holds_it() {
        let locks = UserLocks::new();
        let guard = locks.lock(1).await;

        let other = locks.clone();
        let waiter = tokio::spawn(async move {
            let _g = other.lock(1).await;
            tokio::time::sleep(Duration::from_millis(10)).await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
