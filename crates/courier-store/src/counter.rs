//! Per-(tenant, user) unread counter over the store's atomic increment.
//!
//! Counters are created lazily on first increment and never explicitly
//! destroyed: an absent key reads as zero. The counter and the feed list
//! are updated as a pair but not transactionally, so the counter is never
//! allowed to go negative here, and reconciliation recomputes it from the
//! feed's true unread count instead of trusting counter history.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use courier_core::Result;

use crate::keys;
use crate::store::FeedStore;

/// Manager for unread counters.
#[derive(Clone)]
pub struct CounterManager {
    store: Arc<dyn FeedStore>,
}

impl CounterManager {
    pub fn new(store: Arc<dyn FeedStore>) -> Self {
        Self { store }
    }

    /// Increment the unread counter, creating it at 1 if absent.
    pub async fn increment(&self, tenant_id: Uuid, user_id: Uuid) -> Result<i64> {
        self.store
            .increment(&keys::unread(tenant_id, user_id), 1)
            .await
    }

    /// Decrement the unread counter, flooring at zero.
    ///
    /// Callers decrement at most once per notification (on its unread→read
    /// transition or its deletion while unread). Decrementing an absent or
    /// zero counter means feed and counter drifted; that is a logged
    /// inconsistency, not an error, and the key is reset to zero.
    pub async fn decrement(&self, tenant_id: Uuid, user_id: Uuid) -> Result<i64> {
        let key = keys::unread(tenant_id, user_id);
        let value = self.store.increment(&key, -1).await?;
        if value < 0 {
            warn!(
                %tenant_id,
                %user_id,
                counter = value,
                "Unread counter underflow, resetting to zero"
            );
            self.store.delete(&key).await?;
            return Ok(0);
        }
        Ok(value)
    }

    /// Reset the counter to zero by deleting the key.
    pub async fn reset(&self, tenant_id: Uuid, user_id: Uuid) -> Result<()> {
        self.store.delete(&keys::unread(tenant_id, user_id)).await
    }

    /// Overwrite the counter with a recomputed value (feed reconciliation).
    pub async fn reconcile(&self, tenant_id: Uuid, user_id: Uuid, value: i64) -> Result<()> {
        let key = keys::unread(tenant_id, user_id);
        self.store.delete(&key).await?;
        if value > 0 {
            self.store.increment(&key, value).await?;
        }
        Ok(())
    }

    /// Current counter value; absent or unparseable reads as zero.
    pub async fn read(&self, tenant_id: Uuid, user_id: Uuid) -> Result<i64> {
        let key = keys::unread(tenant_id, user_id);
        match self.store.get(&key).await? {
            None => Ok(0),
            Some(raw) => match raw.parse::<i64>() {
                Ok(value) => Ok(value.max(0)),
                Err(_) => {
                    warn!(%tenant_id, %user_id, %raw, "Unread counter holds a non-integer value, reading as zero");
                    Ok(0)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFeedStore;

    fn counters() -> CounterManager {
        CounterManager::new(Arc::new(MemoryFeedStore::new()))
    }

    #[tokio::test]
    async fn test_absent_counter_reads_zero() {
        let counters = counters();
        assert_eq!(
            counters.read(Uuid::new_v4(), Uuid::new_v4()).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_increment_creates_lazily() {
        let counters = counters();
        let (tenant, user) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(counters.increment(tenant, user).await.unwrap(), 1);
        assert_eq!(counters.increment(tenant, user).await.unwrap(), 2);
        assert_eq!(counters.read(tenant, user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_decrement_floors_at_zero() {
        let counters = counters();
        let (tenant, user) = (Uuid::new_v4(), Uuid::new_v4());

        // Decrementing an absent counter is an inconsistency, not an error
        assert_eq!(counters.decrement(tenant, user).await.unwrap(), 0);
        assert_eq!(counters.read(tenant, user).await.unwrap(), 0);

        counters.increment(tenant, user).await.unwrap();
        assert_eq!(counters.decrement(tenant, user).await.unwrap(), 0);
        assert_eq!(counters.decrement(tenant, user).await.unwrap(), 0);
        assert_eq!(counters.read(tenant, user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_never_negative_under_mixed_operations() {
        let counters = counters();
        let (tenant, user) = (Uuid::new_v4(), Uuid::new_v4());

        for _ in 0..3 {
            counters.increment(tenant, user).await.unwrap();
        }
        for _ in 0..10 {
            counters.decrement(tenant, user).await.unwrap();
            assert!(counters.read(tenant, user).await.unwrap() >= 0);
        }
        counters.reset(tenant, user).await.unwrap();
        assert_eq!(counters.read(tenant, user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reset_and_reconcile() {
        let counters = counters();
        let (tenant, user) = (Uuid::new_v4(), Uuid::new_v4());

        for _ in 0..5 {
            counters.increment(tenant, user).await.unwrap();
        }
        counters.reset(tenant, user).await.unwrap();
        assert_eq!(counters.read(tenant, user).await.unwrap(), 0);

        counters.reconcile(tenant, user, 3).await.unwrap();
        assert_eq!(counters.read(tenant, user).await.unwrap(), 3);

        counters.reconcile(tenant, user, 0).await.unwrap();
        assert_eq!(counters.read(tenant, user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_counters_are_independent_across_users() {
        let counters = counters();
        let tenant = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        counters.increment(tenant, alice).await.unwrap();
        counters.increment(tenant, alice).await.unwrap();
        counters.increment(tenant, bob).await.unwrap();

        assert_eq!(counters.read(tenant, alice).await.unwrap(), 2);
        assert_eq!(counters.read(tenant, bob).await.unwrap(), 1);
    }
}
