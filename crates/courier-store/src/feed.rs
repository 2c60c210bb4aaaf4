//! Notification feed repository: the durable per-user feed and its
//! read/query API.
//!
//! The feed for a (tenant, user) pair is a newest-first list of
//! notification IDs plus one JSON record per notification for direct,
//! ownership-validated lookups. Every feed write refreshes the retention
//! TTL on both. Feed reads skip IDs whose record has already expired and
//! lazily prune them from the list, so eviction never resurrects an entry.
//!
//! The feed list and the unread counter are two pieces of state updated by
//! two operations, not one transaction. Brief divergence is tolerated;
//! `mark_all_read` and `delete_all` reconcile the counter from the feed's
//! true unread count.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use courier_core::{defaults, Error, Notification, Result};

use crate::counter::CounterManager;
use crate::keys;
use crate::store::FeedStore;

/// Feed repository configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `FEED_RETENTION_DAYS` | `30` | Age-based feed retention window |
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Retention window applied as TTL on feed lists and records.
    pub retention: Duration,
    /// Hard cap on requested page sizes.
    pub page_size_max: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            retention: Duration::from_secs(defaults::FEED_RETENTION_SECS),
            page_size_max: defaults::PAGE_SIZE_MAX,
        }
    }
}

impl FeedConfig {
    /// Create config from environment variables (with defaults).
    pub fn from_env() -> Self {
        let retention_days = std::env::var("FEED_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::FEED_RETENTION_DAYS)
            .max(1);

        Self {
            retention: Duration::from_secs(retention_days * 24 * 60 * 60),
            ..Self::default()
        }
    }

    /// Override the retention window.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }
}

/// Read/query repository over feeds, records, and unread counters.
#[derive(Clone)]
pub struct NotificationFeed {
    store: Arc<dyn FeedStore>,
    counters: CounterManager,
    config: FeedConfig,
}

impl NotificationFeed {
    pub fn new(store: Arc<dyn FeedStore>, config: FeedConfig) -> Self {
        let counters = CounterManager::new(store.clone());
        Self {
            store,
            counters,
            config,
        }
    }

    /// The counter manager sharing this feed's store.
    pub fn counters(&self) -> &CounterManager {
        &self.counters
    }

    /// Write one notification to its recipient's feed.
    ///
    /// Stores the per-ID record and prepends the ID to the feed list, both
    /// with a refreshed retention TTL. IDs are freshly generated per
    /// delivery, so the feed cannot contain duplicates.
    pub async fn push(&self, notification: &Notification) -> Result<()> {
        let record = serde_json::to_string(notification)?;
        self.store
            .put(&keys::record(notification.id), &record, self.config.retention)
            .await?;
        self.store
            .prepend(
                &keys::feed(notification.tenant_id, notification.recipient_id),
                &notification.id.to_string(),
                self.config.retention,
            )
            .await
    }

    /// Direct record lookup; `None` if unknown or already evicted.
    pub async fn load(&self, notification_id: Uuid) -> Result<Option<Notification>> {
        match self.store.get(&keys::record(notification_id)).await? {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    /// Unread feed entries, newest first.
    pub async fn get_unread(&self, tenant_id: Uuid, user_id: Uuid) -> Result<Vec<Notification>> {
        let all = self.walk(tenant_id, user_id, 0, -1).await?;
        Ok(all.into_iter().filter(|n| !n.is_read()).collect())
    }

    /// One page of the full feed, newest first. Pages are zero-based; a
    /// size of zero falls back to the default, and sizes are clamped to the
    /// configured maximum. Out-of-range pages are empty, not an error.
    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        page: usize,
        size: usize,
    ) -> Result<Vec<Notification>> {
        let size = if size == 0 {
            defaults::PAGE_SIZE
        } else {
            size.min(self.config.page_size_max)
        };
        let start = (page * size) as isize;
        let stop = start + size as isize - 1;
        self.walk(tenant_id, user_id, start, stop).await
    }

    /// Mark a notification read on behalf of its recipient.
    ///
    /// Idempotent: marking an already-read notification is a no-op, and an
    /// unknown or evicted ID already satisfies the intent, so both return
    /// `Ok(false)`. The unread counter is decremented exactly once, guarded
    /// by the record's current read state.
    pub async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<bool> {
        let Some(notification) = self.load(notification_id).await? else {
            return Ok(false);
        };
        self.check_ownership(&notification, user_id)?;
        self.transition_read(notification, user_id).await
    }

    /// Administrative override: mark read on behalf of another user.
    /// `read_by` records the acting user.
    pub async fn mark_read_by(&self, notification_id: Uuid, actor_id: Uuid) -> Result<bool> {
        let Some(notification) = self.load(notification_id).await? else {
            return Ok(false);
        };
        self.transition_read(notification, actor_id).await
    }

    /// Mark every unread entry in the current feed snapshot read, then
    /// reset the counter to zero.
    ///
    /// Reset rather than per-item decrement: notifications arriving mid-walk
    /// would otherwise drift the counter. Returns how many entries
    /// transitioned.
    pub async fn mark_all_read(&self, tenant_id: Uuid, user_id: Uuid) -> Result<usize> {
        let snapshot = self.walk(tenant_id, user_id, 0, -1).await?;
        let mut marked = 0;
        for mut notification in snapshot {
            if notification.mark_read(user_id) {
                let record = serde_json::to_string(&notification)?;
                self.store
                    .put(&keys::record(notification.id), &record, self.config.retention)
                    .await?;
                marked += 1;
            }
        }
        self.counters.reset(tenant_id, user_id).await?;
        Ok(marked)
    }

    /// Remove one notification from its recipient's feed.
    ///
    /// Unknown or evicted IDs are success (`Ok(false)`): the end state
    /// matches intent. Deleting a still-unread entry decrements the
    /// counter.
    pub async fn delete(&self, notification_id: Uuid, user_id: Uuid) -> Result<bool> {
        let Some(notification) = self.load(notification_id).await? else {
            return Ok(false);
        };
        self.check_ownership(&notification, user_id)?;

        let feed_key = keys::feed(notification.tenant_id, notification.recipient_id);
        self.store
            .remove_value(&feed_key, &notification.id.to_string())
            .await?;
        self.store.delete(&keys::record(notification.id)).await?;

        if !notification.is_read() {
            self.counters
                .decrement(notification.tenant_id, notification.recipient_id)
                .await?;
        }
        Ok(true)
    }

    /// Remove every entry in the current feed snapshot, then reconcile the
    /// counter against whatever the feed holds afterwards (notifications
    /// fanned out concurrently with the sweep survive, and the counter is
    /// recomputed rather than decremented per removed item).
    pub async fn delete_all(&self, tenant_id: Uuid, user_id: Uuid) -> Result<usize> {
        let snapshot = self.walk(tenant_id, user_id, 0, -1).await?;
        let feed_key = keys::feed(tenant_id, user_id);
        for notification in &snapshot {
            self.store
                .remove_value(&feed_key, &notification.id.to_string())
                .await?;
            self.store.delete(&keys::record(notification.id)).await?;
        }

        let remaining_unread = self.get_unread(tenant_id, user_id).await?.len() as i64;
        self.counters
            .reconcile(tenant_id, user_id, remaining_unread)
            .await?;
        Ok(snapshot.len())
    }

    /// Total feed length (including read entries).
    pub async fn count(&self, tenant_id: Uuid, user_id: Uuid) -> Result<i64> {
        self.store
            .list_len(&keys::feed(tenant_id, user_id))
            .await
    }

    /// Unread counter value.
    pub async fn unread_count(&self, tenant_id: Uuid, user_id: Uuid) -> Result<i64> {
        self.counters.read(tenant_id, user_id).await
    }

    /// Walk a slice of the feed list, resolving IDs to records. IDs whose
    /// record expired are skipped and pruned from the list.
    async fn walk(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        start: isize,
        stop: isize,
    ) -> Result<Vec<Notification>> {
        let feed_key = keys::feed(tenant_id, user_id);
        let ids = self.store.range(&feed_key, start, stop).await?;

        let mut notifications = Vec::with_capacity(ids.len());
        for raw_id in ids {
            let Ok(id) = raw_id.parse::<Uuid>() else {
                warn!(%tenant_id, %user_id, %raw_id, "Feed list holds a non-UUID entry, pruning");
                self.store.remove_value(&feed_key, &raw_id).await?;
                continue;
            };
            match self.load(id).await? {
                Some(notification) => notifications.push(notification),
                None => {
                    debug!(%tenant_id, %user_id, notification_id = %id, "Pruning evicted feed entry");
                    self.store.remove_value(&feed_key, &raw_id).await?;
                }
            }
        }
        Ok(notifications)
    }

    fn check_ownership(&self, notification: &Notification, user_id: Uuid) -> Result<()> {
        if notification.recipient_id != user_id {
            warn!(
                notification_id = %notification.id,
                owner = %notification.recipient_id,
                %user_id,
                "Rejected mutation of another user's notification"
            );
            return Err(Error::OwnershipMismatch {
                notification_id: notification.id,
                user_id,
            });
        }
        Ok(())
    }

    async fn transition_read(&self, mut notification: Notification, actor_id: Uuid) -> Result<bool> {
        if !notification.mark_read(actor_id) {
            return Ok(false);
        }
        let record = serde_json::to_string(&notification)?;
        self.store
            .put(&keys::record(notification.id), &record, self.config.retention)
            .await?;
        self.counters
            .decrement(notification.tenant_id, notification.recipient_id)
            .await?;
        Ok(true)
    }
}
