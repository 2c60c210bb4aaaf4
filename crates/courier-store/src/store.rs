//! Feed store contract and the Redis adapter.
//!
//! The trait captures exactly what the notification engine needs from an
//! expiring key-value backend: set-with-expiry, list prepend/range/remove,
//! key deletion, atomic increment, and existence checks. Any backend
//! failure surfaces as [`Error::StoreUnavailable`]; retry policy belongs to
//! the caller (the fan-out dispatcher isolates per-recipient failures, read
//! paths propagate).

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use courier_core::{Error, Result};

/// Expiring key-value store backing feeds, counters, and records.
///
/// List writes always refresh the list TTL so an active user's feed does
/// not expire mid-use; a feed with no writes for the retention window is
/// fully evictable.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Set a value with an expiry.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Fetch a value; `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Prepend to a list and refresh the list's TTL.
    async fn prepend(&self, list_key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Inclusive range over a list. Negative indices count from the end,
    /// `-1` being the last element.
    async fn range(&self, list_key: &str, start: isize, stop: isize) -> Result<Vec<String>>;

    /// Remove all occurrences of a value from a list.
    async fn remove_value(&self, list_key: &str, value: &str) -> Result<()>;

    /// Delete a key (value or list). Deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Atomically add `delta` to an integer key, returning the new value.
    /// An absent key counts as zero.
    async fn increment(&self, key: &str, delta: i64) -> Result<i64>;

    /// Whether a key currently exists.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Length of a list; zero if absent.
    async fn list_len(&self, list_key: &str) -> Result<i64>;
}

/// Redis-backed feed store.
///
/// ## Configuration
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `REDIS_URL` | `redis://localhost:6379` | Redis connection URL |
#[derive(Clone)]
pub struct RedisFeedStore {
    conn: ConnectionManager,
}

impl RedisFeedStore {
    /// Connect to Redis at the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| Error::Config(format!("invalid Redis URL: {e}")))?;
        let conn = ConnectionManager::new(client).await?;
        info!(
            url = %url.replace(|c: char| c.is_ascii_alphanumeric(), "*"),
            "Connected to Redis feed store"
        );
        Ok(Self { conn })
    }

    /// Connect using `REDIS_URL` from the environment.
    pub async fn from_env() -> Result<Self> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        Self::connect(&url).await
    }

    fn connection(&self) -> ConnectionManager {
        // ConnectionManager multiplexes; a clone is a cheap handle.
        self.conn.clone()
    }
}

#[async_trait]
impl FeedStore for RedisFeedStore {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection();
        let value = conn.get::<_, Option<String>>(key).await?;
        Ok(value)
    }

    async fn prepend(&self, list_key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection();
        redis::pipe()
            .lpush(list_key, value)
            .ignore()
            .expire(list_key, ttl.as_secs() as i64)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn range(&self, list_key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let mut conn = self.connection();
        let items = conn.lrange::<_, Vec<String>>(list_key, start, stop).await?;
        Ok(items)
    }

    async fn remove_value(&self, list_key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection();
        conn.lrem::<_, _, ()>(list_key, 0, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        let mut conn = self.connection();
        let value = conn.incr::<_, _, i64>(key, delta).await?;
        Ok(value)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection();
        let present = conn.exists::<_, bool>(key).await?;
        Ok(present)
    }

    async fn list_len(&self, list_key: &str) -> Result<i64> {
        let mut conn = self.connection();
        let len = conn.llen::<_, i64>(list_key).await?;
        Ok(len)
    }
}
