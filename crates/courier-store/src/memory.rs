//! In-memory feed store for tests and local development.
//!
//! Mirrors the Redis adapter's semantics, including Redis-style inclusive
//! list ranges with negative indexing. Expiry is tracked per key and
//! enforced lazily: an entry past its deadline behaves as absent on the
//! next access.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use courier_core::Result;

use crate::store::FeedStore;

struct ValueEntry {
    value: String,
    expires_at: Option<Instant>,
}

struct ListEntry {
    items: Vec<String>,
    expires_at: Option<Instant>,
}

#[derive(Default)]
struct Inner {
    values: HashMap<String, ValueEntry>,
    lists: HashMap<String, ListEntry>,
}

/// Mutex-guarded in-process [`FeedStore`].
#[derive(Default)]
pub struct MemoryFeedStore {
    inner: Mutex<Inner>,
}

impl MemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn expired(expires_at: Option<Instant>) -> bool {
    matches!(expires_at, Some(deadline) if deadline <= Instant::now())
}

/// Redis LRANGE index handling: negative indices count from the end,
/// bounds are inclusive and clamped.
fn range_bounds(start: isize, stop: isize, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let len = len as isize;
    let start = (if start < 0 { start + len } else { start }).max(0);
    let stop = (if stop < 0 { stop + len } else { stop }).min(len - 1);
    if start > stop {
        return None;
    }
    Some((start as usize, stop as usize))
}

impl Inner {
    fn evict_expired(&mut self, key: &str) {
        if self.values.get(key).is_some_and(|e| expired(e.expires_at)) {
            self.values.remove(key);
        }
        if self.lists.get(key).is_some_and(|e| expired(e.expires_at)) {
            self.lists.remove(key);
        }
    }
}

#[async_trait]
impl FeedStore for MemoryFeedStore {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.values.insert(
            key.to_string(),
            ValueEntry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.evict_expired(key);
        Ok(inner.values.get(key).map(|e| e.value.clone()))
    }

    async fn prepend(&self, list_key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.evict_expired(list_key);
        let entry = inner.lists.entry(list_key.to_string()).or_insert(ListEntry {
            items: Vec::new(),
            expires_at: None,
        });
        entry.items.insert(0, value.to_string());
        entry.expires_at = Some(Instant::now() + ttl);
        Ok(())
    }

    async fn range(&self, list_key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.evict_expired(list_key);
        let Some(entry) = inner.lists.get(list_key) else {
            return Ok(Vec::new());
        };
        Ok(match range_bounds(start, stop, entry.items.len()) {
            Some((lo, hi)) => entry.items[lo..=hi].to_vec(),
            None => Vec::new(),
        })
    }

    async fn remove_value(&self, list_key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.evict_expired(list_key);
        if let Some(entry) = inner.lists.get_mut(list_key) {
            entry.items.retain(|item| item != value);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.values.remove(key);
        inner.lists.remove(key);
        Ok(())
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.evict_expired(key);
        let entry = inner.values.entry(key.to_string()).or_insert(ValueEntry {
            value: "0".to_string(),
            expires_at: None,
        });
        let current: i64 = entry.value.parse().unwrap_or(0);
        let next = current + delta;
        entry.value = next.to_string();
        Ok(next)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.evict_expired(key);
        Ok(inner.values.contains_key(key) || inner.lists.contains_key(key))
    }

    async fn list_len(&self, list_key: &str) -> Result<i64> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.evict_expired(list_key);
        Ok(inner.lists.get(list_key).map(|e| e.items.len()).unwrap_or(0) as i64)
    }
}
