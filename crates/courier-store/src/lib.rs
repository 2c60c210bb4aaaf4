//! # courier-store
//!
//! Expiring feed storage for the courier notification engine.
//!
//! This crate provides:
//! - The [`FeedStore`] trait: set-with-expiry, list prepend/range/remove,
//!   atomic increment, all over namespaced keys
//! - [`RedisFeedStore`], the production adapter over a Redis backend
//! - [`MemoryFeedStore`], an in-process implementation for tests and local
//!   development
//! - [`CounterManager`], the per-(tenant, user) unread counter
//! - [`NotificationFeed`], the read/query repository over feeds, counters,
//!   and per-notification records
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use courier_store::{FeedConfig, NotificationFeed, RedisFeedStore};
//!
//! #[tokio::main]
//! async fn main() -> courier_core::Result<()> {
//!     let store = Arc::new(RedisFeedStore::connect("redis://localhost:6379").await?);
//!     let feed = NotificationFeed::new(store, FeedConfig::from_env());
//!
//!     let unread = feed.get_unread(tenant_id, user_id).await?;
//!     println!("{} unread notifications", unread.len());
//!     Ok(())
//! }
//! ```

pub mod counter;
pub mod feed;
pub mod keys;
pub mod memory;
pub mod store;

pub use counter::CounterManager;
pub use feed::{FeedConfig, NotificationFeed};
pub use memory::MemoryFeedStore;
pub use store::{FeedStore, RedisFeedStore};
