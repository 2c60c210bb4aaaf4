//! Notification service facade consumed by the HTTP/API layer.
//!
//! Bundles the fan-out entry points, the feed read/query API, and live
//! push subscriptions behind one handle. The HTTP layer supplies tenant and
//! user IDs; authentication and request validation happen before calls
//! reach this service.

use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use courier_core::{
    Audience, DeliveryReport, Notification, NotificationTemplate, PushChannel, PushMessage,
    Result, UserDirectory, UserRole,
};
use courier_store::{FeedConfig, FeedStore, NotificationFeed};

use crate::dispatcher::{DispatcherConfig, FanoutDispatcher};

/// One handle over the whole notification engine.
#[derive(Clone)]
pub struct NotificationService {
    feed: NotificationFeed,
    push: Arc<PushChannel>,
    dispatcher: Arc<FanoutDispatcher>,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn FeedStore>,
        directory: Arc<dyn UserDirectory>,
        feed_config: FeedConfig,
        dispatcher_config: DispatcherConfig,
    ) -> Self {
        let feed = NotificationFeed::new(store, feed_config);
        let push = Arc::new(PushChannel::default());
        let dispatcher = Arc::new(FanoutDispatcher::new(
            feed.clone(),
            push.clone(),
            directory,
            dispatcher_config,
        ));
        Self {
            feed,
            push,
            dispatcher,
        }
    }

    /// Service with default configuration (env-driven defaults).
    pub fn with_defaults(store: Arc<dyn FeedStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self::new(
            store,
            directory,
            FeedConfig::from_env(),
            DispatcherConfig::from_env(),
        )
    }

    // ========== Fan-out entry points ==========

    /// Notify one user.
    pub async fn notify_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        template: NotificationTemplate,
    ) -> Result<DeliveryReport> {
        self.dispatcher
            .dispatch(Audience::Direct { tenant_id, user_id }, template)
            .await
    }

    /// Notify every user in a tenant.
    pub async fn notify_tenant(
        &self,
        tenant_id: Uuid,
        template: NotificationTemplate,
    ) -> Result<DeliveryReport> {
        self.dispatcher
            .dispatch(Audience::Tenant { tenant_id }, template)
            .await
    }

    /// Notify every user holding a role in a tenant.
    pub async fn notify_role(
        &self,
        tenant_id: Uuid,
        role: UserRole,
        template: NotificationTemplate,
    ) -> Result<DeliveryReport> {
        self.dispatcher
            .dispatch(Audience::Role { tenant_id, role }, template)
            .await
    }

    // ========== Read/query API ==========

    pub async fn get_unread(&self, tenant_id: Uuid, user_id: Uuid) -> Result<Vec<Notification>> {
        self.feed.get_unread(tenant_id, user_id).await
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        page: usize,
        size: usize,
    ) -> Result<Vec<Notification>> {
        self.feed.get_page(tenant_id, user_id, page, size).await
    }

    pub async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<bool> {
        self.feed.mark_read(notification_id, user_id).await
    }

    /// Administrative override; `read_by` records the acting user.
    pub async fn mark_read_by(&self, notification_id: Uuid, actor_id: Uuid) -> Result<bool> {
        self.feed.mark_read_by(notification_id, actor_id).await
    }

    pub async fn mark_all_read(&self, tenant_id: Uuid, user_id: Uuid) -> Result<usize> {
        self.feed.mark_all_read(tenant_id, user_id).await
    }

    pub async fn delete(&self, notification_id: Uuid, user_id: Uuid) -> Result<bool> {
        self.feed.delete(notification_id, user_id).await
    }

    pub async fn delete_all(&self, tenant_id: Uuid, user_id: Uuid) -> Result<usize> {
        self.feed.delete_all(tenant_id, user_id).await
    }

    pub async fn get_count(&self, tenant_id: Uuid, user_id: Uuid) -> Result<i64> {
        self.feed.count(tenant_id, user_id).await
    }

    pub async fn get_unread_count(&self, tenant_id: Uuid, user_id: Uuid) -> Result<i64> {
        self.feed.unread_count(tenant_id, user_id).await
    }

    // ========== Live sessions ==========

    /// Subscribe a live client session to its push topic.
    pub async fn subscribe(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> broadcast::Receiver<PushMessage> {
        self.push.subscribe(tenant_id, user_id).await
    }
}
