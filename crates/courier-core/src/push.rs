//! Real-time push channel for per-user notification topics.
//!
//! Each (tenant, user) pair gets its own broadcast topic, created lazily on
//! first subscribe. Publishing is best-effort and non-blocking: the
//! dispatcher publishes only after the durable feed write succeeds, and a
//! missing or empty topic simply drops the message; the feed is the
//! authoritative fallback for pull-based reads. Slow receivers that fall
//! behind the topic buffer receive a `Lagged` error and miss messages;
//! freshness matters more than completeness here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::defaults;
use crate::models::{Notification, NotificationKind};

/// Wire view of a notification as delivered to live sessions.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for PushMessage {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            title: n.title.clone(),
            body: n.body.clone(),
            created_at: n.created_at,
        }
    }
}

/// Per-user topic registry over `tokio::sync::broadcast`.
pub struct PushChannel {
    topics: RwLock<HashMap<(Uuid, Uuid), broadcast::Sender<PushMessage>>>,
    capacity: usize,
}

impl Default for PushChannel {
    fn default() -> Self {
        Self::new(defaults::PUSH_TOPIC_CAPACITY)
    }
}

impl PushChannel {
    /// Create a push channel with the given per-topic buffer capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Subscribe a live session to a user's topic, creating it if needed.
    ///
    /// Each subscriber gets an independent stream.
    pub async fn subscribe(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> broadcast::Receiver<PushMessage> {
        let mut topics = self.topics.write().await;
        let tx = topics.entry((tenant_id, user_id)).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.capacity);
            tx
        });
        tx.subscribe()
    }

    /// Best-effort publish to the recipient's topic.
    ///
    /// No topic or no live receivers means the message is dropped. Topics
    /// whose receivers have all disconnected are pruned here.
    pub async fn publish(&self, notification: &Notification) {
        let key = (notification.tenant_id, notification.recipient_id);

        let tx = {
            let topics = self.topics.read().await;
            topics.get(&key).cloned()
        };

        let Some(tx) = tx else {
            return;
        };

        if tx.receiver_count() == 0 {
            let mut topics = self.topics.write().await;
            // Re-check under the write lock: a session may have subscribed
            // between the two lock acquisitions.
            if let Some(current) = topics.get(&key) {
                if current.receiver_count() == 0 {
                    topics.remove(&key);
                    tracing::debug!(
                        tenant_id = %key.0,
                        user_id = %key.1,
                        "Pruned push topic with no receivers"
                    );
                    return;
                }
            }
        }

        tracing::debug!(
            tenant_id = %notification.tenant_id,
            user_id = %notification.recipient_id,
            notification_id = %notification.id,
            subscriber_count = tx.receiver_count(),
            "Push publish"
        );
        let _ = tx.send(PushMessage::from(notification));
    }

    /// Number of live subscribers on a user's topic.
    pub async fn subscriber_count(&self, tenant_id: Uuid, user_id: Uuid) -> usize {
        let topics = self.topics.read().await;
        topics
            .get(&(tenant_id, user_id))
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Number of registered topics (monitoring/tests).
    pub async fn topic_count(&self) -> usize {
        self.topics.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationTemplate;

    fn sample_notification(tenant_id: Uuid, user_id: Uuid) -> Notification {
        let template = NotificationTemplate::new(
            NotificationKind::MessageReceived,
            "New message",
            "A customer replied",
        );
        Notification::from_template(&template, tenant_id, user_id)
    }

    #[tokio::test]
    async fn test_subscribe_then_publish() {
        let channel = PushChannel::new(16);
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();

        let mut rx = channel.subscribe(tenant, user).await;
        let n = sample_notification(tenant, user);
        channel.publish(&n).await;

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.id, n.id);
        assert_eq!(msg.kind, NotificationKind::MessageReceived);
        assert_eq!(msg.title, "New message");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let channel = PushChannel::new(16);
        let n = sample_notification(Uuid::new_v4(), Uuid::new_v4());
        // No topic exists; must not panic or block
        channel.publish(&n).await;
        assert_eq!(channel.topic_count().await, 0);
    }

    #[tokio::test]
    async fn test_topics_are_isolated_per_user() {
        let channel = PushChannel::new(16);
        let tenant = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let mut alice_rx = channel.subscribe(tenant, alice).await;
        let mut bob_rx = channel.subscribe(tenant, bob).await;

        channel.publish(&sample_notification(tenant, alice)).await;

        let msg = alice_rx.recv().await.unwrap();
        assert_eq!(msg.title, "New message");
        assert!(matches!(
            bob_rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_multiple_subscribers_same_user() {
        let channel = PushChannel::new(16);
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();

        let mut rx1 = channel.subscribe(tenant, user).await;
        let mut rx2 = channel.subscribe(tenant, user).await;
        assert_eq!(channel.subscriber_count(tenant, user).await, 2);

        let n = sample_notification(tenant, user);
        channel.publish(&n).await;

        assert_eq!(rx1.recv().await.unwrap().id, n.id);
        assert_eq!(rx2.recv().await.unwrap().id, n.id);
    }

    #[tokio::test]
    async fn test_dead_topic_is_pruned_on_publish() {
        let channel = PushChannel::new(16);
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();

        let rx = channel.subscribe(tenant, user).await;
        assert_eq!(channel.topic_count().await, 1);
        drop(rx);

        channel.publish(&sample_notification(tenant, user)).await;
        assert_eq!(channel.topic_count().await, 0);
    }

    #[tokio::test]
    async fn test_lagged_receiver_misses_messages() {
        let channel = PushChannel::new(2);
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();

        let mut rx = channel.subscribe(tenant, user).await;
        for _ in 0..5 {
            channel.publish(&sample_notification(tenant, user)).await;
        }

        let result = rx.recv().await;
        assert!(result.is_ok() || matches!(result, Err(broadcast::error::RecvError::Lagged(_))));
    }

    #[test]
    fn test_push_message_wire_shape() {
        let n = sample_notification(Uuid::new_v4(), Uuid::new_v4());
        let msg = PushMessage::from(&n);
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["kind"], "message-received");
        assert!(parsed["id"].is_string());
        assert!(parsed["created_at"].is_string());
        // Recipient identity is not leaked onto the wire
        assert!(parsed.get("recipient_id").is_none());
        assert!(parsed.get("tenant_id").is_none());
    }
}
