//! Fan-out dispatcher: one logical notification → many per-user deliveries.
//!
//! For each resolved recipient the dispatcher constructs a fresh
//! notification, writes it durably (feed entry + counter increment), and
//! only then publishes to the push channel, so a live client never sees a
//! notification that would vanish on refresh. Recipients are processed in
//! bounded-concurrency batches with a per-recipient timeout; one bad
//! delivery is logged and skipped, never aborting the batch. A fan-out to
//! hundreds of tenant users therefore degrades, it does not fail.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use courier_core::{
    defaults, Audience, DeliveryReport, Notification, NotificationTemplate, PushChannel, Recipient,
    Result, UserDirectory,
};
use courier_store::NotificationFeed;

use crate::resolver::AudienceResolver;

/// Configuration for the fan-out dispatcher.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `NOTIFY_MAX_CONCURRENT` | `8` | Max concurrent per-recipient deliveries |
/// | `NOTIFY_RECIPIENT_TIMEOUT_SECS` | `5` | Per-recipient delivery timeout |
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Maximum concurrent per-recipient deliveries.
    pub max_concurrent: usize,
    /// Per-recipient delivery timeout.
    pub recipient_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::FANOUT_MAX_CONCURRENT,
            recipient_timeout: Duration::from_secs(defaults::RECIPIENT_TIMEOUT_SECS),
        }
    }
}

impl DispatcherConfig {
    /// Create config from environment variables (with defaults).
    pub fn from_env() -> Self {
        let max_concurrent = std::env::var("NOTIFY_MAX_CONCURRENT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults::FANOUT_MAX_CONCURRENT)
            .max(1);

        let recipient_timeout_secs = std::env::var("NOTIFY_RECIPIENT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::RECIPIENT_TIMEOUT_SECS);

        Self {
            max_concurrent,
            recipient_timeout: Duration::from_secs(recipient_timeout_secs),
        }
    }

    /// Set maximum concurrent deliveries.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// Set the per-recipient timeout.
    pub fn with_recipient_timeout(mut self, timeout: Duration) -> Self {
        self.recipient_timeout = timeout;
        self
    }
}

/// Dispatches one notification template to a resolved audience.
pub struct FanoutDispatcher {
    feed: NotificationFeed,
    push: Arc<PushChannel>,
    resolver: AudienceResolver,
    config: DispatcherConfig,
}

impl FanoutDispatcher {
    pub fn new(
        feed: NotificationFeed,
        push: Arc<PushChannel>,
        directory: Arc<dyn UserDirectory>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            feed,
            push,
            resolver: AudienceResolver::new(directory),
            config,
        }
    }

    /// Fan the template out to every recipient the audience resolves to.
    ///
    /// Returns delivery counts; partial failure is reported, not raised.
    /// Only total resolution failure is an error. Cancelling the returned
    /// future stops scheduling further recipients; deliveries that already
    /// completed stay committed.
    pub async fn dispatch(
        &self,
        audience: Audience,
        template: NotificationTemplate,
    ) -> Result<DeliveryReport> {
        let start = Instant::now();
        let recipients = self.resolver.resolve(&audience).await?;

        if recipients.is_empty() {
            debug!(mode = audience.mode(), "Audience resolved to nobody, nothing to deliver");
            return Ok(DeliveryReport::default());
        }

        let mut report = DeliveryReport::default();
        for batch in recipients.chunks(self.config.max_concurrent) {
            let mut tasks = JoinSet::new();
            for recipient in batch {
                let feed = self.feed.clone();
                let push = self.push.clone();
                let template = template.clone();
                let recipient = *recipient;
                let per_recipient = self.config.recipient_timeout;

                tasks.spawn(async move {
                    let outcome =
                        timeout(per_recipient, deliver_one(feed, push, &template, recipient)).await;
                    match outcome {
                        Ok(Ok(())) => true,
                        Ok(Err(e)) => {
                            warn!(
                                tenant_id = %recipient.tenant_id,
                                user_id = %recipient.user_id,
                                kind = %template.kind,
                                error = %e,
                                "Delivery failed, skipping recipient"
                            );
                            false
                        }
                        Err(_) => {
                            warn!(
                                tenant_id = %recipient.tenant_id,
                                user_id = %recipient.user_id,
                                kind = %template.kind,
                                timeout_secs = per_recipient.as_secs(),
                                "Delivery timed out, skipping recipient"
                            );
                            false
                        }
                    }
                });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(true) => report.delivered += 1,
                    Ok(false) => report.failed += 1,
                    Err(e) => {
                        error!(error = ?e, "Delivery task panicked");
                        report.failed += 1;
                    }
                }
            }
        }

        info!(
            mode = audience.mode(),
            kind = %template.kind,
            recipient_count = recipients.len(),
            delivered = report.delivered,
            failed = report.failed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Fan-out complete"
        );
        Ok(report)
    }
}

/// Deliver to a single recipient: durable writes first, push last.
async fn deliver_one(
    feed: NotificationFeed,
    push: Arc<PushChannel>,
    template: &NotificationTemplate,
    recipient: Recipient,
) -> Result<()> {
    let notification =
        Notification::from_template(template, recipient.tenant_id, recipient.user_id);

    feed.push(&notification).await?;
    feed.counters()
        .increment(recipient.tenant_id, recipient.user_id)
        .await?;

    // Best-effort, after the durable write succeeded
    push.publish(&notification).await;
    Ok(())
}
