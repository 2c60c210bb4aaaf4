//! Domain model for the courier notification engine.
//!
//! A [`Notification`] is immutable except for its read state, which
//! transitions at most once from unset to set. Notification kinds and user
//! roles are closed enumerations validated at construction, never free
//! text inspected at read sites.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::uuid_utils::new_v7;

/// Notification event categories.
///
/// Serialized with kebab-case wire names, e.g. `"conversation-assigned"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// A support conversation was assigned to an agent.
    ConversationAssigned,
    /// A new message arrived on a conversation.
    MessageReceived,
    /// Platform-level alert (maintenance, incidents).
    SystemAlert,
    /// Billing/subscription alert for the tenant.
    BillingAlert,
}

impl NotificationKind {
    /// Returns the kebab-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ConversationAssigned => "conversation-assigned",
            NotificationKind::MessageReceived => "message-received",
            NotificationKind::SystemAlert => "system-alert",
            NotificationKind::BillingAlert => "billing-alert",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conversation-assigned" => Ok(NotificationKind::ConversationAssigned),
            "message-received" => Ok(NotificationKind::MessageReceived),
            "system-alert" => Ok(NotificationKind::SystemAlert),
            "billing-alert" => Ok(NotificationKind::BillingAlert),
            other => Err(Error::InvalidInput(format!(
                "unknown notification kind: {other}"
            ))),
        }
    }
}

/// User role within a tenant, used for role-targeted fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    Admin,
    Agent,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Agent => "agent",
            UserRole::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "agent" => Ok(UserRole::Agent),
            "viewer" => Ok(UserRole::Viewer),
            other => Err(Error::InvalidInput(format!("unknown user role: {other}"))),
        }
    }
}

/// A single notification delivered to one user's feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier (UUIDv7 for temporal ordering).
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub tenant_id: Uuid,
    pub recipient_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Absent until the notification is marked read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    /// Who marked it read: the recipient, except for administrative override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_by: Option<Uuid>,
}

impl Notification {
    /// Construct a fresh notification for one recipient from a template.
    pub fn from_template(
        template: &NotificationTemplate,
        tenant_id: Uuid,
        recipient_id: Uuid,
    ) -> Self {
        Self {
            id: new_v7(),
            kind: template.kind,
            title: template.title.clone(),
            body: template.body.clone(),
            tenant_id,
            recipient_id,
            created_at: Utc::now(),
            read_at: None,
            read_by: None,
        }
    }

    /// Whether the read transition has happened.
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Transition to read, at most once.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// notification was already read (the state is left untouched).
    pub fn mark_read(&mut self, actor: Uuid) -> bool {
        if self.read_at.is_some() {
            return false;
        }
        self.read_at = Some(Utc::now());
        self.read_by = Some(actor);
        true
    }
}

/// The caller-supplied content of a fan-out: what to deliver, not to whom.
#[derive(Debug, Clone)]
pub struct NotificationTemplate {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

impl NotificationTemplate {
    pub fn new(kind: NotificationKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Addressing mode for a fan-out call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// One specific user within a tenant.
    Direct { tenant_id: Uuid, user_id: Uuid },
    /// Every user in a tenant.
    Tenant { tenant_id: Uuid },
    /// Every user holding a role within a tenant.
    Role { tenant_id: Uuid, role: UserRole },
}

impl Audience {
    /// Short label for logging.
    pub fn mode(&self) -> &'static str {
        match self {
            Audience::Direct { .. } => "direct",
            Audience::Tenant { .. } => "tenant",
            Audience::Role { .. } => "role",
        }
    }
}

/// A resolved fan-out recipient. Transient, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recipient {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
}

/// Outcome of a fan-out call. Partial failure is reported here, not raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}
