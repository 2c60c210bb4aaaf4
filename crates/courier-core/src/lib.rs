//! # courier-core
//!
//! Core types, traits, and abstractions for the courier notification engine.
//!
//! This crate provides the domain model (notifications, audiences, delivery
//! reports), the error taxonomy, the real-time push channel, and the trait
//! seam to the external user directory that the other courier crates depend
//! on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod push;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{
    Audience, DeliveryReport, Notification, NotificationKind, NotificationTemplate, Recipient,
    UserRole,
};
pub use push::{PushChannel, PushMessage};
pub use traits::UserDirectory;
pub use uuid_utils::{is_v7, new_v7};
