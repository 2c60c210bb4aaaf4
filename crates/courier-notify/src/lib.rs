//! # courier-notify
//!
//! Fan-out delivery for the courier notification engine.
//!
//! This crate provides:
//! - [`AudienceResolver`]: addressing mode → concrete recipient set
//! - [`FanoutDispatcher`]: bounded-concurrency per-recipient delivery with
//!   partial-failure isolation
//! - [`NotificationService`]: the facade the HTTP/API layer consumes
//!
//! ## Example
//!
//! ```rust,ignore
//! use courier_core::{NotificationKind, NotificationTemplate};
//!
//! let report = service
//!     .notify_tenant(
//!         tenant_id,
//!         NotificationTemplate::new(NotificationKind::BillingAlert, "Invoice overdue", "..."),
//!     )
//!     .await?;
//! println!("delivered {} / failed {}", report.delivered, report.failed);
//! ```

pub mod dispatcher;
pub mod resolver;
pub mod service;

pub use dispatcher::{DispatcherConfig, FanoutDispatcher};
pub use resolver::AudienceResolver;
pub use service::NotificationService;
