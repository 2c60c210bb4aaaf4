//! Structured logging schema and field name constants for courier.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem. Tenant/user/notification identity is always an explicit
//! field on the event; there is no ambient logging context.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue (per-recipient failure, counter underflow) |
//! | INFO  | Fan-out completions, lifecycle events |
//! | DEBUG | Decision points, cache/topic housekeeping |
//! | TRACE | Per-entry iteration during feed walks |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "store", "counter", "resolver", "dispatcher", "push", "feed"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "dispatch", "mark_read", "delete_all", "publish"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Tenant UUID the operation is scoped to.
pub const TENANT_ID: &str = "tenant_id";

/// User UUID the operation is scoped to.
pub const USER_ID: &str = "user_id";

/// Notification UUID being operated on.
pub const NOTIFICATION_ID: &str = "notification_id";

/// Notification kind (kebab-case wire name).
pub const KIND: &str = "kind";

// ─── Fan-out fields ────────────────────────────────────────────────────────

/// Number of recipients the audience resolved to.
pub const RECIPIENT_COUNT: &str = "recipient_count";

/// Number of recipients delivered successfully.
pub const DELIVERED: &str = "delivered";

/// Number of recipients that failed and were skipped.
pub const FAILED: &str = "failed";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
