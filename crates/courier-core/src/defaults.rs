//! Centralized default constants for the courier notification engine.
//!
//! **This module is the single source of truth** for all shared default
//! values. The other courier crates reference these constants instead of
//! defining their own magic numbers.

// =============================================================================
// RETENTION
// =============================================================================

/// Age-based feed retention window in days. Feeds and per-notification
/// records with no writes for this long are fully evictable.
pub const FEED_RETENTION_DAYS: u64 = 30;

/// Retention window in seconds (what the store TTL operations consume).
pub const FEED_RETENTION_SECS: u64 = FEED_RETENTION_DAYS * 24 * 60 * 60;

// =============================================================================
// FAN-OUT
// =============================================================================

/// Maximum concurrent per-recipient deliveries during a fan-out batch.
pub const FANOUT_MAX_CONCURRENT: usize = 8;

/// Per-recipient delivery timeout in seconds. A recipient exceeding this is
/// counted as failed and the dispatcher moves on.
pub const RECIPIENT_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// PUSH CHANNEL
// =============================================================================

/// Broadcast buffer capacity per (tenant, user) push topic. Slow receivers
/// beyond this lag and miss messages; the durable feed is authoritative.
pub const PUSH_TOPIC_CAPACITY: usize = 16;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for feed reads.
pub const PAGE_SIZE: usize = 50;

/// Maximum page size a caller may request for feed reads.
pub const PAGE_SIZE_MAX: usize = 200;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_secs_matches_days() {
        assert_eq!(FEED_RETENTION_SECS, FEED_RETENTION_DAYS * 86_400);
    }

    #[test]
    fn test_page_size_within_max() {
        assert!(PAGE_SIZE <= PAGE_SIZE_MAX);
    }
}
