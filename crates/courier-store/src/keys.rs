//! Namespaced key layout for the feed store.
//!
//! Every key is scoped by tenant and user so no store operation can cross a
//! tenant boundary. Three key families cover the persisted state: the
//! per-user feed list, the per-user unread counter, and one record per
//! notification ID for ownership-validated direct lookups.

use uuid::Uuid;

/// Key namespace prefix for everything courier writes.
pub const PREFIX: &str = "courier";

/// Feed list key: list of notification IDs, newest first.
pub fn feed(tenant_id: Uuid, user_id: Uuid) -> String {
    format!("{PREFIX}:feed:{tenant_id}:{user_id}")
}

/// Unread counter key.
pub fn unread(tenant_id: Uuid, user_id: Uuid) -> String {
    format!("{PREFIX}:unread:{tenant_id}:{user_id}")
}

/// Per-notification record key for direct lookups.
pub fn record(notification_id: Uuid) -> String {
    format!("{PREFIX}:notif:{notification_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        let tenant = Uuid::nil();
        let user = Uuid::nil();
        assert_eq!(
            feed(tenant, user),
            format!("courier:feed:{tenant}:{user}")
        );
        assert_eq!(
            unread(tenant, user),
            format!("courier:unread:{tenant}:{user}")
        );
        assert_eq!(record(tenant), format!("courier:notif:{tenant}"));
    }

    #[test]
    fn test_keys_isolate_tenants() {
        let user = Uuid::new_v4();
        let t1 = Uuid::new_v4();
        let t2 = Uuid::new_v4();
        assert_ne!(feed(t1, user), feed(t2, user));
        assert_ne!(unread(t1, user), unread(t2, user));
    }

    #[test]
    fn test_keys_isolate_users() {
        let tenant = Uuid::new_v4();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        assert_ne!(feed(tenant, u1), feed(tenant, u2));
        assert_ne!(unread(tenant, u1), unread(tenant, u2));
    }
}
