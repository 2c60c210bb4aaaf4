//! UUID v7 utilities for time-ordered identifiers.
//!
//! Notification IDs are UUIDv7: they embed a millisecond-precision Unix
//! timestamp in the first 48 bits, so IDs generated later sort
//! lexicographically greater. The feed relies on insertion order, but
//! time-ordered IDs keep direct-lookup keys and logs naturally sortable.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Check whether a UUID is version 7.
#[inline]
pub fn is_v7(id: &Uuid) -> bool {
    id.get_version_num() == 7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_is_v7() {
        let id = new_v7();
        assert!(is_v7(&id));
    }

    #[test]
    fn test_new_v7_is_time_ordered() {
        let a = new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = new_v7();
        assert!(b > a);
    }

    #[test]
    fn test_is_v7_rejects_v4() {
        let id = Uuid::new_v4();
        assert!(!is_v7(&id));
    }
}
