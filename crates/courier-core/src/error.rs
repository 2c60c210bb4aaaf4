//! Error types for the courier notification engine.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using courier's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for courier operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Feed store backend unavailable (transient; caller may retry).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// User directory lookup failed; fan-out aborts before any delivery.
    #[error("Audience resolution failed: {0}")]
    AudienceResolution(String),

    /// Resource not found. Feed operations report a missing or evicted
    /// notification as `Ok(false)`; this variant is reserved for the API
    /// surface mapping.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Mutation targeted a notification belonging to a different user.
    #[error("Ownership mismatch: notification {notification_id} does not belong to user {user_id}")]
    OwnershipMismatch {
        notification_id: Uuid,
        user_id: Uuid,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::StoreUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
