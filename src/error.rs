//! Error types for the state container.

use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store configuration: {0}")]
    Config(String),

    #[error("Cannot find mutation with the name {0}")]
    UnknownMutation(String),

    #[error("Getter not found: {0}")]
    UnknownGetter(String),

    #[error("Event subscriptions need to be registered before a commit")]
    SubscriptionRequired,

    #[error("Invalid payload for {name}: {reason}")]
    InvalidPayload { name: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
