//! Error types for availsync.

use thiserror::Error;

/// Errors that can occur while syncing the availability calendar.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Malformed event {event_id}: {reason}")]
    DataShape { event_id: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for availsync operations.
pub type SyncResult<T> = Result<T, SyncError>;
