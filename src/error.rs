//! Error types for vymova-sw

use thiserror::Error;

/// Common result type for worker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the pronunciation scoring worker
#[derive(Error, Debug)]
pub enum Error {
    /// Inbound message is missing required fields or is not valid JSON
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Acoustic recognition failed (unreadable audio, unsupported format,
    /// or recognizer tool failure)
    #[error("Recognition error: {0}")]
    Recognition(String),

    /// Outbound result emission failed
    #[error("Publish error: {0}")]
    Publish(String),

    /// AMQP connection or channel error (wraps lapin::Error)
    #[error("Broker error: {0}")]
    Broker(#[from] lapin::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
