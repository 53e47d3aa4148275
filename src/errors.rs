// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for the user sync bridge

use std::error::Error as StdError;
use thiserror::Error;

/// Errors that can occur while setting up or running the sync bridge
///
/// Per-event failures (user not found, validation, rejected or failed
/// delivery) are not errors at this level. They are logged and reported as a
/// [`SyncOutcome`](crate::listener::SyncOutcome) instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// User store lookup failed
    #[error("User store error: {0}")]
    UserStore(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS subscribe error
    #[error("NATS subscribe error: {0}")]
    NatsSubscribe(String),
}

/// Result type for sync bridge operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Render an error and every `source()` below it, joined with ": "
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}
