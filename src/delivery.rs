// Copyright (c) 2025 - Cowboy AI, Inc.
//! Delivery client for the external user service
//!
//! One POST per sync payload, bounded by the configured connect and read
//! timeouts. The outcome is logged and handed back to the caller for
//! inspection only. Nothing is retried.
//!
//! ```text
//! 2xx            → Success           (info)
//! other status   → ServiceRejected   (warn, body at error)
//! I/O / timeout  → TransportFailure  (error)
//! ```

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::config::{SharedSecret, SyncConfig};
use crate::errors::{error_chain, SyncError, SyncResult};
use crate::payload::SyncPayload;

/// Header carrying the shared secret
pub const SECRET_HEADER: &str = "X-Keycloak-Secret";

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    Timeout,
    Connect,
    Other,
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailureKind::Timeout => write!(f, "timeout"),
            TransportFailureKind::Connect => write!(f, "connect"),
            TransportFailureKind::Other => write!(f, "other"),
        }
    }
}

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The service answered with a 2xx status
    Success { status: u16 },

    /// The service answered with any other status
    ServiceRejected { status: u16, body: Option<String> },

    /// No usable response (DNS, refused connection, timeout, protocol error)
    TransportFailure {
        kind: TransportFailureKind,
        detail: String,
    },
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DeliveryOutcome::Success { status } | DeliveryOutcome::ServiceRejected { status, .. } => {
                Some(*status)
            }
            DeliveryOutcome::TransportFailure { .. } => None,
        }
    }
}

/// HTTP client for the user service sync endpoint
#[derive(Debug, Clone)]
pub struct UserServiceClient {
    client: Client,
    endpoint: String,
    secret: Option<SharedSecret>,
}

impl UserServiceClient {
    pub fn new(config: &SyncConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(|e| SyncError::HttpClient(format!("Failed to create HTTP client: {}", e)))?;

        info!(endpoint = %config.endpoint(), "User service client ready");

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            secret: config.sync_secret.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the payload and classify what came back
    ///
    /// Only encoding can fail; every HTTP failure is folded into the outcome.
    pub async fn deliver(&self, payload: &SyncPayload) -> SyncResult<DeliveryOutcome> {
        let body = payload.to_json_bytes()?;
        Ok(self.send(body).await)
    }

    async fn send(&self, body: Vec<u8>) -> DeliveryOutcome {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        match &self.secret {
            Some(secret) => request = request.header(SECRET_HEADER, secret.expose()),
            None => warn!("{} not set, sync may fail", crate::config::SYNC_SECRET_VAR),
        }

        debug!(
            endpoint = %self.endpoint,
            payload = %String::from_utf8_lossy(&body),
            "Attempting to sync user"
        );

        // Connection goes back to the pool when `response` drops.
        let response = match request.body(body).send().await {
            Ok(response) => response,
            Err(e) => return transport_failure(&self.endpoint, e),
        };

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "Successfully synced user to service");
            return DeliveryOutcome::Success {
                status: status.as_u16(),
            };
        }

        warn!(status = status.as_u16(), "Failed to sync user to service");

        let body = match response.text().await {
            Ok(text) if !text.is_empty() => {
                error!(status = status.as_u16(), body = %text, "User service error body");
                Some(text)
            }
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "Could not read error body");
                None
            }
        };

        DeliveryOutcome::ServiceRejected {
            status: status.as_u16(),
            body,
        }
    }
}

fn transport_failure(endpoint: &str, err: reqwest::Error) -> DeliveryOutcome {
    let kind = if err.is_timeout() {
        TransportFailureKind::Timeout
    } else if err.is_connect() {
        TransportFailureKind::Connect
    } else {
        TransportFailureKind::Other
    };

    let detail = error_chain(&err);
    error!(endpoint, kind = %kind, error = %detail, "Error syncing user to service");

    DeliveryOutcome::TransportFailure { kind, detail }
}
