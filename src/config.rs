// Copyright (c) 2025 - Cowboy AI, Inc.
//! Sync bridge configuration
//!
//! Read once at process start and handed to the listener at construction.
//! Nothing in the pipeline reads the environment per event.
//!
//! | Variable                        | Required | Default                             |
//! |---------------------------------|----------|-------------------------------------|
//! | `USER_SERVICE_URL`              | yes      |                                     |
//! | `KEYCLOAK_SYNC_SECRET`          | no       | unset (header omitted)              |
//! | `USER_SYNC_PATH`                | no       | `/api/users/internal/keycloak-sync` |
//! | `USER_SYNC_CONNECT_TIMEOUT_MS`  | no       | `5000`                              |
//! | `USER_SYNC_READ_TIMEOUT_MS`     | no       | `5000`                              |
//! | `USER_SYNC_ON_LOGIN`            | no       | `true`                              |

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use tracing::warn;

use crate::errors::{SyncError, SyncResult};

pub const USER_SERVICE_URL_VAR: &str = "USER_SERVICE_URL";
pub const SYNC_SECRET_VAR: &str = "KEYCLOAK_SYNC_SECRET";
pub const SYNC_PATH_VAR: &str = "USER_SYNC_PATH";
pub const CONNECT_TIMEOUT_VAR: &str = "USER_SYNC_CONNECT_TIMEOUT_MS";
pub const READ_TIMEOUT_VAR: &str = "USER_SYNC_READ_TIMEOUT_MS";
pub const SYNC_ON_LOGIN_VAR: &str = "USER_SYNC_ON_LOGIN";

/// Internal sync endpoint on the user service
pub const DEFAULT_SYNC_PATH: &str = "/api/users/internal/keycloak-sync";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5000);

/// Pre-shared credential sent to the user service
///
/// `Debug` is redacted so the value never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wrap a secret, treating blank input as "not configured"
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}

/// Configuration for the sync pipeline and its delivery client
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the external user service (e.g., "http://users:8080")
    pub user_service_url: String,

    /// Optional shared secret for the `X-Keycloak-Secret` header
    pub sync_secret: Option<SharedSecret>,

    /// Path appended to the base URL
    pub sync_path: String,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Read timeout for the response
    pub read_timeout: Duration,

    /// Whether login events trigger a sync
    pub sync_on_login: bool,
}

impl SyncConfig {
    /// Build a configuration with defaults for everything except the service URL
    pub fn new(user_service_url: impl Into<String>) -> SyncResult<Self> {
        let user_service_url = user_service_url.into();
        validate_service_url(&user_service_url)?;

        Ok(Self {
            user_service_url,
            sync_secret: None,
            sync_path: DEFAULT_SYNC_PATH.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            sync_on_login: true,
        })
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.sync_secret = SharedSecret::new(secret);
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    pub fn with_sync_on_login(mut self, enabled: bool) -> Self {
        self.sync_on_login = enabled;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> SyncResult<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> SyncResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_service_url = lookup(USER_SERVICE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                SyncError::Configuration(format!(
                    "{} environment variable is not set",
                    USER_SERVICE_URL_VAR
                ))
            })?;

        let mut config = Self::new(user_service_url.trim())?;

        config.sync_secret = lookup(SYNC_SECRET_VAR).and_then(SharedSecret::new);
        if config.sync_secret.is_none() {
            warn!(
                "{} not set, requests to the user service will carry no secret",
                SYNC_SECRET_VAR
            );
        }

        if let Some(path) = lookup(SYNC_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            let path = path.trim();
            config.sync_path = if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            };
        }

        if let Some(ms) = lookup(CONNECT_TIMEOUT_VAR) {
            config.connect_timeout = parse_millis(CONNECT_TIMEOUT_VAR, &ms)?;
        }
        if let Some(ms) = lookup(READ_TIMEOUT_VAR) {
            config.read_timeout = parse_millis(READ_TIMEOUT_VAR, &ms)?;
        }

        if let Some(flag) = lookup(SYNC_ON_LOGIN_VAR) {
            config.sync_on_login = parse_bool(SYNC_ON_LOGIN_VAR, &flag)?;
        }

        Ok(config)
    }

    /// Full URL of the sync endpoint
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.user_service_url.trim_end_matches('/'),
            self.sync_path
        )
    }
}

fn validate_service_url(raw: &str) -> SyncResult<()> {
    let url = Url::parse(raw).map_err(|e| {
        SyncError::Configuration(format!("{} is not a valid URL: {}", USER_SERVICE_URL_VAR, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SyncError::Configuration(format!(
            "{} must use http or https, got '{}'",
            USER_SERVICE_URL_VAR, other
        ))),
    }
}

fn parse_millis(key: &str, raw: &str) -> SyncResult<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(SyncError::Configuration(format!(
            "{} must be a positive number of milliseconds, got '{}'",
            key, raw
        ))),
    }
}

fn parse_bool(key: &str, raw: &str) -> SyncResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SyncError::Configuration(format!(
            "{} must be a boolean, got '{}'",
            key, raw
        ))),
    }
}
