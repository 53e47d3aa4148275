// Copyright (c) 2025 - Cowboy AI, Inc.
//! Keycloak admin REST user store
//!
//! Resolves users over the admin API for hosts that receive events out of
//! process:
//!
//! ```text
//! POST {base}/realms/{token_realm}/protocol/openid-connect/token   (client_credentials)
//! GET  {base}/admin/realms/{realm}/users/{id}                      (Bearer token)
//! ```
//!
//! A token is requested for every lookup so no state survives between events.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::UserStore;
use crate::config::SharedSecret;
use crate::errors::{error_chain, SyncError, SyncResult};
use crate::user::UserRecord;

/// Connection settings for the admin API
#[derive(Debug, Clone)]
pub struct KeycloakStoreConfig {
    /// Server base URL (e.g., "http://keycloak:8080")
    pub base_url: String,

    /// Realm the service account lives in
    pub token_realm: String,

    /// Service account client id
    pub client_id: String,

    /// Service account client secret
    pub client_secret: SharedSecret,

    /// Request timeout
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// [`UserStore`] backed by the Keycloak admin REST API
pub struct KeycloakAdminStore {
    config: KeycloakStoreConfig,
    client: Client,
}

impl KeycloakAdminStore {
    pub fn new(config: KeycloakStoreConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SyncError::HttpClient(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn access_token(&self) -> SyncResult<String> {
        let url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url(),
            urlencoding::encode(&self.config.token_realm)
        );

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose()),
            ])
            .send()
            .await
            .map_err(|e| {
                SyncError::UserStore(format!("Token request failed: {}", error_chain(&e)))
            })?;

        if !response.status().is_success() {
            return Err(SyncError::UserStore(format!(
                "Token endpoint returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Deserialization(format!("Invalid token response: {}", e)))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl UserStore for KeycloakAdminStore {
    async fn find_user(&self, realm: &str, user_id: &str) -> SyncResult<Option<UserRecord>> {
        let token = self.access_token().await?;

        let url = format!(
            "{}/admin/realms/{}/users/{}",
            self.base_url(),
            urlencoding::encode(realm),
            urlencoding::encode(user_id)
        );
        debug!(realm, user_id, "Looking up user via admin API");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                SyncError::UserStore(format!("User lookup failed: {}", error_chain(&e)))
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let user = response.json::<UserRecord>().await.map_err(|e| {
                    SyncError::Deserialization(format!("Invalid user representation: {}", e))
                })?;
                Ok(Some(user))
            }
            status => {
                let body = match response.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        debug!(error = %e, "Could not read admin API error body");
                        String::new()
                    }
                };
                Err(SyncError::UserStore(format!(
                    "Admin API returned {}: {}",
                    status, body
                )))
            }
        }
    }
}
