// Copyright (c) 2025 - Cowboy AI, Inc.
//! User Sync Listener Service
//!
//! Subscribes to identity provider events on NATS and syncs newly created
//! users to the user service:
//! - Events → NATS → EventDispatcher → UserSyncListener → User Service API
//!
//! Run with: cargo run --bin user-sync-listener
//!
//! Prerequisites:
//! 1. NATS server receiving Keycloak events (NATS_URL, NATS_SUBJECT)
//! 2. User service reachable (USER_SERVICE_URL, KEYCLOAK_SYNC_SECRET)
//! 3. A service account allowed to view users (KEYCLOAK_URL,
//!    KEYCLOAK_CLIENT_ID, KEYCLOAK_CLIENT_SECRET)

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use user_sync_bridge::{
    EventDispatcher, EventListener, KeycloakAdminStore, KeycloakStoreConfig, NatsClient,
    NatsConfig, SharedSecret, SyncConfig, UserSyncListener,
};

/// Configuration for the listener service
#[derive(Debug, Clone)]
struct ServiceConfig {
    nats: NatsConfig,
    keycloak: KeycloakStoreConfig,
    sync: SyncConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let defaults = NatsConfig::default();
        let nats = NatsConfig {
            servers: std::env::var("NATS_URL")
                .map(|urls| urls.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.servers),
            subject: std::env::var("NATS_SUBJECT").unwrap_or(defaults.subject),
            ..defaults
        };

        let client_secret = std::env::var("KEYCLOAK_CLIENT_SECRET")
            .ok()
            .and_then(SharedSecret::new)
            .context("KEYCLOAK_CLIENT_SECRET not set")?;

        let keycloak = KeycloakStoreConfig {
            base_url: std::env::var("KEYCLOAK_URL").context("KEYCLOAK_URL not set")?,
            token_realm: std::env::var("KEYCLOAK_TOKEN_REALM")
                .unwrap_or_else(|_| "master".to_string()),
            client_id: std::env::var("KEYCLOAK_CLIENT_ID")
                .unwrap_or_else(|_| "user-sync".to_string()),
            client_secret,
            timeout: Duration::from_secs(5),
        };

        let sync = SyncConfig::from_env().context("Invalid user service configuration")?;

        Ok(Self {
            nats,
            keycloak,
            sync,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting user sync listener");

    let config = ServiceConfig::from_env()?;
    info!("Configuration loaded:");
    info!("  - NATS servers: {:?}", config.nats.servers);
    info!("  - Subject: {}", config.nats.subject);
    info!("  - Keycloak URL: {}", config.keycloak.base_url);
    info!("  - Sync endpoint: {}", config.sync.endpoint());
    info!("  - Sync on login: {}", config.sync.sync_on_login);

    let store = KeycloakAdminStore::new(config.keycloak.clone())
        .context("Failed to create Keycloak user store")?;
    let listener = UserSyncListener::new(&config.sync, Arc::new(store))
        .context("Failed to create sync listener")?;
    info!("Registered listener '{}'", listener.id());

    let client = NatsClient::new(&config.nats)
        .await
        .context("Failed to connect to NATS")?;

    let handle = EventDispatcher::new(Arc::new(listener))
        .spawn(&client, &config.nats.subject)
        .await
        .context("Failed to subscribe to identity events")?;

    tokio::select! {
        _ = handle => {
            anyhow::bail!("Event subscription ended unexpectedly");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
