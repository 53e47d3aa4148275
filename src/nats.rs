// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS host integration
//!
//! Identity provider events arrive as JSON [`ProviderEvent`]s on a NATS
//! subject and are handed to an [`EventListener`] one at a time.

use async_nats::{Client, ConnectOptions, Subscriber};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::{SyncError, SyncResult};
use crate::events::ProviderEvent;
use crate::listener::{EventListener, SyncOutcome};

/// Configuration for NATS connection
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Subject carrying identity provider events
    pub subject: String,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "user-sync-listener".to_string(),
            subject: "keycloak.events.>".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Thin NATS client wrapper
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    pub async fn new(config: &NatsConfig) -> SyncResult<Self> {
        let connect_options = ConnectOptions::new()
            .name(&config.name)
            .connection_timeout(config.connect_timeout);

        let client = async_nats::connect_with_options(config.servers.join(","), connect_options)
            .await
            .map_err(|e| SyncError::NatsConnection(e.to_string()))?;

        info!("Connected to NATS at {:?}", config.servers);

        Ok(Self { client })
    }

    pub async fn subscribe(&self, subject: &str) -> SyncResult<Subscriber> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| SyncError::NatsSubscribe(e.to_string()))?;

        info!("Subscribed to subject: {}", subject);
        Ok(subscriber)
    }
}

/// Feeds messages from a subscription into a listener
pub struct EventDispatcher<L> {
    listener: Arc<L>,
}

impl<L: EventListener + 'static> EventDispatcher<L> {
    pub fn new(listener: Arc<L>) -> Self {
        Self { listener }
    }

    /// Decode one message and run it through the listener
    ///
    /// Malformed payloads are logged and dropped.
    pub async fn dispatch(&self, payload: &[u8]) -> SyncResult<SyncOutcome> {
        let event: ProviderEvent = serde_json::from_slice(payload)
            .map_err(|e| SyncError::Deserialization(e.to_string()))?;

        debug!(realm = event.realm(), listener = self.listener.id(), "Dispatching event");

        Ok(self.listener.on_provider_event(&event).await)
    }

    /// Consume a subscription until it closes
    pub async fn run(self, mut subscriber: Subscriber) {
        while let Some(message) = subscriber.next().await {
            debug!(
                subject = %message.subject,
                payload_size = message.payload.len(),
                "Received event"
            );

            match self.dispatch(&message.payload).await {
                Ok(outcome) => debug!(?outcome, "Event handled"),
                Err(e) => error!(subject = %message.subject, error = %e, "Failed to decode event"),
            }
        }

        warn!("Subscription ended");
    }

    /// Subscribe and consume in a background task
    pub async fn spawn(self, client: &NatsClient, subject: &str) -> SyncResult<JoinHandle<()>> {
        let subscriber = client.subscribe(subject).await?;
        Ok(tokio::spawn(self.run(subscriber)))
    }
}
