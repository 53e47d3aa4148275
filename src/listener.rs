// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event-to-webhook sync pipeline
//!
//! Each event runs through the stages below inline and ends in exactly one
//! terminal [`SyncOutcome`]. Any stage may stop the event after logging; no
//! stage keeps state between events.
//!
//! ```text
//! classify ──▶ resolve ──▶ derive role ──▶ validate ──▶ encode ──▶ deliver
//!    │            │                            │           │          │
//!    ▼            ▼                            ▼           ▼          ▼
//! Ignored   NotFound/LookupFailed      ValidationFailed  EncodingFailed  Attempted
//! ```
//!
//! The host integration calls [`EventListener`]; the listener itself knows
//! nothing about where events come from.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::SyncConfig;
use crate::delivery::{DeliveryOutcome, UserServiceClient};
use crate::errors::SyncResult;
use crate::events::{
    classify_admin_event, classify_user_event, AdminEvent, ClassifierOptions, EventNotification,
    ProviderEvent, UserEvent,
};
use crate::payload::SyncPayload;
use crate::store::UserStore;
use crate::user::{derive_role, RequiredField, ValidatedUser};

/// Identifier under which the listener registers with a host
pub const LISTENER_ID: &str = "user-sync-event-listener";

/// Why an event produced no sync attempt before resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Not a user-creation-equivalent event
    NotSyncable,
    /// Admin resource path does not name a user
    NoSubject,
}

/// Terminal state of one handled event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Ignored(IgnoreReason),
    NotFound { subject_id: String },
    LookupFailed { subject_id: String },
    ValidationFailed { missing: Vec<RequiredField> },
    EncodingFailed,
    Attempted(DeliveryOutcome),
}

impl SyncOutcome {
    /// Whether a POST reached the service and was accepted
    pub fn is_delivered(&self) -> bool {
        matches!(self, SyncOutcome::Attempted(outcome) if outcome.is_success())
    }

    /// Whether a POST was issued at all
    pub fn is_attempted(&self) -> bool {
        matches!(self, SyncOutcome::Attempted(_))
    }
}

/// Interface a host uses to feed identity provider events into the bridge
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Handle a user event
    async fn on_event(&self, event: &UserEvent) -> SyncOutcome;

    /// Handle an admin event
    async fn on_admin_event(&self, event: &AdminEvent) -> SyncOutcome;

    /// Handle either event family
    async fn on_provider_event(&self, event: &ProviderEvent) -> SyncOutcome {
        match event {
            ProviderEvent::User(e) => self.on_event(e).await,
            ProviderEvent::Admin(e) => self.on_admin_event(e).await,
        }
    }

    fn id(&self) -> &str {
        LISTENER_ID
    }
}

/// Listener that pushes newly created users to the user service
pub struct UserSyncListener<S> {
    store: Arc<S>,
    client: UserServiceClient,
    options: ClassifierOptions,
}

impl<S: UserStore> UserSyncListener<S> {
    /// Build a listener from startup configuration
    ///
    /// Fails only if the HTTP client cannot be built.
    pub fn new(config: &SyncConfig, store: Arc<S>) -> SyncResult<Self> {
        Ok(Self {
            store,
            client: UserServiceClient::new(config)?,
            options: ClassifierOptions {
                sync_on_login: config.sync_on_login,
            },
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn handle(&self, realm: &str, notification: EventNotification) -> SyncOutcome {
        let kind = notification.kind();

        let Some(subject_id) = notification.subject_id() else {
            debug!(event_kind = %kind, ?notification, "Event does not reference a user");
            return SyncOutcome::Ignored(IgnoreReason::NoSubject);
        };

        let user = match self.store.find_user(realm, subject_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(event_kind = %kind, subject_id, realm, "User not found for event");
                return SyncOutcome::NotFound {
                    subject_id: subject_id.to_string(),
                };
            }
            Err(e) => {
                error!(event_kind = %kind, subject_id, realm, error = %e, "User lookup failed");
                return SyncOutcome::LookupFailed {
                    subject_id: subject_id.to_string(),
                };
            }
        };

        let role = derive_role(&user);

        let validated = match ValidatedUser::try_from(&user) {
            Ok(validated) => validated,
            Err(e) => {
                warn!(
                    user_id = user.display_id(),
                    error = %e,
                    "User missing required fields, skipping sync"
                );
                return SyncOutcome::ValidationFailed { missing: e.missing };
            }
        };

        let payload = SyncPayload::new(&validated, role);

        match self.client.deliver(&payload).await {
            Ok(outcome) => SyncOutcome::Attempted(outcome),
            Err(e) => {
                error!(user_id = user.display_id(), error = %e, "Failed to encode sync payload");
                SyncOutcome::EncodingFailed
            }
        }
    }
}

#[async_trait]
impl<S: UserStore + 'static> EventListener for UserSyncListener<S> {
    async fn on_event(&self, event: &UserEvent) -> SyncOutcome {
        match classify_user_event(event, self.options) {
            Some(notification) => self.handle(&event.realm, notification).await,
            None => SyncOutcome::Ignored(IgnoreReason::NotSyncable),
        }
    }

    async fn on_admin_event(&self, event: &AdminEvent) -> SyncOutcome {
        match classify_admin_event(event) {
            Some(notification) => self.handle(&event.realm, notification).await,
            None => SyncOutcome::Ignored(IgnoreReason::NotSyncable),
        }
    }
}
