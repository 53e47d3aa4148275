// Copyright (c) 2025 - Cowboy AI, Inc.
//! User sync bridge
//!
//! Observes user lifecycle events from an identity provider (self
//! registration, login, admin-created users) and forwards a normalized user
//! record to an external user service over HTTP, so the service can upsert
//! its own copy.
//!
//! ```text
//! ProviderEvent ──▶ UserSyncListener ──▶ UserStore ──▶ SyncPayload ──▶ POST /api/users/internal/keycloak-sync
//! ```
//!
//! Delivery is best-effort: one attempt per event, outcome logged, never
//! retried.

pub mod config;
pub mod delivery;
pub mod errors;
pub mod events;
pub mod listener;
pub mod nats;
pub mod payload;
pub mod store;
pub mod user;

// Re-export commonly used types
pub use config::{SharedSecret, SyncConfig};
pub use delivery::{DeliveryOutcome, TransportFailureKind, UserServiceClient};
pub use errors::{SyncError, SyncResult};
pub use events::{
    AdminEvent, EventKind, EventNotification, EventType, OperationType, ProviderEvent,
    ResourceType, UserEvent,
};
pub use listener::{EventListener, IgnoreReason, SyncOutcome, UserSyncListener};
pub use nats::{EventDispatcher, NatsClient, NatsConfig};
pub use payload::SyncPayload;
pub use store::{InMemoryUserStore, KeycloakAdminStore, KeycloakStoreConfig, UserStore};
pub use user::{derive_role, RequiredField, UserRecord, ValidatedUser};
