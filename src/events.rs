// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identity provider events and the sync classifier
//!
//! The identity provider reports two families of events: user events
//! (registration, login, ...) and admin events (operations performed through
//! the admin API). Only a small subset means "a user now exists that the user
//! service should know about":
//!
//! ```text
//! UserEvent  REGISTER             → SelfRegistration
//! UserEvent  LOGIN                → FirstLogin   (if enabled)
//! AdminEvent USER + CREATE        → AdminCreate
//! anything else                   → ignored
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Resource path prefix of admin events that target a user
pub const USER_RESOURCE_PREFIX: &str = "users/";

/// User event types reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Register,
    Login,
    Logout,
    UpdateProfile,
    #[serde(other)]
    Other,
}

/// Admin resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    User,
    Group,
    Client,
    RealmRole,
    #[serde(other)]
    Other,
}

/// Admin operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Create,
    Update,
    Delete,
    Action,
    #[serde(other)]
    Other,
}

/// A user-initiated event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Realm name as used in admin API paths, never the internal realm id
    #[serde(rename = "realmName")]
    pub realm: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<DateTime<Utc>>,
}

impl UserEvent {
    pub fn new(event_type: EventType, realm: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: None,
            event_type,
            realm: realm.into(),
            user_id: Some(user_id.into()),
            time: None,
        }
    }
}

/// An event raised by an administrative operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(rename = "realmName")]
    pub realm: String,
    pub resource_type: ResourceType,
    pub operation_type: OperationType,
    #[serde(default)]
    pub resource_path: Option<String>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<DateTime<Utc>>,
}

impl AdminEvent {
    pub fn new(
        realm: impl Into<String>,
        resource_type: ResourceType,
        operation_type: OperationType,
        resource_path: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            realm: realm.into(),
            resource_type,
            operation_type,
            resource_path: Some(resource_path.into()),
            time: None,
        }
    }
}

/// Either event family, as carried on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ProviderEvent {
    User(UserEvent),
    Admin(AdminEvent),
}

impl ProviderEvent {
    pub fn realm(&self) -> &str {
        match self {
            ProviderEvent::User(e) => &e.realm,
            ProviderEvent::Admin(e) => &e.realm,
        }
    }
}

/// A lifecycle occurrence worth syncing
///
/// Each variant carries only what its path needs: a subject id for user
/// events, a resource path for admin creations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventNotification {
    SelfRegistration { subject_id: String },
    FirstLogin { subject_id: String },
    AdminCreate { resource_path: String },
}

impl EventNotification {
    pub fn kind(&self) -> EventKind {
        match self {
            EventNotification::SelfRegistration { .. } => EventKind::SelfRegistration,
            EventNotification::FirstLogin { .. } => EventKind::FirstLogin,
            EventNotification::AdminCreate { .. } => EventKind::AdminCreate,
        }
    }

    /// Identifier of the affected user
    ///
    /// Admin paths must look like `users/<id>`; anything else has no subject.
    pub fn subject_id(&self) -> Option<&str> {
        match self {
            EventNotification::SelfRegistration { subject_id }
            | EventNotification::FirstLogin { subject_id } => Some(subject_id),
            EventNotification::AdminCreate { resource_path } => resource_path
                .strip_prefix(USER_RESOURCE_PREFIX)
                .filter(|id| !id.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SelfRegistration,
    FirstLogin,
    AdminCreate,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::SelfRegistration => write!(f, "REGISTER"),
            EventKind::FirstLogin => write!(f, "LOGIN"),
            EventKind::AdminCreate => write!(f, "ADMIN_CREATE"),
        }
    }
}

/// Which event paths are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierOptions {
    pub sync_on_login: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            sync_on_login: true,
        }
    }
}

/// Decide whether a user event should be synced
pub fn classify_user_event(
    event: &UserEvent,
    options: ClassifierOptions,
) -> Option<EventNotification> {
    let subject_id = event.user_id.clone().filter(|id| !id.is_empty())?;

    match event.event_type {
        EventType::Register => Some(EventNotification::SelfRegistration { subject_id }),
        EventType::Login if options.sync_on_login => {
            Some(EventNotification::FirstLogin { subject_id })
        }
        _ => None,
    }
}

/// Decide whether an admin event should be synced
///
/// Only user creations qualify. Updates, deletes and other resource types
/// are dropped without comment.
pub fn classify_admin_event(event: &AdminEvent) -> Option<EventNotification> {
    match (event.resource_type, event.operation_type) {
        (ResourceType::User, OperationType::Create) => {
            event
                .resource_path
                .clone()
                .map(|resource_path| EventNotification::AdminCreate { resource_path })
        }
        _ => None,
    }
}

/// Classify any provider event
pub fn classify(event: &ProviderEvent, options: ClassifierOptions) -> Option<EventNotification> {
    match event {
        ProviderEvent::User(e) => classify_user_event(e, options),
        ProviderEvent::Admin(e) => classify_admin_event(e),
    }
}
