// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for user-sync-bridge
//!
//! Deterministic users, events and configuration shared by the integration
//! tests. Every test realm is `eventy`.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use user_sync_bridge::{
    AdminEvent, EventType, InMemoryUserStore, OperationType, ResourceType, SyncConfig, UserEvent,
    UserRecord, UserSyncListener,
};

pub const REALM: &str = "eventy";
pub const SYNC_PATH: &str = "/api/users/internal/keycloak-sync";
pub const SECRET: &str = "sync-secret-123";

/// Alice: complete record, no role attribute
pub fn alice() -> UserRecord {
    UserRecord {
        id: Some("u1".to_string()),
        username: Some("alice".to_string()),
        email: Some("a@x.com".to_string()),
        first_name: Some("Alice".to_string()),
        last_name: Some("A".to_string()),
        attributes: BTreeMap::new(),
    }
}

/// Bob: complete record with `app_role = admin`
pub fn bob_admin() -> UserRecord {
    let mut attributes = BTreeMap::new();
    attributes.insert("app_role".to_string(), vec!["admin".to_string()]);
    UserRecord {
        id: Some("u2".to_string()),
        username: Some("bob".to_string()),
        email: Some("b@x.com".to_string()),
        first_name: Some("Bob".to_string()),
        last_name: Some("B".to_string()),
        attributes,
    }
}

/// Carol: blank first name
pub fn carol_incomplete() -> UserRecord {
    UserRecord {
        id: Some("u3".to_string()),
        username: Some("carol".to_string()),
        email: Some("c@x.com".to_string()),
        first_name: Some("   ".to_string()),
        last_name: Some("C".to_string()),
        attributes: BTreeMap::new(),
    }
}

pub fn store_with(users: Vec<UserRecord>) -> Arc<InMemoryUserStore> {
    let store = InMemoryUserStore::new();
    for user in users {
        store.insert(REALM, user).expect("fixture user has an id");
    }
    Arc::new(store)
}

pub fn config(base_url: &str) -> SyncConfig {
    SyncConfig::new(base_url)
        .expect("mock server URL is valid")
        .with_secret(SECRET)
        .with_timeouts(Duration::from_millis(500), Duration::from_millis(500))
}

pub fn listener(
    config: &SyncConfig,
    store: Arc<InMemoryUserStore>,
) -> UserSyncListener<InMemoryUserStore> {
    UserSyncListener::new(config, store).expect("listener builds")
}

pub fn register(user_id: &str) -> UserEvent {
    UserEvent::new(EventType::Register, REALM, user_id)
}

pub fn login(user_id: &str) -> UserEvent {
    UserEvent::new(EventType::Login, REALM, user_id)
}

pub fn admin_create(resource_path: &str) -> AdminEvent {
    AdminEvent::new(REALM, ResourceType::User, OperationType::Create, resource_path)
}
