// Copyright (c) 2025 - Cowboy AI, Inc.
//! User store abstraction
//!
//! The pipeline resolves the affected user through a [`UserStore`] at the
//! moment an event is handled. Records are fetched once per event and never
//! cached.

pub mod keycloak;

pub use keycloak::{KeycloakAdminStore, KeycloakStoreConfig};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::errors::{SyncError, SyncResult};
use crate::user::UserRecord;

/// Lookup from `(realm, user id)` to the current user snapshot
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user, `Ok(None)` when the realm has no such user
    async fn find_user(&self, realm: &str, user_id: &str) -> SyncResult<Option<UserRecord>>;
}

/// Realm-scoped in-memory user store
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<(String, String), UserRecord>>,
    lookups: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user, keyed by its id
    pub fn insert(&self, realm: impl Into<String>, user: UserRecord) -> SyncResult<()> {
        let id = user
            .id
            .clone()
            .ok_or_else(|| SyncError::UserStore("user record has no id".to_string()))?;
        let mut users = self
            .users
            .write()
            .map_err(|_| SyncError::UserStore("user store lock poisoned".to_string()))?;
        users.insert((realm.into(), id), user);
        Ok(())
    }

    pub fn remove(&self, realm: &str, user_id: &str) -> SyncResult<Option<UserRecord>> {
        let mut users = self
            .users
            .write()
            .map_err(|_| SyncError::UserStore("user store lock poisoned".to_string()))?;
        Ok(users.remove(&(realm.to_string(), user_id.to_string())))
    }

    /// Number of lookups served so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user(&self, realm: &str, user_id: &str) -> SyncResult<Option<UserRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let users = self
            .users
            .read()
            .map_err(|_| SyncError::UserStore("user store lock poisoned".to_string()))?;
        Ok(users
            .get(&(realm.to_string(), user_id.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserRecord {
        UserRecord {
            id: Some(id.to_string()),
            username: Some(format!("{}-name", id)),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_is_realm_scoped() {
        let store = InMemoryUserStore::new();
        store.insert("eventy", user("u1")).unwrap();

        let found = tokio_test::block_on(store.find_user("eventy", "u1")).unwrap();
        assert_eq!(found.and_then(|u| u.username), Some("u1-name".to_string()));

        let other_realm = tokio_test::block_on(store.find_user("master", "u1")).unwrap();
        assert!(other_realm.is_none());
        assert_eq!(store.lookups(), 2);
    }

    #[test]
    fn test_insert_requires_id() {
        let store = InMemoryUserStore::new();
        let err = store.insert("eventy", UserRecord::default()).unwrap_err();
        assert!(matches!(err, SyncError::UserStore(_)));
    }

    #[test]
    fn test_remove() {
        let store = InMemoryUserStore::new();
        store.insert("eventy", user("u1")).unwrap();
        assert!(store.remove("eventy", "u1").unwrap().is_some());
        assert!(tokio_test::block_on(store.find_user("eventy", "u1"))
            .unwrap()
            .is_none());
    }
}
