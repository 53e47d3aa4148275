// Copyright (c) 2025 - Cowboy AI, Inc.
//! Sync payload sent to the user service
//!
//! A flat JSON object with a fixed field order:
//!
//! ```json
//! {"id":"...","username":"...","email":"...","firstName":"...","lastName":"...","role":"..."}
//! ```
//!
//! `id` is left out when the user record has none.

use serde::{Deserialize, Serialize};

use crate::errors::SyncResult;
use crate::user::ValidatedUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl SyncPayload {
    pub fn new(user: &ValidatedUser, role: impl Into<String>) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: role.into(),
        }
    }

    /// UTF-8 JSON body
    pub fn to_json_bytes(&self) -> SyncResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
