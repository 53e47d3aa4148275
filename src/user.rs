// Copyright (c) 2025 - Cowboy AI, Inc.
//! User records, role derivation and required-field validation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Custom attribute holding the application role
pub const APP_ROLE_ATTRIBUTE: &str = "app_role";

/// Role assigned when the user carries no usable `app_role`
pub const DEFAULT_ROLE: &str = "USER";

/// Snapshot of a user as stored by the identity provider
///
/// Every field may be missing. Attributes are multi-valued; only the first
/// value of an attribute is ever consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl UserRecord {
    /// First value of an attribute, if any
    pub fn first_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Stable identifier for log lines
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("<unknown>")
    }
}

/// Application role for a user
///
/// The first `app_role` value, trimmed and upper-cased, or `USER` when the
/// attribute is absent or blank. Never empty.
pub fn derive_role(user: &UserRecord) -> String {
    match user.first_attribute(APP_ROLE_ATTRIBUTE).map(str::trim) {
        Some(role) if !role.is_empty() => role.to_uppercase(),
        _ => DEFAULT_ROLE.to_string(),
    }
}

/// Fields the user service requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Username,
    Email,
    FirstName,
    LastName,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::Username => write!(f, "username"),
            RequiredField::Email => write!(f, "email"),
            RequiredField::FirstName => write!(f, "firstName"),
            RequiredField::LastName => write!(f, "lastName"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing or blank required fields: {}", format_fields(.missing))]
pub struct UserValidationError {
    pub missing: Vec<RequiredField>,
}

fn format_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A user record known to carry every required field
///
/// Values are kept exactly as stored; trimming only decides validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUser {
    pub id: Option<String>,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl TryFrom<&UserRecord> for ValidatedUser {
    type Error = UserValidationError;

    fn try_from(user: &UserRecord) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();

        let mut require = |value: &Option<String>, field: RequiredField| -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v.clone(),
                _ => {
                    missing.push(field);
                    String::new()
                }
            }
        };

        let username = require(&user.username, RequiredField::Username);
        let email = require(&user.email, RequiredField::Email);
        let first_name = require(&user.first_name, RequiredField::FirstName);
        let last_name = require(&user.last_name, RequiredField::LastName);

        if !missing.is_empty() {
            return Err(UserValidationError { missing });
        }

        Ok(Self {
            id: user.id.clone(),
            username,
            email,
            first_name,
            last_name,
        })
    }
}
