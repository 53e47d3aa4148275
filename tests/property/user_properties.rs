// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Role Derivation and Field Validation

use proptest::prelude::*;
use std::collections::BTreeMap;
use user_sync_bridge::{derive_role, RequiredField, UserRecord, ValidatedUser};

fn blank() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[ \t\r\n]{0,8}".prop_map(Some)]
}

fn present() -> impl Strategy<Value = Option<String>> {
    "[ ]{0,2}[a-zA-Z0-9@._-]{1,16}[ ]{0,2}".prop_map(Some)
}

/// A field that is either blank/absent or carries text
fn field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![blank(), present()]
}

fn record(
    username: Option<String>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> UserRecord {
    UserRecord {
        id: Some("u1".to_string()),
        username,
        email,
        first_name,
        last_name,
        attributes: BTreeMap::new(),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

proptest! {
    /// Property: Validation fails exactly for the blank or absent fields
    #[test]
    fn prop_validation_reports_blank_fields(
        username in field(),
        email in field(),
        first_name in field(),
        last_name in field(),
    ) {
        let expected: Vec<RequiredField> = [
            (RequiredField::Username, &username),
            (RequiredField::Email, &email),
            (RequiredField::FirstName, &first_name),
            (RequiredField::LastName, &last_name),
        ]
        .iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(field, _)| *field)
        .collect();

        let user = record(username.clone(), email.clone(), first_name.clone(), last_name.clone());
        match ValidatedUser::try_from(&user) {
            Ok(validated) => {
                prop_assert!(expected.is_empty());
                prop_assert_eq!(Some(validated.username), username);
                prop_assert_eq!(Some(validated.last_name), last_name);
            }
            Err(e) => prop_assert_eq!(e.missing, expected),
        }
    }

    /// Property: Role is never empty and defaults to USER for blank input
    #[test]
    fn prop_role_is_upper_and_non_empty(role in proptest::option::of("[ \t]{0,3}[a-zA-Z_]{0,10}[ \t]{0,3}")) {
        let mut user = record(None, None, None, None);
        if let Some(role) = &role {
            user.attributes.insert("app_role".to_string(), vec![role.clone()]);
        }

        let derived = derive_role(&user);
        prop_assert!(!derived.is_empty());
        prop_assert_eq!(&derived, &derived.to_uppercase());

        match role.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => prop_assert_eq!(derived, r.to_uppercase()),
            _ => prop_assert_eq!(derived, "USER"),
        }
    }
}
