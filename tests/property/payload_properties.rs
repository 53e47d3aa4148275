// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Payload Encoding
//!
//! Any string a user record can hold must survive the trip through the JSON
//! body and a standard parser unchanged.

use proptest::prelude::*;
use user_sync_bridge::{SyncPayload, ValidatedUser};

// ============================================================================
// Strategies
// ============================================================================

/// Strings biased toward characters that need escaping
fn tricky_string() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        r#"[a-z"\\\n\r\t\x00-\x1f\x7f\u{2028}\u{2029}é😀]{0,24}"#,
    ]
}

fn validated_user() -> impl Strategy<Value = ValidatedUser> {
    (
        proptest::option::of(tricky_string()),
        tricky_string(),
        tricky_string(),
        tricky_string(),
        tricky_string(),
    )
        .prop_map(|(id, username, email, first_name, last_name)| ValidatedUser {
            id,
            username,
            email,
            first_name,
            last_name,
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Encoding is lossless for every field
    #[test]
    fn prop_payload_round_trips(user in validated_user(), role in tricky_string()) {
        let payload = SyncPayload::new(&user, role);
        let body = payload.to_json_bytes().unwrap();

        let decoded: SyncPayload = serde_json::from_slice(&body).unwrap();
        prop_assert_eq!(decoded, payload);
    }

    /// Property: The body is a flat object with the fixed key order
    #[test]
    fn prop_payload_is_flat_with_fixed_order(user in validated_user(), role in tricky_string()) {
        let has_id = user.id.is_some();
        let body = SyncPayload::new(&user, role).to_json_bytes().unwrap();

        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let object = value.as_object().unwrap();
        prop_assert!(object.values().all(|v| v.is_string()));

        let text = String::from_utf8(body).unwrap();
        let mut keys = vec!["\"username\":", "\"email\":", "\"firstName\":", "\"lastName\":", "\"role\":"];
        if has_id {
            keys.insert(0, "\"id\":");
        }
        prop_assert_eq!(object.len(), keys.len());

        // Keys are located in order, each search starting after the previous one.
        let mut cursor = 0;
        for key in keys {
            let found = text[cursor..].find(key);
            prop_assert!(found.is_some(), "missing {} in {}", key, text);
            cursor += found.unwrap() + key.len();
        }
    }
}

#[test]
fn test_quote_and_backslash_round_trip() {
    let user = ValidatedUser {
        id: Some("u1".to_string()),
        username: "a\"b\\c".to_string(),
        email: "a@x.com".to_string(),
        first_name: "Alice".to_string(),
        last_name: "A".to_string(),
    };
    let body = SyncPayload::new(&user, "USER").to_json_bytes().unwrap();

    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["username"], "a\"b\\c");
}
