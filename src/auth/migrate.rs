//! Legacy storage-shape migration
//!
//! The `users` value has carried several shapes over time: the current
//! single-record array, a legacy keyed mapping, and pre-invariant arrays
//! with more than one entry. Decoding is modeled as a tagged union over
//! those shapes, followed by an explicit collapse transform down to the
//! current zero-or-one-record form.

use serde_json::{Map, Value};
use tracing::warn;

use crate::auth::users::UserRecord;
use crate::shared::error::AuthError;

/// The recognized shapes of the persisted `users` value
#[derive(Debug)]
pub(crate) enum StoredUsers {
    /// Current shape: an array of records
    Records(Vec<Value>),
    /// Legacy shape: a keyed mapping of records
    Keyed(Map<String, Value>),
    /// Parseable JSON of any other shape
    Unrecognized(Value),
}

/// Outcome of normalizing a decoded `users` value
#[derive(Debug)]
pub(crate) enum Normalized {
    /// The value already held zero or one decodable records
    Unchanged(Vec<UserRecord>),
    /// The value must be rewritten as the returned collection
    Rewritten(Vec<UserRecord>),
    /// The value is not a users collection at all; leave it in place and
    /// treat the collection as empty
    Skipped,
}

/// Decode the raw `users` JSON text into its shape
///
/// Syntactically invalid JSON is storage corruption.
pub(crate) fn decode_users(raw: &str) -> Result<StoredUsers, AuthError> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(match value {
        Value::Array(items) => StoredUsers::Records(items),
        Value::Object(map) => StoredUsers::Keyed(map),
        other => StoredUsers::Unrecognized(other),
    })
}

/// Collapse a decoded `users` value down to the current shape
///
/// The keyed legacy mapping and oversized arrays keep only the most
/// recently created entry; entries missing a timestamp sort as the oldest,
/// and ties keep their original relative order.
pub(crate) fn normalize_shape(stored: StoredUsers) -> Normalized {
    match stored {
        StoredUsers::Records(items) => {
            let total = items.len();
            let decoded: Vec<UserRecord> = items.into_iter().filter_map(decode_record).collect();
            if decoded.len() == total && decoded.len() <= 1 {
                Normalized::Unchanged(decoded)
            } else {
                Normalized::Rewritten(most_recent(decoded))
            }
        }
        StoredUsers::Keyed(map) => {
            let decoded: Vec<UserRecord> = map
                .into_iter()
                .map(|(_, value)| value)
                .filter_map(decode_record)
                .collect();
            Normalized::Rewritten(most_recent(decoded))
        }
        StoredUsers::Unrecognized(value) => {
            warn!("Unrecognized users value shape: {}", shape_name(&value));
            Normalized::Skipped
        }
    }
}

/// Decode a single stored entry, skipping values that are not user records
fn decode_record(value: Value) -> Option<UserRecord> {
    match serde_json::from_value::<UserRecord>(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Skipping undecodable user entry: {}", e);
            None
        }
    }
}

/// Keep only the most recently created record
///
/// The sort is stable, so among entries sharing a timestamp the last one
/// in original order wins.
fn most_recent(mut records: Vec<UserRecord>) -> Vec<UserRecord> {
    records.sort_by_key(|record| record.created_at);
    match records.pop() {
        Some(latest) => vec![latest],
        None => Vec::new(),
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, username: &str, created_at: &str) -> String {
        format!(
            r#"{{"id":"{}","username":"{}","password":"pw","createdAt":"{}"}}"#,
            id, username, created_at
        )
    }

    #[test]
    fn test_decode_array_shape() {
        let stored = decode_users("[]").unwrap();
        assert!(matches!(stored, StoredUsers::Records(items) if items.is_empty()));
    }

    #[test]
    fn test_decode_keyed_shape() {
        let stored = decode_users("{\"u1\": {}}").unwrap();
        assert!(matches!(stored, StoredUsers::Keyed(map) if map.len() == 1));
    }

    #[test]
    fn test_decode_unrecognized_shape() {
        let stored = decode_users("42").unwrap();
        assert!(matches!(stored, StoredUsers::Unrecognized(_)));
    }

    #[test]
    fn test_decode_invalid_json_is_corruption() {
        let result = decode_users("{ not json");
        assert!(matches!(result, Err(AuthError::Corrupted { .. })));
    }

    #[test]
    fn test_single_record_array_is_unchanged() {
        let raw = format!("[{}]", entry("u1", "alice", "2024-01-01T00:00:00Z"));
        let stored = decode_users(&raw).unwrap();

        match normalize_shape(stored) {
            Normalized::Unchanged(users) => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].username, "alice");
            }
            other => panic!("Expected Unchanged, got {:?}", other),
        }
    }

    #[test]
    fn test_keyed_map_keeps_most_recent() {
        let raw = format!(
            "{{\"a\": {}, \"b\": {}}}",
            entry("u1", "old", "2023-01-01T00:00:00Z"),
            entry("u2", "new", "2024-06-01T00:00:00Z")
        );
        let stored = decode_users(&raw).unwrap();

        match normalize_shape(stored) {
            Normalized::Rewritten(users) => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].username, "new");
            }
            other => panic!("Expected Rewritten, got {:?}", other),
        }
    }

    #[test]
    fn test_keyed_map_tie_keeps_original_order() {
        // Keys deliberately out of alphabetical order: with equal
        // timestamps the later *document* entry must win, which relies on
        // serde_json preserving map order.
        let raw = format!(
            "{{\"z\": {}, \"a\": {}}}",
            entry("u1", "first", "2024-01-01T00:00:00Z"),
            entry("u2", "second", "2024-01-01T00:00:00Z")
        );
        let stored = decode_users(&raw).unwrap();

        match normalize_shape(stored) {
            Normalized::Rewritten(users) => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].username, "second");
            }
            other => panic!("Expected Rewritten, got {:?}", other),
        }
    }

    #[test]
    fn test_keyed_map_missing_timestamp_sorts_oldest() {
        let raw = format!(
            "{{\"a\": {{\"id\":\"u1\",\"username\":\"undated\",\"password\":\"pw\"}}, \"b\": {}}}",
            entry("u2", "dated", "2020-01-01T00:00:00Z")
        );
        let stored = decode_users(&raw).unwrap();

        match normalize_shape(stored) {
            Normalized::Rewritten(users) => {
                assert_eq!(users[0].username, "dated");
            }
            other => panic!("Expected Rewritten, got {:?}", other),
        }
    }

    #[test]
    fn test_keyed_map_skips_garbage_entries() {
        let raw = format!(
            "{{\"a\": 17, \"b\": {}, \"c\": \"nope\"}}",
            entry("u1", "alice", "2024-01-01T00:00:00Z")
        );
        let stored = decode_users(&raw).unwrap();

        match normalize_shape(stored) {
            Normalized::Rewritten(users) => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].username, "alice");
            }
            other => panic!("Expected Rewritten, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_array_collapses() {
        let raw = format!(
            "[{}, {}]",
            entry("u1", "old", "2023-01-01T00:00:00Z"),
            entry("u2", "new", "2024-01-01T00:00:00Z")
        );
        let stored = decode_users(&raw).unwrap();

        match normalize_shape(stored) {
            Normalized::Rewritten(users) => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].username, "new");
            }
            other => panic!("Expected Rewritten, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_keyed_map_rewrites_to_empty() {
        let stored = decode_users("{}").unwrap();
        assert!(matches!(
            normalize_shape(stored),
            Normalized::Rewritten(users) if users.is_empty()
        ));
    }

    #[test]
    fn test_unrecognized_shape_is_skipped() {
        let stored = decode_users("\"oops\"").unwrap();
        assert!(matches!(normalize_shape(stored), Normalized::Skipped));
    }
}
