/**
 * User Record Model
 *
 * This module defines the sole persisted account entity and its credential
 * operations. Records are serialized as JSON with the field names the
 * storage format has always used (`createdAt` camel case; the credential
 * field accepts the legacy `password` name on decode).
 */

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AuthError;

/// Prefix shared by every bcrypt hash version marker ("$2a$", "$2b$", "$2y$")
const BCRYPT_PREFIX: &str = "$2";

/// The sole persisted account entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user ID (opaque string; new records use a UUIDv4)
    pub id: String,
    /// Username (trimmed, non-empty for well-formed records)
    pub username: String,
    /// Hashed password (bcrypt)
    ///
    /// Legacy data may still carry a plaintext value under the old
    /// `password` field name; normalization upgrades it on open.
    #[serde(default, alias = "password")]
    pub password_hash: String,
    /// Created at timestamp (RFC 3339)
    ///
    /// Legacy entries without one sort as the oldest.
    #[serde(rename = "createdAt", default = "unix_epoch")]
    pub created_at: DateTime<Utc>,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl UserRecord {
    /// Create a new record with a fresh id, the current timestamp, and a
    /// bcrypt-hashed credential
    ///
    /// # Arguments
    /// * `username` - already-trimmed username
    /// * `password` - plaintext password, hashed before it is stored
    ///
    /// # Errors
    /// Returns `AuthError::Hash` if hashing fails.
    pub fn new(username: impl Into<String>, password: &str) -> Result<Self, AuthError> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            password_hash: hash(password, DEFAULT_COST)?,
            created_at: Utc::now(),
        })
    }

    /// Verify a candidate password against the stored hash
    ///
    /// A stored value that is not a valid bcrypt hash cannot match any
    /// candidate; it is reported as a non-match after a warning.
    pub fn verify_password(&self, candidate: &str) -> bool {
        match verify(candidate, &self.password_hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(
                    "Password verification error for user {}: {:?}",
                    self.username,
                    e
                );
                false
            }
        }
    }

    /// Replace the credential with a bcrypt hash of `password`
    pub fn set_password(&mut self, password: &str) -> Result<(), AuthError> {
        self.password_hash = hash(password, DEFAULT_COST)?;
        Ok(())
    }

    /// Whether the stored credential already looks like a bcrypt hash
    pub fn has_hashed_password(&self) -> bool {
        self.password_hash.starts_with(BCRYPT_PREFIX)
    }
}
