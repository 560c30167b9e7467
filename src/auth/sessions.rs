/**
 * Session Type
 *
 * This module defines the active session: a reference to the single stored
 * user record, held in memory by the store and persisted under its own
 * storage key as the plain record.
 *
 * The session is an explicit value returned by every state-changing store
 * operation, rather than a global the embedder reaches into.
 */

use serde::{Deserialize, Serialize};

use crate::auth::users::UserRecord;

/// The active user session
///
/// Exists independently of the stored record: logging out drops the
/// session while the record stays persisted. If a session exists, its
/// username matches the stored record's username (normalization enforces
/// this on open).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    user: UserRecord,
}

impl Session {
    /// Create a session for the given record
    pub fn new(user: UserRecord) -> Self {
        Self { user }
    }

    /// The record this session points at
    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    /// Username of the active user
    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Consume the session, returning the record
    pub fn into_user(self) -> UserRecord {
        self.user
    }
}
