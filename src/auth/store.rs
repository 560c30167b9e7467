/**
 * Account Store
 *
 * This module implements the session store: the single persisted user
 * record, the active session, and the signup/login/logout/change-password
 * operations against them.
 *
 * # Storage Layout
 *
 * - `users` - JSON array of zero or one user record
 * - `currentUser` - JSON record for the active session, or absent
 *
 * # Normalization
 *
 * Opening a store migrates whatever is found under those keys into the
 * current shape. Legacy keyed mappings collapse to the most recently
 * created entry and plaintext credentials are upgraded to bcrypt hashes;
 * the session is then repaired or resynchronized against the stored
 * record. Normalization never fails the caller.
 *
 * # Security
 *
 * - Passwords are hashed with bcrypt before storage
 * - Credential failures share one error variant (no information leakage)
 * - Passwords are never logged
 */

use tracing::{error, info, warn};

use crate::auth::migrate::{decode_users, normalize_shape, Normalized};
use crate::auth::sessions::Session;
use crate::auth::users::UserRecord;
use crate::shared::error::AuthError;
use crate::storage::{Storage, CURRENT_USER_KEY, USERS_KEY};

/// JSON text of the empty users collection
const EMPTY_USERS: &str = "[]";

/// The session store
///
/// Generic over its [`Storage`] backend so tests can run against the
/// in-memory one. All operations are synchronous and take `&mut self`;
/// each performs its storage read-modify-write before returning.
pub struct AccountStore<S: Storage> {
    storage: S,
    session: Option<Session>,
}

impl<S: Storage> AccountStore<S> {
    /// Open a store over the given backend
    ///
    /// Runs [`normalize`](Self::normalize) before returning, so the caller
    /// always starts from the current storage shape. Opening never fails;
    /// problems found in stored data are logged and handled in place.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            session: None,
        };
        store.normalize();
        store
    }

    /// The active session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a session is active
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Read the persisted record, if any
    pub fn stored_user(&self) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.load_users()?.into_iter().next())
    }

    /// Borrow the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning the storage backend
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Normalize persisted state
    ///
    /// Migrates legacy storage shapes, upgrades plaintext credentials,
    /// and resynchronizes the session with the stored record. Idempotent.
    /// Never fails the caller: data problems are handled in place and
    /// backend failures are logged and swallowed.
    pub fn normalize(&mut self) {
        if let Err(e) = self.normalize_inner() {
            warn!("Storage normalization failed: {}", e);
        }
    }

    fn normalize_inner(&mut self) -> Result<(), AuthError> {
        // Initialize the collection on first run
        let raw = match self.storage.get(USERS_KEY)? {
            Some(raw) => raw,
            None => {
                self.storage.set(USERS_KEY, EMPTY_USERS)?;
                EMPTY_USERS.to_string()
            }
        };

        // Corrupted JSON resets both keys
        let stored = match decode_users(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                error!("Corrupted users value, resetting storage: {}", e);
                return self.reset_storage();
            }
        };

        // Collapse legacy shapes down to at most one record
        let mut users = match normalize_shape(stored) {
            Normalized::Unchanged(users) => users,
            Normalized::Rewritten(users) => {
                info!("Migrated legacy users value to the single-record form");
                self.write_users(&users)?;
                users
            }
            Normalized::Skipped => return Ok(()),
        };

        // Upgrade a legacy plaintext credential in place
        let needs_upgrade = users
            .first()
            .map(|user| !user.password_hash.is_empty() && !user.has_hashed_password())
            .unwrap_or(false);
        if needs_upgrade {
            let user = &mut users[0];
            info!(
                "Upgrading legacy plaintext credential for user: {}",
                user.username
            );
            let plaintext = std::mem::take(&mut user.password_hash);
            user.set_password(&plaintext)?;
            self.write_users(&users)?;
        }

        self.sync_session(users.first())
    }

    /// Bring the session in line with the stored record
    ///
    /// No record clears the session. With a record: an absent session
    /// defaults to it, a session for another username resynchronizes to
    /// it, and a session missing its credential gets the record's hash
    /// copied across.
    fn sync_session(&mut self, user: Option<&UserRecord>) -> Result<(), AuthError> {
        let Some(user) = user else {
            self.storage.remove(CURRENT_USER_KEY)?;
            self.session = None;
            return Ok(());
        };

        let existing = match self.read_session_record() {
            Ok(existing) => existing,
            Err(AuthError::Corrupted { message }) => {
                error!("Corrupted session value, resetting storage: {}", message);
                return self.reset_storage();
            }
            Err(e) => return Err(e),
        };

        match existing {
            None => {
                self.write_session(user)?;
                self.session = Some(Session::new(user.clone()));
            }
            Some(record) if record.username != user.username => {
                warn!(
                    "Session for {:?} does not match stored account {:?}, resynchronizing",
                    record.username, user.username
                );
                self.write_session(user)?;
                self.session = Some(Session::new(user.clone()));
            }
            Some(mut record) => {
                let stale = record.password_hash.is_empty()
                    || (!record.has_hashed_password() && user.has_hashed_password());
                if stale {
                    info!("Repairing session credential for user: {}", record.username);
                    record.password_hash = user.password_hash.clone();
                    self.write_session(&record)?;
                }
                self.session = Some(Session::new(record));
            }
        }
        Ok(())
    }

    /// Persist exactly one record and make it the active session
    ///
    /// The collection is replaced wholesale; records are never appended.
    /// A malformed record (empty username or credential) is a logged
    /// no-op.
    pub fn save_single_user(&mut self, user: &UserRecord) -> Result<(), AuthError> {
        if user.username.is_empty() || user.password_hash.is_empty() {
            warn!("Refusing to save malformed user record");
            return Ok(());
        }
        self.write_users(std::slice::from_ref(user))?;
        self.write_session(user)?;
        self.session = Some(Session::new(user.clone()));
        Ok(())
    }

    /// Register the single account
    ///
    /// Builds a fresh record (new id, current timestamp, hashed
    /// credential) and replaces whatever account existed before - the
    /// store never holds more than one. The new account is immediately
    /// logged in.
    ///
    /// # Errors
    ///
    /// * `AuthError::Validation` - a field is empty after trimming
    /// * `AuthError::Hash` - password hashing failed
    /// * `AuthError::Storage` - the backend failed
    pub fn signup(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() {
            warn!("Signup rejected: empty username");
            return Err(AuthError::validation("username", "Username is required"));
        }
        if password.is_empty() {
            warn!("Signup rejected: empty password");
            return Err(AuthError::validation("password", "Password is required"));
        }

        let user = UserRecord::new(username, password)?;
        self.save_single_user(&user)?;
        info!("User created and logged in: {}", user.username);

        Ok(Session::new(user))
    }

    /// Authenticate against the stored account
    ///
    /// Inputs are trimmed. On success the record is re-saved, refreshing
    /// the single-user state and the session.
    ///
    /// # Errors
    ///
    /// * `AuthError::Credentials` - no stored account, or the username or
    ///   password does not match
    /// * `AuthError::Corrupted` / `AuthError::Storage` - the stored value
    ///   could not be read
    pub fn login(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        let username = username.trim();
        let password = password.trim();
        info!("Login attempt for user: {}", username);

        let Some(user) = self.load_users()?.into_iter().next() else {
            warn!("Login failed: no stored account");
            return Err(AuthError::Credentials);
        };

        if user.username != username || !user.verify_password(password) {
            warn!("Login failed: credential mismatch for user: {}", username);
            return Err(AuthError::Credentials);
        }

        self.save_single_user(&user)?;
        info!("User logged in successfully: {}", user.username);

        Ok(Session::new(user))
    }

    /// Change the stored account's password
    ///
    /// Requires an active session. The new credential is hashed and
    /// written to both the stored record and the session in one save.
    ///
    /// # Errors
    ///
    /// * `AuthError::NoSession` - no session is active
    /// * `AuthError::Credentials` - `current_password` does not match the
    ///   stored record (storage is left unchanged)
    pub fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
    ) -> Result<Session, AuthError> {
        if self.session.is_none() {
            warn!("Password change rejected: no active session");
            return Err(AuthError::NoSession);
        }

        let Some(mut user) = self.load_users()?.into_iter().next() else {
            warn!("Password change failed: no stored account");
            return Err(AuthError::Credentials);
        };

        if !user.verify_password(current_password) {
            warn!(
                "Password change failed: current password mismatch for user: {}",
                user.username
            );
            return Err(AuthError::Credentials);
        }

        user.set_password(new_password)?;
        self.save_single_user(&user)?;
        info!("Password changed for user: {}", user.username);

        Ok(Session::new(user))
    }

    /// End the active session
    ///
    /// Clears only the session pointer; the stored account remains.
    /// Idempotent.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.storage.remove(CURRENT_USER_KEY)?;
        self.session = None;
        info!("User logged out");
        Ok(())
    }

    /// Read the users collection, tolerating legacy shapes
    ///
    /// A shape that is not a users collection reads as empty. Corrupted
    /// JSON aborts the calling operation; the next open resets it.
    fn load_users(&self) -> Result<Vec<UserRecord>, AuthError> {
        let Some(raw) = self.storage.get(USERS_KEY)? else {
            return Ok(Vec::new());
        };
        Ok(match normalize_shape(decode_users(&raw)?) {
            Normalized::Unchanged(users) | Normalized::Rewritten(users) => users,
            Normalized::Skipped => Vec::new(),
        })
    }

    fn read_session_record(&self) -> Result<Option<UserRecord>, AuthError> {
        let Some(raw) = self.storage.get(CURRENT_USER_KEY)? else {
            return Ok(None);
        };
        // A stored `null` counts as no session
        Ok(serde_json::from_str::<Option<UserRecord>>(&raw)?)
    }

    fn write_users(&mut self, users: &[UserRecord]) -> Result<(), AuthError> {
        let text = serde_json::to_string(users)?;
        self.storage.set(USERS_KEY, &text)
    }

    fn write_session(&mut self, user: &UserRecord) -> Result<(), AuthError> {
        let text = serde_json::to_string(user)?;
        self.storage.set(CURRENT_USER_KEY, &text)
    }

    /// Reset both storage keys to absent
    fn reset_storage(&mut self) -> Result<(), AuthError> {
        self.storage.remove(USERS_KEY)?;
        self.storage.remove(CURRENT_USER_KEY)?;
        self.session = None;
        Ok(())
    }
}
