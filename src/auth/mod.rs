//! Session Store Module
//!
//! This module implements the account store: at most one persisted user
//! record, an optional active session pointing at it, migration of legacy
//! storage shapes, and the signup/login/logout/change-password operations.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User record model and credential hashing
//! ├── sessions.rs     - The active session type
//! ├── migrate.rs      - Legacy storage-shape decoding and collapse
//! └── store.rs        - The account store operations
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: validate input → create record (fresh id, hashed
//!    credential) → replace the stored collection → session active
//! 2. **Login**: look up the single record → verify credential → re-save →
//!    session active
//! 3. **Change password**: require session → verify current credential →
//!    re-hash → persist to record and session
//! 4. **Logout**: clear the session pointer only; the record stays
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Legacy plaintext credentials are upgraded in place on open
//! - Credential failures share one error variant (no information leakage)

/// User record model and credential hashing
pub mod users;

/// The active session type
pub mod sessions;

/// Legacy storage-shape decoding and collapse
pub(crate) mod migrate;

/// The account store operations
pub mod store;

// Re-export commonly used types
pub use sessions::Session;
pub use store::AccountStore;
pub use users::UserRecord;
