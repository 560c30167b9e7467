//! Storage Backends
//!
//! The account store reads and writes string-keyed, JSON-text-valued
//! storage through the [`Storage`] trait. Isolating storage behind this
//! seam lets tests substitute the in-memory backend for the file-backed
//! one without touching store logic.
//!
//! # Module Structure
//!
//! ```text
//! storage/
//! ├── mod.rs      - Storage trait and key constants
//! ├── memory.rs   - In-memory backend
//! └── file.rs     - File-per-key backend with atomic writes
//! ```

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::shared::error::AuthError;

/// Storage key holding the persisted users collection (JSON array of zero
/// or one record)
pub const USERS_KEY: &str = "users";

/// Storage key holding the active session record (JSON record or absent)
pub const CURRENT_USER_KEY: &str = "currentUser";

/// String-keyed, JSON-text-valued storage
///
/// Values are opaque text to the backend; the store layers JSON semantics
/// on top. Backends are not required to validate what they are given.
pub trait Storage {
    /// Read the raw text stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, AuthError>;

    /// Overwrite the raw text stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), AuthError>;

    /// Remove `key` and its value
    ///
    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), AuthError>;
}
