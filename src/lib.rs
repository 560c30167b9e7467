//! LocalAuth - Main Library
//!
//! LocalAuth is a local, single-account credential and session store. It
//! persists at most one user record as JSON text under string keys, tracks
//! an optional active session pointing at that record, migrates legacy
//! storage shapes on open, and exposes the signup/login/logout/change-
//! password operations an embedding application wires to its UI.
//!
//! # Overview
//!
//! There is no server and no network: everything happens against a local
//! storage backend supplied by the embedder. Two backends ship with the
//! crate - an in-memory map and a file-per-key store - and anything else
//! can be plugged in through the [`Storage`] trait.
//!
//! # Module Structure
//!
//! The library is organized into three main modules:
//!
//! - **`shared`** - Types used across the crate
//!   - Error types
//!   - Store configuration
//!
//! - **`auth`** - The session store itself
//!   - User record model and credential hashing
//!   - Session type
//!   - Legacy storage-shape migration
//!   - The account store operations
//!
//! - **`storage`** - Storage backends
//!   - The `Storage` repository trait
//!   - In-memory backend (tests, ephemeral embedding)
//!   - File backend (one JSON file per key, atomic writes)
//!
//! # Usage
//!
//! ```rust
//! use localauth::{AccountStore, MemoryStorage};
//!
//! # fn example() -> Result<(), localauth::AuthError> {
//! let mut store = AccountStore::open(MemoryStorage::new());
//!
//! let session = store.signup("alice", "correct horse battery staple")?;
//! assert_eq!(session.username(), "alice");
//!
//! store.logout()?;
//! assert!(!store.is_authenticated());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Concurrency
//!
//! The store is synchronous and single-threaded by design: operations take
//! `&mut self` and complete before returning. The original environment is a
//! single-threaded UI event loop; the exclusive borrow encodes the same
//! discipline.
//!
//! # Error Handling
//!
//! All fallible operations return `Result<_, AuthError>`. Nothing is fatal:
//! corrupted storage is reset on open, and rejected operations leave the
//! persisted state untouched.

/// Types shared across the crate
pub mod shared;

/// The session store: records, sessions, migration, operations
pub mod auth;

/// Storage backends
pub mod storage;

// Re-export commonly used types
pub use auth::sessions::Session;
pub use auth::store::AccountStore;
pub use auth::users::UserRecord;
pub use shared::config::{StoreConfig, StoreConfigBuilder};
pub use shared::error::AuthError;
pub use storage::{FileStorage, MemoryStorage, Storage};
