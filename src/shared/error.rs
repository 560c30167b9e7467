//! Shared Error Types
//!
//! This module defines the error type used throughout the crate.
//!
//! # Error Categories
//!
//! - `Validation` - a required field is missing or empty
//! - `Credentials` - credential mismatch (including "no stored account")
//! - `NoSession` - the operation requires an active session
//! - `Corrupted` - stored JSON failed to parse
//! - `Storage` - the storage backend failed
//! - `Hash` - password hashing failed
//!
//! # Usage
//!
//! ```rust
//! use localauth::shared::error::AuthError;
//!
//! // Create a validation error
//! let error = AuthError::validation("username", "Username is required");
//! ```
use thiserror::Error;

/// Errors produced by the account store and its storage backends
#[derive(Debug, Error, Clone)]
pub enum AuthError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Credential mismatch
    ///
    /// Covers a wrong username, a wrong password, and the absence of any
    /// stored account. One variant, so callers cannot distinguish the
    /// cases (no information leakage).
    #[error("Invalid username or password")]
    Credentials,

    /// The operation requires an active session, but none exists
    #[error("No active session")]
    NoSession,

    /// Stored JSON failed to parse
    ///
    /// Handled on open by resetting both storage keys; during an
    /// operation it aborts that operation without mutating state.
    #[error("Corrupted storage: {message}")]
    Corrupted {
        /// Human-readable error message
        message: String,
    },

    /// Storage backend error
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message
        message: String,
    },

    /// Password hashing error
    #[error("Password hashing error: {message}")]
    Hash {
        /// Human-readable error message
        message: String,
    },
}

impl AuthError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new corruption error
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::corrupted(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Hash {
            message: err.to_string(),
        }
    }
}
