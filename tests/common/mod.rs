//! Shared test helpers
//!
//! Provides storage seeding utilities and tracing setup for the
//! integration tests.

#![allow(dead_code)]

use localauth::{AccountStore, MemoryStorage};

/// Initialize tracing once for integration tests
///
/// Honors `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Open a store over fresh in-memory storage
pub fn open_empty() -> AccountStore<MemoryStorage> {
    init_tracing();
    AccountStore::open(MemoryStorage::new())
}

/// bcrypt cost used for seeded test fixtures (the minimum the algorithm
/// allows, far below `DEFAULT_COST`)
const TEST_COST: u32 = 4;

/// bcrypt-hash a password with the test fixture cost
pub fn hash_password(password: &str) -> String {
    bcrypt::hash(password, TEST_COST).unwrap()
}

/// JSON text for a stored record carrying a legacy plaintext credential
pub fn legacy_record_json(id: &str, username: &str, password: &str, created_at: &str) -> String {
    serde_json::json!({
        "id": id,
        "username": username,
        "password": password,
        "createdAt": created_at,
    })
    .to_string()
}

/// JSON text for a stored record in the current hashed shape
pub fn record_json(id: &str, username: &str, password_hash: &str, created_at: &str) -> String {
    serde_json::json!({
        "id": id,
        "username": username,
        "password_hash": password_hash,
        "createdAt": created_at,
    })
    .to_string()
}
