//! # Key/value storage seam
//!
//! Session data lives in a flat, string-valued key/value store: the browser's
//! `localStorage` on the web platform ([`crate::LocalStorage`]) and an in-memory
//! map everywhere else ([`crate::MemoryStorage`]). [`KeyValueStore`] is the only
//! way the session layer touches either of them.
//!
//! Calls are synchronous. `localStorage` is a blocking API and every read or
//! write here is a single step, so there is nothing to await.

use thiserror::Error;

/// Failure reported by a [`KeyValueStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backend cannot be reached at all (no window, storage disabled,
    /// poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// A single operation failed, e.g. the quota was exceeded.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Synchronous string key/value store.
pub trait KeyValueStore {
    /// Read `key`. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
