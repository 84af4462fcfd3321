//! Durable key-value storage for client state.
//!
//! Stands in for browser local storage: string values under short string keys,
//! read once at start-up and rewritten after every relevant mutation.
//!
//! # Backends
//!
//! - [`FileStorage`] - one file per key under a directory
//! - [`MemoryStorage`] - process-local map, used by tests and ephemeral sessions
//!
//! Callers never see storage failures: [`load_json`] and [`save_json`] log and
//! absorb them, so a broken disk degrades to "nothing remembered" rather than
//! an error.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Key holding the serialized cart snapshot.
pub const CART_KEY: &str = "cartState";
/// Key holding the serialized signed-in user.
pub const USER_KEY: &str = "sabriaz_user";
/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "sabriaz_token";
/// Key holding ids of orders placed without an account.
pub const GUEST_ORDERS_KEY: &str = "guest_orders";

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A previous writer panicked while holding the lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string key-value store.
pub trait Storage: Send + Sync {
    /// Read the value under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value, absorbing every failure.
///
/// Absent keys, read errors and undecodable payloads all yield `None`; the
/// latter two are logged.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, key, "Failed to read persisted state");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, key, "Discarding corrupt persisted state");
            None
        }
    }
}

/// Encode and write a JSON value, absorbing every failure.
///
/// Returns whether the write landed, for callers that want to report it.
pub fn save_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) -> bool {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!(error = %e, key, "Failed to encode state for persistence");
            return false;
        }
    };
    write_raw(storage, key, &encoded)
}

/// Write a raw string value, absorbing failure.
pub fn write_raw(storage: &dyn Storage, key: &str, value: &str) -> bool {
    match storage.set(key, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, key, "Failed to persist state");
            false
        }
    }
}

/// Remove a key, absorbing failure.
pub fn remove_quietly(storage: &dyn Storage, key: &str) -> bool {
    match storage.remove(key) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, key, "Failed to remove persisted state");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(load_json::<Vec<String>>(&storage, "nothing"), None);
    }

    #[test]
    fn test_load_corrupt_value() {
        let storage = MemoryStorage::new();
        storage.set(GUEST_ORDERS_KEY, "{not json").unwrap();
        assert_eq!(load_json::<Vec<String>>(&storage, GUEST_ORDERS_KEY), None);
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        assert!(save_json(&storage, GUEST_ORDERS_KEY, &["o1", "o2"]));
        assert_eq!(
            load_json::<Vec<String>>(&storage, GUEST_ORDERS_KEY),
            Some(vec!["o1".to_string(), "o2".to_string()])
        );
    }
}
