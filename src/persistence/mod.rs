//! Key-value persistence for progress
//!
//! The core treats storage as an opaque get/set store of strings. Reads fall
//! back to documented defaults when the entry is missing, unreadable or
//! corrupt; writes are best effort and never roll back in-memory state.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys (LocalStorage on web)
pub mod keys {
    pub const COINS: &str = "ecorunner_coins";
    pub const HIGH_SCORE: &str = "ecorunner_highscore";
    pub const PURCHASED_SKINS: &str = "ecorunner_purchased_skins";
    pub const CURRENT_SKIN: &str = "ecorunner_current_skin";
    pub const THEMES: &str = "ecorunner_themes";
    pub const PROMO_CODES: &str = "ecorunner_promo_codes";
    pub const TUNING: &str = "ecorunner_tuning";
}

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Opaque string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw entry
    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Raw entry, if present
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// Open the window's LocalStorage
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

/// Read a raw string, logging backend failures
fn read(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to load {}: {}", key, e);
            None
        }
    }
}

/// Write a raw string, logging and ignoring backend failures
fn write(store: &mut dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        log::warn!("Failed to save {}: {}", key, e);
    }
}

/// Load a JSON blob, or `default()` when missing or unparsable
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    default: impl FnOnce() -> T,
) -> T {
    let Some(json) = read(store, key) else {
        return default();
    };
    match serde_json::from_str(&json) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Corrupt entry {}, using defaults: {}", key, e);
            default()
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => write(store, key, &json),
        Err(e) => log::warn!("Failed to encode {}: {}", key, e),
    }
}

/// Load an unsigned integer, or `default` when missing or unparsable
pub fn load_u64(store: &dyn KeyValueStore, key: &str, default: u64) -> u64 {
    read(store, key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

pub fn save_u64(store: &mut dyn KeyValueStore, key: &str, value: u64) {
    write(store, key, &value.to_string());
}

/// Load a plain string, or `default` when missing or empty
pub fn load_string(store: &dyn KeyValueStore, key: &str, default: &str) -> String {
    read(store, key)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn save_string(store: &mut dyn KeyValueStore, key: &str, value: &str) {
    write(store, key, value);
}

/// A backend that fails every operation
#[cfg(test)]
pub(crate) struct FailingStore;

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Read {
            key: key.to_string(),
            reason: "quota".to_string(),
        })
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write {
            key: key.to_string(),
            reason: "quota".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entries_use_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_u64(&store, keys::COINS, 10), 10);
        assert_eq!(load_string(&store, keys::CURRENT_SKIN, "default"), "default");
        let skins: Vec<String> = load_json(&store, keys::PURCHASED_SKINS, || vec!["default".into()]);
        assert_eq!(skins, vec!["default".to_string()]);
    }

    #[test]
    fn test_unparsable_number_uses_default() {
        let mut store = MemoryStore::new();
        store.insert(keys::COINS, "lots");
        assert_eq!(load_u64(&store, keys::COINS, 10), 10);
        store.insert(keys::COINS, "-5");
        assert_eq!(load_u64(&store, keys::COINS, 10), 10);
        store.insert(keys::COINS, "250");
        assert_eq!(load_u64(&store, keys::COINS, 10), 250);
    }

    #[test]
    fn test_failing_backend_falls_back() {
        let mut store = FailingStore;
        assert_eq!(load_u64(&store, keys::HIGH_SCORE, 0), 0);
        // Writes are swallowed
        save_u64(&mut store, keys::HIGH_SCORE, 7);
        save_json(&mut store, keys::PURCHASED_SKINS, &["default"]);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut store = MemoryStore::new();
        save_json(&mut store, keys::PURCHASED_SKINS, &vec!["default", "red"]);
        assert_eq!(store.raw(keys::PURCHASED_SKINS), Some(r#"["default","red"]"#));
    }
}
