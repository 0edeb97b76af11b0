//! Key-value persistence
//!
//! The ledger and settings only need whole-value get/set against string keys.
//! Values are JSON documents. Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `FileStore`: one `<key>.json` file per key in a directory (native)
//! - `platform::web::LocalStore`: browser LocalStorage (wasm32)

mod file;

pub use file::FileStore;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage failure. Always recovered by the caller; never fatal.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O failed for key \"{key}\": {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed value for key \"{key}\": {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Minimal durable key-value store
pub trait KeyValueStore {
    /// Read a raw value; `Ok(None)` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Read and decode a JSON value
pub fn load_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Malformed {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a JSON value, replacing whatever was there
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Malformed {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value (e.g. a corrupted payload in tests)
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip_through_memory() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "ids", &vec!["A".to_string(), "B".to_string()]).unwrap();
        assert_eq!(store.raw("ids"), Some(r#"["A","B"]"#));
        let ids: Option<Vec<String>> = load_json(&store, "ids").unwrap();
        assert_eq!(ids, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        let v: Option<Vec<String>> = load_json(&store, "nothing").unwrap();
        assert!(v.is_none());
    }

    #[test]
    fn test_malformed_value_is_error() {
        let store = MemoryStore::new().with_value("ids", "{not json");
        let err = load_json::<Vec<String>>(&store, "ids").unwrap_err();
        assert!(matches!(err, StorageError::Malformed { ref key, .. } if key == "ids"));
    }

    #[test]
    fn test_set_replaces_whole_value() {
        let mut store = MemoryStore::new();
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    }
}
