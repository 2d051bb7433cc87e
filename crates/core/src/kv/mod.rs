//! Key-value storage abstraction layer
//!
//! Provides a `KeyValueStore` trait that decouples persisted app state from the
//! underlying storage. Two implementations:
//! - `MemoryKv`: in-memory map (tests, ephemeral sessions)
//! - `FileKv`: a single JSON document on disk (default for the CLI host)

pub mod file;
pub mod memory;

pub use file::FileKv;
pub use memory::MemoryKv;

use std::path::PathBuf;

/// Failure while reading or writing durable local state.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize stored value: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Durable string key-value storage provided by the host.
///
/// Values are opaque strings; structured data is stored as JSON by the caller.
/// Returns owned values so callers don't hold locks.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Reads a JSON-encoded value, treating missing keys and undecodable data as absent.
pub fn load_json<T: serde::de::DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring undecodable stored value");
            None
        }
    }
}

/// A stored JSON array decoded element by element.
///
/// Elements that don't decode are kept verbatim so a later save writes them
/// back instead of dropping them.
#[derive(Debug)]
pub struct JsonList<T> {
    pub items: Vec<T>,
    pub unreadable: Vec<serde_json::Value>,
}

impl<T> Default for JsonList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            unreadable: Vec::new(),
        }
    }
}

/// Reads a JSON array under `key`, skipping elements that fail to decode.
pub fn load_json_list<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> JsonList<T> {
    let Some(values) = load_json::<Vec<serde_json::Value>>(store, key) else {
        return JsonList::default();
    };
    let mut list = JsonList::default();
    for value in values {
        match serde_json::from_value(value.clone()) {
            Ok(item) => list.items.push(item),
            Err(e) => {
                tracing::warn!(key, error = %e, "keeping undecodable entry as-is");
                list.unreadable.push(value);
            }
        }
    }
    list
}

/// Writes `items` followed by the entries that could not be decoded on load.
pub fn save_json_list<T: serde::Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
    unreadable: &[serde_json::Value],
) -> Result<(), PersistenceError> {
    let mut values = Vec::with_capacity(items.len() + unreadable.len());
    for item in items {
        values.push(serde_json::to_value(item)?);
    }
    values.extend(unreadable.iter().cloned());
    save_json(store, key, &values)
}

/// Writes a value as JSON.
pub fn save_json<T: serde::Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
