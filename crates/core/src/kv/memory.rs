//! In-memory key-value store

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, PersistenceError};

/// In-memory store backed by `HashMap<String, String>`
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    /// Create a new empty MemoryKv
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self.entries.read().map_err(|_| PersistenceError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PersistenceError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PersistenceError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
