//! JSON-file key-value store (`~/.config/pantry/state.json`)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{KeyValueStore, PersistenceError};

const STATE_FILENAME: &str = "state.json";

/// Returns `~/.config/pantry/`, creating it if needed.
pub fn config_dir() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join("pantry");
    if !dir.exists() {
        fs::create_dir_all(&dir).ok()?;
    }
    Some(dir)
}

/// Default location of the state file.
pub fn default_state_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(STATE_FILENAME))
}

/// Key-value store persisted as one pretty-printed JSON object.
///
/// The whole document is cached in memory and rewritten on every mutation via a
/// temp file + rename, so readers never observe a half-written file.
#[derive(Debug)]
pub struct FileKv {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKv {
    /// Open the store at `path`. A missing file is an empty store; an unreadable
    /// document is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_document(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        let io_err = |source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

fn read_document(path: &Path) -> BTreeMap<String, String> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read state file");
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "state file is corrupt, starting empty");
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self.entries.lock().map_err(|_| PersistenceError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.lock().map_err(|_| PersistenceError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.lock().map_err(|_| PersistenceError::Poisoned)?;
        if entries.remove(key).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.persist(&entries)
    }
}
