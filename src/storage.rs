//! Persisted key/value storage.
//!
//! The browser build keeps a handful of keys in `localStorage`; here they
//! live in `~/.pageshell/local_storage.json` (or under a configured data
//! directory). Reads never fail: a missing or corrupt file reads as empty.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ShellError, ShellResult};

/// The storage directory name under the home directory.
const STORAGE_DIR: &str = ".pageshell";

/// The storage file name.
const STORAGE_FILE: &str = "local_storage.json";

/// String key/value storage surviving restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ShellResult<()>;
    fn remove(&self, key: &str) -> ShellResult<()>;
}

/// One persisted value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredEntry {
    pub value: String,
    pub saved_at: DateTime<Utc>,
}

/// JSON-file backed store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at `~/.pageshell/local_storage.json`.
    pub fn new() -> ShellResult<Self> {
        let home = dirs::home_dir().ok_or(ShellError::NoHomeDirectory)?;
        Ok(Self::in_dir(home.join(STORAGE_DIR)))
    }

    /// Store at `<dir>/local_storage.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every entry. Missing or unreadable files load as empty.
    pub fn load(&self) -> BTreeMap<String, StoredEntry> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(_) => return BTreeMap::new(),
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring corrupt storage file: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, StoredEntry>) -> ShellResult<()> {
        let io_err = |source| ShellError::Storage {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = File::create(&self.path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.flush().map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: &str) -> ShellResult<()> {
        let mut entries = self.load();
        entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                saved_at: Utc::now(),
            },
        );
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> ShellResult<()> {
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ShellResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ShellResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
