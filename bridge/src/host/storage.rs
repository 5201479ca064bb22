//! File-backed local storage.
//!
//! The native counterpart of the WebView's `localStorage`: a flat JSON object
//! of string keys to string values kept in `<dir>/local-storage.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_STORAGE_DIR;
use crate::error::StorageResult;

const STORAGE_FILE: &str = "local-storage.json";

/// Key/value store persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage in the default directory (relative to current dir).
    pub fn new() -> Self {
        Self::with_dir(DEFAULT_STORAGE_DIR)
    }

    /// Storage in a custom directory.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    /// Read a value. A missing file is an empty store.
    pub fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    /// Write a value, creating the storage directory if needed.
    pub fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    /// Remove a value. Returns whether it was present.
    pub fn remove_item(&self, key: &str) -> StorageResult<bool> {
        let mut items = self.load()?;
        let removed = items.remove(key).is_some();
        if removed {
            self.save(&items)?;
        }
        Ok(removed)
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        let path = self.path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, items: &BTreeMap<String, String>) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(items)?;
        fs::write(self.path(), content)?;
        Ok(())
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}
