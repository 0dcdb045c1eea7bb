//! JSON file-based key-value store.
//!
//! This module provides a simple, human-readable store implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - loads the entire file into memory once
//! - **Write**: O(n) - serializes and writes the entire dataset on every `set`
//! - **Best for**: a handful of trees with a few hundred nodes each

use crate::domain::error::{Result, TreeError};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Version of the container format for future migrations.
    version: u32,

    /// Raw values by key.
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file key-value store.
///
/// The whole dataset is kept in memory and written through on every change,
/// so a successful `set` or `delete` is durable when it returns.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "te_lastselected": "te_tree_20240309070501000",
///     "te_tree_20240309070501000": "{\"version\":\"1\",\"history\":[...]}"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the file.
    data: StoreData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonFileStore {
    /// Creates or opens a JSON file store.
    ///
    /// If the file exists, loads existing data. Otherwise starts empty; the
    /// file is created on the first write. Parent directories are created
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(entry_count = data.entries.len(), "store opened");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| TreeError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            entries = data.entries.len(),
            "loaded store data"
        );

        Ok(data)
    }

    /// Writes the in-memory data to disk via a temporary file and rename.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| TreeError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_set", key = %key, bytes = value.len()).entered();

        if self.data.entries.get(key).is_some_and(|existing| existing == value) {
            return Ok(());
        }
        self.data.entries.insert(key.to_string(), value.to_string());
        self.dirty = true;
        self.save_to_file()
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_delete", key = %key).entered();

        if self.data.entries.remove(key).is_some() {
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .data
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
