//! Key-value persistence abstraction.
//!
//! This module defines the [`KeyValueStore`] trait the workspace writes tree
//! documents through. It mirrors the narrow interface a browser-style local
//! store offers: string keys, string values, prefix listing.
//!
//! # Implementations
//!
//! - [`crate::storage::JsonFileStore`]: one JSON file, atomic writes (default)
//! - [`crate::storage::MemoryStore`]: in-process map, used by tests and headless runs

use crate::domain::error::Result;

/// Abstraction over persistent key-value backends.
///
/// Writes are synchronous and durable once the call returns.
///
/// # Examples
///
/// ```
/// use tree_explorer::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.set("te_tree_1", "{}")?;
/// assert_eq!(store.get("te_tree_1")?.as_deref(), Some("{}"));
/// assert_eq!(store.list_keys("te_tree_")?, vec!["te_tree_1".to_string()]);
/// # Ok::<(), tree_explorer::TreeError>(())
/// ```
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Returns every key starting with `prefix`, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).list_keys(prefix)
    }
}
