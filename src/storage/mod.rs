//! Storage layer for persisted trees.
//!
//! This module provides the key-value persistence abstraction, its
//! implementations, the stored document format and the tree catalog built on
//! top of them.
//!
//! # Modules
//!
//! - `backend`: key-value trait abstraction for backend implementations
//! - `json`: JSON file-based store (default)
//! - `memory`: in-process store
//! - `models`: stored tree document and key constants
//! - `workspace`: tree catalog, selection, import and export

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;
pub mod workspace;

pub use backend::KeyValueStore;
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{TreeDocument, SELECTED_TREE_KEY, TREE_KEY_PREFIX};
pub use workspace::{ExportedTree, TreeTab, Workspace};
