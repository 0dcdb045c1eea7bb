//! Stored tree documents.
//!
//! A tree is persisted as one JSON document under its own key:
//!
//! ```json
//! { "version": "1", "history": [ { "action": "add", "item": { ... } } ] }
//! ```
//!
//! These types are separate from [`crate::tree::TreeStore`] so the storage
//! representation can change without touching the event-sourced state.

use crate::domain::{Action, Node, Result, TreeError};
use serde::{Deserialize, Serialize};

/// Prefix shared by every stored tree key.
pub const TREE_KEY_PREFIX: &str = "te_tree_";

/// Key holding the storage key of the selected tree.
pub const SELECTED_TREE_KEY: &str = "te_lastselected";

/// Document format version written by this crate.
pub const DOCUMENT_VERSION: &str = "1";

/// Label and id of the root of a freshly created tree.
pub const NEW_TREE_ROOT_ID: &str = "root";
/// Default label for new trees and new nodes.
pub const NEW_NODE_TEXT: &str = "New";

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// Persisted form of one tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDocument {
    /// Document format version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Full action history.
    pub history: Vec<Action>,
}

impl TreeDocument {
    /// Wraps a history in a current-version document.
    #[must_use]
    pub fn new(history: Vec<Action>) -> Self {
        Self {
            version: default_version(),
            history,
        }
    }

    /// Document of a brand new tree: a single large root labelled "New".
    #[must_use]
    pub fn new_tree() -> Self {
        Self::new(vec![Action::Add(Node::root(NEW_TREE_ROOT_ID, NEW_NODE_TEXT))])
    }

    /// Decodes a stored document.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Storage`] if `json` is not a valid tree document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TreeError::Storage(format!("invalid tree document: {e}")))
    }

    /// Encodes the document compactly.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Storage`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| TreeError::Storage(format!("failed to serialize tree document: {e}")))
    }
}
