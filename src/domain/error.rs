//! Error types for the tree explorer.
//!
//! This module defines the centralized error type [`TreeError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate.
//!
//! # Error Classes
//!
//! - **Corruption** (`DuplicateId`, `UnknownId`, `InvalidAction`, `CorruptedHistory`):
//!   the action log disagrees with itself. These abort the operation; the tree
//!   state is never patched to make them go away.
//! - **User input** (`Import`): rejected atomically, prior state unchanged.
//! - **Environment** (`Storage`, `Io`, `Config`): persistence and setup failures.
//!
//! # Examples
//!
//! ```
//! use tree_explorer::domain::{NodeId, TreeError};
//!
//! let err = TreeError::DuplicateId(NodeId::from("root"));
//! assert_eq!(err.to_string(), "node 'root' already exists");
//! ```

use super::node::NodeId;
use thiserror::Error;

/// The main error type for tree explorer operations.
#[derive(Debug, Error)]
pub enum TreeError {
    /// An `Add` action named an id that is already present in the table.
    #[error("node '{0}' already exists")]
    DuplicateId(NodeId),

    /// A `Remove`/`Modify` action (or an `Add` parent reference) named an id
    /// that is not present in the table.
    #[error("node '{0}' does not exist")]
    UnknownId(NodeId),

    /// The action would break the single-rooted tree shape.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Replaying a history failed at the given entry.
    ///
    /// Returned by `rebuild`; the live table is left untouched.
    #[error("history corrupted at entry {index}: {source}")]
    CorruptedHistory {
        /// Zero-based position of the failing entry in the history.
        index: usize,
        /// The error the failing entry produced.
        #[source]
        source: Box<TreeError>,
    },

    /// An imported document was rejected.
    #[error("Import error: {0}")]
    Import(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TreeError {
    /// Returns `true` for errors that mean the action log is inconsistent.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId(_)
                | Self::UnknownId(_)
                | Self::InvalidAction(_)
                | Self::CorruptedHistory { .. }
        )
    }
}

/// A specialized `Result` type for tree explorer operations.
pub type Result<T> = std::result::Result<T, TreeError>;
