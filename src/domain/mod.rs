//! Domain layer for the tree explorer.
//!
//! This module contains the core value types shared by every other layer,
//! independent of storage, layout or input handling.
//!
//! # Organization
//!
//! - [`action`]: history entries (`Add`, `Remove`, `Modify`)
//! - [`error`]: error types and result alias
//! - [`ids`]: timestamp-based id generation
//! - [`node`]: node model and size tiers
//!
//! # Examples
//!
//! ```
//! use tree_explorer::domain::{Action, Node, SizeIndicator};
//!
//! let history = vec![
//!     Action::Add(Node::root("root", "Plans")),
//!     Action::Add(Node::child("a", "root", "Garden", SizeIndicator::Medium)),
//! ];
//! assert_eq!(history[1].kind(), "add");
//! ```

pub mod action;
pub mod error;
pub mod ids;
pub mod node;

pub use action::{Action, NodeChanges, NodeRef};
pub use error::{Result, TreeError};
pub use ids::{flat_timestamp, IdGenerator};
pub use node::{Node, NodeId, SizeIndicator};
