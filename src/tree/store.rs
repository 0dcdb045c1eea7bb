//! Event-sourced tree state.
//!
//! [`TreeStore`] owns a tree's append-only history and the node table derived
//! from it. The only ways to change the table are [`TreeStore::append`] and
//! [`TreeStore::rebuild`], so `NodeTable::replay(history) == table` holds at
//! all times.

use super::table::{NodeTable, TreeChange};
use crate::domain::{Action, Node, NodeId, Result};

/// History plus derived node table for one tree.
#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    history: Vec<Action>,
    table: NodeTable,
}

impl TreeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store by replaying `history`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TreeError::CorruptedHistory`] if the history is not
    /// internally consistent.
    pub fn from_history(history: Vec<Action>) -> Result<Self> {
        let mut store = Self::new();
        store.rebuild(history)?;
        Ok(store)
    }

    /// Validates and applies `action`, then records it in the history.
    ///
    /// A `Remove` cascades: every descendant is removed first, children before
    /// parents. The returned [`TreeChange`] tells the caller which layout
    /// entries are stale.
    ///
    /// # Errors
    ///
    /// - [`crate::TreeError::DuplicateId`] if an `Add` id is already present
    /// - [`crate::TreeError::UnknownId`] if a `Remove`/`Modify` target is absent
    /// - [`crate::TreeError::InvalidAction`] for a second root or removing the root
    ///
    /// Nothing is recorded when an error is returned.
    pub fn append(&mut self, action: Action) -> Result<TreeChange> {
        let _span = tracing::debug_span!("tree_append",
            action = action.kind(),
            target = %action.target()
        )
        .entered();

        let change = self.table.apply(&action).map_err(|e| {
            tracing::warn!(error = %e, "rejected history action");
            e
        })?;
        self.history.push(action);

        tracing::debug!(
            history_len = self.history.len(),
            node_count = self.table.len(),
            "action appended"
        );
        Ok(change)
    }

    /// Discards the current table and replays `history` from empty.
    ///
    /// The store is left unchanged if replay fails.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TreeError::CorruptedHistory`] for the first entry
    /// that does not apply cleanly.
    pub fn rebuild(&mut self, history: Vec<Action>) -> Result<()> {
        let _span = tracing::debug_span!("tree_rebuild", entries = history.len()).entered();

        let table = NodeTable::replay(&history).map_err(|e| {
            tracing::error!(error = %e, "history replay failed");
            e
        })?;

        self.table = table;
        self.history = history;

        tracing::debug!(node_count = self.table.len(), "tree rebuilt from history");
        Ok(())
    }

    /// Direct children of `id` in insertion order.
    #[must_use]
    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.table.children(id)
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.table.get(id)
    }

    /// Id of the root node.
    #[must_use]
    pub const fn root(&self) -> Option<&NodeId> {
        self.table.root()
    }

    /// The derived node table.
    #[must_use]
    pub const fn table(&self) -> &NodeTable {
        &self.table
    }

    /// The full action history.
    #[must_use]
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Returns `true` if replaying the history reproduces the table.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        NodeTable::replay(&self.history).is_ok_and(|replayed| replayed == self.table)
    }
}
