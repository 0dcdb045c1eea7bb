//! The derived node table.
//!
//! [`NodeTable`] is the current state of a tree: the left fold of its history.
//! It keeps nodes in insertion order (the order of their `Add` actions) and a
//! per-parent child list, also in insertion order, which drives the angular
//! placement of children.

use crate::domain::{Action, Node, NodeChanges, NodeId, Result, TreeError};
use std::collections::HashMap;

/// Describes what a successfully applied action changed.
///
/// Callers use it to scope layout-cache invalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChange {
    /// A node was inserted under `parent`.
    Added {
        /// The new node.
        id: NodeId,
        /// Its parent, `None` for the root.
        parent: Option<NodeId>,
    },
    /// A subtree was removed.
    Removed {
        /// Parent of the removed subtree root.
        parent: Option<NodeId>,
        /// Every removed id, children before their parents; the subtree root is last.
        removed: Vec<NodeId>,
    },
    /// Fields of a node were updated.
    Modified {
        /// The modified node.
        id: NodeId,
        /// Whether the size tier changed value.
        size_changed: bool,
        /// Whether the label changed value.
        text_changed: bool,
    },
}

/// Current nodes of one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeTable {
    order: Vec<NodeId>,
    nodes: HashMap<NodeId, Node>,
    children: HashMap<NodeId, Vec<NodeId>>,
    root: Option<NodeId>,
}

impl NodeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `history` from empty, failing fast on the first inconsistent entry.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::CorruptedHistory`] carrying the entry index and
    /// the error that entry produced.
    pub fn replay(history: &[Action]) -> Result<Self> {
        let mut table = Self::new();
        for (index, action) in history.iter().enumerate() {
            table
                .apply(action)
                .map_err(|source| TreeError::CorruptedHistory {
                    index,
                    source: Box::new(source),
                })?;
        }
        Ok(table)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the table has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns `true` if `id` is present.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Id of the root node.
    #[must_use]
    pub const fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    /// Node ids in table (insertion) order.
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes in table (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Direct children of `id` in insertion order.
    #[must_use]
    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.children.get(id).map_or(&[], Vec::as_slice)
    }

    /// Every id of the tree ordered so that each node's children precede it.
    #[must_use]
    pub fn post_order(&self) -> Vec<NodeId> {
        self.root
            .as_ref()
            .map_or_else(Vec::new, |root| self.subtree_post_order(root))
    }

    /// Ids of the subtree rooted at `id`, children before parents, `id` last.
    ///
    /// Walks with an explicit stack so arbitrarily deep trees do not grow the
    /// call stack. Siblings are visited in insertion order.
    #[must_use]
    pub fn subtree_post_order(&self, id: &NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut stack: Vec<(&NodeId, bool)> = vec![(id, false)];

        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                out.push(current.clone());
                continue;
            }
            stack.push((current, true));
            for child in self.children(current).iter().rev() {
                stack.push((child, false));
            }
        }

        out
    }

    /// Ids of the subtree rooted at `id`, parents before children.
    #[must_use]
    pub fn subtree_pre_order(&self, id: &NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current.clone());
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Applies one action, validating it first.
    ///
    /// The table is unchanged when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`TreeError::DuplicateId`] for an `Add` of an existing id
    /// - [`TreeError::UnknownId`] for a missing target or `Add` parent
    /// - [`TreeError::InvalidAction`] for a second root or removal of the root
    pub fn apply(&mut self, action: &Action) -> Result<TreeChange> {
        match action {
            Action::Add(node) => self.add(node),
            Action::Remove(node) => self.remove(&node.id),
            Action::Modify(changes) => self.modify(changes),
        }
    }

    fn add(&mut self, node: &Node) -> Result<TreeChange> {
        if self.contains(&node.id) {
            return Err(TreeError::DuplicateId(node.id.clone()));
        }

        match &node.parent_id {
            None => {
                if let Some(root) = &self.root {
                    return Err(TreeError::InvalidAction(format!(
                        "cannot add second root '{}' (root is '{root}')",
                        node.id
                    )));
                }
                self.root = Some(node.id.clone());
            }
            Some(parent) => {
                if !self.contains(parent) {
                    return Err(TreeError::UnknownId(parent.clone()));
                }
                self.children
                    .entry(parent.clone())
                    .or_default()
                    .push(node.id.clone());
            }
        }

        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node.clone());

        Ok(TreeChange::Added {
            id: node.id.clone(),
            parent: node.parent_id.clone(),
        })
    }

    fn remove(&mut self, id: &NodeId) -> Result<TreeChange> {
        let parent = match self.nodes.get(id) {
            None => return Err(TreeError::UnknownId(id.clone())),
            Some(node) => node.parent_id.clone(),
        };
        if parent.is_none() {
            return Err(TreeError::InvalidAction(format!(
                "cannot remove root '{id}'"
            )));
        }

        let removed = self.subtree_post_order(id);
        for doomed in &removed {
            self.nodes.remove(doomed);
            self.children.remove(doomed);
        }
        self.order.retain(|candidate| !removed.contains(candidate));

        if let Some(siblings) = parent.as_ref().and_then(|p| self.children.get_mut(p)) {
            siblings.retain(|candidate| candidate != id);
        }

        Ok(TreeChange::Removed { parent, removed })
    }

    fn modify(&mut self, changes: &NodeChanges) -> Result<TreeChange> {
        let node = self
            .nodes
            .get_mut(&changes.id)
            .ok_or_else(|| TreeError::UnknownId(changes.id.clone()))?;

        let mut text_changed = false;
        if let Some(text) = &changes.text {
            text_changed = &node.text != text;
            node.text.clone_from(text);
        }

        let mut size_changed = false;
        if let Some(size) = changes.size_indicator {
            size_changed = node.size_indicator != size;
            node.size_indicator = size;
        }

        Ok(TreeChange::Modified {
            id: changes.id.clone(),
            size_changed,
            text_changed,
        })
    }
}
