//! History actions.
//!
//! An [`Action`] is one entry of a tree's append-only history. The node table
//! is the left fold of all actions starting from empty.
//!
//! # Wire Format
//!
//! ```json
//! { "action": "add",    "item": { "id": "a", "parentId": "root", "text": "New", "sizeIndicator": 3 } }
//! { "action": "modify", "item": { "id": "a", "sizeIndicator": 2 } }
//! { "action": "remove", "item": { "id": "a" } }
//! ```

use super::node::{Node, NodeId, SizeIndicator};
use serde::{Deserialize, Serialize};

/// Reference to an existing node by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    /// Target node id.
    pub id: NodeId,
}

/// Partial update of a node's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeChanges {
    /// Target node id.
    pub id: NodeId,
    /// New label text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New size tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_indicator: Option<SizeIndicator>,
}

impl NodeChanges {
    /// A text-only change.
    pub fn text(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            size_indicator: None,
        }
    }

    /// A size-only change.
    pub fn size(id: impl Into<NodeId>, size_indicator: SizeIndicator) -> Self {
        Self {
            id: id.into(),
            text: None,
            size_indicator: Some(size_indicator),
        }
    }
}

/// One history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "item", rename_all = "lowercase")]
pub enum Action {
    /// Inserts a new node.
    Add(Node),
    /// Removes a node and, first, all of its descendants.
    Remove(NodeRef),
    /// Updates fields of an existing node.
    Modify(NodeChanges),
}

impl Action {
    /// Builds a `Remove` action.
    pub fn remove(id: impl Into<NodeId>) -> Self {
        Self::Remove(NodeRef { id: id.into() })
    }

    /// Id of the node the action targets.
    #[must_use]
    pub const fn target(&self) -> &NodeId {
        match self {
            Self::Add(node) => &node.id,
            Self::Remove(node) => &node.id,
            Self::Modify(changes) => &changes.id,
        }
    }

    /// Short lowercase name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Modify(_) => "modify",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_use_the_tagged_history_format() {
        let add = Action::Add(Node::child("a", "root", "New", SizeIndicator::Large));
        assert_eq!(
            serde_json::to_string(&add).unwrap(),
            r#"{"action":"add","item":{"id":"a","parentId":"root","text":"New","sizeIndicator":3}}"#
        );
        assert_eq!(
            serde_json::to_string(&Action::remove("a")).unwrap(),
            r#"{"action":"remove","item":{"id":"a"}}"#
        );

        let modify: Action =
            serde_json::from_str(r#"{"action":"modify","item":{"id":"a","sizeIndicator":"2"}}"#)
                .unwrap();
        assert_eq!(modify, Action::Modify(NodeChanges::size("a", SizeIndicator::Medium)));
    }

    #[test]
    fn unknown_action_tags_are_rejected() {
        let parsed = serde_json::from_str::<Action>(r#"{"action":"rename","item":{"id":"a"}}"#);
        assert!(parsed.is_err());
    }
}
