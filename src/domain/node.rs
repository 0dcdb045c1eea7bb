//! Node domain model.
//!
//! A [`Node`] is a labeled point in the rooted tree. Exactly one node has no
//! parent (the root); the parent chain of every other node ends at the root.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One of the three discrete size tiers a node may have.
///
/// Serialized as a JSON number. Stored documents written by older editors
/// carry the tier as a numeric string, so both forms are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SizeIndicator {
    /// Half of the full radius.
    Small,
    /// Three quarters of the full radius.
    Medium,
    /// The full radius.
    #[default]
    Large,
}

impl SizeIndicator {
    /// All tiers, smallest first.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Radius multiplier applied to a node's base radius.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Small => 0.5,
            Self::Medium => 0.75,
            Self::Large => 1.0,
        }
    }

    /// Wire value (`1`, `2` or `3`).
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Small => 1,
            Self::Medium => 2,
            Self::Large => 3,
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub const fn from_value(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::Small),
            2 => Some(Self::Medium),
            3 => Some(Self::Large),
            _ => None,
        }
    }
}

impl fmt::Display for SizeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for SizeIndicator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for SizeIndicator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TierVisitor;

        impl Visitor<'_> for TierVisitor {
            type Value = SizeIndicator;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a size indicator of 1, 2 or 3 (number or string)")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                SizeIndicator::from_value(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(SizeIndicator::from_value)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
                if v.fract() == 0.0 && v >= 0.0 {
                    if let Some(tier) = SizeIndicator::from_value(v as u64) {
                        return Ok(tier);
                    }
                }
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                v.trim()
                    .parse::<u64>()
                    .ok()
                    .and_then(SizeIndicator::from_value)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(TierVisitor)
    }
}

/// A labeled node in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique id.
    pub id: NodeId,
    /// Parent id, `None` only for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Label text.
    #[serde(default)]
    pub text: String,
    /// Size tier.
    #[serde(default)]
    pub size_indicator: SizeIndicator,
}

impl Node {
    /// Creates a root node.
    pub fn root(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            text: text.into(),
            size_indicator: SizeIndicator::Large,
        }
    }

    /// Creates a child of `parent`.
    pub fn child(
        id: impl Into<NodeId>,
        parent: impl Into<NodeId>,
        text: impl Into<String>,
        size_indicator: SizeIndicator,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent.into()),
            text: text.into(),
            size_indicator,
        }
    }

    /// Returns `true` if this node has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_indicator_accepts_numbers_and_strings() {
        let a: SizeIndicator = serde_json::from_str("3").unwrap();
        let b: SizeIndicator = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(a, SizeIndicator::Large);
        assert_eq!(b, SizeIndicator::Medium);
        assert!(serde_json::from_str::<SizeIndicator>("4").is_err());
        assert!(serde_json::from_str::<SizeIndicator>("\"big\"").is_err());
    }

    #[test]
    fn node_uses_camel_case_and_omits_missing_parent() {
        let json = serde_json::to_string(&Node::root("root", "New")).unwrap();
        assert_eq!(json, r#"{"id":"root","text":"New","sizeIndicator":3}"#);

        let child: Node =
            serde_json::from_str(r#"{"id":"a","parentId":"root","text":"x","sizeIndicator":"1"}"#)
                .unwrap();
        assert_eq!(child.parent_id, Some(NodeId::from("root")));
        assert_eq!(child.size_indicator, SizeIndicator::Small);
    }

    #[test]
    fn missing_size_defaults_to_large() {
        assert_eq!(SizeIndicator::default(), SizeIndicator::Large);

        let node: Node = serde_json::from_str(r#"{"id":"a","parentId":"root"}"#).unwrap();
        assert_eq!(node.size_indicator, SizeIndicator::Large);
        assert_eq!(node.text, "");
    }
}
