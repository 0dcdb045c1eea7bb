//! Per-node geometry produced by the layout engine.

use crate::domain::NodeId;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tunables of the radial layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Full radius of the root at zoom `1.0`; also the drag-resize tier scale.
    pub base_size: f64,
    /// Fraction of a node's radius used for the ring its children sit on.
    pub inner_ring_factor: f64,
    /// Fraction of the parent's radius shared among its children.
    pub child_scale: f64,
    /// Children of a parent smaller than this are not fully drawn.
    pub visibility_cutoff: f64,
    /// Children of a parent smaller than this take no pointer input.
    pub interactivity_cutoff: f64,
    /// Upper bound on button size, independent of zoom.
    pub max_button_size: f64,
    /// Whether nodes carry an edit button.
    pub show_edit_button: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            base_size: 200.0,
            inner_ring_factor: 0.4,
            child_scale: 0.55,
            visibility_cutoff: 50.0,
            interactivity_cutoff: 200.0,
            max_button_size: 20.0,
            show_edit_button: false,
        }
    }
}

/// What a node button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    /// Adds a child node.
    Add,
    /// Removes the node and its subtree.
    Remove,
    /// Opens the text editor for the node.
    Edit,
}

impl ButtonKind {
    /// Angle around the node border where the button sits.
    #[must_use]
    pub fn angle(self) -> f64 {
        match self {
            Self::Remove => PI * 1.25,
            Self::Add => PI * 1.75,
            Self::Edit => PI * 0.25,
        }
    }
}

/// A button anchored on a node's border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonAnchor {
    /// Button action.
    pub kind: ButtonKind,
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Button radius.
    pub size: f64,
}

/// Computed geometry of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Node id.
    pub id: NodeId,
    /// Parent id, `None` for the root.
    pub parent_id: Option<NodeId>,
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Final radius (base radius times the tier multiplier).
    pub radius: f64,
    /// Radius before the tier multiplier.
    pub base_radius: f64,
    /// Radius of the ring this node's children sit on.
    pub inner_ring_radius: f64,
    /// Stroke width of the node border.
    pub border_width: f64,
    /// Direct children in insertion order.
    pub child_ids: Vec<NodeId>,
    /// Number of children the parent has (0 for the root).
    pub sibling_count: usize,
    /// Buttons around the border.
    pub buttons: Vec<ButtonAnchor>,
    /// The parent is too small for this node to be fully drawn.
    pub visibility_restricted: bool,
    /// The parent is too small for this node to take pointer input.
    pub interactivity_restricted: bool,
}

/// Angle of child `index` among `count` siblings.
///
/// Two children sit left/right of the parent; any other count starts at the
/// top and proceeds clockwise in screen coordinates.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn child_angle(count: usize, index: usize) -> f64 {
    let start = if count == 2 { PI } else { -(PI / 2.0) };
    start + ((2.0 * PI) / count as f64) * index as f64
}

/// Buttons for a node of `radius` centred at `(x, y)`.
#[must_use]
pub fn button_anchors(
    settings: &LayoutSettings,
    x: f64,
    y: f64,
    radius: f64,
    is_root: bool,
) -> Vec<ButtonAnchor> {
    let size = ((radius / 3.0).max(2.0) * (2.0 / 5.0) * 1.4).min(settings.max_button_size);

    let mut kinds = Vec::with_capacity(3);
    if !is_root {
        kinds.push(ButtonKind::Remove);
    }
    kinds.push(ButtonKind::Add);
    if settings.show_edit_button {
        kinds.push(ButtonKind::Edit);
    }

    kinds
        .into_iter()
        .map(|kind| ButtonAnchor {
            kind,
            x: x + kind.angle().cos() * radius,
            y: y + kind.angle().sin() * radius,
            size,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_size_is_capped() {
        let settings = LayoutSettings::default();
        let big = button_anchors(&settings, 0.0, 0.0, 1000.0, true);
        assert_eq!(big.len(), 1);
        assert!((big[0].size - 20.0).abs() < f64::EPSILON);

        let small = button_anchors(&settings, 0.0, 0.0, 3.0, false);
        assert_eq!(small[0].kind, ButtonKind::Remove);
        assert!((small[0].size - 2.0 * 0.4 * 1.4).abs() < 1e-12);
    }
}
