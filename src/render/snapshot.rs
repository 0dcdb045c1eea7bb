//! Read-only frame description handed to the renderer.
//!
//! A [`RenderSnapshot`] is computed from a [`TreeSession`] on demand and holds
//! only display-ready data: positions, colours, which buttons to draw. The
//! renderer owns all pixel and text drawing; it reports label boxes back
//! through [`TreeSession::set_text_box`] so text hover can work.

use super::palette::{lighten, node_color, HIGHLIGHT_LIGHTEN};
use crate::app::{Cursor, TreeSession};
use crate::domain::NodeId;
use crate::hit::TextBox;
use crate::layout::{ButtonKind, Camera};
use serde::Serialize;

/// Ring opacity of a node that has children.
const RING_OPACITY_BRANCH: f64 = 1.0;
/// Ring opacity of a leaf.
const RING_OPACITY_LEAF: f64 = 0.2;

/// One frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Nodes in table order; later nodes draw on top.
    pub nodes: Vec<NodeView>,
    /// Buttons to draw, empty unless a node is hovered and no label is.
    pub buttons: Vec<ButtonView>,
    /// Label box to outline, if the pointer is over one.
    pub text_hover: Option<TextBox>,
    /// Cursor to show.
    pub cursor: Cursor,
    /// Camera the geometry was computed with.
    pub camera: Camera,
}

/// Display data for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    /// Node id.
    pub id: NodeId,
    /// Label text.
    pub text: String,
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Radius.
    pub radius: f64,
    /// Border stroke width.
    pub border_width: f64,
    /// Fill and border colour as `#rrggbb`.
    pub color: String,
    /// Opacity of the node circle.
    pub ring_opacity: f64,
    /// Whether to draw the light outer ring.
    pub outer_ring: bool,
    /// Hovered or being resized.
    pub highlighted: bool,
}

/// Display data for one button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ButtonView {
    /// What the button does.
    pub kind: ButtonKind,
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Radius.
    pub size: f64,
}

impl RenderSnapshot {
    /// Builds the frame for the session's current state.
    pub fn capture(session: &mut TreeSession) -> Self {
        let _span = tracing::trace_span!("render_snapshot").entered();

        let layouts = session.layout_all();
        let dragging = session.pointer().dragging().cloned();
        let hovered_first = session.hovering().first().cloned();

        let mut nodes = Vec::with_capacity(layouts.len());
        let mut buttons = Vec::new();

        for (index, layout) in layouts.iter().enumerate() {
            let text = session
                .store()
                .node(&layout.id)
                .map(|node| node.text.clone())
                .unwrap_or_default();
            let highlighted =
                dragging.as_ref() == Some(&layout.id) || session.hovering().contains(&layout.id);
            let base = node_color(index);
            let color = if highlighted {
                lighten(base, HIGHLIGHT_LIGHTEN)
            } else {
                base.to_string()
            };

            nodes.push(NodeView {
                id: layout.id.clone(),
                text,
                x: layout.x,
                y: layout.y,
                radius: layout.radius,
                border_width: layout.border_width,
                color,
                ring_opacity: if layout.child_ids.is_empty() {
                    RING_OPACITY_LEAF
                } else {
                    RING_OPACITY_BRANCH
                },
                outer_ring: !layout.visibility_restricted,
                highlighted,
            });

            let shows_buttons = session.hover_text().is_none()
                && !layout.interactivity_restricted
                && hovered_first.as_ref() == Some(&layout.id);
            if shows_buttons {
                buttons.extend(layout.buttons.iter().map(|button| ButtonView {
                    kind: button.kind,
                    x: button.x,
                    y: button.y,
                    size: button.size,
                }));
            }
        }

        let text_hover = session
            .hover_text()
            .and_then(|id| session.text_box(id))
            .copied();

        Self {
            nodes,
            buttons,
            text_hover,
            cursor: session.cursor(),
            camera: *session.camera(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{handle_event, Event, TreeSession};
    use crate::domain::{Action, Node, SizeIndicator};
    use crate::layout::{ButtonKind, LayoutSettings, Viewport};
    use crate::tree::TreeStore;

    fn session() -> TreeSession {
        let store = TreeStore::from_history(vec![
            Action::Add(Node::root("root", "Root")),
            Action::Add(Node::child("a", "root", "A", SizeIndicator::Large)),
        ])
        .unwrap();
        TreeSession::new("te_tree_1", store, LayoutSettings::default(), Viewport::new(500.0, 500.0))
    }

    #[test]
    fn idle_frame_has_nodes_without_buttons() {
        let snapshot = session().render_snapshot();

        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.nodes[0].color, "#911eb4");
        assert!((snapshot.nodes[0].ring_opacity - 1.0).abs() < f64::EPSILON);
        assert!((snapshot.nodes[1].ring_opacity - 0.2).abs() < f64::EPSILON);
        assert!(snapshot.nodes.iter().all(|node| node.outer_ring));
        assert!(snapshot.buttons.is_empty());
    }

    #[test]
    fn hovered_node_is_lightened_and_shows_buttons() {
        let mut session = session();
        // Inside "a" (centred on the root, radius 110), away from its border.
        handle_event(&mut session, &Event::PointerMove { x: 250.0, y: 250.0 }).unwrap();
        let snapshot = session.render_snapshot();

        assert_eq!(snapshot.nodes[1].color, "#6181f6");
        assert!(snapshot.nodes[1].highlighted);
        let kinds: Vec<ButtonKind> = snapshot.buttons.iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![ButtonKind::Remove, ButtonKind::Add]);
    }
}
