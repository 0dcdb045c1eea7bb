//! Event handling and state transition logic.
//!
//! This module implements the pointer state machine. Events arrive from the
//! host one at a time; [`handle_event`] mutates the [`TreeSession`] and returns
//! whether a redraw is needed plus the [`Effect`]s the host must execute.
//!
//! # Event Types
//!
//! - **Pointer**: `PointerDown`, `PointerMove`, `PointerUp`, `Click`, `Wheel`
//! - **Modal**: `TextEdited`, `CloseModal`
//! - **Host**: `Resize`, `LabelBox`
//!
//! Pointer events are ignored while the text editor is open.
//!
//! # Example
//!
//! ```
//! use tree_explorer::app::{handle_event, Event, TreeSession};
//! use tree_explorer::domain::{Action, Node};
//! use tree_explorer::layout::{LayoutSettings, Viewport};
//! use tree_explorer::tree::TreeStore;
//!
//! let store = TreeStore::from_history(vec![Action::Add(Node::root("root", "New"))])?;
//! let mut session =
//!     TreeSession::new("te_tree_1", store, LayoutSettings::default(), Viewport::new(500.0, 500.0));
//!
//! handle_event(&mut session, &Event::PointerDown { x: 10.0, y: 10.0 })?;
//! let (redraw, _) = handle_event(&mut session, &Event::PointerMove { x: 20.0, y: 10.0 })?;
//! assert!(redraw);
//! assert!((session.camera().pan_x - 10.0).abs() < f64::EPSILON);
//! # Ok::<(), tree_explorer::TreeError>(())
//! ```

use super::actions::Effect;
use super::modes::{Cursor, Gesture, PointerState};
use super::session::TreeSession;
use crate::domain::{Action, Node, NodeChanges, NodeId, Result, SizeIndicator};
use crate::hit::{border_test, radius_test, Circle, Point, TextBox};
use crate::layout::{ButtonKind, Viewport};
use crate::storage::models::NEW_NODE_TEXT;
use crate::tree::TreeChange;
use serde::{Deserialize, Serialize};

/// Input delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A pointer button was pressed.
    PointerDown {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// The pointer moved.
    PointerMove {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// A pointer button was released.
    PointerUp {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// A press and release without intervening movement.
    Click {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// Scroll wheel input at a pointer position.
    Wheel {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
        /// Vertical scroll amount; positive scrolls down (zooms out).
        delta_y: f64,
    },
    /// The label editor content changed.
    TextEdited {
        /// Full editor content.
        text: String,
    },
    /// The label editor was dismissed.
    CloseModal,
    /// The drawing surface changed size.
    Resize {
        /// New width in pixels.
        width: f64,
        /// New height in pixels.
        height: f64,
    },
    /// The renderer laid out a node label at this box.
    LabelBox {
        /// Node the label belongs to.
        id: NodeId,
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
}

impl Event {
    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::Click { .. } => "click",
            Self::Wheel { .. } => "wheel",
            Self::TextEdited { .. } => "text_edited",
            Self::CloseModal => "close_modal",
            Self::Resize { .. } => "resize",
            Self::LabelBox { .. } => "label_box",
        }
    }

    /// Returns `true` for events the open text editor suspends.
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerDown { .. }
                | Self::PointerMove { .. }
                | Self::PointerUp { .. }
                | Self::Click { .. }
                | Self::Wheel { .. }
        )
    }
}

/// Processes an event, mutates the session, and returns `(redraw, effects)`.
///
/// Effects must be executed in order. Tree mutations are committed through
/// [`TreeSession::commit`] before this returns; persisting them is left to
/// the caller via [`Effect::Persist`].
///
/// # Errors
///
/// Returns the history error if a commit is rejected. The session is left
/// as it was before the rejected action.
pub fn handle_event(session: &mut TreeSession, event: &Event) -> Result<(bool, Vec<Effect>)> {
    let _span = tracing::debug_span!(
        "handle_event",
        event_type = event.kind(),
        storage_key = %session.storage_key()
    )
    .entered();

    if session.pointer.is_modal() && event.is_pointer() {
        tracing::trace!("pointer event ignored while editor is open");
        return Ok((false, vec![]));
    }

    match event {
        Event::PointerDown { x, y } => Ok(pointer_down(session, Point::new(*x, *y))),
        Event::PointerMove { x, y } => pointer_move(session, Point::new(*x, *y)),
        Event::PointerUp { .. } => Ok(pointer_up(session)),
        Event::Click { x, y } => click(session, Point::new(*x, *y)),
        Event::Wheel { x, y, delta_y } => Ok(wheel(session, Point::new(*x, *y), *delta_y)),
        Event::TextEdited { text } => text_edited(session, text),
        Event::CloseModal => {
            if !session.pointer.is_modal() {
                return Ok((false, vec![]));
            }
            session.pointer = PointerState::Idle;
            Ok((true, vec![Effect::CloseTextEditor]))
        }
        Event::Resize { width, height } => {
            session.set_viewport(Viewport::new(*width, *height));
            Ok((true, vec![]))
        }
        Event::LabelBox {
            id,
            x,
            y,
            width,
            height,
        } => {
            session.set_text_box(
                id.clone(),
                TextBox {
                    x: *x,
                    y: *y,
                    width: *width,
                    height: *height,
                },
            );
            Ok((false, vec![]))
        }
    }
}

/// Size tier whose target radius is closest to `distance`.
///
/// Target radii are `base_size` times each tier multiplier; ties go to the
/// smaller tier.
#[must_use]
pub fn nearest_tier(distance: f64, base_size: f64) -> SizeIndicator {
    let gap = |tier: &SizeIndicator| (distance - base_size * tier.multiplier()).abs();
    SizeIndicator::ALL
        .into_iter()
        .min_by(|a, b| gap(a).total_cmp(&gap(b)))
        .unwrap_or_default()
}

fn pointer_down(session: &mut TreeSession, p: Point) -> (bool, Vec<Effect>) {
    if !matches!(session.pointer, PointerState::Idle) {
        tracing::debug!(state = ?session.pointer, "pointer down outside idle ignored");
        return (false, vec![]);
    }
    session.gesture = Gesture::default();

    // Table order, not hit order: the first border in insertion order wins.
    let ids = session.store().table().ids().to_vec();
    for id in ids {
        let Some(node) = session.node_layout(&id) else {
            continue;
        };
        if border_test(p, &Circle::from(&node)) {
            tracing::debug!(node_id = %id, "resize drag started");
            session.pointer = PointerState::DraggingNode { target: id };
            return (true, vec![]);
        }
    }

    session.pointer = PointerState::Panning { origin: p };
    (false, vec![])
}

fn pointer_move(session: &mut TreeSession, p: Point) -> Result<(bool, Vec<Effect>)> {
    let (mut cursor, hovering) = scan_hover(session, p);
    let mut redraw = session.hovering != hovering;
    session.hovering = hovering;

    match session.pointer.clone() {
        PointerState::Panning { origin } => {
            session.gesture.was_drag = true;
            session.pan_by(p.x - origin.x, p.y - origin.y);
            session.pointer = PointerState::Panning { origin: p };
            cursor = Some(Cursor::Move);
            redraw = true;
        }
        PointerState::DraggingNode { target } => {
            session.gesture.was_drag = true;
            if resize_toward(session, &target, p)? {
                session.gesture.resized = true;
            }
            cursor = Some(Cursor::Crosshair);
            redraw = true;
        }
        PointerState::Idle | PointerState::ModalOpen { .. } => {}
    }

    let cursor = if let Some(cursor) = cursor {
        if session.hover_text.take().is_some() {
            redraw = true;
        }
        cursor
    } else {
        let hover_text = session.text_box_at(p);
        if hover_text != session.hover_text {
            session.hover_text = hover_text;
            redraw = true;
        }
        if session.hover_text.is_some() {
            Cursor::Text
        } else {
            Cursor::Default
        }
    };

    let mut effects = Vec::new();
    if cursor != session.cursor {
        session.cursor = cursor;
        effects.push(Effect::SetCursor { cursor });
    }
    Ok((redraw, effects))
}

/// Cursor implied by what is under `p`, and the hovered nodes innermost first.
fn scan_hover(session: &mut TreeSession, p: Point) -> (Option<Cursor>, Vec<NodeId>) {
    let mut cursor = None;
    let mut hovering = Vec::new();

    let order = session.hit_order().to_vec();
    for id in order {
        let Some(node) = session.node_layout(&id) else {
            continue;
        };
        if node.interactivity_restricted {
            continue;
        }

        let on_button = node
            .buttons
            .iter()
            .any(|button| radius_test(p, &Circle::from(button)));
        if cursor.is_none() {
            if on_button {
                cursor = Some(Cursor::Pointer);
            } else if border_test(p, &Circle::from(&node)) {
                cursor = Some(Cursor::Crosshair);
            }
        }
        if on_button || radius_test(p, &Circle::from(&node)) {
            hovering.push(id);
        }
    }

    (cursor, hovering)
}

/// Commits a tier change if the pointer distance now favours another tier.
fn resize_toward(session: &mut TreeSession, target: &NodeId, p: Point) -> Result<bool> {
    let Some(node) = session.node_layout(target) else {
        return Ok(false);
    };
    let Some(current) = session.store().node(target).map(|n| n.size_indicator) else {
        return Ok(false);
    };

    let tier = nearest_tier(p.distance_to(node.x, node.y), session.settings().base_size);
    if tier == current {
        return Ok(false);
    }

    tracing::debug!(node_id = %target, from = %current, to = %tier, "size tier crossed");
    session.commit(Action::Modify(NodeChanges::size(target.clone(), tier)))?;
    Ok(true)
}

fn pointer_up(session: &mut TreeSession) -> (bool, Vec<Effect>) {
    match std::mem::take(&mut session.pointer) {
        PointerState::Idle => (false, vec![]),
        PointerState::Panning { .. } => (true, vec![]),
        PointerState::DraggingNode { target } => {
            if session.gesture.resized {
                tracing::debug!(node_id = %target, "resize gesture finished");
                (true, vec![Effect::Persist])
            } else {
                (true, vec![])
            }
        }
        modal @ PointerState::ModalOpen { .. } => {
            session.pointer = modal;
            (false, vec![])
        }
    }
}

fn click(session: &mut TreeSession, p: Point) -> Result<(bool, Vec<Effect>)> {
    if session.gesture.was_drag {
        tracing::trace!("click after drag ignored");
        return Ok((false, vec![]));
    }

    if let Some((target, kind)) = button_at(session, p) {
        return press_button(session, target, kind);
    }

    if let Some(target) = session.text_box_at(p) {
        return Ok(open_editor(session, target));
    }

    Ok((false, vec![]))
}

/// First button under `p`, scanning innermost nodes first.
fn button_at(session: &mut TreeSession, p: Point) -> Option<(NodeId, ButtonKind)> {
    let order = session.hit_order().to_vec();
    order.into_iter().find_map(|id| {
        let node = session.node_layout(&id)?;
        if node.interactivity_restricted {
            return None;
        }
        let kind = crate::hit::button_at(p, &node)?.kind;
        Some((id, kind))
    })
}

fn press_button(
    session: &mut TreeSession,
    target: NodeId,
    kind: ButtonKind,
) -> Result<(bool, Vec<Effect>)> {
    tracing::debug!(node_id = %target, button = ?kind, "button pressed");

    match kind {
        ButtonKind::Add => {
            let id = session.next_node_id();
            session.commit(Action::Add(Node::child(
                id,
                target,
                NEW_NODE_TEXT,
                SizeIndicator::Large,
            )))?;
            Ok((true, vec![Effect::Persist]))
        }
        ButtonKind::Remove => {
            session.commit(Action::remove(target))?;
            Ok((true, vec![Effect::Persist]))
        }
        ButtonKind::Edit => Ok(open_editor(session, target)),
    }
}

fn open_editor(session: &mut TreeSession, target: NodeId) -> (bool, Vec<Effect>) {
    let text = session
        .store()
        .node(&target)
        .map(|node| node.text.clone())
        .unwrap_or_default();

    tracing::debug!(node_id = %target, "opening text editor");
    session.hover_text = None;
    session.pointer = PointerState::ModalOpen {
        target: target.clone(),
    };
    (true, vec![Effect::OpenTextEditor { id: target, text }])
}

fn text_edited(session: &mut TreeSession, text: &str) -> Result<(bool, Vec<Effect>)> {
    let PointerState::ModalOpen { target } = &session.pointer else {
        tracing::debug!("text edit without open editor ignored");
        return Ok((false, vec![]));
    };
    let target = target.clone();
    let text = text.trim().to_string();

    let change = session.commit(Action::Modify(NodeChanges::text(target.clone(), text.clone())))?;

    let mut effects = vec![Effect::Persist];
    let is_root = session.store().root() == Some(&target);
    if is_root && matches!(change, TreeChange::Modified { text_changed: true, .. }) {
        effects.push(Effect::TreeTitleChanged { title: text });
    }
    Ok((true, effects))
}

fn wheel(session: &mut TreeSession, p: Point, delta_y: f64) -> (bool, Vec<Effect>) {
    let viewport = *session.viewport();
    let direction = if delta_y > 0.0 { -1.0 } else { 1.0 };
    let zoom = session.camera().zoom;
    let zoom_change = (-delta_y / 100.0) * session.zoom_multiplier();

    session.pan_by(
        pan_bias(p.x, viewport.center_x()) * direction,
        pan_bias(p.y, viewport.center_y()) * direction,
    );
    session.zoom_by(zoom_change * zoom.sqrt());
    (true, vec![])
}

/// Whole-pixel pan toward the pointer, growing with the root of its offset.
fn pan_bias(pointer: f64, center: f64) -> f64 {
    let magnitude = (pointer - center).abs().sqrt().floor();
    if pointer > center {
        -magnitude
    } else {
        magnitude
    }
}
