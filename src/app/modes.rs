//! Pointer state machine types.
//!
//! Exactly one [`PointerState`] is active at a time:
//!
//! ```text
//!            PointerDown (no border hit)           PointerUp
//!   Idle ────────────────────────────► Panning ─────────────► Idle
//!    │ PointerDown (border hit)                  PointerUp
//!    ├────────────────────────────► DraggingNode ───────────► Idle
//!    │ Click (text box / edit button)            CloseModal
//!    └────────────────────────────► ModalOpen ──────────────► Idle
//! ```
//!
//! `ModalOpen` suspends all pointer handling until the modal is closed.

use crate::domain::NodeId;
use crate::hit::Point;
use serde::{Deserialize, Serialize};

/// Current pointer gesture.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PointerState {
    /// No button held.
    #[default]
    Idle,

    /// Button held on empty space; pointer moves pan the camera.
    Panning {
        /// Last pointer position the pan was applied from.
        origin: Point,
    },

    /// Button held on a node border; pointer moves resize the node.
    DraggingNode {
        /// Node being resized.
        target: NodeId,
    },

    /// The text editor is open for a node.
    ModalOpen {
        /// Node whose label is being edited.
        target: NodeId,
    },
}

impl PointerState {
    /// Returns `true` while a button is held (panning or dragging).
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        matches!(self, Self::Panning { .. } | Self::DraggingNode { .. })
    }

    /// Returns `true` while the text editor is open.
    #[must_use]
    pub const fn is_modal(&self) -> bool {
        matches!(self, Self::ModalOpen { .. })
    }

    /// Node being resized, if any.
    #[must_use]
    pub const fn dragging(&self) -> Option<&NodeId> {
        match self {
            Self::DraggingNode { target } => Some(target),
            _ => None,
        }
    }
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    /// Plain arrow.
    #[default]
    Default,
    /// Over a button.
    Pointer,
    /// Over a node border, or resizing.
    Crosshair,
    /// Panning.
    Move,
    /// Over an editable label.
    Text,
}

/// Bookkeeping for the current press/release cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gesture {
    /// The pointer moved while pressed; the following click is ignored.
    pub was_drag: bool,
    /// At least one tier change was committed during this drag.
    pub resized: bool,
}
