//! Application layer: the pointer interaction state machine.
//!
//! This module sits between the host (main.rs or an embedding UI) and the
//! tree, layout and hit-testing layers.
//!
//! # Architecture
//!
//! ```text
//! Host input → Event → handle_event → TreeSession mutations → Effects → Host
//!                                          │
//!                                          └─→ (redraw) RenderSnapshot
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effects emitted by the event handler
//! - [`handler`]: event processing and state transitions
//! - [`modes`]: pointer state and cursor types
//! - [`session`]: the live state of one open tree

pub mod actions;
pub mod handler;
pub mod modes;
pub mod session;

pub use actions::Effect;
pub use handler::{handle_event, nearest_tier, Event};
pub use modes::{Cursor, Gesture, PointerState};
pub use session::{TreeSession, DEFAULT_ZOOM_MULTIPLIER};
