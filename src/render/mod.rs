//! Render boundary.
//!
//! The crate does not draw. It hands the renderer a [`RenderSnapshot`] per
//! frame and receives label boxes back:
//!
//! ```text
//! TreeSession → RenderSnapshot::capture → RenderSnapshot → external renderer
//!      ↑                                                        │
//!      └──────────────── set_text_box (label layout) ───────────┘
//! ```
//!
//! - [`snapshot`]: frame description types
//! - [`palette`]: node colours

pub mod palette;
pub mod snapshot;

pub use snapshot::{ButtonView, NodeView, RenderSnapshot};
