//! Radial layout engine.
//!
//! - [`camera`]: pan/zoom camera and viewport
//! - [`geometry`]: computed per-node geometry, buttons and layout tunables
//! - [`engine`]: the memoized [`LayoutEngine`]

pub mod camera;
pub mod engine;
pub mod geometry;

pub use camera::{Camera, Viewport, MIN_ZOOM};
pub use engine::LayoutEngine;
pub use geometry::{child_angle, ButtonAnchor, ButtonKind, LayoutNode, LayoutSettings};
