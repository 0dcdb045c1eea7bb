//! Camera and viewport state.
//!
//! The [`Camera`] is a pan offset plus a zoom factor. The [`Viewport`] is the
//! size of the drawing surface; its centre is where the root sits when the
//! camera is not panned.

use serde::{Deserialize, Serialize};

/// Smallest zoom factor the camera accepts.
pub const MIN_ZOOM: f64 = 0.01;

/// Viewport extent that maps to a zoom of `1.0` in [`Camera::reset`].
const DEFAULT_ZOOM_EXTENT: f64 = 500.0;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal centre.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    /// Vertical centre.
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Pan and zoom of the view onto the tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Horizontal pan offset in pixels.
    pub pan_x: f64,
    /// Vertical pan offset in pixels.
    pub pan_y: f64,
    /// Zoom factor.
    pub zoom: f64,
}

impl Camera {
    /// Creates a camera.
    #[must_use]
    pub const fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        Self { pan_x, pan_y, zoom }
    }

    /// The camera a freshly opened tree starts with.
    ///
    /// Zoom fits the shorter viewport side (`min(w, h) / 500`, rounded to two
    /// decimals); pan is zero.
    #[must_use]
    pub fn reset(viewport: &Viewport) -> Self {
        let fit = viewport.width.min(viewport.height) / DEFAULT_ZOOM_EXTENT;
        let zoom = ((fit * 100.0).round() / 100.0).max(MIN_ZOOM);
        Self::new(0.0, 0.0, zoom)
    }

    /// Moves the camera by a pointer delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Adds `delta` to the zoom, never going below [`MIN_ZOOM`].
    pub fn zoom_by(&mut self, delta: f64) {
        let next = self.zoom + delta;
        self.zoom = if next.is_finite() { next.max(MIN_ZOOM) } else { self.zoom };
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_fits_shorter_side() {
        let camera = Camera::reset(&Viewport::new(1920.0, 1080.0));
        assert!((camera.zoom - 2.16).abs() < 1e-9);
        assert!(camera.pan_x == 0.0 && camera.pan_y == 0.0);
    }

    #[test]
    fn zoom_never_reaches_zero() {
        let mut camera = Camera::default();
        camera.zoom_by(-5.0);
        assert!((camera.zoom - MIN_ZOOM).abs() < f64::EPSILON);
    }
}
