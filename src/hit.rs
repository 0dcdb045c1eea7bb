//! Geometric hit-testing.
//!
//! Stateless predicates over a pointer location and a circle (a node or one of
//! its buttons). Callers decide traversal order; scanning a post-order list of
//! ids (children before parents) makes the innermost match win over every
//! enclosing ancestor.

use crate::layout::{ButtonAnchor, LayoutNode};
use serde::{Deserialize, Serialize};

/// Inner slack of the border annulus, in pixels.
const BORDER_GRAB_SLACK: f64 = 5.0;

/// A pointer location in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance to `(x, y)`.
    #[must_use]
    pub fn distance_squared_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).powi(2) + (self.y - y).powi(2)
    }

    /// Euclidean distance to `(x, y)`.
    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        self.distance_squared_to(x, y).sqrt()
    }
}

/// Stroke width of a circle border for a given radius.
#[must_use]
pub fn border_width(radius: f64) -> f64 {
    (radius.sqrt() / 2.0).floor().max(1.0)
}

/// A circle with a stroked border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Radius.
    pub radius: f64,
    /// Border stroke width.
    pub border_width: f64,
}

impl Circle {
    /// Creates a circle whose border width is derived from its radius.
    #[must_use]
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            radius,
            border_width: border_width(radius),
        }
    }
}

impl From<&LayoutNode> for Circle {
    fn from(node: &LayoutNode) -> Self {
        Self {
            x: node.x,
            y: node.y,
            radius: node.radius,
            border_width: node.border_width,
        }
    }
}

impl From<&ButtonAnchor> for Circle {
    fn from(button: &ButtonAnchor) -> Self {
        Self::new(button.x, button.y, button.size)
    }
}

/// True iff `p` lies on the grab annulus of `circle`'s border.
///
/// The annulus spans squared distances `[(r - 5)^2, (r + border)^2]`.
#[must_use]
pub fn border_test(p: Point, circle: &Circle) -> bool {
    let distance = p.distance_squared_to(circle.x, circle.y);
    distance >= (circle.radius - BORDER_GRAB_SLACK).powi(2)
        && distance <= (circle.radius + circle.border_width).powi(2)
}

/// True iff `p` lies inside `circle` including its border.
#[must_use]
pub fn radius_test(p: Point, circle: &Circle) -> bool {
    p.distance_squared_to(circle.x, circle.y) <= (circle.radius + circle.border_width).powi(2)
}

/// First button of `node` that `p` hits.
#[must_use]
pub fn button_at(p: Point, node: &LayoutNode) -> Option<&ButtonAnchor> {
    node.buttons
        .iter()
        .find(|button| radius_test(p, &Circle::from(*button)))
}

/// Axis-aligned label box reported by the renderer for text hover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl TextBox {
    /// True iff `p` is strictly inside the box.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_annulus_bounds() {
        let circle = Circle::new(0.0, 0.0, 100.0);
        assert!((circle.border_width - 5.0).abs() < f64::EPSILON);

        assert!(border_test(Point::new(95.0, 0.0), &circle));
        assert!(border_test(Point::new(105.0, 0.0), &circle));
        assert!(!border_test(Point::new(94.9, 0.0), &circle));
        assert!(!border_test(Point::new(105.1, 0.0), &circle));
    }

    #[test]
    fn radius_includes_border_and_interior() {
        let circle = Circle::new(10.0, 10.0, 16.0);
        assert!(radius_test(Point::new(10.0, 10.0), &circle));
        assert!(radius_test(Point::new(10.0, 28.0), &circle));
        assert!(!radius_test(Point::new(10.0, 28.1), &circle));
    }

    #[test]
    fn text_box_is_open_interval() {
        let text = TextBox {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 5.0,
        };
        assert!(text.contains(Point::new(5.0, 2.5)));
        assert!(!text.contains(Point::new(0.0, 2.5)));
        assert!(!text.contains(Point::new(10.0, 2.5)));
    }
}
