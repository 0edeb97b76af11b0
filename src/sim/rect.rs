//! Axis-aligned rectangle geometry for landing zones
//!
//! Screen space: origin top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink by `margin` on every side. Collapses to zero size rather than inverting.
    pub fn inset(&self, margin: f32) -> Self {
        let width = (self.width - 2.0 * margin).max(0.0);
        let height = (self.height - 2.0 * margin).max(0.0);
        let center = self.center();
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Strict containment (points on the edge are outside)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.right() && p.y > self.y && p.y < self.bottom()
    }

    /// Clamp an x coordinate to the rectangle's span, keeping `margin` from each side
    pub fn clamp_x(&self, x: f32, margin: f32) -> f32 {
        let lo = self.x + margin;
        let hi = self.right() - margin;
        if lo > hi {
            self.center().x
        } else {
            x.clamp(lo, hi)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_shrinks_all_sides() {
        let r = Rect::new(100.0, 200.0, 130.0, 70.0).inset(10.0);
        assert_eq!(r, Rect::new(110.0, 210.0, 110.0, 50.0));
    }

    #[test]
    fn test_inset_never_inverts() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).inset(20.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
        assert_eq!(r.center(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_contains_point_is_strict() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(r.contains_point(Vec2::new(50.0, 25.0)));
        assert!(!r.contains_point(Vec2::new(0.0, 25.0)));
        assert!(!r.contains_point(Vec2::new(50.0, 50.0)));
        assert!(!r.contains_point(Vec2::new(150.0, 25.0)));
    }

    #[test]
    fn test_clamp_x() {
        let r = Rect::new(100.0, 0.0, 130.0, 70.0);
        assert_eq!(r.clamp_x(50.0, 20.0), 120.0);
        assert_eq!(r.clamp_x(300.0, 20.0), 210.0);
        assert_eq!(r.clamp_x(150.0, 20.0), 150.0);
        // Narrower than the margins: pin to center
        assert_eq!(Rect::new(0.0, 0.0, 30.0, 10.0).clamp_x(0.0, 20.0), 15.0);
    }
}
