//! Viewport and element geometry shared by the engine components

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Window / drawing-surface size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Height as whole pixels, never zero
    pub fn height_px(&self) -> u32 {
        (self.height.round() as u32).max(1)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// An element's bounding box in viewport (client) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Grow (positive) or shrink (negative) on all four sides
    pub fn inflate(&self, amount: f32) -> Self {
        Self {
            left: self.left - amount,
            top: self.top - amount,
            width: (self.width + 2.0 * amount).max(0.0),
            height: (self.height + 2.0 * amount).max(0.0),
        }
    }

    /// True when the boxes overlap with positive extent on at least one axis
    /// and non-negative extent on the other (a zero-height line still counts)
    pub fn intersects(&self, other: &Rect) -> bool {
        let overlap_x = self.right().min(other.right()) - self.left.max(other.left);
        let overlap_y = self.bottom().min(other.bottom()) - self.top.max(other.top);
        overlap_x >= 0.0 && overlap_y >= 0.0 && (overlap_x > 0.0 || overlap_y > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_px_never_zero() {
        assert_eq!(ViewportSize::new(0.0, 0.0).height_px(), 1);
        assert_eq!(ViewportSize::new(100.0, 719.6).height_px(), 720);
    }

    #[test]
    fn test_intersects() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert!(Rect::new(10.0, 700.0, 100.0, 200.0).intersects(&viewport));
        assert!(!Rect::new(10.0, 900.0, 100.0, 200.0).intersects(&viewport));
        assert!(!Rect::new(10.0, -300.0, 100.0, 200.0).intersects(&viewport));
        // A bare point never counts, a line does
        assert!(!Rect::new(10.0, 400.0, 0.0, 0.0).intersects(&viewport));
        assert!(Rect::new(10.0, 400.0, 50.0, 0.0).intersects(&viewport));
        assert!(!Rect::new(10.0, 800.0, 0.0, 0.0).intersects(&viewport));
    }

    #[test]
    fn test_inflate_clamps_to_zero() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).inflate(-20.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
    }
}
