//! Page-coordinate geometry.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in PDF page coordinates (origin bottom-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    /// Create a rectangle from two corners given in any order.
    ///
    /// Annotation `/Rect` arrays are not guaranteed to list the lower-left
    /// corner first, so the result is always normalized.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }.normalized()
    }

    /// Return a copy with `x1 <= x2` and `y1 <= y2`.
    pub fn normalized(self) -> Self {
        Self {
            x1: self.x1.min(self.x2),
            y1: self.y1.min(self.y2),
            x2: self.x1.max(self.x2),
            y2: self.y1.max(self.y2),
        }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Check whether a point lies inside the rectangle grown by `margin` on
    /// every side.
    pub fn contains_point(&self, x: f32, y: f32, margin: f32) -> bool {
        x >= self.x1 - margin && x <= self.x2 + margin && y >= self.y1 - margin && y <= self.y2 + margin
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Signed horizontal distance between two rectangles.
    ///
    /// Negative when their x-extents overlap.
    pub fn horizontal_gap(&self, other: &Rect) -> f32 {
        (other.x1 - self.x2).max(self.x1 - other.x2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let rect = Rect::new(200.0, 720.0, 100.0, 700.0);
        assert_eq!(rect.x1, 100.0);
        assert_eq!(rect.y1, 700.0);
        assert_eq!(rect.x2, 200.0);
        assert_eq!(rect.y2, 720.0);
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 20.0);
    }

    #[test]
    fn test_contains_point_with_margin() {
        let rect = Rect::new(100.0, 700.0, 200.0, 720.0);
        assert!(rect.contains_point(150.0, 710.0, 0.0));
        assert!(rect.contains_point(98.5, 699.0, 2.0));
        assert!(!rect.contains_point(97.0, 710.0, 2.0));
        assert!(!rect.contains_point(150.0, 723.0, 2.0));
    }

    #[test]
    fn test_horizontal_gap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(14.0, 0.0, 20.0, 10.0);
        assert_eq!(a.horizontal_gap(&b), 4.0);
        assert_eq!(b.horizontal_gap(&a), 4.0);

        let overlapping = Rect::new(5.0, 0.0, 12.0, 10.0);
        assert!(a.horizontal_gap(&overlapping) < 0.0);
    }
}
