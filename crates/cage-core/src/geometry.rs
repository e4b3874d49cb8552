//! Bounding rectangles in the shared stage coordinate space.

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with a top-left origin (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingRect {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoundingRect {
    /// Creates a rectangle from its left/top edges and size.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Creates a rectangle from an origin point and a size vector.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    /// Creates the smallest rectangle containing all given points.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for point in points {
            min = min.min(point);
            max = max.max(point);
        }
        if min.x > max.x || min.y > max.y {
            return Self::default();
        }
        Self::from_origin_size(min, max - min)
    }

    /// Top-left corner.
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Width and height as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Geometric center.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// The four corners, clockwise from the top-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right(), self.top),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.left, self.bottom()),
        ]
    }

    /// Returns true if the rectangle contains the point (edges inclusive).
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Returns the rectangle grown by `amount` on every side.
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.left - amount,
            self.top - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Returns the rectangle moved by `offset`.
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(
            self.left + offset.x,
            self.top + offset.y,
            self.width,
            self.height,
        )
    }

    /// Axis-aligned box of this rectangle rotated by `degrees` (clockwise on
    /// screen) around `pivot`.
    pub fn rotated_aabb(&self, degrees: f32, pivot: Vec2) -> Self {
        if degrees == 0.0 {
            return *self;
        }
        let rotation = Mat2::from_angle(degrees.to_radians());
        Self::from_points(
            self.corners()
                .map(|corner| pivot + rotation * (corner - pivot)),
        )
    }
}

/// Rotate `point` by `degrees` (clockwise on screen) around `pivot`.
pub fn rotate_point(point: Vec2, pivot: Vec2, degrees: f32) -> Vec2 {
    if degrees == 0.0 {
        return point;
    }
    pivot + Mat2::from_angle(degrees.to_radians()) * (point - pivot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_and_edges() {
        let rect = BoundingRect::new(50.0, 50.0, 100.0, 40.0);
        assert_eq!(rect.center(), Vec2::new(100.0, 70.0));
        assert_eq!(rect.right(), 150.0);
        assert_eq!(rect.bottom(), 90.0);
        assert!(rect.contains_point(Vec2::new(150.0, 90.0)));
        assert!(!rect.contains_point(Vec2::new(151.0, 90.0)));
    }

    #[test]
    fn test_from_points() {
        let rect = BoundingRect::from_points([
            Vec2::new(10.0, 5.0),
            Vec2::new(-2.0, 8.0),
            Vec2::new(4.0, 20.0),
        ]);
        assert_eq!(rect, BoundingRect::new(-2.0, 5.0, 12.0, 15.0));
        assert_eq!(BoundingRect::from_points(std::iter::empty()), BoundingRect::default());
    }

    #[test]
    fn test_rotated_aabb_quarter_turn() {
        let rect = BoundingRect::new(0.0, 0.0, 100.0, 50.0);
        let rotated = rect.rotated_aabb(90.0, rect.center());
        assert_relative_eq!(rotated.width, 50.0, epsilon = 1e-3);
        assert_relative_eq!(rotated.height, 100.0, epsilon = 1e-3);
        assert_relative_eq!(rotated.center().x, 50.0, epsilon = 1e-3);
        assert_relative_eq!(rotated.center().y, 25.0, epsilon = 1e-3);
    }

    #[test]
    fn test_rotate_point_is_clockwise_on_screen() {
        // +90 takes a point right of the pivot to below it (y down)
        let p = rotate_point(Vec2::new(10.0, 0.0), Vec2::ZERO, 90.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 10.0, epsilon = 1e-4);
    }
}
