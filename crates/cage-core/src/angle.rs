//! Angle utilities for a y-down coordinate space
//!
//! Screen and page coordinates grow downward, so the raw y delta is negated
//! before handing it to `atan2`. Angles are counter-clockwise from the
//! positive x axis, in degrees, within `(-180, 180]`.

use glam::Vec2;

/// Angle of the vector from `(origin_x, origin_y)` to `(point_x, point_y)`.
///
/// Defined for every input: a zero-length vector yields `0.0`.
///
/// # Example
///
/// ```
/// use cage_core::angle;
///
/// assert_eq!(angle(0.0, 0.0, 10.0, 0.0), 0.0);
/// assert!((angle(0.0, 0.0, 0.0, -10.0) - 90.0).abs() < 1e-4);
/// ```
pub fn angle(origin_x: f32, origin_y: f32, point_x: f32, point_y: f32) -> f32 {
    let dx = point_x - origin_x;
    let dy = origin_y - point_y;
    let degrees = dy.atan2(dx).to_degrees();
    // atan2 may return -180 for a negative zero y delta
    if degrees <= -180.0 { 180.0 } else { degrees }
}

/// [`angle`] over `glam` points.
pub fn line_angle(origin: Vec2, point: Vec2) -> f32 {
    angle(origin.x, origin.y, point.x, point.y)
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cardinal_directions() {
        assert_relative_eq!(angle(0.0, 0.0, 10.0, 0.0), 0.0);
        assert_relative_eq!(angle(0.0, 0.0, 0.0, -10.0), 90.0);
        assert_relative_eq!(angle(0.0, 0.0, -10.0, 0.0).abs(), 180.0);
        assert_relative_eq!(angle(0.0, 0.0, 0.0, 10.0), -90.0);
    }

    #[test]
    fn test_origin_offset() {
        // Pointer straight above a center at (100, 100)
        assert_relative_eq!(angle(100.0, 100.0, 100.0, 70.0), 90.0);
        assert_relative_eq!(angle(100.0, 100.0, 130.0, 100.0), 0.0);
        assert_relative_eq!(line_angle(Vec2::new(100.0, 100.0), Vec2::new(130.0, 70.0)), 45.0);
    }

    #[test]
    fn test_degenerate_vector() {
        assert_eq!(angle(5.0, 5.0, 5.0, 5.0), 0.0);
    }

    #[test]
    fn test_range_excludes_minus_180() {
        let a = angle(0.0, -0.0, -10.0, 0.0);
        assert!(a > -180.0 && a <= 180.0, "angle out of range: {}", a);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_relative_eq!(normalize_degrees(0.0), 0.0);
        assert_relative_eq!(normalize_degrees(190.0), -170.0);
        assert_relative_eq!(normalize_degrees(-190.0), 170.0);
        assert_relative_eq!(normalize_degrees(540.0), 180.0);
        assert_relative_eq!(normalize_degrees(-180.0), 180.0);
        assert_relative_eq!(normalize_degrees(340.0), -20.0);
    }
}
