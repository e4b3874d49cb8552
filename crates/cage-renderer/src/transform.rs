//! Rotation helpers shared by both backends

use glam::{Affine2, Vec2};

/// Clockwise (on screen) rotation by `degrees` about `pivot`.
pub fn rotation_about(pivot: Vec2, degrees: f32) -> Affine2 {
    if degrees == 0.0 {
        return Affine2::IDENTITY;
    }
    Affine2::from_translation(pivot)
        * Affine2::from_angle(degrees.to_radians())
        * Affine2::from_translation(-pivot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_about_pivot() {
        let t = rotation_about(Vec2::new(100.0, 100.0), 90.0);
        let p = t.transform_point2(Vec2::new(130.0, 100.0));
        // Right of the pivot goes below it in y-down space
        assert_relative_eq!(p.x, 100.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 130.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        assert_eq!(rotation_about(Vec2::new(5.0, 5.0), 0.0), Affine2::IDENTITY);
    }
}
