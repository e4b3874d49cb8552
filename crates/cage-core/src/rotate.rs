//! Rotation gestures
//!
//! Pointer motion around a pivot is turned into incremental angle deltas.
//! The controller keeps the last absolute pointer angle as its reference, so
//! every move reports only the change since the previous move and the
//! reference carries over from one gesture to the next.

use glam::Vec2;

use crate::angle::{line_angle, normalize_degrees};
use crate::constants::{CLICK_THRESHOLD, NEUTRAL_ROTATE_ANGLE};
use crate::geometry::BoundingRect;

/// State of the gesture in progress
#[derive(Debug, Clone, Copy)]
struct RotateGesture {
    pivot: Vec2,
    start_pointer: Vec2,
    start_reference: f32,
    /// Sum of the deltas reported so far
    applied: f32,
}

/// Outcome of a finished rotate gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotateEnd {
    /// The pointer travelled less than the click threshold. The reference
    /// angle was restored; apply `revert` to undo the deltas already
    /// reported during the gesture.
    Click { revert: f32 },
    /// A real rotation; `total` is the sum of all reported deltas.
    Rotated { total: f32 },
}

/// Tracks one rotation gesture at a time.
#[derive(Debug, Clone)]
pub struct RotationController {
    reference_angle: f32,
    click_threshold: f32,
    active: Option<RotateGesture>,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(CLICK_THRESHOLD)
    }
}

impl RotationController {
    pub fn new(click_threshold: f32) -> Self {
        Self {
            reference_angle: NEUTRAL_ROTATE_ANGLE,
            click_threshold,
            active: None,
        }
    }

    /// Absolute pointer angle the next move is measured against.
    pub fn reference_angle(&self) -> f32 {
        self.reference_angle
    }

    /// Re-seed the reference, e.g. after binding to an already rotated
    /// target. Ignored while a gesture is active.
    pub fn set_reference_angle(&mut self, degrees: f32) {
        if self.active.is_none() {
            self.reference_angle = normalize_degrees(degrees);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Pivot of the active gesture.
    pub fn pivot(&self) -> Option<Vec2> {
        self.active.map(|g| g.pivot)
    }

    /// Start a gesture around the center of `bounds`.
    ///
    /// Returns the absolute angle from the pivot to the pointer.
    pub fn begin(&mut self, bounds: BoundingRect, pointer: Vec2) -> f32 {
        let pivot = bounds.center();
        self.active = Some(RotateGesture {
            pivot,
            start_pointer: pointer,
            start_reference: self.reference_angle,
            applied: 0.0,
        });
        let start_angle = line_angle(pivot, pointer);
        tracing::debug!(
            "Rotate gesture started: pivot=({}, {}), angle={}",
            pivot.x,
            pivot.y,
            start_angle
        );
        start_angle
    }

    /// Feed a pointer move.
    ///
    /// Returns the clockwise delta in degrees to add to the current rotation,
    /// or `None` when no gesture is active.
    pub fn update(&mut self, pointer: Vec2) -> Option<f32> {
        let gesture = self.active.as_mut()?;
        let current = line_angle(gesture.pivot, pointer);
        let delta = normalize_degrees(self.reference_angle - current);
        self.reference_angle = current;
        gesture.applied += delta;
        Some(delta)
    }

    /// End the gesture with the pointer released at `pointer`.
    pub fn end(&mut self, pointer: Vec2) -> Option<RotateEnd> {
        let gesture = self.active.take()?;
        if pointer.distance(gesture.start_pointer) < self.click_threshold {
            self.reference_angle = gesture.start_reference;
            tracing::debug!("Rotate gesture treated as click");
            return Some(RotateEnd::Click {
                revert: -gesture.applied,
            });
        }
        tracing::debug!("Rotate gesture finished: total={}", gesture.applied);
        Some(RotateEnd::Rotated {
            total: gesture.applied,
        })
    }

    /// Abort the gesture, restoring the reference angle.
    ///
    /// Returns the delta that undoes everything reported so far.
    pub fn cancel(&mut self) -> Option<f32> {
        let gesture = self.active.take()?;
        self.reference_angle = gesture.start_reference;
        Some(-gesture.applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn centered_at_100() -> BoundingRect {
        BoundingRect::new(50.0, 50.0, 100.0, 100.0)
    }

    #[test]
    fn test_quarter_turn_delta() {
        let mut rotation = RotationController::default();
        let start = rotation.begin(centered_at_100(), Vec2::new(100.0, 70.0));
        assert_relative_eq!(start, 90.0);

        let delta = rotation.update(Vec2::new(130.0, 100.0)).unwrap();
        assert_relative_eq!(delta, 90.0);
        assert_relative_eq!(rotation.reference_angle(), 0.0);
    }

    #[test]
    fn test_incremental_moves_accumulate() {
        let mut rotation = RotationController::default();
        rotation.begin(centered_at_100(), Vec2::new(100.0, 70.0));

        let a = rotation.update(Vec2::new(130.0, 70.0)).unwrap();
        let b = rotation.update(Vec2::new(130.0, 100.0)).unwrap();
        assert_relative_eq!(a, 45.0, epsilon = 1e-4);
        assert_relative_eq!(b, 45.0, epsilon = 1e-4);

        let end = rotation.end(Vec2::new(130.0, 100.0)).unwrap();
        match end {
            RotateEnd::Rotated { total } => assert_relative_eq!(total, 90.0, epsilon = 1e-4),
            other => panic!("expected rotation, got {:?}", other),
        }
        assert!(!rotation.is_active());
    }

    #[test]
    fn test_reference_carries_across_gestures() {
        let mut rotation = RotationController::default();
        rotation.begin(centered_at_100(), Vec2::new(100.0, 70.0));
        rotation.update(Vec2::new(130.0, 100.0));
        rotation.end(Vec2::new(130.0, 100.0));

        // Grab the handle where the previous gesture left it
        rotation.begin(centered_at_100(), Vec2::new(130.0, 100.0));
        let delta = rotation.update(Vec2::new(130.0, 100.0)).unwrap();
        assert_relative_eq!(delta, 0.0);
    }

    #[test]
    fn test_click_reverts() {
        let mut rotation = RotationController::default();
        rotation.begin(centered_at_100(), Vec2::new(100.0, 70.0));
        let delta = rotation.update(Vec2::new(103.0, 70.0)).unwrap();
        assert!(delta > 0.0);

        let end = rotation.end(Vec2::new(103.0, 70.0)).unwrap();
        match end {
            RotateEnd::Click { revert } => assert_relative_eq!(revert, -delta),
            other => panic!("expected click, got {:?}", other),
        }
        assert_relative_eq!(rotation.reference_angle(), 90.0);
    }

    #[test]
    fn test_seam_crossing_is_small_step() {
        let mut rotation = RotationController::default();
        rotation.set_reference_angle(170.0);
        rotation.begin(BoundingRect::new(-10.0, -10.0, 20.0, 20.0), Vec2::new(-10.0, -1.0));
        // From just above the negative x axis to just below it
        let delta = rotation.update(Vec2::new(-10.0, 1.0)).unwrap();
        assert!(delta.abs() < 30.0, "delta should not wrap: {}", delta);
    }

    #[test]
    fn test_idle_controller() {
        let mut rotation = RotationController::default();
        assert!(rotation.update(Vec2::new(1.0, 1.0)).is_none());
        assert!(rotation.end(Vec2::ZERO).is_none());
        assert!(rotation.cancel().is_none());
        assert!(rotation.pivot().is_none());
    }

    #[test]
    fn test_cancel_restores_reference() {
        let mut rotation = RotationController::default();
        rotation.begin(centered_at_100(), Vec2::new(100.0, 70.0));
        rotation.update(Vec2::new(130.0, 100.0));
        let revert = rotation.cancel().unwrap();
        assert_relative_eq!(revert, -90.0);
        assert_relative_eq!(rotation.reference_angle(), 90.0);
    }
}
