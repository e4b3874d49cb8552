//! Directional resize gestures
//!
//! A resize gesture starts on one of the eight handles and turns the pointer
//! delta since the gesture start into a new box. Geometry produced during the
//! drag is provisional; the owner commits it when the gesture ends.

use glam::Vec2;

use crate::config::{AspectPolicy, MinSizePolicy};
use crate::geometry::BoundingRect;
use crate::handle::CursorTag;

/// Compute the box produced by dragging the `cursor` handle from
/// `start_pointer` to `pointer`, starting from `start`.
///
/// # Algorithm
///
/// 1. Raw deltas are the pointer travel since the gesture start.
/// 2. Under aspect-ratio lock one delta is derived from the other: edge
///    handles on the x axis (`e`, `w`) drive y from x, every other handle
///    drives x from y. The derived delta is signed by
///    [`CursorTag::aspect_sign`] so both edges move outward together. With
///    [`AspectPolicy::Mirror`] it has the same magnitude as the driving
///    delta; [`AspectPolicy::Proportional`] scales it by the start ratio
///    `width / height`.
/// 3. West-bearing handles shrink the width by `dx` and shift the left edge
///    by `dx`; the others grow the width by `dx`. North-bearing handles do
///    the same for height and the top edge. An axis locked by the handle is
///    left alone unless aspect-ratio lock forces it to follow.
pub fn compute_delta(
    pointer: Vec2,
    start_pointer: Vec2,
    cursor: CursorTag,
    lock_aspect_ratio: bool,
    aspect_policy: AspectPolicy,
    start: BoundingRect,
) -> BoundingRect {
    let lock = cursor.axis_lock();
    let mut dx = pointer.x - start_pointer.x;
    let mut dy = pointer.y - start_pointer.y;

    if lock_aspect_ratio {
        let sign = cursor.aspect_sign();
        let ratio = match aspect_policy {
            AspectPolicy::Mirror => 1.0,
            AspectPolicy::Proportional => aspect_ratio(start),
        };
        if lock.y {
            dy = dx * sign / ratio;
        } else {
            dx = dy * sign * ratio;
        }
    }

    let mut result = start;

    if !lock.x || lock_aspect_ratio {
        if cursor.is_west() {
            result.width = start.width - dx;
            result.left = start.left + dx;
        } else {
            result.width = start.width + dx;
        }
    }

    if !lock.y || lock_aspect_ratio {
        if cursor.is_north() {
            result.height = start.height - dy;
            result.top = start.top + dy;
        } else {
            result.height = start.height + dy;
        }
    }

    result
}

fn aspect_ratio(rect: BoundingRect) -> f32 {
    let ratio = rect.width / rect.height;
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

/// One active resize drag.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    cursor: CursorTag,
    start_pointer: Vec2,
    start_rect: BoundingRect,
    lock_aspect_ratio: bool,
    aspect_policy: AspectPolicy,
    min_size: MinSizePolicy,
    last_valid: BoundingRect,
}

impl ResizeGesture {
    /// Start a drag on the `cursor` handle of a box currently at `start_rect`.
    pub fn begin(
        cursor: CursorTag,
        start_pointer: Vec2,
        start_rect: BoundingRect,
        lock_aspect_ratio: bool,
        aspect_policy: AspectPolicy,
        min_size: MinSizePolicy,
    ) -> Self {
        Self {
            cursor,
            start_pointer,
            start_rect,
            lock_aspect_ratio,
            aspect_policy,
            min_size,
            last_valid: start_rect,
        }
    }

    pub fn cursor(&self) -> CursorTag {
        self.cursor
    }

    pub fn start_rect(&self) -> BoundingRect {
        self.start_rect
    }

    pub fn lock_aspect_ratio(&self) -> bool {
        self.lock_aspect_ratio
    }

    /// Latest accepted geometry.
    pub fn current(&self) -> BoundingRect {
        self.last_valid
    }

    /// Feed a pointer move.
    ///
    /// Returns the new provisional box, or `None` if the minimum size policy
    /// rejected this step. A rejected step leaves [`Self::current`] at the
    /// previous accepted geometry and the gesture stays live.
    pub fn update(&mut self, pointer: Vec2) -> Option<BoundingRect> {
        let candidate = compute_delta(
            pointer,
            self.start_pointer,
            self.cursor,
            self.lock_aspect_ratio,
            self.aspect_policy,
            self.start_rect,
        );
        if !self.min_size.accepts(candidate.width, candidate.height) {
            tracing::trace!(
                "Resize step rejected: {}x{} below minimum",
                candidate.width,
                candidate.height
            );
            return None;
        }
        self.last_valid = candidate;
        Some(candidate)
    }

    /// End the drag at `pointer` and return the geometry to commit.
    pub fn finish(mut self, pointer: Vec2) -> BoundingRect {
        self.update(pointer);
        self.last_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(w: f32, h: f32) -> BoundingRect {
        BoundingRect::new(50.0, 50.0, w, h)
    }

    #[test]
    fn test_east_handle_ignores_y() {
        let start = rect(100.0, 100.0);
        let out = compute_delta(
            Vec2::new(20.0, 5.0),
            Vec2::ZERO,
            CursorTag::E,
            false,
            AspectPolicy::Mirror,
            start,
        );
        assert_eq!(out.width, 120.0);
        assert_eq!(out.height, 100.0);
        assert_eq!(out.origin(), start.origin());
    }

    #[test]
    fn test_north_handle_ignores_x() {
        let start = rect(100.0, 100.0);
        let out = compute_delta(
            Vec2::new(30.0, -10.0),
            Vec2::ZERO,
            CursorTag::N,
            false,
            AspectPolicy::Mirror,
            start,
        );
        assert_eq!(out.width, 100.0);
        assert_eq!(out.height, 110.0);
        assert_eq!(out.top, 40.0);
        assert_eq!(out.left, 50.0);
    }

    #[test]
    fn test_west_handle_shifts_left_edge() {
        let start = rect(100.0, 100.0);
        let out = compute_delta(
            Vec2::new(-15.0, 0.0),
            Vec2::ZERO,
            CursorTag::W,
            false,
            AspectPolicy::Mirror,
            start,
        );
        assert_eq!(out.width, 115.0);
        assert_eq!(out.left, 35.0);
        // Right edge stays put
        assert_eq!(out.right(), start.right());
    }

    #[test]
    fn test_nw_corner_moves_both_edges() {
        let start = rect(100.0, 80.0);
        let out = compute_delta(
            Vec2::new(10.0, 20.0),
            Vec2::ZERO,
            CursorTag::Nw,
            false,
            AspectPolicy::Mirror,
            start,
        );
        assert_eq!(out.width, 90.0);
        assert_eq!(out.height, 60.0);
        assert_eq!(out.origin(), Vec2::new(60.0, 70.0));
        assert_eq!(out.right(), start.right());
        assert_eq!(out.bottom(), start.bottom());
    }

    #[test]
    fn test_aspect_lock_mirrors_driving_delta() {
        let start = rect(100.0, 50.0);

        // Corners drive x from y
        let se = compute_delta(
            Vec2::new(20.0, 20.0),
            Vec2::ZERO,
            CursorTag::Se,
            true,
            AspectPolicy::Mirror,
            start,
        );
        assert_eq!(se.width, 120.0);
        assert_eq!(se.height, 70.0);
        assert_eq!(se.origin(), start.origin());

        // Edge handles on the x axis drive y from x
        let east = compute_delta(
            Vec2::new(20.0, 0.0),
            Vec2::ZERO,
            CursorTag::E,
            true,
            AspectPolicy::Mirror,
            start,
        );
        assert_eq!(east.width, 120.0);
        assert_eq!(east.height, 70.0);

        // x travel alone does not resize a corner under lock
        let out = compute_delta(
            Vec2::new(20.0, 0.0),
            Vec2::ZERO,
            CursorTag::Se,
            true,
            AspectPolicy::Mirror,
            start,
        );
        assert_eq!(out, start);
    }

    #[test]
    fn test_aspect_lock_mirror_every_handle_grows_outward() {
        let start = rect(100.0, 50.0);
        // Pointer travel pointing away from the box for each handle
        let outward = [
            (CursorTag::Nw, Vec2::new(-10.0, -10.0)),
            (CursorTag::N, Vec2::new(0.0, -10.0)),
            (CursorTag::Ne, Vec2::new(10.0, -10.0)),
            (CursorTag::E, Vec2::new(10.0, 0.0)),
            (CursorTag::Se, Vec2::new(10.0, 10.0)),
            (CursorTag::S, Vec2::new(0.0, 10.0)),
            (CursorTag::Sw, Vec2::new(-10.0, 10.0)),
            (CursorTag::W, Vec2::new(-10.0, 0.0)),
        ];
        for (tag, travel) in outward {
            let out = compute_delta(travel, Vec2::ZERO, tag, true, AspectPolicy::Mirror, start);
            assert_eq!((out.width, out.height), (110.0, 60.0), "handle {}", tag);
        }

        let west = compute_delta(
            Vec2::new(-10.0, 0.0),
            Vec2::ZERO,
            CursorTag::W,
            true,
            AspectPolicy::Mirror,
            start,
        );
        assert_eq!(west.left, 40.0);
        assert_eq!(west.right(), start.right());
    }

    #[test]
    fn test_proportional_lock_keeps_ratio() {
        let start = rect(100.0, 50.0);
        let se = compute_delta(
            Vec2::new(20.0, 10.0),
            Vec2::ZERO,
            CursorTag::Se,
            true,
            AspectPolicy::Proportional,
            start,
        );
        assert_relative_eq!(se.width, 120.0);
        assert_relative_eq!(se.height, 60.0);

        let north = compute_delta(
            Vec2::new(0.0, -10.0),
            Vec2::ZERO,
            CursorTag::N,
            true,
            AspectPolicy::Proportional,
            start,
        );
        assert_relative_eq!(north.width, 120.0);
        assert_relative_eq!(north.height, 60.0);
        assert_relative_eq!(north.top, 40.0);
    }

    #[test]
    fn test_proportional_lock_every_handle_grows_outward() {
        let start = rect(100.0, 50.0);
        let outward = [
            (CursorTag::Nw, Vec2::new(-20.0, -10.0)),
            (CursorTag::N, Vec2::new(0.0, -10.0)),
            (CursorTag::Ne, Vec2::new(20.0, -10.0)),
            (CursorTag::E, Vec2::new(20.0, 0.0)),
            (CursorTag::Se, Vec2::new(20.0, 10.0)),
            (CursorTag::S, Vec2::new(0.0, 10.0)),
            (CursorTag::Sw, Vec2::new(-20.0, 10.0)),
            (CursorTag::W, Vec2::new(-20.0, 0.0)),
        ];
        for (tag, travel) in outward {
            let out =
                compute_delta(travel, Vec2::ZERO, tag, true, AspectPolicy::Proportional, start);
            assert_relative_eq!(out.width, 120.0, epsilon = 1e-4);
            assert_relative_eq!(out.height, 60.0, epsilon = 1e-4);
            assert_relative_eq!(out.width / out.height, 2.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_gesture_rejects_below_minimum() {
        let start = rect(100.0, 100.0);
        let mut gesture = ResizeGesture::begin(
            CursorTag::E,
            Vec2::new(150.0, 100.0),
            start,
            false,
            AspectPolicy::Mirror,
            MinSizePolicy::default(),
        );

        let accepted = gesture.update(Vec2::new(100.0, 100.0)).unwrap();
        assert_eq!(accepted.width, 50.0);

        // Would give width -10
        assert!(gesture.update(Vec2::new(40.0, 100.0)).is_none());
        assert_eq!(gesture.current(), accepted);

        // Recovers on a later move
        let recovered = gesture.update(Vec2::new(60.0, 100.0)).unwrap();
        assert_eq!(recovered.width, 10.0);
    }

    #[test]
    fn test_gesture_finish_keeps_last_valid() {
        let start = rect(100.0, 100.0);
        let mut gesture = ResizeGesture::begin(
            CursorTag::S,
            Vec2::ZERO,
            start,
            false,
            AspectPolicy::Mirror,
            MinSizePolicy::default(),
        );
        gesture.update(Vec2::new(0.0, -60.0));
        let committed = gesture.finish(Vec2::new(0.0, -200.0));
        assert_eq!(committed.height, 40.0);
    }

    #[test]
    fn test_unclamped_policy_allows_inversion() {
        let start = rect(10.0, 10.0);
        let mut gesture = ResizeGesture::begin(
            CursorTag::E,
            Vec2::ZERO,
            start,
            false,
            AspectPolicy::Mirror,
            MinSizePolicy::Unclamped,
        );
        let out = gesture.update(Vec2::new(-30.0, 0.0)).unwrap();
        assert_eq!(out.width, -20.0);
    }
}
