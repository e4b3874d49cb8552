//! Resize handle layout
//!
//! Eight handles sit on the four corners and four edge midpoints of the box.
//! Their positions are a pure function of the box size and handle size and
//! are recomputed whenever either changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Direction code of a resize handle.
///
/// The tag encodes both the edges a handle moves and the axis it leaves
/// untouched: `N`/`S` lock the x axis, `E`/`W` lock the y axis, corners
/// lock neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorTag {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl CursorTag {
    /// All tags in layout order.
    pub const ALL: [CursorTag; 8] = [
        CursorTag::Nw,
        CursorTag::N,
        CursorTag::Ne,
        CursorTag::E,
        CursorTag::Se,
        CursorTag::S,
        CursorTag::Sw,
        CursorTag::W,
    ];

    /// Short direction code, e.g. `"nw"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorTag::Nw => "nw",
            CursorTag::N => "n",
            CursorTag::Ne => "ne",
            CursorTag::E => "e",
            CursorTag::Se => "se",
            CursorTag::S => "s",
            CursorTag::Sw => "sw",
            CursorTag::W => "w",
        }
    }

    /// CSS cursor name, e.g. `"nw-resize"`.
    pub fn css_cursor(&self) -> String {
        format!("{}-resize", self.as_str())
    }

    /// Handle moves the left edge.
    pub fn is_west(&self) -> bool {
        matches!(self, CursorTag::Nw | CursorTag::Sw | CursorTag::W)
    }

    /// Handle moves the top edge.
    pub fn is_north(&self) -> bool {
        matches!(self, CursorTag::Nw | CursorTag::N | CursorTag::Ne)
    }

    /// Handle sits on a corner.
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            CursorTag::Nw | CursorTag::Ne | CursorTag::Se | CursorTag::Sw
        )
    }

    /// Axis left untouched by this handle.
    pub fn axis_lock(&self) -> AxisLock {
        match self {
            CursorTag::N | CursorTag::S => AxisLock { x: true, y: false },
            CursorTag::E | CursorTag::W => AxisLock { x: false, y: true },
            _ => AxisLock::NONE,
        }
    }

    /// Sign linking the two axis deltas under aspect-ratio lock.
    ///
    /// Handles whose edges move in opposite screen directions on the two
    /// axes (growing left while growing down, and so on) get `-1`.
    pub fn aspect_sign(&self) -> f32 {
        match self {
            CursorTag::W | CursorTag::N | CursorTag::Sw | CursorTag::Ne => -1.0,
            _ => 1.0,
        }
    }
}

impl std::fmt::Display for CursorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axes a drag is not allowed to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisLock {
    pub x: bool,
    pub y: bool,
}

impl AxisLock {
    /// No axis locked.
    pub const NONE: AxisLock = AxisLock { x: false, y: false };

    /// Zero out the locked components of `delta`.
    pub fn apply(&self, delta: Vec2) -> Vec2 {
        Vec2::new(
            if self.x { 0.0 } else { delta.x },
            if self.y { 0.0 } else { delta.y },
        )
    }
}

/// A resize handle placed relative to the box origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleDescriptor {
    /// Anchor point on the box outline, relative to the box origin
    pub anchor: Vec2,
    /// Handle diameter
    pub size: f32,
    /// Resize direction
    pub cursor: CursorTag,
}

impl HandleDescriptor {
    /// Top-left of the handle visual, so that it straddles the anchor.
    pub fn top_left(&self) -> Vec2 {
        self.anchor - Vec2::splat(self.size / 2.0)
    }

    /// Returns true if `point` (relative to the box origin) falls on the
    /// handle, with `tolerance` of extra slack.
    pub fn contains(&self, point: Vec2, tolerance: f32) -> bool {
        point.distance(self.anchor) <= self.size / 2.0 + tolerance
    }
}

/// Compute the eight handles for a box of `width` x `height`.
///
/// Order is fixed: nw, n, ne, e, se, s, sw, w.
pub fn layout(width: f32, height: f32, handle_size: f32) -> [HandleDescriptor; 8] {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let anchors = [
        Vec2::new(0.0, 0.0),
        Vec2::new(half_w, 0.0),
        Vec2::new(width, 0.0),
        Vec2::new(width, half_h),
        Vec2::new(width, height),
        Vec2::new(half_w, height),
        Vec2::new(0.0, height),
        Vec2::new(0.0, half_h),
    ];

    std::array::from_fn(|i| HandleDescriptor {
        anchor: anchors[i],
        size: handle_size,
        cursor: CursorTag::ALL[i],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_order_and_count() {
        let handles = layout(100.0, 60.0, 8.0);
        let tags: Vec<_> = handles.iter().map(|h| h.cursor).collect();
        assert_eq!(tags, CursorTag::ALL.to_vec());
    }

    #[test]
    fn test_layout_corners_and_midpoints() {
        let handles = layout(100.0, 60.0, 8.0);
        let anchor = |tag: CursorTag| {
            handles
                .iter()
                .find(|h| h.cursor == tag)
                .map(|h| h.anchor)
                .unwrap()
        };

        assert_eq!(anchor(CursorTag::Nw), Vec2::new(0.0, 0.0));
        assert_eq!(anchor(CursorTag::Ne), Vec2::new(100.0, 0.0));
        assert_eq!(anchor(CursorTag::Se), Vec2::new(100.0, 60.0));
        assert_eq!(anchor(CursorTag::Sw), Vec2::new(0.0, 60.0));

        assert_eq!(anchor(CursorTag::N), Vec2::new(50.0, 0.0));
        assert_eq!(anchor(CursorTag::E), Vec2::new(100.0, 30.0));
        assert_eq!(anchor(CursorTag::S), Vec2::new(50.0, 60.0));
        assert_eq!(anchor(CursorTag::W), Vec2::new(0.0, 30.0));
    }

    #[test]
    fn test_handle_straddles_anchor() {
        let handles = layout(100.0, 60.0, 8.0);
        assert_eq!(handles[0].top_left(), Vec2::new(-4.0, -4.0));
        assert_eq!(handles[4].top_left(), Vec2::new(96.0, 56.0));
        assert!(handles.iter().all(|h| h.size == 8.0));
    }

    #[test]
    fn test_layout_tracks_size() {
        let before = layout(100.0, 100.0, 8.0);
        let after = layout(120.0, 80.0, 8.0);
        assert_ne!(before[4].anchor, after[4].anchor);
        assert_eq!(after[4].anchor, Vec2::new(120.0, 80.0));
        // Origin-anchored handle never moves
        assert_eq!(before[0].anchor, after[0].anchor);
    }

    #[test]
    fn test_axis_locks() {
        assert_eq!(CursorTag::N.axis_lock(), AxisLock { x: true, y: false });
        assert_eq!(CursorTag::S.axis_lock(), AxisLock { x: true, y: false });
        assert_eq!(CursorTag::E.axis_lock(), AxisLock { x: false, y: true });
        assert_eq!(CursorTag::W.axis_lock(), AxisLock { x: false, y: true });
        for tag in [CursorTag::Nw, CursorTag::Ne, CursorTag::Se, CursorTag::Sw] {
            assert_eq!(tag.axis_lock(), AxisLock::NONE);
        }
    }

    #[test]
    fn test_direction_flags() {
        let west: Vec<_> = CursorTag::ALL.iter().filter(|t| t.is_west()).collect();
        let north: Vec<_> = CursorTag::ALL.iter().filter(|t| t.is_north()).collect();
        assert_eq!(west, vec![&CursorTag::Nw, &CursorTag::Sw, &CursorTag::W]);
        assert_eq!(north, vec![&CursorTag::Nw, &CursorTag::N, &CursorTag::Ne]);
    }

    #[test]
    fn test_aspect_sign() {
        let negative: Vec<_> = CursorTag::ALL
            .into_iter()
            .filter(|t| t.aspect_sign() < 0.0)
            .collect();
        assert_eq!(
            negative,
            vec![CursorTag::N, CursorTag::Ne, CursorTag::Sw, CursorTag::W]
        );
    }

    #[test]
    fn test_css_cursor() {
        assert_eq!(CursorTag::Se.css_cursor(), "se-resize");
        assert_eq!(CursorTag::W.to_string(), "w");
    }

    #[test]
    fn test_hit_with_tolerance() {
        let handle = layout(100.0, 100.0, 8.0)[4];
        assert!(handle.contains(Vec2::new(104.0, 100.0), 0.0));
        assert!(!handle.contains(Vec2::new(106.0, 100.0), 0.0));
        assert!(handle.contains(Vec2::new(106.0, 100.0), 2.0));
    }
}
