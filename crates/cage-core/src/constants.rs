//! Global constants for cage-core

/// Default handle diameter in pixels
pub const DEFAULT_HANDLE_SIZE: f32 = 8.0;

/// Default minimum box width enforced by [`crate::MinSizePolicy::Reject`]
pub const DEFAULT_MIN_WIDTH: f32 = 1.0;

/// Default minimum box height enforced by [`crate::MinSizePolicy::Reject`]
pub const DEFAULT_MIN_HEIGHT: f32 = 1.0;

/// Pointer travel (pixels) below which a gesture counts as a click
pub const CLICK_THRESHOLD: f32 = 7.0;

/// Absolute angle of the rotate handle on an unrotated box (straight up)
pub const NEUTRAL_ROTATE_ANGLE: f32 = 90.0;

/// Distance between the top edge of the box and the rotate handle
pub const ROTATE_BAR_LENGTH: f32 = 20.0;

/// Extra hit radius around handles
pub const HIT_TOLERANCE: f32 = 2.0;

/// Confirm icon width
pub const CONFIRM_ICON_WIDTH: f32 = 16.0;

/// Confirm icon height
pub const CONFIRM_ICON_HEIGHT: f32 = 8.0;

/// Confirm icon inset from the top-right corner of the box (right, top)
pub const CONFIRM_ICON_INSET: [f32; 2] = [5.0, 2.0];
