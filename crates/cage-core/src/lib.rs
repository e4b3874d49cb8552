//! Transform Cage Core
//!
//! Backend-agnostic geometry and interaction engine for a resize/rotate
//! overlay drawn over an element on a visual editing surface.
//!
//! This crate provides:
//! - Angle and bounding-rect math in a y-down coordinate space
//! - Handle layout for the eight directional resize handles
//! - Resize and rotation gesture controllers
//! - A drag primitive turning raw pointer input into start/move/end gestures
//! - The [`RenderBackend`] capability trait the overlay draws through
//! - The [`Overlay`] orchestrator binding all of the above to an edit target

pub mod angle;
pub mod backend;
pub mod config;
pub mod constants;
pub mod drag;
pub mod geometry;
pub mod handle;
pub mod overlay;
pub mod resize;
pub mod rotate;

// Re-exports for convenience
pub use angle::{angle, line_angle, normalize_degrees};
pub use backend::{BackendError, BackendKind, BackendResult, ChromeKind, NodeId, RenderBackend};
pub use config::{AspectPolicy, ConfigError, MinSizePolicy, OverlayConfig};
pub use drag::{DragEvent, DragPhase, DragTracker, PointerEvent};
pub use geometry::BoundingRect;
pub use handle::{AxisLock, CursorTag, HandleDescriptor, layout};
pub use overlay::{BindOptions, ChromeNodes, ConfirmCallback, Overlay, OverlayError, OverlayPart};
pub use resize::{ResizeGesture, compute_delta};
pub use rotate::{RotateEnd, RotationController};
