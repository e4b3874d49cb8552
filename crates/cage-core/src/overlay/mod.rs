//! Overlay orchestrator
//!
//! An [`Overlay`] owns a group of chrome elements (dashed frame, eight
//! resize handles, optional rotate bar and handle, optional confirm icon)
//! and an edit target it keeps in sync with that chrome. Pointer input is
//! routed into exactly one gesture at a time; resize and rotation math is
//! delegated to [`ResizeGesture`] and [`RotationController`].
//!
//! # Module Structure
//!
//! ```text
//! overlay/
//! ├── mod.rs       # Overlay state, construction, binding, accessors
//! ├── chrome.rs    # Chrome element creation and placement
//! └── gesture.rs   # Pointer routing, gesture lifecycle, confirm
//! ```

mod chrome;
mod gesture;

use std::marker::PhantomData;

use glam::Vec2;
use thiserror::Error;

use crate::backend::{BackendError, NodeId, RenderBackend};
use crate::config::{ConfigError, OverlayConfig};
use crate::constants::NEUTRAL_ROTATE_ANGLE;
use crate::drag::{DragTracker, PointerEvent};
use crate::geometry::BoundingRect;
use crate::handle::{CursorTag, HandleDescriptor, layout};
use crate::rotate::RotationController;

pub use chrome::ChromeNodes;
use gesture::ActiveGesture;

/// Callback invoked when the confirm icon is clicked
pub type ConfirmCallback = Box<dyn FnMut(&PointerEvent)>;

/// Options for [`Overlay::bind_edit_target`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindOptions {
    /// Keep the width/height ratio fixed during each resize drag
    pub lock_aspect_ratio: bool,
}

impl BindOptions {
    pub fn locked() -> Self {
        Self {
            lock_aspect_ratio: true,
        }
    }
}

/// Interactive part of the overlay under a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPart {
    /// One of the eight resize handles
    Handle(CursorTag),
    /// The rotate handle
    RotateHandle,
    /// The confirm icon
    ConfirmIcon,
    /// Inside the frame, away from any handle
    Body,
}

/// Overlay construction errors
#[derive(Debug, Clone, Error)]
pub enum OverlayError {
    #[error("Invalid overlay config: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build overlay chrome: {0}")]
    Backend(#[from] BackendError),
}

/// Resize/rotate overlay drawn through a backend `B`.
pub struct Overlay<B: RenderBackend> {
    config: OverlayConfig,
    nodes: ChromeNodes,
    /// Committed box origin in stage coordinates
    origin: Vec2,
    /// Committed box width
    width: f32,
    /// Committed box height
    height: f32,
    /// Handles for the committed size, relative to `origin`
    handles: [HandleDescriptor; 8],
    /// Clockwise rotation of the overlay in degrees
    rotation: f32,
    lock_aspect_ratio: bool,
    edit_target: Option<NodeId>,
    /// Whether the bound target accepts rotation
    target_rotates: bool,
    visible: bool,
    drag: DragTracker,
    rotation_ctl: RotationController,
    gesture: Option<ActiveGesture>,
    on_confirm: Option<ConfirmCallback>,
    _backend: PhantomData<fn(&mut B)>,
}

impl<B: RenderBackend> Overlay<B> {
    /// Build the overlay chrome inside a new group under `stage`.
    ///
    /// The group starts hidden; it is shown by
    /// [`Overlay::bind_edit_target`].
    pub fn new(backend: &mut B, stage: NodeId, config: OverlayConfig) -> Result<Self, OverlayError> {
        config.validate()?;

        let nodes = ChromeNodes::build(backend, stage, &config)?;
        let handles = layout(config.width, config.height, config.handle_size);
        let rotation_ctl = RotationController::new(config.click_threshold);

        let overlay = Self {
            origin: Vec2::ZERO,
            width: config.width,
            height: config.height,
            handles,
            rotation: 0.0,
            lock_aspect_ratio: false,
            edit_target: None,
            target_rotates: false,
            visible: false,
            drag: DragTracker::default(),
            rotation_ctl,
            gesture: None,
            on_confirm: None,
            nodes,
            config,
            _backend: PhantomData,
        };
        overlay.sync_chrome(backend, overlay.rect());

        tracing::debug!(
            "Overlay created on {} backend: {}x{}, rotateable={}, moveable={}",
            backend.kind(),
            overlay.width,
            overlay.height,
            overlay.config.rotateable,
            overlay.config.moveable
        );
        Ok(overlay)
    }

    /// Attach the confirm callback
    pub fn with_on_confirm(mut self, callback: impl FnMut(&PointerEvent) + 'static) -> Self {
        self.on_confirm = Some(Box::new(callback));
        self
    }

    /// Replace the confirm callback
    pub fn set_on_confirm(&mut self, callback: impl FnMut(&PointerEvent) + 'static) {
        self.on_confirm = Some(Box::new(callback));
    }

    /// Bind the overlay to `target` and show it.
    ///
    /// Geometry and rotation are re-read from the target, so binding the
    /// same target twice gives the same overlay. A gesture in progress is
    /// cancelled first. If the target cannot be read the call is a no-op.
    pub fn bind_edit_target(&mut self, backend: &mut B, target: NodeId, options: BindOptions) {
        if self.gesture.is_some() {
            self.cancel_gesture(backend);
        }

        let geometry = match backend.geometry(target) {
            Ok(geometry) => geometry,
            Err(e) => {
                tracing::warn!("Cannot bind edit target: {}", e);
                return;
            }
        };
        let rotation = backend.rotation(target).unwrap_or(0.0);

        self.target_rotates = backend.supports_rotation(target);
        if self.config.rotateable && !self.target_rotates {
            tracing::warn!(
                "Edit target {} on the {} backend cannot be rotated; rotation disabled for this binding",
                target,
                backend.kind()
            );
        }

        self.edit_target = Some(target);
        self.lock_aspect_ratio = options.lock_aspect_ratio;
        self.commit_rect(geometry);
        self.rotation = rotation;
        self.rotation_ctl
            .set_reference_angle(NEUTRAL_ROTATE_ANGLE - rotation);

        self.set_group_visible(backend, true);
        self.sync_chrome(backend, geometry);

        tracing::info!(
            "Bound edit target {}: {}x{} at ({}, {}), rotation={}",
            target,
            geometry.width,
            geometry.height,
            geometry.left,
            geometry.top,
            rotation
        );
    }

    /// Release the edit target and hide the overlay.
    pub fn unbind_edit_target(&mut self, backend: &mut B) {
        self.gesture = None;
        self.drag = DragTracker::default();
        self.rotation_ctl.cancel();
        if let Some(target) = self.edit_target.take() {
            tracing::debug!("Unbound edit target {}", target);
        }
        self.set_group_visible(backend, false);
    }

    /// The bound target, if it is still alive in `backend`.
    ///
    /// A target removed from the scene behind the overlay's back is treated
    /// as unbound.
    fn live_target(&self, backend: &B) -> Option<NodeId> {
        self.edit_target.filter(|target| backend.contains(*target))
    }

    fn commit_rect(&mut self, rect: BoundingRect) {
        self.origin = rect.origin();
        self.width = rect.width;
        self.height = rect.height;
        self.handles = layout(rect.width, rect.height, self.config.handle_size);
    }

    fn set_group_visible(&mut self, backend: &mut B, visible: bool) {
        self.visible = visible;
        if let Err(e) = backend.set_visible(self.nodes.group, visible) {
            tracing::warn!("Failed to toggle overlay visibility: {}", e);
        }
    }

    // ============== Accessors ==============

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Chrome element ids
    pub fn nodes(&self) -> &ChromeNodes {
        &self.nodes
    }

    /// Committed box width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Committed box height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Committed box origin
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Committed box in stage coordinates
    pub fn rect(&self) -> BoundingRect {
        BoundingRect::from_origin_size(self.origin, Vec2::new(self.width, self.height))
    }

    /// Clockwise rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Handles for the committed size, relative to the box origin
    pub fn handles(&self) -> &[HandleDescriptor; 8] {
        &self.handles
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn edit_target(&self) -> Option<NodeId> {
        self.edit_target
    }

    pub fn lock_aspect_ratio(&self) -> bool {
        self.lock_aspect_ratio
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Absolute pointer angle the next rotate move is measured against
    pub fn reference_angle(&self) -> f32 {
        self.rotation_ctl.reference_angle()
    }
}
