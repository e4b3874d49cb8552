//! Pointer routing and gesture lifecycle

use glam::Vec2;

use super::chrome::{confirm_icon_rect, rotate_handle_center};
use super::{Overlay, OverlayPart};
use crate::angle::normalize_degrees;
use crate::backend::{BackendResult, NodeId, RenderBackend};
use crate::drag::{DragTracker, PointerEvent};
use crate::geometry::{BoundingRect, rotate_point};
use crate::handle::AxisLock;
use crate::resize::ResizeGesture;
use crate::rotate::RotateEnd;

/// The single gesture an overlay may be running
#[derive(Debug, Clone)]
pub(super) enum ActiveGesture {
    Resize(ResizeGesture),
    Rotate,
    Move {
        start_origin: Vec2,
        target_start: Option<Vec2>,
    },
    /// Press on the confirm icon, waiting for release
    Confirm,
}

impl<B: RenderBackend> Overlay<B> {
    /// Which part of the overlay lies under `point` (stage coordinates).
    ///
    /// Priority: rotate handle, resize handles, confirm icon, frame body.
    /// Handles win over the icon where the two overlap near the top-right
    /// corner. The point is mapped into the overlay's unrotated frame first.
    pub fn hit_test(&self, point: Vec2) -> Option<OverlayPart> {
        if !self.visible {
            return None;
        }

        let rect = self.rect();
        let local = rotate_point(point, rect.center(), -self.rotation);
        let tolerance = self.config.hit_tolerance;

        if self.nodes.rotate_handle.is_some() {
            let center = rotate_handle_center(rect, self.config.rotate_bar_length);
            if local.distance(center) <= self.config.handle_size / 2.0 + tolerance {
                return Some(OverlayPart::RotateHandle);
            }
        }

        // Closest handle wins when handles overlap on a small box
        let relative = local - rect.origin();
        let handle = self
            .handles
            .iter()
            .filter(|h| h.contains(relative, tolerance))
            .min_by(|a, b| {
                a.anchor
                    .distance(relative)
                    .total_cmp(&b.anchor.distance(relative))
            });
        if let Some(handle) = handle {
            return Some(OverlayPart::Handle(handle.cursor));
        }

        if self.nodes.confirm_icon.is_some()
            && confirm_icon_rect(self.nodes.kind, rect).contains_point(local)
        {
            return Some(OverlayPart::ConfirmIcon);
        }

        rect.contains_point(local).then_some(OverlayPart::Body)
    }

    /// Cursor name to show over `point`, if the overlay reacts there.
    pub fn cursor_at(&self, point: Vec2) -> Option<String> {
        match self.hit_test(point)? {
            OverlayPart::Handle(tag) => Some(tag.css_cursor()),
            OverlayPart::RotateHandle => Some("grab".to_string()),
            OverlayPart::ConfirmIcon => Some("pointer".to_string()),
            OverlayPart::Body if self.config.moveable => Some("move".to_string()),
            OverlayPart::Body => None,
        }
    }

    /// Pointer press. Returns true if the overlay started a gesture and the
    /// event should not propagate further.
    pub fn pointer_down(&mut self, backend: &mut B, event: PointerEvent) -> bool {
        if self.gesture.is_some() || !self.visible {
            return false;
        }
        let Some(part) = self.hit_test(event.position) else {
            return false;
        };
        self.begin_gesture(backend, part, event)
    }

    /// Start a gesture on `part` with the pointer at `event`, as if the
    /// press had landed on that element.
    ///
    /// Hosts that deliver presses per chrome element call this directly;
    /// [`Overlay::pointer_down`] calls it after hit testing. The same guards
    /// apply either way: the overlay must be visible and idle, the target
    /// alive, and `part` present and enabled.
    pub fn begin_gesture(
        &mut self,
        backend: &mut B,
        part: OverlayPart,
        event: PointerEvent,
    ) -> bool {
        if self.gesture.is_some() || !self.visible {
            return false;
        }
        let Some(target) = self.live_target(backend) else {
            if let Some(stale) = self.edit_target {
                tracing::debug!("Edit target {} is gone; ignoring pointer", stale);
            }
            return false;
        };

        let position = event.position;
        let (gesture, lock) = match part {
            OverlayPart::ConfirmIcon => {
                if self.nodes.confirm_icon.is_none() {
                    return false;
                }
                (ActiveGesture::Confirm, AxisLock::NONE)
            }
            OverlayPart::RotateHandle => {
                if self.nodes.rotate_handle.is_none() || !self.target_rotates {
                    return false;
                }
                let bounds = match backend.bounding_rect(target) {
                    Ok(bounds) => bounds,
                    Err(e) => {
                        tracing::warn!("Cannot start rotation: {}", e);
                        return false;
                    }
                };
                self.rotation_ctl.begin(bounds, position);
                (ActiveGesture::Rotate, AxisLock::NONE)
            }
            OverlayPart::Handle(tag) => {
                let resize = ResizeGesture::begin(
                    tag,
                    position,
                    self.rect(),
                    self.lock_aspect_ratio,
                    self.config.aspect_policy,
                    self.config.min_size,
                );
                (ActiveGesture::Resize(resize), tag.axis_lock())
            }
            OverlayPart::Body => {
                if !self.config.moveable {
                    return false;
                }
                let target_start = backend.geometry(target).ok().map(|g| g.origin());
                let gesture = ActiveGesture::Move {
                    start_origin: self.origin,
                    target_start,
                };
                (gesture, AxisLock::NONE)
            }
        };

        tracing::debug!("Gesture started on {:?} at ({}, {})", part, position.x, position.y);
        self.drag = DragTracker::new(lock);
        self.drag.pointer_down(position);
        self.gesture = Some(gesture);
        true
    }

    /// Pointer motion. Returns true if a gesture consumed it.
    pub fn pointer_move(&mut self, backend: &mut B, event: PointerEvent) -> bool {
        let Some(mut gesture) = self.gesture.take() else {
            return false;
        };
        let Some(drag) = self.drag.pointer_move(event.position) else {
            self.gesture = Some(gesture);
            return false;
        };

        match &mut gesture {
            ActiveGesture::Resize(resize) => {
                // Rejected steps leave box and target at the last valid geometry
                if let Some(rect) = resize.update(drag.pointer) {
                    self.sync_chrome(backend, rect);
                    self.sync_target(backend, rect);
                }
            }
            ActiveGesture::Rotate => {
                if let Some(delta) = self.rotation_ctl.update(event.position) {
                    self.apply_rotation_delta(backend, delta);
                }
            }
            ActiveGesture::Move {
                start_origin,
                target_start,
            } => {
                let offset = drag.delta();
                let rect = BoundingRect::from_origin_size(
                    *start_origin + offset,
                    Vec2::new(self.width, self.height),
                );
                self.sync_chrome(backend, rect);
                self.move_target(backend, target_start.unwrap_or(*start_origin) + offset);
            }
            ActiveGesture::Confirm => {}
        }

        self.gesture = Some(gesture);
        true
    }

    /// Pointer release. Ends the active gesture unconditionally and commits
    /// its result. Returns true if a gesture was active.
    pub fn pointer_up(&mut self, backend: &mut B, event: PointerEvent) -> bool {
        let drag = self.drag.pointer_up(event.position);
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        let Some(drag) = drag else {
            return true;
        };

        match gesture {
            ActiveGesture::Resize(resize) => {
                let rect = resize.finish(drag.pointer);
                self.commit_rect(rect);
                self.sync_chrome(backend, rect);
                self.sync_target(backend, rect);
                tracing::debug!("Resize committed: {}x{}", rect.width, rect.height);
            }
            ActiveGesture::Rotate => {
                if let Some(RotateEnd::Click { revert }) = self.rotation_ctl.end(event.position)
                    && revert != 0.0
                {
                    self.apply_rotation_delta(backend, revert);
                }
            }
            ActiveGesture::Move {
                start_origin,
                target_start,
            } => {
                let offset = drag.delta();
                self.origin = start_origin + offset;
                self.sync_chrome(backend, self.rect());
                self.move_target(backend, target_start.unwrap_or(start_origin) + offset);
                tracing::debug!("Move committed: ({}, {})", self.origin.x, self.origin.y);
            }
            ActiveGesture::Confirm => {
                let is_click = event.position.distance(drag.pos) < self.config.click_threshold;
                if is_click && self.hit_test(event.position) == Some(OverlayPart::ConfirmIcon) {
                    self.confirm(backend, &event);
                }
            }
        }
        true
    }

    /// Abort the active gesture, restoring the overlay and edit target to
    /// where they were when it started. Returns true if a gesture was active.
    pub fn cancel_gesture(&mut self, backend: &mut B) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        self.drag = DragTracker::default();

        match gesture {
            ActiveGesture::Resize(resize) => {
                let rect = resize.start_rect();
                self.sync_chrome(backend, rect);
                self.sync_target(backend, rect);
            }
            ActiveGesture::Rotate => {
                if let Some(revert) = self.rotation_ctl.cancel()
                    && revert != 0.0
                {
                    self.apply_rotation_delta(backend, revert);
                }
            }
            ActiveGesture::Move {
                start_origin,
                target_start,
            } => {
                self.sync_chrome(backend, self.rect());
                self.move_target(backend, target_start.unwrap_or(start_origin));
            }
            ActiveGesture::Confirm => {}
        }
        tracing::debug!("Gesture cancelled");
        true
    }

    fn confirm(&mut self, backend: &mut B, event: &PointerEvent) {
        self.set_group_visible(backend, false);
        tracing::info!("Overlay confirmed");
        if let Some(callback) = self.on_confirm.as_mut() {
            callback(event);
        }
    }

    fn move_target(&self, backend: &mut B, top_left: Vec2) {
        let Some(target) = self.live_target(backend) else {
            return;
        };
        let result = backend.set_position(target, top_left).and_then(|_| {
            if self.target_rotates {
                self.recenter_target_rotation(backend, target)
            } else {
                Ok(())
            }
        });
        if let Err(e) = result {
            tracing::warn!("Failed to move edit target {}: {}", target, e);
        }
    }

    fn recenter_target_rotation(&self, backend: &mut B, target: NodeId) -> BackendResult<()> {
        let degrees = backend.rotation(target)?;
        let center = backend.geometry(target)?.center();
        backend.set_rotation(target, degrees, center)
    }

    /// Add `delta` degrees to the overlay and edit target rotation.
    fn apply_rotation_delta(&mut self, backend: &mut B, delta: f32) {
        self.rotation = normalize_degrees(self.rotation + delta);
        if let Err(e) = backend.set_rotation(self.nodes.group, self.rotation, self.rect().center())
        {
            tracing::warn!("Failed to rotate overlay: {}", e);
        }

        if !self.target_rotates {
            return;
        }
        let Some(target) = self.live_target(backend) else {
            return;
        };
        let result = backend.rotation(target).and_then(|degrees| {
            let center = backend.geometry(target)?.center();
            backend.set_rotation(target, normalize_degrees(degrees + delta), center)
        });
        if let Err(e) = result {
            tracing::warn!("Failed to rotate edit target {}: {}", target, e);
        }
    }
}
