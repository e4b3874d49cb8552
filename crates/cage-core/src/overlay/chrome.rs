//! Chrome element creation and placement

use glam::Vec2;

use super::Overlay;
use crate::backend::{BackendKind, BackendResult, ChromeKind, NodeId, RenderBackend};
use crate::config::OverlayConfig;
use crate::constants::{CONFIRM_ICON_HEIGHT, CONFIRM_ICON_INSET, CONFIRM_ICON_WIDTH};
use crate::geometry::BoundingRect;
use crate::handle::layout;

/// Element ids of the overlay chrome
#[derive(Debug, Clone)]
pub struct ChromeNodes {
    /// Backend family the chrome was built on
    pub kind: BackendKind,
    /// Container holding every other chrome element
    pub group: NodeId,
    /// Dashed bounding box
    pub frame: NodeId,
    /// Resize handles in layout order
    pub handles: [NodeId; 8],
    pub rotate_bar: Option<NodeId>,
    pub rotate_handle: Option<NodeId>,
    pub confirm_icon: Option<NodeId>,
}

impl ChromeNodes {
    /// Create the chrome for a box at the stage origin. The group is hidden.
    pub(super) fn build<B: RenderBackend>(
        backend: &mut B,
        stage: NodeId,
        config: &OverlayConfig,
    ) -> BackendResult<Self> {
        let kind = backend.kind();
        let rect = BoundingRect::new(0.0, 0.0, config.width, config.height);

        let group = backend.create_group(stage)?;
        backend.set_visible(group, false)?;

        let frame = backend.create_rect(group, rect, ChromeKind::Frame)?;
        if config.moveable {
            backend.set_cursor(frame, "move")?;
        }

        let mut handles = [NodeId::NIL; 8];
        for (slot, handle) in handles
            .iter_mut()
            .zip(layout(rect.width, rect.height, config.handle_size))
        {
            let node =
                backend.create_circle(group, handle.anchor, handle.size, ChromeKind::Handle)?;
            backend.set_cursor(node, &handle.cursor.css_cursor())?;
            *slot = node;
        }

        let (rotate_bar, rotate_handle) = if config.rotateable {
            let center = rotate_handle_center(rect, config.rotate_bar_length);
            let bar = backend.create_line(
                group,
                Vec2::new(center.x, rect.top),
                center,
                ChromeKind::RotateBar,
            )?;
            let handle =
                backend.create_circle(group, center, config.handle_size, ChromeKind::RotateHandle)?;
            backend.set_cursor(handle, "grab")?;
            (Some(bar), Some(handle))
        } else {
            (None, None)
        };

        let confirm_icon = if config.hide_check_icon {
            None
        } else {
            let icon = backend.create_rect(
                group,
                confirm_icon_rect(kind, rect),
                ChromeKind::ConfirmIcon,
            )?;
            backend.set_cursor(icon, "pointer")?;
            Some(icon)
        };

        Ok(Self {
            kind,
            group,
            frame,
            handles,
            rotate_bar,
            rotate_handle,
            confirm_icon,
        })
    }
}

/// Center of the rotate handle above the top edge of `rect`
pub(super) fn rotate_handle_center(rect: BoundingRect, bar_length: f32) -> Vec2 {
    Vec2::new(rect.center().x, rect.top - bar_length)
}

/// Confirm icon box in the top-right corner of `rect`.
///
/// DOM chrome insets the icon from the corner; vector chrome sits it flush.
pub(super) fn confirm_icon_rect(kind: BackendKind, rect: BoundingRect) -> BoundingRect {
    let [inset_right, inset_top] = match kind {
        BackendKind::Dom => CONFIRM_ICON_INSET,
        BackendKind::Vector => [0.0, 0.0],
    };
    BoundingRect::new(
        rect.right() - inset_right - CONFIRM_ICON_WIDTH,
        rect.top + inset_top,
        CONFIRM_ICON_WIDTH,
        CONFIRM_ICON_HEIGHT,
    )
}

impl<B: RenderBackend> Overlay<B> {
    /// Place every chrome element for a box at `rect`.
    ///
    /// Handle positions are recomputed from `rect`; nothing here commits
    /// state, so this serves provisional in-gesture geometry as well.
    pub(super) fn sync_chrome(&self, backend: &mut B, rect: BoundingRect) {
        let nodes = &self.nodes;
        let mut results: Vec<BackendResult<()>> = Vec::with_capacity(16);

        results.push(backend.set_position(nodes.frame, rect.origin()));
        results.push(backend.set_size(nodes.frame, rect.size()));

        for (node, handle) in nodes
            .handles
            .iter()
            .zip(layout(rect.width, rect.height, self.config.handle_size))
        {
            results.push(backend.set_position(*node, rect.origin() + handle.top_left()));
        }

        let rotate_center = rotate_handle_center(rect, self.config.rotate_bar_length);
        if let Some(bar) = nodes.rotate_bar {
            results.push(backend.set_line(bar, Vec2::new(rotate_center.x, rect.top), rotate_center));
        }
        if let Some(handle) = nodes.rotate_handle {
            let top_left = rotate_center - Vec2::splat(self.config.handle_size / 2.0);
            results.push(backend.set_position(handle, top_left));
        }

        if let Some(icon) = nodes.confirm_icon {
            results.push(backend.set_position(icon, confirm_icon_rect(nodes.kind, rect).origin()));
        }

        results.push(backend.set_rotation(nodes.group, self.rotation, rect.center()));

        if let Some(e) = results.into_iter().find_map(Result::err) {
            tracing::warn!("Failed to update overlay chrome: {}", e);
        }
    }

    /// Apply `rect` to the edit target, if one is bound and alive.
    pub(super) fn sync_target(&self, backend: &mut B, rect: BoundingRect) {
        let Some(target) = self.live_target(backend) else {
            return;
        };
        let mut result = backend
            .set_position(target, rect.origin())
            .and_then(|_| backend.set_size(target, rect.size()));
        // Keep a rotated target turning about its new center
        if result.is_ok() && self.target_rotates {
            result = backend
                .rotation(target)
                .and_then(|degrees| backend.set_rotation(target, degrees, rect.center()));
        }
        if let Err(e) = result {
            tracing::warn!("Failed to update edit target {}: {}", target, e);
        }
    }
}
