//! Application state

use std::sync::Arc;

use cage_core::{
    AspectPolicy, BindOptions, BoundingRect, ChromeKind, NodeId, Overlay, OverlayConfig,
    OverlayError, RenderBackend, geometry::rotate_point,
};
use cage_renderer::VectorBackend;
use glam::Vec2;
use parking_lot::Mutex;

/// Stage size in points
pub const STAGE_SIZE: Vec2 = Vec2::new(800.0, 600.0);

/// Actions that can be performed on the app state
#[derive(Debug, Clone)]
pub enum AppAction {
    /// Bind the overlay to a target
    BindTarget { target: NodeId, lock_aspect_ratio: bool },
    /// Release the current target
    Unbind,
    /// Rebuild the overlay after an option changed
    RebuildOverlay,
    /// Add a new target to the stage
    AddTarget,
    /// Remove the bound target from the stage
    RemoveBoundTarget,
    /// Recreate the stage with its initial targets
    ResetScene,
}

/// Overlay options exposed in the side panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    pub rotateable: bool,
    pub moveable: bool,
    pub hide_check_icon: bool,
    /// Scale the derived delta by the start ratio under aspect lock
    pub proportional_aspect: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            rotateable: true,
            moveable: true,
            hide_check_icon: false,
            proportional_aspect: false,
        }
    }
}

impl OverlayOptions {
    fn to_config(self) -> OverlayConfig {
        OverlayConfig::default()
            .rotateable(self.rotateable)
            .moveable(self.moveable)
            .hide_check_icon(self.hide_check_icon)
            .with_aspect_policy(if self.proportional_aspect {
                AspectPolicy::Proportional
            } else {
                AspectPolicy::Mirror
            })
    }
}

/// An edit target on the stage
#[derive(Debug, Clone)]
pub struct Target {
    pub id: NodeId,
    pub name: String,
}

/// Shared confirm counter, bumped by the overlay's confirm callback
pub type ConfirmCounter = Arc<Mutex<u32>>;

const TARGET_COLORS: [[u8; 4]; 4] = [
    [86, 156, 214, 255],
    [214, 157, 86, 255],
    [120, 190, 120, 255],
    [190, 120, 190, 255],
];

/// Main application state
pub struct AppState {
    pub scene: VectorBackend,
    pub overlay: Option<Overlay<VectorBackend>>,
    pub targets: Vec<Target>,
    pub options: OverlayOptions,
    pub confirm_count: ConfirmCounter,
    /// Last error, shown in the side panel
    pub last_error: Option<String>,
    pending_actions: Vec<AppAction>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let mut state = Self {
            scene: VectorBackend::new(STAGE_SIZE),
            overlay: None,
            targets: Vec::new(),
            options: OverlayOptions::default(),
            confirm_count: Arc::new(Mutex::new(0)),
            last_error: None,
            pending_actions: Vec::new(),
        };
        state.populate();
        state.rebuild_overlay();
        state
    }

    /// Queue an action
    pub fn queue_action(&mut self, action: AppAction) {
        self.pending_actions.push(action);
    }

    /// Take all pending actions
    pub fn take_pending_actions(&mut self) -> Vec<AppAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Apply a queued action
    pub fn apply(&mut self, action: AppAction) {
        tracing::debug!("Applying {:?}", action);
        match action {
            AppAction::BindTarget {
                target,
                lock_aspect_ratio,
            } => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.bind_edit_target(&mut self.scene, target, BindOptions { lock_aspect_ratio });
                }
            }
            AppAction::Unbind => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.unbind_edit_target(&mut self.scene);
                }
            }
            AppAction::RebuildOverlay => self.rebuild_overlay(),
            AppAction::AddTarget => {
                let n = self.targets.len();
                let offset = 30.0 * (n % 8) as f32;
                let rect = BoundingRect::new(320.0 + offset, 380.0 - offset / 2.0, 90.0, 70.0);
                self.add_target(rect);
            }
            AppAction::RemoveBoundTarget => self.remove_bound_target(),
            AppAction::ResetScene => {
                self.scene = VectorBackend::new(STAGE_SIZE);
                self.targets.clear();
                self.overlay = None;
                self.populate();
                self.rebuild_overlay();
            }
        }
    }

    /// Topmost target under `point` (stage coordinates)
    pub fn target_at(&self, point: Vec2) -> Option<NodeId> {
        self.targets.iter().rev().map(|t| t.id).find(|id| {
            let (Ok(rect), Ok(rotation)) = (self.scene.geometry(*id), self.scene.rotation(*id))
            else {
                return false;
            };
            rect.contains_point(rotate_point(point, rect.center(), -rotation))
        })
    }

    /// Display name of `id`
    pub fn target_name(&self, id: NodeId) -> Option<&str> {
        self.targets
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
    }

    fn populate(&mut self) {
        for rect in [
            BoundingRect::new(80.0, 80.0, 160.0, 100.0),
            BoundingRect::new(360.0, 140.0, 120.0, 120.0),
            BoundingRect::new(160.0, 320.0, 200.0, 80.0),
        ] {
            self.add_target(rect);
        }
    }

    fn add_target(&mut self, rect: BoundingRect) {
        let root = self.scene.root();
        let color = TARGET_COLORS[self.targets.len() % TARGET_COLORS.len()];
        let result = self
            .scene
            .create_rect(root, rect, ChromeKind::Content)
            .and_then(|id| self.scene.set_fill(id, color).map(|_| id));
        match result {
            Ok(id) => {
                let name = format!("Box {}", self.targets.len() + 1);
                tracing::info!("Added target {} ({})", name, id);
                self.targets.push(Target { id, name });
            }
            Err(e) => {
                tracing::error!("Failed to add target: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        // Keep the overlay painted above the targets
        if self.overlay.is_some() {
            self.rebuild_overlay();
        }
    }

    fn remove_bound_target(&mut self) {
        let Some(target) = self.overlay.as_ref().and_then(|o| o.edit_target()) else {
            return;
        };
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.unbind_edit_target(&mut self.scene);
        }
        if let Err(e) = self.scene.remove(target) {
            tracing::warn!("Failed to remove target: {}", e);
            return;
        }
        self.targets.retain(|t| t.id != target);
        tracing::info!("Removed target {}", target);
    }

    /// Replace the overlay with one built from the current options,
    /// keeping the bound target.
    fn rebuild_overlay(&mut self) {
        let previous = self.overlay.take();
        let binding = previous
            .as_ref()
            .and_then(|o| o.edit_target().map(|t| (t, o.lock_aspect_ratio(), o.is_visible())));
        if let Some(old) = previous
            && let Err(e) = self.scene.remove(old.nodes().group)
        {
            tracing::warn!("Failed to remove old overlay: {}", e);
        }

        match self.build_overlay() {
            Ok(mut overlay) => {
                if let Some((target, lock_aspect_ratio, true)) = binding {
                    overlay.bind_edit_target(&mut self.scene, target, BindOptions { lock_aspect_ratio });
                }
                self.overlay = Some(overlay);
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("Failed to build overlay: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn build_overlay(&mut self) -> Result<Overlay<VectorBackend>, OverlayError> {
        let root = self.scene.root();
        let counter = Arc::clone(&self.confirm_count);
        let overlay = Overlay::new(&mut self.scene, root, self.options.to_config())?
            .with_on_confirm(move |event| {
                let mut count = counter.lock();
                *count += 1;
                tracing::info!(
                    "Confirmed at ({}, {}); {} total",
                    event.position.x,
                    event.position.y,
                    *count
                );
            });
        Ok(overlay)
    }
}

pub type SharedAppState = Arc<Mutex<AppState>>;

/// Create a new shared app state
pub fn create_shared_state() -> SharedAppState {
    Arc::new(Mutex::new(AppState::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cage_core::PointerEvent;

    #[test]
    fn test_initial_scene() {
        let state = AppState::new();
        assert_eq!(state.targets.len(), 3);
        assert!(state.overlay.is_some());
        assert_eq!(state.target_at(Vec2::new(100.0, 100.0)), Some(state.targets[0].id));
        assert_eq!(state.target_at(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_rebuild_keeps_binding() {
        let mut state = AppState::new();
        let target = state.targets[1].id;
        state.apply(AppAction::BindTarget {
            target,
            lock_aspect_ratio: true,
        });

        state.options.rotateable = false;
        state.options.proportional_aspect = true;
        state.apply(AppAction::RebuildOverlay);

        let overlay = state.overlay.as_ref().unwrap();
        assert_eq!(overlay.edit_target(), Some(target));
        assert!(overlay.lock_aspect_ratio());
        assert!(overlay.nodes().rotate_handle.is_none());
        assert_eq!(overlay.config().aspect_policy, AspectPolicy::Proportional);
    }

    #[test]
    fn test_confirm_bumps_counter() {
        let mut state = AppState::new();
        let target = state.targets[0].id;
        state.apply(AppAction::BindTarget {
            target,
            lock_aspect_ratio: false,
        });

        // Confirm icon sits flush in the top-right corner of (80, 80, 160, 100)
        let icon = PointerEvent::new(230.0, 84.0);
        let AppState {
            scene, overlay, ..
        } = &mut state;
        let overlay = overlay.as_mut().unwrap();
        assert!(overlay.pointer_down(scene, icon));
        assert!(overlay.pointer_up(scene, icon));

        assert_eq!(*state.confirm_count.lock(), 1);
    }

    #[test]
    fn test_remove_bound_target() {
        let mut state = AppState::new();
        let target = state.targets[2].id;
        state.apply(AppAction::BindTarget {
            target,
            lock_aspect_ratio: false,
        });
        state.apply(AppAction::RemoveBoundTarget);

        assert_eq!(state.targets.len(), 2);
        assert!(!state.scene.contains(target));
    }
}
