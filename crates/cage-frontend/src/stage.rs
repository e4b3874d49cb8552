//! Stage panel: paints the scene and routes pointer input to the overlay

use cage_core::PointerEvent;
use glam::Vec2;

use crate::paint::paint_scene;
use crate::state::{AppAction, SharedAppState};

/// Map a CSS cursor name to an egui cursor
fn cursor_icon(name: &str) -> egui::CursorIcon {
    match name {
        "move" => egui::CursorIcon::Move,
        "grab" => egui::CursorIcon::Grab,
        "pointer" => egui::CursorIcon::PointingHand,
        "nw-resize" | "se-resize" => egui::CursorIcon::ResizeNwSe,
        "ne-resize" | "sw-resize" => egui::CursorIcon::ResizeNeSw,
        "n-resize" | "s-resize" => egui::CursorIcon::ResizeVertical,
        "e-resize" | "w-resize" => egui::CursorIcon::ResizeHorizontal,
        _ => egui::CursorIcon::Default,
    }
}

/// Interactive stage
pub struct StagePanel;

impl StagePanel {
    pub fn ui(ui: &mut egui::Ui, app_state: &SharedAppState) {
        let mut state = app_state.lock();
        let size = state.scene.size();
        let (response, painter) =
            ui.allocate_painter(egui::vec2(size.x, size.y), egui::Sense::click_and_drag());
        let origin = response.rect.min;

        let (pressed, released, moved, shift, escape, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.is_moving(),
                i.modifiers.shift,
                i.key_pressed(egui::Key::Escape),
                i.pointer.latest_pos(),
            )
        });
        let local = pointer.map(|p| Vec2::new(p.x - origin.x, p.y - origin.y));

        let state = &mut *state;
        let mut missed_press = None;
        if let Some(overlay) = state.overlay.as_mut() {
            let scene = &mut state.scene;

            if escape && overlay.cancel_gesture(scene) {
                tracing::debug!("Gesture cancelled from keyboard");
            }

            if let Some(local) = local {
                let event = PointerEvent::from(local);
                if pressed && response.hovered() {
                    if !overlay.pointer_down(scene, event) {
                        missed_press = Some(local);
                    }
                } else if moved && overlay.is_gesture_active() {
                    overlay.pointer_move(scene, event);
                }
                if released {
                    overlay.pointer_up(scene, event);
                }

                if response.hovered()
                    && !overlay.is_gesture_active()
                    && let Some(name) = overlay.cursor_at(local)
                {
                    ui.ctx().set_cursor_icon(cursor_icon(&name));
                }
            }
        }

        // A press the overlay did not take picks a target or clears the binding
        if let Some(point) = missed_press {
            let action = match state.target_at(point) {
                Some(target) => AppAction::BindTarget {
                    target,
                    lock_aspect_ratio: shift,
                },
                None => AppAction::Unbind,
            };
            state.queue_action(action);
        }

        paint_scene(&painter, origin, &state.scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_mapping() {
        assert_eq!(cursor_icon("se-resize"), egui::CursorIcon::ResizeNwSe);
        assert_eq!(cursor_icon("w-resize"), egui::CursorIcon::ResizeHorizontal);
        assert_eq!(cursor_icon("grab"), egui::CursorIcon::Grab);
        assert_eq!(cursor_icon("unknown"), egui::CursorIcon::Default);
    }
}
