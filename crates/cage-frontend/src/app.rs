//! Main application module

use crate::stage::StagePanel;
use crate::state::{AppAction, AppState, SharedAppState, create_shared_state};

/// Main application
pub struct CageApp {
    app_state: SharedAppState,
}

impl CageApp {
    /// Create a new app
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            app_state: create_shared_state(),
        }
    }

    /// Process pending actions
    fn process_actions(&mut self) {
        let mut state = self.app_state.lock();
        for action in state.take_pending_actions() {
            state.apply(action);
        }
    }
}

/// Side panel with overlay options and state
fn render_side_panel(ctx: &egui::Context, app_state: &SharedAppState) {
    egui::SidePanel::right("overlay_panel")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            let mut state = app_state.lock();

            ui.heading("Overlay");
            let mut options = state.options;
            ui.checkbox(&mut options.rotateable, "Rotateable");
            ui.checkbox(&mut options.moveable, "Moveable");
            ui.checkbox(&mut options.hide_check_icon, "Hide check icon");
            ui.checkbox(&mut options.proportional_aspect, "Proportional aspect lock");
            if options != state.options {
                state.options = options;
                state.queue_action(AppAction::RebuildOverlay);
            }

            ui.separator();
            render_overlay_info(ui, &state);

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Add box").clicked() {
                    state.queue_action(AppAction::AddTarget);
                }
                if ui.button("Remove bound").clicked() {
                    state.queue_action(AppAction::RemoveBoundTarget);
                }
            });
            if ui.button("Reset scene").clicked() {
                state.queue_action(AppAction::ResetScene);
            }

            ui.separator();
            ui.label(format!("Confirmed: {}", *state.confirm_count.lock()));
            if let Some(err) = &state.last_error {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), err);
            }

            ui.separator();
            ui.small("Click a box to edit it. Shift-click locks the aspect ratio. Esc cancels a drag.");
        });
}

fn render_overlay_info(ui: &mut egui::Ui, state: &AppState) {
    let Some(overlay) = state.overlay.as_ref() else {
        ui.label("No overlay");
        return;
    };
    let target = overlay
        .edit_target()
        .and_then(|id| state.target_name(id))
        .unwrap_or("none");

    egui::Grid::new("overlay_info").num_columns(2).show(ui, |ui| {
        ui.label("Target");
        ui.label(target);
        ui.end_row();

        ui.label("Visible");
        ui.label(overlay.is_visible().to_string());
        ui.end_row();

        ui.label("Origin");
        ui.label(format!("{:.0}, {:.0}", overlay.origin().x, overlay.origin().y));
        ui.end_row();

        ui.label("Size");
        ui.label(format!("{:.0} x {:.0}", overlay.width(), overlay.height()));
        ui.end_row();

        ui.label("Rotation");
        ui.label(format!("{:.1}°", overlay.rotation()));
        ui.end_row();

        ui.label("Aspect lock");
        ui.label(overlay.lock_aspect_ratio().to_string());
        ui.end_row();
    });
}

impl eframe::App for CageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_actions();

        render_side_panel(ctx, &self.app_state);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                StagePanel::ui(ui, &self.app_state);
            });
        });
    }
}
