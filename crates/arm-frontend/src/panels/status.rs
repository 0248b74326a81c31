//! Loading / running status

use arm_core::{ArmViewer, ViewerState};

pub fn status_panel(ui: &mut egui::Ui, viewer: &ArmViewer) {
    ui.heading("Status");
    ui.separator();

    match viewer.state() {
        ViewerState::Loading => {
            let counter = viewer.loader().counter();
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!(
                    "Loading meshes {}/{}",
                    counter.loaded(),
                    counter.expected()
                ));
            });
        }
        ViewerState::Running => {
            ui.label(format!("Running, frame {}", viewer.frames()));
        }
        ViewerState::Stopped => {
            ui.label("Stopped");
        }
        ViewerState::Failed(message) => {
            ui.colored_label(egui::Color32::from_rgb(230, 80, 80), "Failed");
            ui.label(message);
        }
    }

    let size = viewer.viewport().size();
    ui.weak(format!("Viewport {}x{}", size.width, size.height));
}
