//! Main application

use arm_core::{ArmViewer, FrameStatus, JointSetpoint, LoadProgress};
use arm_renderer::DisplayOptions;

use crate::config::{SharedConfig, create_shared_config};
use crate::loading::{LoadQueue, spawn_fetch};
use crate::panels::{joints_panel, status_panel};
use crate::viewport_state::ViewportState;

pub struct ArmViewerApp {
    config: SharedConfig,
    viewer: ArmViewer,
    joints: Vec<JointSetpoint>,
    load_queue: LoadQueue,
    viewport: Option<ViewportState>,
    last_error: Option<String>,
}

impl ArmViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = create_shared_config();
        let viewer_config = config.read().config().clone();

        let mut viewer = ArmViewer::new(viewer_config.clone());

        let viewport = match cc.wgpu_render_state.as_ref() {
            Some(render_state) => Some(ViewportState::new(
                render_state.device.clone(),
                render_state.queue.clone(),
                render_state.target_format,
                viewer.viewport().size(),
                &viewer_config.scene,
            )),
            None => {
                tracing::error!("wgpu render state not available, nothing will be drawn");
                None
            }
        };

        let load_queue = LoadQueue::new();
        for request in viewer.begin_loading() {
            spawn_fetch(request, load_queue.clone(), cc.egui_ctx.clone());
        }

        Self {
            config,
            viewer,
            joints: viewer_config.joints,
            load_queue,
            viewport,
            last_error: None,
        }
    }

    /// Hand finished fetches to the viewer
    fn process_load_events(&mut self) {
        for event in self.load_queue.drain() {
            let name = event.name().to_string();
            match self.viewer.handle_load_event(event, self.joints.as_slice()) {
                Ok(LoadProgress::Pending { loaded, expected }) => {
                    tracing::info!("Loaded '{}' ({}/{})", name, loaded, expected);
                }
                Ok(LoadProgress::Complete) => {
                    tracing::info!("All meshes loaded, arm assembled");
                }
                Ok(LoadProgress::Ignored) => {}
                Err(e) => self.last_error = Some(e.to_string()),
            }
        }
    }

    fn save_config(&mut self) {
        let mut config = self.config.write();
        let current = config.config_mut();
        current.joints = self.joints.clone();
        current.viewport.auto_resize = self.viewer.viewport().is_auto_resize();

        if let Err(e) = config.save() {
            tracing::error!("Failed to save config: {}", e);
            self.last_error = Some(e.to_string());
        }
    }

    fn side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                status_panel(ui, &self.viewer);
                if let Some(error) = &self.last_error {
                    ui.colored_label(egui::Color32::from_rgb(230, 80, 80), error);
                }
                ui.add_space(8.0);

                let bindings = self.viewer.rig().map(|rig| rig.bindings.as_slice());
                joints_panel(ui, &mut self.joints, bindings);
                ui.add_space(8.0);

                ui.heading("Display");
                ui.separator();
                if let Some(viewport) = &mut self.viewport {
                    let mut options: DisplayOptions = viewport.display_options();
                    let mut changed = ui.checkbox(&mut options.show_ground, "Ground").changed();
                    changed |= ui.checkbox(&mut options.show_axes, "Axis lines").changed();
                    if changed {
                        viewport.set_display_options(options);
                    }
                }

                let mut auto_resize = self.viewer.viewport().is_auto_resize();
                if ui.checkbox(&mut auto_resize, "Follow window size").changed() {
                    if auto_resize {
                        self.viewer.viewport_mut().start_auto_resize();
                    } else {
                        self.viewer.viewport_mut().stop_auto_resize();
                    }
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save settings").clicked() {
                        self.save_config();
                    }
                    if self.viewer.is_running() && ui.button("Stop").clicked() {
                        self.viewer.stop();
                    }
                });
            });
    }

    fn central_panel(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let available = ui.available_size();
                let ppp = ctx.pixels_per_point();
                let width = (available.x * ppp).round() as u32;
                let height = (available.y * ppp).round() as u32;
                self.viewer.resize(width, height);

                let (Some(viewport), Some(render_state)) =
                    (self.viewport.as_mut(), frame.wgpu_render_state())
                else {
                    return;
                };

                let size = self.viewer.viewport().size();
                let texture_id = {
                    let mut egui_renderer = render_state.renderer.write();
                    viewport.ensure_texture(size, &mut egui_renderer)
                };

                match self.viewer.frame(self.joints.as_slice(), viewport) {
                    Ok(FrameStatus::Rendered) => ctx.request_repaint(),
                    Ok(FrameStatus::Idle | FrameStatus::Stopped) => {}
                    Err(e) => self.last_error = Some(e.to_string()),
                }

                if self.viewer.rig().is_some() {
                    let image_size = egui::vec2(size.width as f32, size.height as f32) / ppp;
                    ui.image(egui::load::SizedTexture::new(texture_id, image_size));
                } else {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                }
            });
    }
}

impl eframe::App for ArmViewerApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.process_load_events();
        self.side_panel(ctx);
        self.central_panel(ctx, frame);
    }

    fn on_exit(&mut self) {
        self.viewer.stop();
    }
}
