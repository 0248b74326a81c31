//! Robot Arm Viewer Frontend
//!
//! egui application that loads the arm meshes, animates the joints from the
//! slider panel and renders the scene into a viewport texture.

mod app;
mod config;
mod loading;
mod panels;
mod viewport_state;

pub use app::ArmViewerApp;
pub use config::{ConfigError, ConfigManager, SharedConfig, create_shared_config};
pub use loading::LoadQueue;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Canvas the web build renders into
#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "arm_viewer_canvas";

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    use wasm_bindgen::JsCast;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();
    tracing::info!("Starting arm viewer (web)");

    wasm_bindgen_futures::spawn_local(async {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CANVAS_ID))
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok());
        let Some(canvas) = canvas else {
            tracing::error!("Canvas '{}' not found", CANVAS_ID);
            return;
        };

        let result = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(ArmViewerApp::new(cc)))),
            )
            .await;

        if let Err(e) = result {
            tracing::error!("Failed to start eframe: {:?}", e);
        }
    });
}
