//! Robot arm viewer entry point

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arm_frontend=debug,arm_core=debug,arm_renderer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting arm viewer");

    // GL backend for llvmpipe / WSL2 compatibility
    let wgpu_options = egui_wgpu::WgpuConfiguration {
        wgpu_setup: egui_wgpu::WgpuSetup::CreateNew {
            supported_backends: wgpu::Backends::GL,
            power_preference: wgpu::PowerPreference::LowPower,
            device_descriptor: std::sync::Arc::new(|_adapter| wgpu::DeviceDescriptor {
                label: Some("arm-viewer device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
            }),
        },
        ..Default::default()
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1240.0, 560.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Arm Viewer"),
        wgpu_options,
        ..Default::default()
    };

    eframe::run_native(
        "arm-viewer",
        native_options,
        Box::new(|cc| Ok(Box::new(arm_frontend::ArmViewerApp::new(cc)))),
    )
}

// The web build starts from `arm_frontend::start`
#[cfg(target_arch = "wasm32")]
fn main() {}
