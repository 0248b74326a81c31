//! Offscreen render target shown as an egui image

use std::sync::Arc;

use arm_core::{Camera, SceneConfig, SceneGraph, SceneRenderer, ViewportSize};
use arm_renderer::{DisplayOptions, Renderer};

struct RenderTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    egui_texture_id: egui::TextureId,
    width: u32,
    height: u32,
}

pub struct ViewportState {
    renderer: Renderer,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    render_texture: Option<RenderTexture>,
}

impl ViewportState {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        size: ViewportSize,
        scene_config: &SceneConfig,
    ) -> Self {
        let renderer = Renderer::new(
            device.clone(),
            queue.clone(),
            format,
            size.width,
            size.height,
            scene_config,
        );
        Self {
            renderer,
            device,
            queue,
            render_texture: None,
        }
    }

    pub fn display_options(&self) -> DisplayOptions {
        self.renderer.display_options()
    }

    pub fn set_display_options(&mut self, options: DisplayOptions) {
        self.renderer.set_display_options(options);
    }

    /// Make the render texture match `size`, re-registering it with egui when it changes
    pub fn ensure_texture(
        &mut self,
        size: ViewportSize,
        egui_renderer: &mut egui_wgpu::Renderer,
    ) -> egui::TextureId {
        let width = size.width.max(1);
        let height = size.height.max(1);

        if let Some(rt) = &self.render_texture
            && rt.width == width
            && rt.height == height
        {
            return rt.egui_texture_id;
        }

        if let Some(old) = self.render_texture.take() {
            egui_renderer.free_texture(&old.egui_texture_id);
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Viewport Render Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.renderer.format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let egui_texture_id =
            egui_renderer.register_native_texture(&self.device, &view, wgpu::FilterMode::Linear);

        self.renderer.resize(width, height);
        tracing::debug!("Viewport texture recreated at {}x{}", width, height);

        self.render_texture = Some(RenderTexture {
            texture,
            view,
            egui_texture_id,
            width,
            height,
        });
        egui_texture_id
    }
}

impl SceneRenderer for ViewportState {
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) {
        let Some(rt) = &self.render_texture else {
            return;
        };

        self.renderer.prepare(scene, camera);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewport Render Encoder"),
            });
        self.renderer.render(&mut encoder, &rt.view);
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
