//! Top-level renderer: owns the context, the depth buffer and the sub-renderers.

use std::sync::Arc;

use arm_core::{Camera, SceneConfig, SceneGraph};

use crate::camera::CameraUniform;
use crate::context::RenderContext;
use crate::display_options::DisplayOptions;
use crate::gpu_resources::create_depth_texture;
use crate::light::LightUniform;
use crate::registry::RendererRegistry;
use crate::sub_renderers::{AxisLineRenderer, GroundRenderer, MeshRenderer};

/// Draws a scene graph into a caller-supplied colour target.
pub struct Renderer {
    ctx: RenderContext,
    registry: RendererRegistry,
    depth_view: wgpu::TextureView,
    // Kept alive for the view
    _depth_texture: wgpu::Texture,
    background: wgpu::Color,
    options: DisplayOptions,
}

impl Renderer {
    /// Creates the context, registers the built-in sub-renderers and uploads the lights.
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene_config: &SceneConfig,
    ) -> Self {
        let ctx = RenderContext::new(device, queue, format, width, height);
        ctx.update_lights(&LightUniform::from_config(scene_config));

        let mut registry = RendererRegistry::new();
        registry.register(GroundRenderer::new(scene_config.ground));
        registry.register(MeshRenderer::new(scene_config.material_color));
        registry.register(AxisLineRenderer::new(scene_config.axis_color));
        registry.init_all(&ctx);

        let (depth_texture, depth_view) = create_depth_texture(ctx.device(), width, height);

        let [r, g, b, a] = scene_config.background;
        tracing::info!(
            "Renderer initialized: {}x{}, format {:?}",
            width,
            height,
            format
        );

        Self {
            ctx,
            registry,
            depth_view,
            _depth_texture: depth_texture,
            background: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
            options: DisplayOptions::default(),
        }
    }

    /// Returns the colour format the scene is rendered in.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.ctx.surface_format()
    }

    /// Returns the current output size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.ctx.width(), self.ctx.height())
    }

    /// Returns which optional elements are drawn.
    pub fn display_options(&self) -> DisplayOptions {
        self.options
    }

    /// Shows or hides the ground and axis lines.
    pub fn set_display_options(&mut self, options: DisplayOptions) {
        self.options = options;
        self.registry
            .set_enabled(GroundRenderer::NAME, options.show_ground);
        self.registry
            .set_enabled(AxisLineRenderer::NAME, options.show_axes);
    }

    /// Recreate the depth buffer for a new output size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size() {
            return;
        }
        let (texture, view) = create_depth_texture(self.ctx.device(), width, height);
        self._depth_texture = texture;
        self.depth_view = view;
        self.ctx.resize(width, height);
        self.registry.resize_all(&self.ctx, width, height);
    }

    /// Upload camera and per-node data for this frame
    pub fn prepare(&mut self, scene: &SceneGraph, camera: &Camera) {
        self.ctx.update_camera(&CameraUniform::from_camera(camera));
        self.registry.prepare_all(&self.ctx, scene);
    }

    /// Record the scene pass into `view`
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.background),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.registry.render_all(&self.ctx, &mut pass);
    }
}
