//! Wireframe ground plane in the XZ plane.

use arm_core::{GroundConfig, SceneGraph};

use crate::context::RenderContext;
use crate::pipeline::PipelineConfig;
use crate::traits::SubRenderer;
use crate::vertex::PositionColorVertex;

/// Static wireframe ground grid.
pub struct GroundRenderer {
    enabled: bool,
    config: GroundConfig,
    pipeline: Option<wgpu::RenderPipeline>,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl GroundRenderer {
    pub const NAME: &'static str = "ground";

    /// Creates a ground renderer; vertices are built on init.
    pub fn new(config: GroundConfig) -> Self {
        Self {
            enabled: true,
            config,
            pipeline: None,
            vertex_buffer: None,
            vertex_count: 0,
        }
    }
}

impl SubRenderer for GroundRenderer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        super::priorities::GROUND
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn on_init(&mut self, ctx: &RenderContext) {
        let pipeline = PipelineConfig::new(
            "Ground",
            include_str!("../shaders/line.wgsl"),
            ctx.surface_format(),
            ctx.depth_format(),
            &[ctx.camera_bind_group_layout()],
        )
        .with_vertex_layouts(vec![PositionColorVertex::layout()])
        .with_topology(wgpu::PrimitiveTopology::LineList)
        .build(ctx.device());

        let vertices = generate_ground_vertices(&self.config);
        self.vertex_count = vertices.len() as u32;

        let vertex_buffer = ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ground Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.pipeline = Some(pipeline);
        self.vertex_buffer = Some(vertex_buffer);
    }

    fn prepare(&mut self, _ctx: &RenderContext, _scene: &SceneGraph) {}

    fn render(&self, ctx: &RenderContext, pass: &mut wgpu::RenderPass<'_>) {
        let (Some(pipeline), Some(vertex_buffer)) = (&self.pipeline, &self.vertex_buffer) else {
            return;
        };

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, ctx.camera_bind_group(), &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Square grid of `divisions` cells per side centred on the origin at y = 0
pub fn generate_ground_vertices(config: &GroundConfig) -> Vec<PositionColorVertex> {
    let divisions = config.divisions.max(1);
    let half = config.size * 0.5;
    let step = config.size / divisions as f32;
    let mut vertices = Vec::with_capacity(4 * (divisions as usize + 1));

    for i in 0..=divisions {
        let t = -half + i as f32 * step;
        // Parallel to X
        vertices.push(PositionColorVertex::new(
            glam::Vec3::new(-half, 0.0, t),
            config.color,
        ));
        vertices.push(PositionColorVertex::new(
            glam::Vec3::new(half, 0.0, t),
            config.color,
        ));
        // Parallel to Z
        vertices.push(PositionColorVertex::new(
            glam::Vec3::new(t, 0.0, -half),
            config.color,
        ));
        vertices.push(PositionColorVertex::new(
            glam::Vec3::new(t, 0.0, half),
            config.color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ground_line_count() {
        let vertices = generate_ground_vertices(&GroundConfig::default());
        // 41 lines each way, two vertices per line
        assert_eq!(vertices.len(), 164);
    }

    #[test]
    fn test_ground_is_flat_and_bounded() {
        let vertices = generate_ground_vertices(&GroundConfig::default());
        for v in &vertices {
            assert_eq!(v.position[1], 0.0);
            assert!(v.position[0].abs() <= 2500.0);
            assert!(v.position[2].abs() <= 2500.0);
        }
        assert_eq!(vertices[0].position, [-2500.0, 0.0, -2500.0]);
    }

    #[test]
    fn test_zero_divisions_still_draws_border() {
        let config = GroundConfig {
            divisions: 0,
            ..Default::default()
        };
        assert_eq!(generate_ground_vertices(&config).len(), 8);
    }
}
