//! Debug axis lines attached to scene nodes.
//!
//! Lines move with their nodes, so the vertex buffer is rewritten every frame
//! from the world-space lines of the scene graph.

use arm_core::{AxisLine, SceneGraph};

use crate::constants::lines::MAX_AXIS_LINES;
use crate::context::RenderContext;
use crate::pipeline::PipelineConfig;
use crate::traits::SubRenderer;
use crate::vertex::PositionColorVertex;

/// World-space debug lines of all scene nodes.
pub struct AxisLineRenderer {
    enabled: bool,
    color: [f32; 4],
    pipeline: Option<wgpu::RenderPipeline>,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl AxisLineRenderer {
    pub const NAME: &'static str = "axis_lines";

    /// Creates an axis line renderer drawing every line in `color`.
    pub fn new(color: [f32; 4]) -> Self {
        Self {
            enabled: true,
            color,
            pipeline: None,
            vertex_buffer: None,
            vertex_count: 0,
        }
    }
}

impl SubRenderer for AxisLineRenderer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        super::priorities::AXIS_LINES
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn on_init(&mut self, ctx: &RenderContext) {
        let pipeline = PipelineConfig::new(
            "Axis Lines",
            include_str!("../shaders/line.wgsl"),
            ctx.surface_format(),
            ctx.depth_format(),
            &[ctx.camera_bind_group_layout()],
        )
        .with_vertex_layouts(vec![PositionColorVertex::layout()])
        .with_topology(wgpu::PrimitiveTopology::LineList)
        .build(ctx.device());

        let vertex_buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Axis Line Vertex Buffer"),
            size: (MAX_AXIS_LINES * 2 * std::mem::size_of::<PositionColorVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.pipeline = Some(pipeline);
        self.vertex_buffer = Some(vertex_buffer);
    }

    fn prepare(&mut self, ctx: &RenderContext, scene: &SceneGraph) {
        let Some(vertex_buffer) = &self.vertex_buffer else {
            return;
        };

        let vertices = line_vertices(&scene.world_lines(), self.color);
        self.vertex_count = vertices.len() as u32;
        if !vertices.is_empty() {
            ctx.write_buffer(vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
    }

    fn render(&self, ctx: &RenderContext, pass: &mut wgpu::RenderPass<'_>) {
        let (Some(pipeline), Some(vertex_buffer)) = (&self.pipeline, &self.vertex_buffer) else {
            return;
        };
        if self.vertex_count == 0 {
            return;
        }

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, ctx.camera_bind_group(), &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Two vertices per line, capped at the buffer capacity
pub fn line_vertices(lines: &[AxisLine], color: [f32; 4]) -> Vec<PositionColorVertex> {
    if lines.len() > MAX_AXIS_LINES {
        tracing::warn!(
            "{} axis lines in scene, drawing the first {}",
            lines.len(),
            MAX_AXIS_LINES
        );
    }

    lines
        .iter()
        .take(MAX_AXIS_LINES)
        .flat_map(|line| {
            [
                PositionColorVertex::new(line.start, color),
                PositionColorVertex::new(line.end, color),
            ]
        })
        .collect()
}
