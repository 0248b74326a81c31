//! Lit meshes of the scene graph nodes.
//!
//! Geometry is uploaded the first time a node with a mesh is seen; after that
//! only the per-node model matrix changes.

use std::collections::HashMap;

use arm_core::{MeshAsset, NodeId, SceneGraph};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::context::RenderContext;
use crate::gpu_resources::{create_uniform_bind_group, create_uniform_bind_group_layout};
use crate::pipeline::PipelineConfig;
use crate::traits::SubRenderer;
use crate::vertex::MeshVertex;

/// Per-node uniform (80 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl ObjectUniform {
    /// Packs a world transform and colour.
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Lambert-shaded node meshes, keyed by scene node.
pub struct MeshRenderer {
    enabled: bool,
    color: [f32; 4],
    pipeline: Option<wgpu::RenderPipeline>,
    object_bind_group_layout: Option<wgpu::BindGroupLayout>,
    meshes: HashMap<NodeId, GpuMesh>,
}

impl MeshRenderer {
    pub const NAME: &'static str = "mesh";

    /// Creates a mesh renderer drawing nodes without an override in `color`.
    pub fn new(color: [f32; 4]) -> Self {
        Self {
            enabled: true,
            color,
            pipeline: None,
            object_bind_group_layout: None,
            meshes: HashMap::new(),
        }
    }

    fn upload(
        ctx: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        mesh: &MeshAsset,
        uniform: ObjectUniform,
    ) -> GpuMesh {
        let vertices = mesh_vertices(mesh);
        let label = format!("{} Vertex Buffer", mesh.name);
        let vertex_buffer = ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group =
            create_uniform_bind_group(ctx.device(), layout, &uniform_buffer, "Object Bind Group");

        tracing::debug!(
            "Uploaded mesh '{}': {} triangles",
            mesh.name,
            mesh.triangle_count()
        );

        GpuMesh {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }
}

impl SubRenderer for MeshRenderer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        super::priorities::MESH
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn on_init(&mut self, ctx: &RenderContext) {
        let object_layout = create_uniform_bind_group_layout(
            ctx.device(),
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            "Object Bind Group Layout",
        );

        let pipeline = PipelineConfig::new(
            "Mesh",
            include_str!("../shaders/mesh.wgsl"),
            ctx.surface_format(),
            ctx.depth_format(),
            &[
                ctx.camera_bind_group_layout(),
                ctx.light_bind_group_layout(),
                &object_layout,
            ],
        )
        .with_vertex_layouts(vec![MeshVertex::layout()])
        .build(ctx.device());

        self.pipeline = Some(pipeline);
        self.object_bind_group_layout = Some(object_layout);
    }

    fn prepare(&mut self, ctx: &RenderContext, scene: &SceneGraph) {
        let Some(layout) = &self.object_bind_group_layout else {
            return;
        };

        let transforms = scene.world_transforms();
        for id in scene.ids() {
            let node = scene.node(id);
            let Some(mesh) = &node.mesh else {
                continue;
            };
            let color = node.color.unwrap_or(self.color);
            let uniform = ObjectUniform::new(transforms[id.index()], color);

            match self.meshes.get(&id) {
                Some(gpu) => {
                    ctx.write_buffer(&gpu.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]))
                }
                None => {
                    let gpu = Self::upload(ctx, layout, mesh, uniform);
                    self.meshes.insert(id, gpu);
                }
            }
        }
    }

    fn render(&self, ctx: &RenderContext, pass: &mut wgpu::RenderPass<'_>) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, ctx.camera_bind_group(), &[]);
        pass.set_bind_group(1, ctx.light_bind_group(), &[]);
        for gpu in self.meshes.values() {
            pass.set_bind_group(2, &gpu.bind_group, &[]);
            pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            pass.draw(0..gpu.vertex_count, 0..1);
        }
    }
}

/// Flat-shaded vertex list for a mesh
pub fn mesh_vertices(mesh: &MeshAsset) -> Vec<MeshVertex> {
    mesh.triangle_vertices()
        .into_iter()
        .map(|(position, normal)| MeshVertex { position, normal })
        .collect()
}
