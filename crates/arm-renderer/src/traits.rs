//! SubRenderer trait definition.

use arm_core::SceneGraph;

use crate::context::RenderContext;

/// One visual element of the viewport (ground, meshes, axis lines).
///
/// Sub-renderers are executed in order of their priority (lower values first):
/// - 0-99: Background elements (ground)
/// - 100-199: Main geometry (meshes)
/// - 200-299: Overlays (axis lines)
pub trait SubRenderer: Send + Sync {
    fn name(&self) -> &str;

    /// Lower = rendered first
    fn priority(&self) -> i32;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Create pipelines and static buffers.
    fn on_init(&mut self, ctx: &RenderContext);

    fn on_resize(&mut self, _ctx: &RenderContext, _width: u32, _height: u32) {}

    /// Upload per-frame data. Called once per frame before the render pass.
    fn prepare(&mut self, ctx: &RenderContext, scene: &SceneGraph);

    /// Set pipeline and bind groups, issue draw calls.
    fn render(&self, ctx: &RenderContext, pass: &mut wgpu::RenderPass<'_>);
}
