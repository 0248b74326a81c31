//! Built-in sub-renderers: ground wireframe, lit meshes, axis lines.

pub mod axis_lines;
pub mod ground;
pub mod mesh;

pub use axis_lines::AxisLineRenderer;
pub use ground::GroundRenderer;
pub use mesh::MeshRenderer;

/// Render priorities for sub-renderers (lower first).
pub mod priorities {
    pub const GROUND: i32 = 0;
    pub const MESH: i32 = 100;
    pub const AXIS_LINES: i32 = 200;
}
