//! Robot Arm Viewer Renderer
//!
//! wgpu rendering of an [`arm_core::SceneGraph`] from an [`arm_core::Camera`].
//!
//! - [`traits::SubRenderer`] - one visual element (ground, meshes, axis lines)
//! - [`registry::RendererRegistry`] - runs sub-renderers in priority order
//! - [`context::RenderContext`] - device, formats and shared camera/light bindings
//! - [`Renderer`] - owns all of the above plus the depth buffer

pub mod camera;
pub mod constants;
pub mod context;
pub mod display_options;
pub mod gpu_resources;
pub mod light;
pub mod pipeline;
pub mod registry;
pub mod renderer;
pub mod sub_renderers;
pub mod traits;
pub mod vertex;

pub use camera::CameraUniform;
pub use context::RenderContext;
pub use display_options::DisplayOptions;
pub use light::LightUniform;
pub use registry::RendererRegistry;
pub use renderer::Renderer;
pub use traits::SubRenderer;
pub use vertex::{MeshVertex, PositionColorVertex};
