//! Robot Arm Viewer Core
//!
//! This crate contains everything the viewer does that does not touch the GPU:
//! - MeshAsset: STL geometry with bounding box
//! - AssetLoader: tracks expected vs. arrived meshes
//! - SceneGraph: rigid parent/child node hierarchy
//! - Assembler: builds the arm hierarchy from loaded meshes
//! - RenderLoop: per-frame joint update and camera orbit
//! - ArmViewer: owns all of the above for one viewport

pub mod assembler;
pub mod camera;
pub mod config;
pub mod joint;
pub mod loader;
pub mod mesh;
pub mod render_loop;
pub mod scene;
pub mod viewer;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_support;

pub use assembler::*;
pub use camera::*;
pub use config::*;
pub use joint::*;
pub use loader::*;
pub use mesh::*;
pub use render_loop::*;
pub use scene::*;
pub use viewer::*;
pub use viewport::*;
