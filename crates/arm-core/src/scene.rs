//! Rigid-body scene graph
//!
//! Nodes live in an arena owned by [`SceneGraph`]. Every node except the
//! implicit scene root has exactly one parent, and its position and rotation
//! are relative to that parent, so rotating a parent carries all descendants.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::joint::RotationAxis;
use crate::mesh::MeshAsset;

/// Index of a node inside a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Debug line segment in the owning node's local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLine {
    pub start: Vec3,
    pub end: Vec3,
}

impl AxisLine {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }
}

/// A named rigid body
#[derive(Debug, Clone)]
pub struct RigidNode {
    pub name: String,
    /// Position relative to the parent
    pub position: Vec3,
    /// XYZ Euler angles in radians, relative to the parent
    pub rotation: Vec3,
    pub mesh: Option<MeshAsset>,
    pub lines: Vec<AxisLine>,
    /// Mesh colour override; the renderer's material colour when `None`
    pub color: Option<[f32; 4]>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl RigidNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            mesh: None,
            lines: Vec::new(),
            color: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Node carrying a mesh, named after it
    pub fn with_mesh(mesh: MeshAsset) -> Self {
        let mut node = Self::new(mesh.name.clone());
        node.mesh = Some(mesh);
        node
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Transform from this node's frame into its parent's frame
    pub fn local_transform(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// Scene graph with an implicit root node
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<RigidNode>,
}

impl SceneGraph {
    pub const ROOT_NAME: &'static str = "scene";

    pub fn new() -> Self {
        Self {
            nodes: vec![RigidNode::new(Self::ROOT_NAME)],
        }
    }

    /// The scene root (identity transform, never has a parent)
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Attach a node under `parent`.
    ///
    /// Children are always appended after their parent, so arena order is a
    /// valid top-down traversal order.
    pub fn add_node(&mut self, parent: NodeId, mut node: RigidNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &RigidNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut RigidNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&RigidNode> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Find the first node with the given name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn add_line(&mut self, id: NodeId, line: AxisLine) {
        self.nodes[id.0].lines.push(line);
    }

    /// Overwrite one rotation component. Absolute, never accumulated.
    pub fn set_joint_angle(&mut self, id: NodeId, axis: RotationAxis, radians: f32) {
        let rotation = &mut self.nodes[id.0].rotation;
        match axis {
            RotationAxis::X => rotation.x = radians,
            RotationAxis::Y => rotation.y = radians,
            RotationAxis::Z => rotation.z = radians,
        }
    }

    pub fn joint_angle(&self, id: NodeId, axis: RotationAxis) -> f32 {
        let rotation = self.nodes[id.0].rotation;
        match axis {
            RotationAxis::X => rotation.x,
            RotationAxis::Y => rotation.y,
            RotationAxis::Z => rotation.z,
        }
    }

    pub fn local_transform(&self, id: NodeId) -> Mat4 {
        self.nodes[id.0].local_transform()
    }

    /// Parent world transform composed with the node's local transform
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.nodes[node_id.0].parent;
        }

        chain
            .into_iter()
            .rev()
            .fold(Mat4::IDENTITY, |acc, node_id| {
                acc * self.nodes[node_id.0].local_transform()
            })
    }

    /// World transforms of every node, indexed by `NodeId::index`
    pub fn world_transforms(&self) -> Vec<Mat4> {
        let mut transforms: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.local_transform();
            let world = match node.parent {
                Some(parent) => transforms[parent.0] * local,
                None => local,
            };
            transforms.push(world);
        }
        transforms
    }

    /// All debug lines transformed to world space
    pub fn world_lines(&self) -> Vec<AxisLine> {
        let transforms = self.world_transforms();
        self.nodes
            .iter()
            .zip(&transforms)
            .flat_map(|(node, world)| {
                node.lines.iter().map(move |line| AxisLine {
                    start: world.transform_point3(line.start),
                    end: world.transform_point3(line.end),
                })
            })
            .collect()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
