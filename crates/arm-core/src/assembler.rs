//! Builds the arm hierarchy from loaded meshes
//!
//! Runs once, after every mesh has arrived. For each body in the layout it
//! attaches the mesh to its parent, moves the geometry so the node rotates
//! about the right point, places the node in the parent's frame and adds its
//! debug axis lines.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::joint::{JointBinding, RotationAxis};
use crate::mesh::{BoundingBox, MeshAsset};
use crate::scene::{AxisLine, NodeId, RigidNode, SceneGraph};

/// How a body's geometry is moved to put its pivot at the local origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PivotRule {
    /// Center of the bounding box footprint (X/Z midpoint, Y untouched)
    BaseCenter,
    /// Fixed translation measured from the asset
    Translate(Vec3),
}

impl PivotRule {
    /// Translation to apply to geometry with the given bounds
    pub fn offset(&self, bounds: &BoundingBox) -> Vec3 {
        match self {
            PivotRule::BaseCenter => bounds.base_center_offset(),
            PivotRule::Translate(offset) => *offset,
        }
    }
}

/// Joint driving a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    pub axis: RotationAxis,
    /// Index into the external setpoint sequence
    pub index: usize,
}

/// One rigid body of the arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    /// Asset key
    pub asset: String,
    /// Parent body asset key; `None` attaches to the scene root
    pub parent: Option<String>,
    pub pivot: PivotRule,
    /// Node position in the parent's frame
    pub offset: Vec3,
    /// Axis lines in the body's own frame
    pub lines: Vec<AxisLine>,
    pub joint: Option<JointSpec>,
    /// Overrides the scene material colour for this body
    #[serde(default)]
    pub color: Option<[f32; 4]>,
}

/// Body hierarchy and debug lines for the whole arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmLayout {
    /// Bodies in attachment order; parents come before children
    pub bodies: Vec<BodySpec>,
    /// Lines attached to the scene root
    pub scene_lines: Vec<AxisLine>,
}

// Measured from torso.stl / humerus.stl. Torso bbox ~152.36 x 325.48 x 152.40,
// humerus bbox ~114.30 x 352.95 x 217.95. Re-measure if the meshes change.
const HUMERUS_PIVOT: Vec3 = Vec3::new(-57.15, -328.0, -193.0);
const SHOULDER_HEIGHT: f32 = 281.0;

impl Default for ArmLayout {
    fn default() -> Self {
        Self {
            bodies: vec![
                BodySpec {
                    asset: "torso".into(),
                    parent: None,
                    pivot: PivotRule::BaseCenter,
                    offset: Vec3::ZERO,
                    lines: vec![AxisLine::new(
                        Vec3::new(100.0, SHOULDER_HEIGHT, 0.0),
                        Vec3::new(-100.0, SHOULDER_HEIGHT, 0.0),
                    )],
                    joint: Some(JointSpec {
                        axis: RotationAxis::Y,
                        index: 0,
                    }),
                    color: None,
                },
                BodySpec {
                    asset: "humerus".into(),
                    parent: Some("torso".into()),
                    pivot: PivotRule::Translate(HUMERUS_PIVOT),
                    offset: Vec3::new(0.0, SHOULDER_HEIGHT, 0.0),
                    lines: vec![AxisLine::new(
                        Vec3::new(100.0, -290.0, -135.0),
                        Vec3::new(-100.0, -290.0, -138.0),
                    )],
                    joint: Some(JointSpec {
                        axis: RotationAxis::X,
                        index: 1,
                    }),
                    color: None,
                },
            ],
            scene_lines: vec![AxisLine::new(
                Vec3::new(0.0, -75.0, 0.0),
                Vec3::new(0.0, 75.0, 0.0),
            )],
        }
    }
}

/// Result of assembly: where each body ended up and what drives it
#[derive(Debug, Clone)]
pub struct ArmRig {
    pub nodes: HashMap<String, NodeId>,
    pub bindings: Vec<JointBinding>,
    /// Bounds of each body's geometry after recentering
    pub bounds: HashMap<String, BoundingBox>,
}

impl ArmRig {
    pub fn node(&self, asset: &str) -> Option<NodeId> {
        self.nodes.get(asset).copied()
    }
}

/// Insert every body of `layout` into `scene`, consuming the meshes it uses
pub fn assemble(
    scene: &mut SceneGraph,
    mut assets: HashMap<String, MeshAsset>,
    layout: &ArmLayout,
) -> Result<ArmRig, AssemblyError> {
    // A failed assembly must leave the scene untouched
    check_layout(layout, &assets)?;

    let mut nodes: HashMap<String, NodeId> = HashMap::new();
    let mut bounds = HashMap::new();
    let mut bindings = Vec::new();

    for body in &layout.bodies {
        let parent = match &body.parent {
            Some(name) => *nodes
                .get(name)
                .ok_or_else(|| AssemblyError::UnknownParent(name.clone()))?,
            None => scene.root(),
        };

        let mut mesh = assets
            .remove(&body.asset)
            .ok_or_else(|| AssemblyError::MissingAsset(body.asset.clone()))?;

        let offset = body.pivot.offset(&mesh.compute_bounding_box());
        mesh.translate(offset);
        let body_bounds = mesh.compute_bounding_box();

        let mut node = RigidNode::with_mesh(mesh);
        node.position = body.offset;
        node.lines = body.lines.clone();
        node.color = body.color;
        let id = scene.add_node(parent, node);

        tracing::debug!(
            "Attached '{}' under '{}' (pivot offset {:?})",
            body.asset,
            scene.node(parent).name,
            offset
        );

        if let Some(joint) = body.joint {
            bindings.push(JointBinding {
                node: id,
                axis: joint.axis,
                index: joint.index,
            });
        }

        nodes.insert(body.asset.clone(), id);
        bounds.insert(body.asset.clone(), body_bounds);
    }

    let root = scene.root();
    for line in &layout.scene_lines {
        scene.add_line(root, *line);
    }

    for name in assets.keys() {
        tracing::warn!("Loaded mesh '{}' is not used by the layout", name);
    }

    tracing::info!("Loading complete!");

    Ok(ArmRig {
        nodes,
        bindings,
        bounds,
    })
}

/// Every body unique, backed by a loaded mesh, and listed after its parent
fn check_layout(
    layout: &ArmLayout,
    assets: &HashMap<String, MeshAsset>,
) -> Result<(), AssemblyError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for body in &layout.bodies {
        if let Some(parent) = &body.parent
            && !seen.contains(parent.as_str())
        {
            return Err(AssemblyError::UnknownParent(parent.clone()));
        }
        if !assets.contains_key(&body.asset) {
            return Err(AssemblyError::MissingAsset(body.asset.clone()));
        }
        if !seen.insert(body.asset.as_str()) {
            return Err(AssemblyError::DuplicateBody(body.asset.clone()));
        }
    }

    Ok(())
}

/// Scene assembly errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("Layout refers to asset '{0}' which was not loaded")]
    MissingAsset(String),
    #[error("Parent body '{0}' must be listed before its children")]
    UnknownParent(String),
    #[error("Body '{0}' appears twice in the layout")]
    DuplicateBody(String),
}
