//! Joint setpoints and their bindings to scene nodes

use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// Local axis a joint rotates about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RotationAxis {
    X,
    #[default]
    Y,
    Z,
}

impl RotationAxis {
    pub fn display_name(&self) -> &'static str {
        match self {
            RotationAxis::X => "X",
            RotationAxis::Y => "Y",
            RotationAxis::Z => "Z",
        }
    }
}

/// Drives one node's rotation from one entry of the setpoint sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointBinding {
    pub node: NodeId,
    pub axis: RotationAxis,
    /// Position in the external setpoint sequence
    pub index: usize,
}

/// Ordered sequence of joint setpoints in degrees
pub trait JointSource {
    fn joint_count(&self) -> usize;

    fn setpoint_degrees(&self, index: usize) -> Option<f32>;
}

/// A user-adjustable joint, as shown in the joint panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSetpoint {
    pub name: String,
    /// Current target in degrees
    pub set_point: f32,
    /// Slider range in degrees
    pub min: f32,
    pub max: f32,
}

impl JointSetpoint {
    pub fn new(name: impl Into<String>, min: f32, max: f32) -> Self {
        Self {
            name: name.into(),
            set_point: 0.0,
            min,
            max,
        }
    }

    /// Set the target, clamped to the slider range
    pub fn set(&mut self, degrees: f32) {
        self.set_point = degrees.clamp(self.min, self.max);
    }
}

impl JointSource for [JointSetpoint] {
    fn joint_count(&self) -> usize {
        self.len()
    }

    fn setpoint_degrees(&self, index: usize) -> Option<f32> {
        self.get(index).map(|j| j.set_point)
    }
}

impl JointSource for Vec<JointSetpoint> {
    fn joint_count(&self) -> usize {
        self.len()
    }

    fn setpoint_degrees(&self, index: usize) -> Option<f32> {
        self.as_slice().setpoint_degrees(index)
    }
}

impl JointSource for [f32] {
    fn joint_count(&self) -> usize {
        self.len()
    }

    fn setpoint_degrees(&self, index: usize) -> Option<f32> {
        self.get(index).copied()
    }
}

/// Length-checked view over a [`JointSource`]
pub struct Setpoints<'a, S: JointSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: JointSource + ?Sized> Setpoints<'a, S> {
    /// Fails unless the source has at least `required` joints
    pub fn new(source: &'a S, required: usize) -> Result<Self, JointError> {
        let available = source.joint_count();
        if available < required {
            return Err(JointError::TooFewJoints {
                required,
                available,
            });
        }
        Ok(Self { source })
    }

    pub fn degrees(&self, index: usize) -> Result<f32, JointError> {
        self.source
            .setpoint_degrees(index)
            .ok_or(JointError::MissingSetpoint(index))
    }

    pub fn radians(&self, index: usize) -> Result<f32, JointError> {
        self.degrees(index).map(|d| d / 180.0 * std::f32::consts::PI)
    }
}

/// Number of setpoints a set of bindings reads
pub fn required_joints(bindings: &[JointBinding]) -> usize {
    bindings.iter().map(|b| b.index + 1).max().unwrap_or(0)
}

/// Joint setpoint errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JointError {
    #[error("Joint source has {available} joints, bindings need {required}")]
    TooFewJoints { required: usize, available: usize },
    #[error("No setpoint for joint index {0}")]
    MissingSetpoint(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_too_short_source_is_rejected() {
        let joints = vec![JointSetpoint::new("torso", -180.0, 180.0)];
        let err = Setpoints::new(&joints, 2).err();
        assert_eq!(
            err,
            Some(JointError::TooFewJoints {
                required: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_degrees_to_radians() {
        let values = [90.0_f32, 45.0];
        let setpoints = Setpoints::new(&values[..], 2).unwrap();
        assert_relative_eq!(setpoints.radians(0).unwrap(), std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(setpoints.radians(1).unwrap(), std::f32::consts::FRAC_PI_4);
        assert_eq!(setpoints.degrees(5), Err(JointError::MissingSetpoint(5)));
    }

    #[test]
    fn test_required_joints() {
        let node = crate::scene::SceneGraph::new().root();
        let bindings = [
            JointBinding {
                node,
                axis: RotationAxis::Y,
                index: 0,
            },
            JointBinding {
                node,
                axis: RotationAxis::X,
                index: 3,
            },
        ];
        assert_eq!(required_joints(&bindings), 4);
        assert_eq!(required_joints(&[]), 0);
    }

    #[test]
    fn test_setpoint_clamps() {
        let mut joint = JointSetpoint::new("shoulder", -90.0, 90.0);
        joint.set(120.0);
        assert_eq!(joint.set_point, 90.0);
    }
}
