//! Per-frame update: joint setpoints -> node rotations, camera orbit, render

use crate::camera::{Camera, OrbitCamera};
use crate::joint::{JointBinding, JointError, JointSource, Setpoints, required_joints};
use crate::scene::SceneGraph;

/// Something that can draw the scene from a camera
pub trait SceneRenderer {
    fn render(&mut self, scene: &SceneGraph, camera: &Camera);
}

/// What a call to [`RenderLoop::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Nothing to draw yet
    Idle,
    /// One frame was drawn; the caller should schedule the next
    Rendered,
    /// The loop was stopped; do not schedule again
    Stopped,
}

/// Frame-driven joint animation.
///
/// Starts running and stays running until [`RenderLoop::stop`]; there is no
/// pause state.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    bindings: Vec<JointBinding>,
    orbit: OrbitCamera,
    running: bool,
    frames: u64,
}

impl RenderLoop {
    /// Validate the joint source against the bindings and start running
    pub fn start<S: JointSource + ?Sized>(
        bindings: Vec<JointBinding>,
        orbit: OrbitCamera,
        joints: &S,
    ) -> Result<Self, JointError> {
        Setpoints::new(joints, required_joints(&bindings))?;

        tracing::info!("Render loop started with {} joint bindings", bindings.len());

        Ok(Self {
            bindings,
            orbit,
            running: true,
            frames: 0,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop for good; later ticks do nothing
    pub fn stop(&mut self) {
        if self.running {
            tracing::info!("Render loop stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn orbit(&self) -> &OrbitCamera {
        &self.orbit
    }

    pub fn bindings(&self) -> &[JointBinding] {
        &self.bindings
    }

    /// Run one frame.
    ///
    /// Joint angles are assigned, not added, so identical setpoints give an
    /// identical pose every frame.
    pub fn tick<S: JointSource + ?Sized>(
        &mut self,
        scene: &mut SceneGraph,
        camera: &mut Camera,
        joints: &S,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<FrameStatus, JointError> {
        if !self.running {
            return Ok(FrameStatus::Stopped);
        }

        let setpoints = Setpoints::new(joints, required_joints(&self.bindings))?;
        for binding in &self.bindings {
            let angle = setpoints.radians(binding.index)?;
            scene.set_joint_angle(binding.node, binding.axis, angle);
        }

        self.orbit.advance(camera);

        renderer.render(scene, camera);
        self.frames += 1;

        Ok(FrameStatus::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::joint::RotationAxis;
    use crate::scene::RigidNode;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[derive(Default)]
    struct CountingRenderer {
        calls: usize,
    }

    impl SceneRenderer for CountingRenderer {
        fn render(&mut self, _scene: &SceneGraph, _camera: &Camera) {
            self.calls += 1;
        }
    }

    fn setup() -> (SceneGraph, Vec<JointBinding>, Camera, OrbitCamera) {
        let mut scene = SceneGraph::new();
        let torso = scene.add_node(scene.root(), RigidNode::new("torso"));
        let humerus = scene.add_node(torso, RigidNode::new("humerus"));
        let bindings = vec![
            JointBinding {
                node: torso,
                axis: RotationAxis::Y,
                index: 0,
            },
            JointBinding {
                node: humerus,
                axis: RotationAxis::X,
                index: 1,
            },
        ];
        let config = CameraConfig::default();
        (
            scene,
            bindings,
            Camera::from_config(&config, 970.0 / 500.0),
            OrbitCamera::from_config(&config),
        )
    }

    #[test]
    fn test_setpoints_applied_without_accumulating() {
        let (mut scene, bindings, mut camera, orbit) = setup();
        let joints = [90.0_f32, 45.0];
        let mut lp = RenderLoop::start(bindings.clone(), orbit, &joints[..]).unwrap();
        let mut renderer = CountingRenderer::default();

        for _ in 0..10 {
            let status = lp
                .tick(&mut scene, &mut camera, &joints[..], &mut renderer)
                .unwrap();
            assert_eq!(status, FrameStatus::Rendered);
            assert_relative_eq!(scene.joint_angle(bindings[0].node, RotationAxis::Y), FRAC_PI_2);
            assert_relative_eq!(scene.joint_angle(bindings[1].node, RotationAxis::X), FRAC_PI_4);
        }

        assert_eq!(renderer.calls, 10);
        assert_eq!(lp.frames(), 10);
    }

    #[test]
    fn test_camera_stays_on_orbit() {
        let (mut scene, bindings, mut camera, orbit) = setup();
        let joints = [0.0_f32, 0.0];
        let mut lp = RenderLoop::start(bindings, orbit, &joints[..]).unwrap();
        let mut renderer = CountingRenderer::default();

        for _ in 0..100 {
            lp.tick(&mut scene, &mut camera, &joints[..], &mut renderer)
                .unwrap();
            let p = camera.position;
            assert_relative_eq!((p.x * p.x + p.z * p.z).sqrt(), 750.0, max_relative = 1e-4);
            assert_eq!(camera.target, glam::Vec3::new(0.0, 300.0, 0.0));
        }
    }

    #[test]
    fn test_short_joint_source_rejected_up_front() {
        let (_, bindings, _, orbit) = setup();
        let joints = [10.0_f32];
        let err = RenderLoop::start(bindings, orbit, &joints[..]).unwrap_err();
        assert_eq!(
            err,
            JointError::TooFewJoints {
                required: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_source_shrinking_mid_run_is_an_error() {
        let (mut scene, bindings, mut camera, orbit) = setup();
        let mut lp = RenderLoop::start(bindings, orbit, &[1.0_f32, 2.0][..]).unwrap();
        let mut renderer = CountingRenderer::default();

        let result = lp.tick(&mut scene, &mut camera, &[1.0_f32][..], &mut renderer);
        assert!(result.is_err());
        assert_eq!(renderer.calls, 0);
    }

    #[test]
    fn test_stop_prevents_rendering() {
        let (mut scene, bindings, mut camera, orbit) = setup();
        let joints = [0.0_f32, 0.0];
        let mut lp = RenderLoop::start(bindings, orbit, &joints[..]).unwrap();
        let mut renderer = CountingRenderer::default();

        lp.stop();
        let status = lp
            .tick(&mut scene, &mut camera, &joints[..], &mut renderer)
            .unwrap();
        assert_eq!(status, FrameStatus::Stopped);
        assert_eq!(renderer.calls, 0);
        assert!(!lp.is_running());
    }
}
