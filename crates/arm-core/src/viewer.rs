//! The arm viewer: loader, scene, camera and render loop for one viewport

use crate::assembler::{ArmRig, AssemblyError, assemble};
use crate::camera::{Camera, OrbitCamera};
use crate::config::ViewerConfig;
use crate::joint::{JointError, JointSource};
use crate::loader::{AssetLoader, LoadError, LoadEvent, LoadProgress, LoadRequest};
use crate::render_loop::{FrameStatus, RenderLoop, SceneRenderer};
use crate::scene::SceneGraph;
use crate::viewport::ViewportManager;

/// Lifecycle of the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerState {
    /// Waiting for meshes
    Loading,
    /// Assembled and animating
    Running,
    /// Render loop stopped
    Stopped,
    /// Loading, assembly or a frame failed
    Failed(String),
}

/// Owns everything needed to show the animated arm
pub struct ArmViewer {
    config: ViewerConfig,
    loader: AssetLoader,
    scene: SceneGraph,
    camera: Camera,
    viewport: ViewportManager,
    rig: Option<ArmRig>,
    render_loop: Option<RenderLoop>,
    state: ViewerState,
}

impl ArmViewer {
    pub fn new(config: ViewerConfig) -> Self {
        let viewport = ViewportManager::new(&config.viewport);
        let camera = Camera::from_config(&config.camera, viewport.aspect());

        Self {
            config,
            loader: AssetLoader::new(),
            scene: SceneGraph::new(),
            camera,
            viewport,
            rig: None,
            render_loop: None,
            state: ViewerState::Loading,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.as_ref().is_some_and(RenderLoop::is_running)
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn rig(&self) -> Option<&ArmRig> {
        self.rig.as_ref()
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportManager {
        &mut self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.render_loop.as_ref().map_or(0, RenderLoop::frames)
    }

    /// Requests for every configured asset; hand these to a fetcher.
    ///
    /// Assembly happens once per viewer, so after it has run this issues
    /// nothing. An empty asset list fails immediately.
    pub fn begin_loading(&mut self) -> Vec<LoadRequest> {
        if self.rig.is_some() {
            tracing::warn!("Arm already assembled, not loading again");
            return Vec::new();
        }

        self.state = ViewerState::Loading;
        match self.loader.begin(&self.config.assets) {
            Ok(requests) => requests,
            Err(err) => {
                self.fail(err.into());
                Vec::new()
            }
        }
    }

    /// Feed one fetch result.
    ///
    /// When the last expected mesh arrives, the arm is assembled and the render
    /// loop started. That happens at most once; later events are ignored.
    pub fn handle_load_event<S: JointSource + ?Sized>(
        &mut self,
        event: LoadEvent,
        joints: &S,
    ) -> Result<LoadProgress, ViewerError> {
        let progress = match self.loader.receive(event) {
            Ok(progress) => progress,
            Err(err) => return Err(self.fail(err.into())),
        };

        if progress == LoadProgress::Complete
            && let Err(err) = self.on_all_loaded(joints)
        {
            return Err(self.fail(err));
        }

        Ok(progress)
    }

    fn on_all_loaded<S: JointSource + ?Sized>(&mut self, joints: &S) -> Result<(), ViewerError> {
        let assets = self.loader.take_assets();
        let rig = assemble(&mut self.scene, assets, &self.config.layout)?;

        let orbit = OrbitCamera::from_config(&self.config.camera);
        let render_loop = RenderLoop::start(rig.bindings.clone(), orbit, joints)?;

        self.rig = Some(rig);
        self.render_loop = Some(render_loop);
        self.state = ViewerState::Running;
        Ok(())
    }

    /// Run one frame if the loop is running
    pub fn frame<S: JointSource + ?Sized>(
        &mut self,
        joints: &S,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<FrameStatus, ViewerError> {
        let Some(render_loop) = self.render_loop.as_mut() else {
            return Ok(FrameStatus::Idle);
        };

        match render_loop.tick(&mut self.scene, &mut self.camera, joints, renderer) {
            Ok(status) => Ok(status),
            Err(err) => {
                render_loop.stop();
                Err(self.fail(err.into()))
            }
        }
    }

    /// Container size changed
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        match self.viewport.on_container_resized(width, height) {
            Some(size) => self.camera.set_aspect(size.aspect()),
            None => false,
        }
    }

    /// Stop the render loop (teardown)
    pub fn stop(&mut self) {
        if let Some(render_loop) = self.render_loop.as_mut() {
            render_loop.stop();
            if self.state == ViewerState::Running {
                self.state = ViewerState::Stopped;
            }
        }
    }

    fn fail(&mut self, err: ViewerError) -> ViewerError {
        tracing::error!("Viewer failed: {}", err);
        self.state = ViewerState::Failed(err.to_string());
        err
    }
}

/// Errors surfaced by the viewer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Joint(#[from] JointError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{humerus_event, torso_event};
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct CountingRenderer {
        calls: usize,
    }

    impl SceneRenderer for CountingRenderer {
        fn render(&mut self, _scene: &SceneGraph, _camera: &Camera) {
            self.calls += 1;
        }
    }

    fn loaded_viewer(joints: &[f32]) -> ArmViewer {
        let mut viewer = ArmViewer::new(ViewerConfig::default());
        viewer.begin_loading();
        viewer.handle_load_event(torso_event(), joints).unwrap();
        viewer.handle_load_event(humerus_event(), joints).unwrap();
        viewer
    }

    #[test]
    fn test_torso_then_humerus_assembles_once() {
        let joints = [0.0_f32, 0.0];
        let mut viewer = ArmViewer::new(ViewerConfig::default());
        let requests = viewer.begin_loading();
        assert_eq!(requests.len(), 2);

        let first = viewer.handle_load_event(torso_event(), &joints[..]).unwrap();
        assert!(matches!(first, LoadProgress::Pending { .. }));
        assert!(viewer.rig().is_none());
        assert_eq!(*viewer.state(), ViewerState::Loading);

        let second = viewer.handle_load_event(humerus_event(), &joints[..]).unwrap();
        assert_eq!(second, LoadProgress::Complete);
        assert_eq!(*viewer.state(), ViewerState::Running);

        let scene = viewer.scene();
        let torso = scene.find("torso").unwrap();
        let humerus = scene.find("humerus").unwrap();
        assert_eq!(scene.parent(humerus), Some(torso));
        assert_eq!(scene.world_lines().len(), 3);
    }

    #[test]
    fn test_extra_event_does_not_reassemble() {
        let joints = [0.0_f32, 0.0];
        let mut viewer = loaded_viewer(&joints);
        let nodes_before = viewer.scene().len();

        let third = viewer.handle_load_event(torso_event(), &joints[..]).unwrap();
        assert_eq!(third, LoadProgress::Ignored);
        assert_eq!(viewer.scene().len(), nodes_before);
        assert_eq!(viewer.scene().world_lines().len(), 3);
    }

    #[test]
    fn test_loading_again_after_assembly_is_a_no_op() {
        let joints = [0.0_f32, 0.0];
        let mut viewer = loaded_viewer(&joints);
        let nodes_before = viewer.scene().len();

        assert!(viewer.begin_loading().is_empty());
        assert_eq!(*viewer.state(), ViewerState::Running);

        let torso = viewer.handle_load_event(torso_event(), &joints[..]).unwrap();
        let humerus = viewer.handle_load_event(humerus_event(), &joints[..]).unwrap();
        assert_eq!(torso, LoadProgress::Ignored);
        assert_eq!(humerus, LoadProgress::Ignored);
        assert_eq!(viewer.scene().len(), nodes_before);
        assert_eq!(viewer.scene().world_lines().len(), 3);
    }

    #[test]
    fn test_empty_asset_list_fails_instead_of_waiting() {
        let config = ViewerConfig {
            assets: Vec::new(),
            ..Default::default()
        };
        let mut viewer = ArmViewer::new(config);

        assert!(viewer.begin_loading().is_empty());
        assert!(matches!(viewer.state(), ViewerState::Failed(_)));
    }

    #[test]
    fn test_frames_apply_setpoints() {
        let joints = [90.0_f32, 45.0];
        let mut viewer = loaded_viewer(&joints);
        let mut renderer = CountingRenderer::default();

        for _ in 0..3 {
            let status = viewer.frame(&joints[..], &mut renderer).unwrap();
            assert_eq!(status, FrameStatus::Rendered);
        }

        let scene = viewer.scene();
        let torso = scene.find("torso").unwrap();
        let humerus = scene.find("humerus").unwrap();
        assert_relative_eq!(scene.node(torso).rotation.y, std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(scene.node(humerus).rotation.x, std::f32::consts::FRAC_PI_4);
        assert_eq!(renderer.calls, 3);
        assert_eq!(viewer.frames(), 3);
    }

    #[test]
    fn test_frame_before_loading_is_idle() {
        let mut viewer = ArmViewer::new(ViewerConfig::default());
        let mut renderer = CountingRenderer::default();
        let status = viewer.frame(&[0.0_f32, 0.0][..], &mut renderer).unwrap();
        assert_eq!(status, FrameStatus::Idle);
        assert_eq!(renderer.calls, 0);
    }

    #[test]
    fn test_too_few_joints_fails_at_start() {
        let mut viewer = ArmViewer::new(ViewerConfig::default());
        viewer.begin_loading();
        let joints = [0.0_f32];
        viewer.handle_load_event(torso_event(), &joints[..]).unwrap();
        let err = viewer.handle_load_event(humerus_event(), &joints[..]).unwrap_err();

        assert!(matches!(err, ViewerError::Joint(JointError::TooFewJoints { .. })));
        assert!(matches!(viewer.state(), ViewerState::Failed(_)));
        assert!(!viewer.is_running());
    }

    #[test]
    fn test_failed_load_surfaces_error() {
        let mut viewer = ArmViewer::new(ViewerConfig::default());
        viewer.begin_loading();
        let joints = [0.0_f32, 0.0];
        let err = viewer
            .handle_load_event(
                LoadEvent::Failed {
                    name: "humerus".into(),
                    reason: "HTTP 404".into(),
                },
                &joints[..],
            )
            .unwrap_err();

        assert!(matches!(err, ViewerError::Load(_)));
        assert!(matches!(viewer.state(), ViewerState::Failed(msg) if msg.contains("404")));
    }

    #[test]
    fn test_stop_ends_the_loop() {
        let joints = [0.0_f32, 0.0];
        let mut viewer = loaded_viewer(&joints);
        let mut renderer = CountingRenderer::default();

        viewer.stop();
        assert_eq!(*viewer.state(), ViewerState::Stopped);
        let status = viewer.frame(&joints[..], &mut renderer).unwrap();
        assert_eq!(status, FrameStatus::Stopped);
        assert_eq!(renderer.calls, 0);
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut viewer = ArmViewer::new(ViewerConfig::default());
        assert!(viewer.resize(1000, 500));
        assert_eq!(viewer.camera().aspect, 2.0);
        assert!(!viewer.resize(0, 500));
        assert_eq!(viewer.camera().aspect, 2.0);
    }
}
