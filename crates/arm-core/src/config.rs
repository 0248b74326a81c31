//! Viewer configuration
//!
//! Every number that depends on the particular mesh files or on the look of the
//! viewer lives here, so swapping the assets means editing the config rather
//! than the code.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assembler::ArmLayout;
use crate::joint::JointSetpoint;
use crate::loader::AssetSpec;

/// Orbit radius of the camera; also places the lights
pub const DEFAULT_CAMERA_DISTANCE: f32 = 750.0;

/// Convert a `0xRRGGBB` colour to linear-ish RGBA floats
pub fn rgb_hex(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
        1.0,
    ]
}

/// Nominal container size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    /// Follow the container size
    pub auto_resize: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 970,
            height: 500,
            auto_resize: true,
        }
    }
}

/// Camera projection and orbit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub height: f32,
    pub look_at: Vec3,
    /// Orbit angle added per frame (radians)
    pub orbit_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 10000.0,
            distance: DEFAULT_CAMERA_DISTANCE,
            height: 300.0,
            look_at: Vec3::new(0.0, 300.0, 0.0),
            orbit_step: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PointLightConfig {
    pub position: Vec3,
    pub color: [f32; 4],
}

/// Wireframe ground plane in the XZ plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GroundConfig {
    pub size: f32,
    pub divisions: u32,
    pub color: [f32; 4],
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 5000.0,
            divisions: 40,
            color: rgb_hex(0x999999),
        }
    }
}

/// Colours, lights and ground
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    pub background: [f32; 4],
    pub material_color: [f32; 4],
    pub axis_color: [f32; 4],
    pub ambient: f32,
    pub lights: Vec<PointLightConfig>,
    pub ground: GroundConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let d = DEFAULT_CAMERA_DISTANCE;
        let white = rgb_hex(0xFFFFFF);
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            material_color: rgb_hex(0xCC0000),
            axis_color: rgb_hex(0x00FF00),
            ambient: 0.1,
            lights: vec![
                PointLightConfig {
                    position: Vec3::new(0.0, d * 1.5, d),
                    color: white,
                },
                PointLightConfig {
                    position: Vec3::new(0.0, d * 1.5, -d),
                    color: white,
                },
            ],
            ground: GroundConfig::default(),
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetSpec>,
    #[serde(default)]
    pub layout: ArmLayout,
    /// Initial joint setpoints, in binding-index order
    #[serde(default = "default_joints")]
    pub joints: Vec<JointSetpoint>,
}

impl ViewerConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            viewport: ViewportConfig::default(),
            camera: CameraConfig::default(),
            scene: SceneConfig::default(),
            assets: default_assets(),
            layout: ArmLayout::default(),
            joints: default_joints(),
        }
    }
}

fn default_assets() -> Vec<AssetSpec> {
    vec![
        AssetSpec::new("torso", "./models/torso.stl"),
        AssetSpec::new("humerus", "./models/humerus.stl"),
    ]
}

fn default_joints() -> Vec<JointSetpoint> {
    vec![
        JointSetpoint::new("Torso", -180.0, 180.0),
        JointSetpoint::new("Shoulder", -180.0, 180.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb_hex(0x00FF00), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(rgb_hex(0xCC0000)[0], 0.8);
    }

    #[test]
    fn test_lights_follow_camera_distance() {
        let scene = SceneConfig::default();
        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.lights[0].position, Vec3::new(0.0, 1125.0, 750.0));
        assert_eq!(scene.lights[1].position.z, -750.0);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: ViewerConfig = ron::from_str("(version: 1, camera: (fov_degrees: 60.0, near: 0.1, far: 100.0, distance: 10.0, height: 1.0, look_at: (0.0, 1.0, 0.0), orbit_step: 0.02))").unwrap();
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.viewport.width, 970);
        assert_eq!(config.assets.len(), 2);
        assert_eq!(config.layout.bodies.len(), 2);
    }

    #[test]
    fn test_ron_roundtrip_preserves_layout() {
        let config = ViewerConfig::default();
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back: ViewerConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
