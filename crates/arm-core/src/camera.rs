//! Perspective camera and the automatic orbit around the arm

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Perspective camera looking at a fixed target
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self::from_config(&CameraConfig::default(), aspect)
    }

    /// Camera at its start position: `(0, height, distance)`, facing the look-at point
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, config.height, config.distance),
            target: config.look_at,
            up: Vec3::Y,
            fov_degrees: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio. Non-finite or non-positive ratios are rejected.
    pub fn set_aspect(&mut self, aspect: f32) -> bool {
        if !aspect.is_finite() || aspect <= 0.0 {
            tracing::warn!("Ignoring degenerate camera aspect {}", aspect);
            return false;
        }
        self.aspect = aspect;
        true
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Circular camera path driven by a per-frame accumulator
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Accumulated orbit angle in radians
    pub angle: f32,
    /// Increment per frame
    pub step: f32,
    /// Radius of the orbit in the XZ plane
    pub distance: f32,
    /// Camera height, constant along the orbit
    pub height: f32,
    pub look_at: Vec3,
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            angle: 0.0,
            step: config.orbit_step,
            distance: config.distance,
            height: config.height,
            look_at: config.look_at,
        }
    }

    /// Advance one frame and move the camera onto the circle
    pub fn advance(&mut self, camera: &mut Camera) {
        self.angle += self.step;
        camera.position = Vec3::new(
            self.angle.sin() * self.distance,
            self.height,
            self.angle.cos() * self.distance,
        );
        camera.look_at(self.look_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_start_position() {
        let camera = Camera::new(970.0 / 500.0);
        assert_eq!(camera.position, Vec3::new(0.0, 300.0, 750.0));
        assert_eq!(camera.target, Vec3::new(0.0, 300.0, 0.0));
        assert_eq!(camera.fov_degrees, 45.0);
    }

    #[test]
    fn test_orbit_stays_on_circle() {
        let config = CameraConfig::default();
        let mut camera = Camera::from_config(&config, 1.0);
        let mut orbit = OrbitCamera::from_config(&config);

        for frame in 1..=500 {
            orbit.advance(&mut camera);
            let p = camera.position;
            assert_relative_eq!(
                p.x * p.x + p.z * p.z,
                config.distance * config.distance,
                max_relative = 1e-4
            );
            assert_eq!(p.y, config.height);
            assert_relative_eq!(orbit.angle, frame as f32 * 0.01, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_degenerate_aspect_rejected() {
        let mut camera = Camera::new(2.0);
        assert!(!camera.set_aspect(0.0));
        assert!(!camera.set_aspect(f32::INFINITY));
        assert!(!camera.set_aspect(f32::NAN));
        assert_eq!(camera.aspect, 2.0);
        assert!(camera.set_aspect(1.5));
    }

    #[test]
    fn test_view_projection_maps_target_to_center() {
        let camera = Camera::new(1.0);
        let clip = camera.view_projection() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
    }
}
