//! Point lights with a flat ambient term

use arm_core::SceneConfig;
use bytemuck::{Pod, Zeroable};

use crate::constants::light::MAX_POINT_LIGHTS;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct PointLightRaw {
    /// xyz = world position, w = 1 if the slot is used
    pub position: [f32; 4],
    pub color: [f32; 4],
}

/// Light uniform buffer data sent to GPU (80 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct LightUniform {
    pub lights: [PointLightRaw; MAX_POINT_LIGHTS],
    /// RGB ambient, A unused
    pub ambient: [f32; 4],
}

impl LightUniform {
    /// Pack the configured lights; extras beyond the uniform capacity are dropped
    pub fn from_config(config: &SceneConfig) -> Self {
        if config.lights.len() > MAX_POINT_LIGHTS {
            tracing::warn!(
                "{} point lights configured, only the first {} are used",
                config.lights.len(),
                MAX_POINT_LIGHTS
            );
        }

        let mut uniform = Self {
            ambient: [config.ambient, config.ambient, config.ambient, 1.0],
            ..Default::default()
        };
        for (slot, light) in uniform.lights.iter_mut().zip(&config.lights) {
            slot.position = light.position.extend(1.0).to_array();
            slot.color = light.color;
        }
        uniform
    }
}
