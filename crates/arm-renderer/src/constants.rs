//! Renderer constants

pub mod viewport {
    /// No MSAA; the viewport texture is sampled directly by egui
    pub const SAMPLE_COUNT: u32 = 1;
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
}

pub mod light {
    /// Point lights packed into the light uniform
    pub const MAX_POINT_LIGHTS: usize = 2;
}

pub mod lines {
    /// Capacity of the axis line vertex buffer, in segments
    pub const MAX_AXIS_LINES: usize = 64;
}
