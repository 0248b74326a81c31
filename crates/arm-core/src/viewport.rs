//! Viewport size tracking

use crate::config::ViewportConfig;

/// Output size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Keeps the render size bound to the container size while auto-resize is on
#[derive(Debug, Clone)]
pub struct ViewportManager {
    size: ViewportSize,
    auto_resize: bool,
}

impl ViewportManager {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            size: ViewportSize {
                width: config.width.max(1),
                height: config.height.max(1),
            },
            auto_resize: config.auto_resize,
        }
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        self.size.aspect()
    }

    pub fn start_auto_resize(&mut self) {
        self.auto_resize = true;
    }

    pub fn stop_auto_resize(&mut self) {
        self.auto_resize = false;
    }

    pub fn is_auto_resize(&self) -> bool {
        self.auto_resize
    }

    /// Container resized. Returns the new size if the viewport follows it.
    pub fn on_container_resized(&mut self, width: u32, height: u32) -> Option<ViewportSize> {
        if !self.auto_resize {
            return None;
        }
        if width == 0 || height == 0 {
            tracing::warn!("Ignoring zero-sized container {}x{}", width, height);
            return None;
        }

        let size = ViewportSize { width, height };
        if size == self.size {
            return None;
        }

        tracing::debug!("Viewport resized to {}x{}", width, height);
        self.size = size;
        Some(size)
    }
}
