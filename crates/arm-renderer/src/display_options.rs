//! Display options for controlling visibility of rendering elements.

/// Which optional scene elements are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_ground: bool,
    pub show_axes: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_ground: true,
            show_axes: true,
        }
    }
}
