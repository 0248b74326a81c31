//! Side panel sections

mod joints;
mod status;

pub use joints::joints_panel;
pub use status::status_panel;
