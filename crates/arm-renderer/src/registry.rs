//! Ordered set of sub-renderers driven by [`crate::Renderer`].

use arm_core::SceneGraph;

use crate::context::RenderContext;
use crate::traits::SubRenderer;

/// Sub-renderers kept in ascending priority order.
///
/// Order is fixed at registration, so every frame walks the list as is.
#[derive(Default)]
pub struct RendererRegistry {
    entries: Vec<Box<dyn SubRenderer>>,
}

impl RendererRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sub-renderer after every entry of lower or equal priority.
    pub fn register<R: SubRenderer + 'static>(&mut self, renderer: R) {
        let priority = renderer.priority();
        let at = self.entries.partition_point(|r| r.priority() <= priority);
        tracing::debug!("Registered sub-renderer '{}' at slot {}", renderer.name(), at);
        self.entries.insert(at, Box::new(renderer));
    }

    /// Turns a sub-renderer on or off by name.
    ///
    /// Returns false if nothing is registered under `name`.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|r| r.name() == name) {
            Some(renderer) => {
                renderer.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// Creates GPU resources for every sub-renderer.
    pub fn init_all(&mut self, ctx: &RenderContext) {
        for renderer in &mut self.entries {
            renderer.on_init(ctx);
        }
    }

    /// Forwards a viewport resize to every sub-renderer.
    pub fn resize_all(&mut self, ctx: &RenderContext, width: u32, height: u32) {
        for renderer in &mut self.entries {
            renderer.on_resize(ctx, width, height);
        }
    }

    /// Uploads per-frame data for the enabled sub-renderers.
    pub fn prepare_all(&mut self, ctx: &RenderContext, scene: &SceneGraph) {
        for renderer in self.entries.iter_mut().filter(|r| r.is_enabled()) {
            renderer.prepare(ctx, scene);
        }
    }

    /// Records draw calls of the enabled sub-renderers, lowest priority first.
    pub fn render_all(&self, ctx: &RenderContext, pass: &mut wgpu::RenderPass<'_>) {
        for renderer in self.entries.iter().filter(|r| r.is_enabled()) {
            renderer.render(ctx, pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        name: &'static str,
        priority: i32,
        enabled: bool,
    }

    impl Stub {
        fn new(name: &'static str, priority: i32) -> Self {
            Self {
                name,
                priority,
                enabled: true,
            }
        }
    }

    impl SubRenderer for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn on_init(&mut self, _ctx: &RenderContext) {}
        fn prepare(&mut self, _ctx: &RenderContext, _scene: &SceneGraph) {}
        fn render(&self, _ctx: &RenderContext, _pass: &mut wgpu::RenderPass<'_>) {}
    }

    fn names(registry: &RendererRegistry) -> Vec<&str> {
        registry.entries.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_register_keeps_priority_order() {
        let mut registry = RendererRegistry::new();
        registry.register(Stub::new("axis_lines", 200));
        registry.register(Stub::new("ground", 0));
        registry.register(Stub::new("mesh", 100));

        assert_eq!(names(&registry), vec!["ground", "mesh", "axis_lines"]);
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let mut registry = RendererRegistry::new();
        registry.register(Stub::new("mesh", 100));
        registry.register(Stub::new("ground", 0));
        registry.register(Stub::new("highlight", 100));

        assert_eq!(names(&registry), vec!["ground", "mesh", "highlight"]);
    }

    #[test]
    fn test_set_enabled_targets_one_entry() {
        let mut registry = RendererRegistry::new();
        registry.register(Stub::new("ground", 0));
        registry.register(Stub::new("axis_lines", 200));

        assert!(registry.set_enabled("ground", false));
        let enabled: Vec<bool> = registry.entries.iter().map(|r| r.is_enabled()).collect();
        assert_eq!(enabled, vec![false, true]);

        assert!(!registry.set_enabled("missing", false));
    }
}
