//! Loading and saving the viewer configuration as RON

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arm_core::ViewerConfig;
use parking_lot::RwLock;

pub type SharedConfig = Arc<RwLock<ConfigManager>>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Owns the active configuration and the file it came from
pub struct ConfigManager {
    config: ViewerConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Load from the standard location, falling back to defaults
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    /// Load from `config_path`, falling back to defaults
    pub fn with_path(config_path: PathBuf) -> Self {
        let config = Self::load_from_path(&config_path).unwrap_or_else(|| {
            tracing::info!("No config file found, using defaults");
            ViewerConfig::new()
        });

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("arm-viewer")
    }

    #[cfg(target_arch = "wasm32")]
    fn config_dir() -> PathBuf {
        PathBuf::from(".")
    }

    fn default_path() -> PathBuf {
        Self::config_dir().join("config.ron")
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_from_path(path: &Path) -> Option<ViewerConfig> {
        let content = std::fs::read_to_string(path).ok()?;
        match ron::from_str::<ViewerConfig>(&content) {
            Ok(config) => {
                if config.version != ViewerConfig::CURRENT_VERSION {
                    tracing::warn!(
                        "Config version {} differs from {}, missing fields use defaults",
                        config.version,
                        ViewerConfig::CURRENT_VERSION
                    );
                }
                tracing::info!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        }
    }

    // No filesystem in the browser; the web build always starts from defaults
    #[cfg(target_arch = "wasm32")]
    fn load_from_path(_path: &Path) -> Option<ViewerConfig> {
        None
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Mutable access; marks the configuration as unsaved
    pub fn config_mut(&mut self) -> &mut ViewerConfig {
        self.dirty = true;
        &mut self.config
    }

    /// Whether there are changes not yet written to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(&self.config_path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.dirty = false;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}
