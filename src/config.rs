//! Engine configuration persistence
//!
//! Stores settings in `~/.config/spintax/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config_paths::AppPaths;

/// Settings for token extraction and settling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Settle passes allowed per update before it is rolled back
    #[serde(default = "default_max_settle_passes")]
    pub max_settle_passes: usize,

    /// Insert a space unit after each extracted token
    #[serde(default = "default_insert_trailing_space")]
    pub insert_trailing_space: bool,
}

fn default_max_settle_passes() -> usize {
    1024
}

fn default_insert_trailing_space() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_settle_passes: default_max_settle_passes(),
            insert_trailing_space: default_insert_trailing_space(),
        }
    }
}

impl EngineConfig {
    /// Load config from the user config dir, or return defaults if not found
    pub fn load() -> Self {
        let Some(paths) = AppPaths::discover() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&paths.config_file())
    }

    /// Load config from `path`, or return defaults if it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<EngineConfig>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config.validated()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to `path`
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// A zero pass limit would reject every edit
    fn validated(mut self) -> Self {
        if self.max_settle_passes == 0 {
            tracing::warn!(
                "max_settle_passes must be at least 1, using {}",
                default_max_settle_passes()
            );
            self.max_settle_passes = default_max_settle_passes();
        }
        self
    }
}
