//! Where spintax keeps its files on disk
//!
//! ```text
//! <root>/config.yaml     engine settings
//! <root>/logs/           daily rolling spintax.log.YYYY-MM-DD
//! ```
//!
//! The root is `$XDG_CONFIG_HOME/spintax` or `~/.config/spintax` on Unix and
//! `%APPDATA%\spintax` on Windows.

use std::{
    env,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "spintax";
const CONFIG_FILE_NAME: &str = "config.yaml";
const LOGS_DIR_NAME: &str = "logs";

/// Prefix of the rolling log files
pub const LOG_FILE_NAME: &str = "spintax.log";

/// The set of paths under one spintax root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Paths under the platform config directory, if one can be found
    pub fn discover() -> Option<Self> {
        platform_config_home().map(|home| Self::at(home.join(APP_DIR)))
    }

    /// Paths under an explicit root
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR_NAME)
    }
}

#[cfg(target_os = "windows")]
fn platform_config_home() -> Option<PathBuf> {
    env::var_os("APPDATA").map(PathBuf::from)
}

#[cfg(not(target_os = "windows"))]
fn platform_config_home() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = AppPaths::at("/tmp/spintax-root");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/spintax-root/config.yaml"));
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/spintax-root/logs"));
    }
}
