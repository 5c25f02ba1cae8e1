use std::path::{Path, PathBuf};

/// Configuration paths used by the panel
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub settings: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));

        Self {
            settings: config_dir.join("skybar/settings.json"),
        }
    }

    /// Paths rooted in an explicit directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            settings: dir.as_ref().join("settings.json"),
        }
    }

    /// Get the skybar config directory
    pub fn config_dir(&self) -> PathBuf {
        self.settings
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}
