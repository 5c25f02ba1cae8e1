use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// User settings (settings.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkybarSettings {
    /// Show the clock in 24-hour format
    #[serde(default)]
    pub twenty_four_time: bool,

    /// Show the battery level next to the battery indicator
    #[serde(default)]
    pub battery_percentage: bool,

    /// Window class of the launchpad; the panel stays below it while it is active
    #[serde(default = "default_launcher_class")]
    pub launcher_class: String,

    /// Command launched when the battery indicator is clicked
    #[serde(default = "default_battery_command")]
    pub battery_command: String,
}

fn default_launcher_class() -> String {
    "skybar-launcher".to_string()
}

fn default_battery_command() -> String {
    "skybar-settings --battery".to_string()
}

impl Default for SkybarSettings {
    fn default() -> Self {
        Self {
            twenty_four_time: false,
            battery_percentage: false,
            launcher_class: default_launcher_class(),
            battery_command: default_battery_command(),
        }
    }
}

impl SkybarSettings {
    /// Load settings, falling back to defaults when the file is missing or invalid
    pub fn load(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(data) => serde_json::from_slice(&data).unwrap_or_else(|e| {
                debug!("Ignoring invalid settings at {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let dir = path.parent().ok_or_else(|| anyhow::anyhow!("Invalid path"))?;
        std::fs::create_dir_all(dir)?;
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Write `battery_percentage` back to the settings file, keeping the other fields
    pub async fn store_battery_percentage(path: &Path, enabled: bool) -> anyhow::Result<()> {
        let mut settings = match tokio::fs::read(path).await {
            Ok(data) => serde_json::from_slice::<Self>(&data).unwrap_or_default(),
            Err(_) => Self::default(),
        };
        settings.battery_percentage = enabled;

        let dir = path.parent().ok_or_else(|| anyhow::anyhow!("Invalid path"))?;
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(path, serde_json::to_string_pretty(&settings)?).await?;
        debug!("Stored battery percentage {} in {:?}", enabled, path);
        Ok(())
    }

    /// Split the battery command into program and arguments
    pub fn battery_command_parts(&self) -> Option<(String, Vec<String>)> {
        let mut parts = self.battery_command.split_whitespace().map(str::to_string);
        let exec = parts.next()?;
        Some((exec, parts.collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SkybarSettings::load(&dir.path().join("settings.json"));
        assert_eq!(settings, SkybarSettings::default());
        assert!(!settings.twenty_four_time);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "twenty_four_time": true }"#).unwrap();

        let settings = SkybarSettings::load(&path);
        assert!(settings.twenty_four_time);
        assert!(!settings.battery_percentage);
        assert_eq!(settings.launcher_class, "skybar-launcher");
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert_eq!(SkybarSettings::load(&path), SkybarSettings::default());
    }

    #[test]
    fn test_store_battery_percentage_keeps_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "twenty_four_time": true, "launcher_class": "launchpad" }"#).unwrap();

        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(SkybarSettings::store_battery_percentage(&path, true)).unwrap();

        let settings = SkybarSettings::load(&path);
        assert!(settings.battery_percentage);
        assert!(settings.twenty_four_time);
        assert_eq!(settings.launcher_class, "launchpad");
    }

    #[test]
    fn test_store_battery_percentage_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skybar/settings.json");

        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(SkybarSettings::store_battery_percentage(&path, true)).unwrap();

        assert_eq!(
            SkybarSettings::load(&path),
            SkybarSettings {
                battery_percentage: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/skybar/settings.json");

        let settings = SkybarSettings {
            battery_percentage: true,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(SkybarSettings::load(&path), settings);
    }

    #[test]
    fn test_battery_command_parts() {
        let settings = SkybarSettings::default();
        let (exec, args) = settings.battery_command_parts().unwrap();
        assert_eq!(exec, "skybar-settings");
        assert_eq!(args, vec!["--battery".to_string()]);

        let empty = SkybarSettings {
            battery_command: "  ".to_string(),
            ..Default::default()
        };
        assert!(empty.battery_command_parts().is_none());
    }
}
