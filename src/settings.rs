use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::annotation::{WHITE, YELLOW};

/// Tool preferences remembered between launches. Board content is never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub pencil_color: [u8; 4],
    pub note_color: [u8; 4],
    pub show_dot_grid: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            pencil_color: WHITE,
            note_color: YELLOW,
            show_dot_grid: true,
        }
    }
}

impl UserSettings {
    fn file_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("com", "blackboard", "blackboard")?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir).ok()?;
        Some(config_dir.join("settings.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read settings from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed settings in {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("cannot write settings to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::UserSettings;
    use crate::annotation::{WHITE, YELLOW};

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{ "pencil_color": [255, 0, 0, 255] }"#).expect("settings");
        assert_eq!(settings.pencil_color, [255, 0, 0, 255]);
        assert_eq!(settings.note_color, YELLOW);
        assert!(settings.show_dot_grid);
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        let settings = UserSettings {
            pencil_color: [0x38, 0xA1, 0x69, 0xFF],
            note_color: WHITE,
            show_dot_grid: false,
        };

        settings.save_to(&path).expect("save");
        assert_eq!(UserSettings::load_from(&path).expect("load"), settings);
    }

    #[test]
    fn unreadable_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");
        let err = UserSettings::load_from(&path).expect_err("missing file");
        assert!(format!("{err:#}").contains("absent.json"));
    }
}
