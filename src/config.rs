//! Save system configuration
//!
//! Defaults place the save file under the platform data directory. A JSON
//! config file and the `SAVESTATE_DIR` environment variable can override
//! them.

use crate::save::{SaveError, SaveMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides [`SaveConfig::save_dir`]
pub const SAVE_DIR_ENV: &str = "SAVESTATE_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub save_dir: PathBuf,
    pub file_name: String,
    pub save_mode: SaveMode,
    /// Seconds between autosaves; `None` disables autosave
    pub autosave_interval_secs: Option<u64>,
}

impl SaveConfig {
    /// Loads a config from a JSON file; missing fields keep their defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: SaveConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `SAVESTATE_DIR` if it is set
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(SAVE_DIR_ENV) {
            self.save_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn autosave_interval(&self) -> Option<Duration> {
        self.autosave_interval_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.file_name.trim().is_empty() {
            return Err(SaveError::Config("file_name must not be empty".to_string()));
        }
        if self.autosave_interval_secs == Some(0) {
            return Err(SaveError::Config(
                "autosave_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        let save_dir = dirs::data_dir()
            .map(|p| p.join("savestate"))
            .unwrap_or_else(|| PathBuf::from("./saves"));

        SaveConfig {
            save_dir,
            file_name: "gameData.json".to_string(),
            save_mode: SaveMode::Rebuild,
            autosave_interval_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SaveConfig::default();
        assert_eq!(config.file_name, "gameData.json");
        assert_eq!(config.save_mode, SaveMode::Rebuild);
        assert!(config.autosave_interval().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save_config.json");
        fs::write(&path, r#"{ "save_mode": "merge", "autosave_interval_secs": 300 }"#).unwrap();

        let config = SaveConfig::load_from_file(&path).unwrap();
        assert_eq!(config.save_mode, SaveMode::Merge);
        assert_eq!(config.autosave_interval(), Some(Duration::from_secs(300)));
        assert_eq!(config.file_name, "gameData.json");
    }

    #[test]
    fn test_rejects_empty_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save_config.json");
        fs::write(&path, r#"{ "file_name": "  " }"#).unwrap();

        assert!(matches!(
            SaveConfig::load_from_file(&path),
            Err(SaveError::Config(_))
        ));
    }
}
