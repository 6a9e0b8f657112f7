use crate::error::{Result, VitalsError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "scene-vitals";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the persisted state blobs
    pub data_dir: Option<PathBuf>,
    /// Download target for exports
    pub export_dir: Option<PathBuf>,
    /// External program used as the native share hand-off
    pub share_command: Option<String>,
    /// Arguments placed before the file paths; `{title}` is substituted
    pub share_args: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("SCENE_VITALS_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let base = dirs::config_dir()
            .ok_or_else(|| VitalsError::Config("config directory not found".into()))?;
        Ok(base.join(APP_DIR).join("config.json"))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| VitalsError::Config("data directory not found".into()))?;
        Ok(base.join(APP_DIR))
    }

    pub fn export_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.export_dir {
            return Ok(dir.clone());
        }
        let base = dirs::download_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| VitalsError::Config("download directory not found".into()))?;
        Ok(base.join("scene-vitals-exports"))
    }

    pub fn set_export_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.export_dir = Some(dir);
        self.save()
    }

    pub fn set_share_command(&mut self, command: Option<String>, args: Vec<String>) -> Result<()> {
        self.share_command = command.filter(|c| !c.trim().is_empty());
        self.share_args = args;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.share_args.is_empty());
    }

    #[test]
    fn test_explicit_dirs_win() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/data")),
            export_dir: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/data"));
        assert_eq!(config.export_dir().unwrap(), PathBuf::from("/tmp/out"));
    }
}
