//! Configuration for the rw binary

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the walk metadata and rating collections
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Session key used when none is given on the command line
    #[serde(default = "default_key")]
    pub key: String,

    /// Glob pattern for the item list, e.g. `recordings/*.wav`
    #[serde(default)]
    pub items: Option<String>,
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ratewalk")
}

fn default_key() -> String {
    "ratings".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            key: default_key(),
            items: None,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("ratewalk").join("config.yml")),
            Some(PathBuf::from("ratewalk.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.key, "ratings");
        assert!(config.items.is_none());
    }

    #[test]
    fn test_round_trip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yml");

        let config = Config {
            store_path: PathBuf::from("/tmp/rw"),
            key: "session-a".to_string(),
            items: Some("media/*.wav".to_string()),
        };
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.key, "session-a");
        assert_eq!(loaded.items.as_deref(), Some("media/*.wav"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yml");
        std::fs::write(&path, "key: voices\n").unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.key, "voices");
        assert_eq!(loaded.store_path, default_store_path());
    }
}
