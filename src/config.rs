//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/weaponstore/config.yaml, or $WEAPONSTORE_CONFIG)
//! 3. Environment variables (WEAPONSTORE_* prefix)
//!
//! Environment variables take precedence over config file values.

use crate::storage::{FileStorage, STORAGE_KEY, SqliteStorage, Storage, validate_key};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix
const ENV_PREFIX: &str = "WEAPONSTORE";

/// Where the inventory is kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per key
    File,
    /// A key-value table in SQLite
    #[default]
    Sqlite,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(format!("Unknown backend: {} (expected file or sqlite)", other)),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the storage files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub backend: Backend,

    /// Key the inventory is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: Backend::default(),
            storage_key: default_storage_key(),
        }
    }
}

impl Config {
    /// Load configuration from the default location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content =
                std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {:?}", path))?;
            Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            debug!(path = ?path, "No config file, using defaults");
            Self::default()
        };

        config.finish(|name| std::env::var(name).ok())
    }

    /// Load configuration from a YAML string, with overrides from `env`
    pub fn load_from_str(yaml: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::parse(yaml)?.finish(env)
    }

    fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    fn finish(mut self, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        self.apply_env_overrides(env)?;
        validate_key(&self.storage_key).wrap_err("Invalid storage_key in configuration")?;
        Ok(self)
    }

    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = env(&format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = env(&format!("{}_BACKEND", ENV_PREFIX)) {
            self.backend = backend.parse().map_err(|e: String| eyre!(e))?;
        }
        if let Some(key) = env(&format!("{}_STORAGE_KEY", ENV_PREFIX)) {
            self.storage_key = key;
        }
        Ok(())
    }

    /// Get the config file path
    ///
    /// Uses $WEAPONSTORE_CONFIG if set, otherwise ~/.config/weaponstore/config.yaml
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weaponstore")
            .join("config.yaml")
    }

    /// Open the configured storage backend
    pub fn open_storage(&self) -> Result<Box<dyn Storage>> {
        let storage: Box<dyn Storage> = match self.backend {
            Backend::File => Box::new(
                FileStorage::open(&self.data_dir)
                    .with_context(|| format!("Failed to open file storage in {:?}", self.data_dir))?,
            ),
            Backend::Sqlite => Box::new(
                SqliteStorage::open(&self.data_dir)
                    .with_context(|| format!("Failed to open SQLite storage in {:?}", self.data_dir))?,
            ),
        };
        Ok(storage)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weaponstore")
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::load_from_str("", no_env).unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.storage_key, STORAGE_KEY);
        assert!(config.data_dir.ends_with("weaponstore"));
    }

    #[test]
    fn test_yaml_values() {
        let yaml = "data_dir: /tmp/arsenal\nbackend: file\nstorage_key: my_weapons\n";
        let config = Config::load_from_str(yaml, no_env).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/arsenal"));
        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.storage_key, "my_weapons");
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("WEAPONSTORE_BACKEND", "sqlite"),
            ("WEAPONSTORE_DATA_DIR", "/var/lib/weapons"),
        ]
        .into_iter()
        .collect();

        let config =
            Config::load_from_str("backend: file\n", |name| env.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/weapons"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::load_from_str("backend: cloud\n", no_env).is_err());
        assert!(Config::load_from_str("storage_key: \"bad key\"\n", no_env).is_err());
        assert!(Config::load_from_str("", |_| Some("nope".to_string())).is_err());
    }

    #[test]
    fn test_load_from_missing_path_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from_path(&temp.path().join("absent.yaml"));
        assert!(config.is_ok());
    }

    #[test]
    fn test_open_storage_backends() {
        let temp = TempDir::new().unwrap();

        for backend in [Backend::File, Backend::Sqlite] {
            let config = Config {
                data_dir: temp.path().join(format!("{:?}", backend)),
                backend,
                storage_key: STORAGE_KEY.to_string(),
            };
            let mut storage = config.open_storage().unwrap();
            storage.set(STORAGE_KEY, "[]").unwrap();
            assert_eq!(storage.get(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
        }
    }
}
