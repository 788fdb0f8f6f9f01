//! stowage.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::Theme;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StowageConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Which durable backend holds the cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Redb,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Key prefix applied to every slot, e.g. `demo/todos`.
    pub namespace: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            namespace: None,
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".stowage/state.redb")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme used until the user picks one.
    #[serde(default)]
    pub default_theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "stowage=info".to_string()
}

impl StowageConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StowageConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a stowage.toml pointing at a redb file under `data_dir`.
    pub fn scaffold(data_dir: &Path, namespace: Option<&str>) -> Self {
        StowageConfig {
            storage: StorageConfig {
                backend: StorageBackend::Redb,
                path: data_dir.join("state.redb"),
                namespace: namespace.map(str::to_string),
            },
            ui: UiConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold() {
        let config = StowageConfig::scaffold(Path::new("/tmp/stowage"), Some("demo"));
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("state.redb"));
        assert!(toml_str.contains("demo"));
    }

    #[test]
    fn test_parse_minimal() {
        let config: StowageConfig = toml::from_str("").unwrap();
        assert_eq!(config, StowageConfig::default());
        assert_eq!(config.storage.backend, StorageBackend::Redb);
        assert_eq!(config.log.filter, "stowage=info");
    }

    #[test]
    fn test_parse_full() {
        let toml_str = r#"
[storage]
backend = "memory"
path = "/var/lib/stowage/db.redb"
namespace = "team"

[ui]
default_theme = "dark"

[log]
filter = "debug"
"#;
        let config: StowageConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.namespace.as_deref(), Some("team"));
        assert_eq!(config.ui.default_theme, Theme::Dark);
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn test_scaffold_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stowage.toml");
        let config = StowageConfig::scaffold(dir.path(), None);
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        assert_eq!(StowageConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StowageConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, StowageConfig::default());
    }
}
