//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every section and
//! field has a default so a missing or partial file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Content database location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Path to the content database (defaults to `<data_dir>/content.db`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Limits applied by the request orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum pages requested from one exporter before giving up.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
        }
    }
}

const fn default_max_pages() -> u32 {
    500
}

/// Switches reproducing legacy behavior.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompatConfig {
    /// Run the organizer exporter against speaker records, as the legacy
    /// plugin did.
    #[serde(default)]
    pub organizer_uses_speaker_kind: bool,
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub compat: CompatConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".wcb-privacy")
    }

    /// Get the content database path.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| self.data_dir().join("content.db"))
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_file_path(&self) -> PathBuf {
        self.data_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.request.max_pages, 500);
        assert!(!config.compat.organizer_uses_speaker_kind);
        assert!(config.database_path().ends_with("content.db"));
    }

    #[test]
    fn test_database_path_override() {
        let mut config = AppConfig::default();
        config.paths.data_dir = Some(PathBuf::from("/srv/privacy"));
        assert_eq!(
            config.database_path(),
            PathBuf::from("/srv/privacy/content.db")
        );

        config.database.path = Some(PathBuf::from("/data/wordcamp.db"));
        assert_eq!(config.database_path(), PathBuf::from("/data/wordcamp.db"));
        assert_eq!(
            config.config_file_path(),
            PathBuf::from("/srv/privacy/config.toml")
        );
    }
}
