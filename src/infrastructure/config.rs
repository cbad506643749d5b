//! Configuration file management.
//!
//! Handles loading TOML configuration files and writing the default one.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# wcb-privacy configuration
# Auto-generated - edit as needed

[database]
# Content database (optional, defaults to <data_dir>/content.db)
# path = "/var/lib/wordcamp/content.db"

[request]
# Maximum pages requested from one exporter before the request fails
max_pages = 500

[compat]
# Run the organizer exporter against speaker records, like the legacy plugin
organizer_uses_speaker_kind = false

[paths]
# Custom data directory (optional, defaults to ~/.wcb-privacy)
# data_dir = "/custom/path"
"#;

/// Load configuration from `path`, or from the default location.
///
/// A missing default file yields the default configuration; a missing
/// explicit file is an error.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(AppError::Config {
                message: format!("Config file not found: {}", path.display()),
            });
        }
        return load_config_from_file(path);
    }

    let config_path = AppConfig::default().config_file_path();
    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        tracing::debug!("No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    let config = toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })?;

    tracing::debug!(path = %path.display(), "Configuration loaded");

    Ok(config)
}

/// Create the default configuration file at `path` if it doesn't exist.
///
/// Returns whether a file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

/// Renders a configuration as TOML.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| AppError::Config {
        message: format!("Failed to serialize config: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.request.max_pages, 500);
        assert!(!config.compat.organizer_uses_speaker_kind);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            toml::from_str("[compat]\norganizer_uses_speaker_kind = true\n").unwrap();
        assert!(config.compat.organizer_uses_speaker_kind);
        assert_eq!(config.request.max_pages, 500);
    }

    #[test]
    fn test_ensure_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        assert!(ensure_config_exists(&config_path).unwrap());
        assert!(!ensure_config_exists(&config_path).unwrap());

        let loaded = load_config(Some(&config_path)).unwrap();
        assert_eq!(loaded.request.max_pages, 500);
    }

    #[test]
    fn test_render_and_reload() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.request.max_pages = 7;
        config.database.path = Some(dir.path().join("content.db"));
        fs::write(&config_path, render_config(&config).unwrap()).unwrap();

        let loaded = load_config_from_file(&config_path).unwrap();
        assert_eq!(loaded.request.max_pages, 7);
        assert_eq!(loaded.database.path, config.database.path);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[request]\nmax_pages = \"many\"\n").unwrap();

        let err = load_config_from_file(&config_path).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
