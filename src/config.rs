// src/config.rs
//
// TOML configuration. Every section and key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::catalog::CatalogOptions;
use crate::db::default_database_path;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Defaults to {data_dir}/comichub/comichub.db
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    8
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            pool_size: default_pool_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_reject_duplicates")]
    pub reject_duplicates: bool,
}

fn default_reject_duplicates() -> bool {
    true
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            reject_duplicates: default_reject_duplicates(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

fn default_dismiss_after_ms() -> u64 {
    3000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

impl NotificationConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl AppConfig {
    /// Configured path, or the per-user default
    pub fn database_path(&self) -> AppResult<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }

    pub fn log_level(&self) -> AppResult<LevelFilter> {
        self.logging.level.parse::<LevelFilter>().map_err(|_| {
            AppError::Config(format!("Unknown log level: '{}'", self.logging.level))
        })
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            reject_duplicate_imports: self.import.reject_duplicates,
        }
    }
}

/// Load configuration. A missing file (or no path at all) yields defaults.
pub fn load_config(path: Option<&Path>) -> AppResult<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;

    if config.database.pool_size == 0 {
        return Err(AppError::Config(
            "database.pool_size must be > 0".to_string(),
        ));
    }
    config.log_level()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.database.pool_size, 8);
        assert!(config.import.reject_duplicates);
        assert_eq!(config.notifications.dismiss_after(), Duration::from_millis(3000));
        assert_eq!(config.log_level().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let file = write_config(
            r#"
            [database]
            path = "/tmp/comics.db"

            [import]
            reject_duplicates = false
            "#,
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/comics.db"));
        assert_eq!(config.database.pool_size, 8);
        assert!(!config.catalog_options().reject_duplicate_imports);
        assert_eq!(config.notifications.dismiss_after_ms, 3000);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let file = write_config("[database\npath = ");
        assert!(matches!(load_config(Some(file.path())), Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let file = write_config("[database]\npool_size = 0\n");
        assert!(matches!(load_config(Some(file.path())), Err(AppError::Config(_))));

        let file = write_config("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(load_config(Some(file.path())), Err(AppError::Config(_))));
    }
}
