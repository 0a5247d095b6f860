//! Backoffice configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use directories::ProjectDirs;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

use shopfront_core::DEFAULT_SESSION_TTL_DAYS;
use shopfront_db::DbConfig;

/// Runtime configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size (default: 5)
    pub max_connections: u32,

    /// Session lifetime in days (default: 7)
    pub session_ttl_days: i64,

    /// Add `Secure` to session cookies (default: false)
    pub secure_cookies: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SHOPFRONT_DB_PATH` | `<platform data dir>/shopfront.db` |
    /// | `SHOPFRONT_DB_MAX_CONNECTIONS` | `5` |
    /// | `SHOPFRONT_SESSION_TTL_DAYS` | `7` |
    /// | `SHOPFRONT_SECURE_COOKIES` | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = match env::var("SHOPFRONT_DB_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path()?,
        };

        let config = AppConfig {
            database_path,

            max_connections: env::var("SHOPFRONT_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SHOPFRONT_DB_MAX_CONNECTIONS".to_string()))?,

            session_ttl_days: env::var("SHOPFRONT_SESSION_TTL_DAYS")
                .unwrap_or_else(|_| DEFAULT_SESSION_TTL_DAYS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SHOPFRONT_SESSION_TTL_DAYS".to_string()))?,

            secure_cookies: env::var("SHOPFRONT_SECURE_COOKIES")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SHOPFRONT_SECURE_COOKIES".to_string()))?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration over a throwaway in-memory database.
    pub fn in_memory() -> Self {
        AppConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            secure_cookies: false,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "SHOPFRONT_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        if self.session_ttl_days <= 0 {
            return Err(ConfigError::InvalidValue(
                "SHOPFRONT_SESSION_TTL_DAYS".to_string(),
            ));
        }
        Ok(())
    }

    /// Session lifetime in seconds.
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl_days * 24 * 60 * 60
    }

    pub fn db_config(&self) -> DbConfig {
        if self.database_path.as_os_str() == ":memory:" {
            return DbConfig::in_memory();
        }
        DbConfig::new(self.database_path.clone()).max_connections(self.max_connections)
    }
}

/// Platform data directory, created on demand.
///
/// - **macOS**: `~/Library/Application Support/com.shopfront.backoffice/shopfront.db`
/// - **Windows**: `%APPDATA%\shopfront\backoffice\data\shopfront.db`
/// - **Linux**: `~/.local/share/backoffice/shopfront.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "shopfront", "backoffice")
        .ok_or_else(|| ConfigError::MissingRequired("SHOPFRONT_DB_PATH".to_string()))?;

    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;

    Ok(data_dir.join("shopfront.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Could not create data directory: {0}")]
    DataDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_seconds() {
        let config = AppConfig::in_memory();
        assert_eq!(config.session_ttl_secs(), 7 * 86_400);
    }

    #[test]
    fn test_memory_db_config() {
        let db = AppConfig::in_memory().db_config();
        assert_eq!(db.max_connections, 1);
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let config = AppConfig {
            max_connections: 0,
            ..AppConfig::in_memory()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }
}
