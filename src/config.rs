//! Configuration management
//!
//! Layered configuration via the `config` crate: compiled-in defaults,
//! optional `config/default`, `config/local`, and `config` files, then
//! `MXR`-prefixed environment variables.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{MxrError, Result};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database settings
    pub database: DatabaseConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Bulk loader settings
    pub loader: LoaderConfig,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path, optionally `sqlite:`-prefixed
    pub url: String,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout_secs: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace..error)
    pub level: String,
    /// Optional log file directory; JSON output when set
    pub file_path: Option<String>,
    /// "json" or "text"
    pub format: String,
}

/// Bulk loader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Default CSV path for the `load` command
    pub csv_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/mxr.db".to_string(),
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            loader: LoaderConfig {
                csv_path: "./tools/data/all_drinks.csv".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();
        // Start with default values
        for (key, value) in Self::default() {
            builder = builder
                .set_default(key.as_str(), value)
                .map_err(|e| MxrError::InvalidConfig(e.to_string()))?;
        }

        let settings = builder
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix, e.g. MXR__DATABASE__URL
            .add_source(Environment::with_prefix("MXR").separator("__"))
            .build()
            .map_err(|e| MxrError::InvalidConfig(e.to_string()))?;

        let app_config: Self = settings
            .try_deserialize()
            .map_err(|e| MxrError::InvalidConfig(e.to_string()))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(MxrError::InvalidConfig("max_connections must be greater than 0".to_string()));
        }
        if self.database.connection_timeout_secs == 0 {
            return Err(MxrError::InvalidConfig(
                "connection_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(MxrError::InvalidConfig(format!(
                "invalid log level: {}. Must be one of: {valid_levels:?}",
                self.logging.level
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(MxrError::InvalidConfig(format!(
                "invalid log format: {}. Must be one of: {valid_formats:?}",
                self.logging.format
            )));
        }

        if self.loader.csv_path.is_empty() {
            return Err(MxrError::InvalidConfig("loader csv_path must not be empty".to_string()));
        }

        Ok(())
    }

    /// Get database URL from environment or config
    #[must_use]
    pub fn get_database_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.database.url.clone())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

impl IntoIterator for AppConfig {
    type Item = (String, config::Value);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        // Flatten the configuration into key-value pairs for set_default
        let mut pairs: Vec<(String, config::Value)> = vec![
            ("database.url".to_string(), self.database.url.into()),
            (
                "database.max_connections".to_string(),
                u64::from(self.database.max_connections).into(),
            ),
            (
                "database.connection_timeout_secs".to_string(),
                self.database.connection_timeout_secs.into(),
            ),
            ("logging.level".to_string(), self.logging.level.into()),
            ("logging.format".to_string(), self.logging.format.into()),
            ("loader.csv_path".to_string(), self.loader.csv_path.into()),
        ];
        if let Some(file_path) = self.logging.file_path {
            pairs.push(("logging.file_path".to_string(), file_path.into()));
        }
        pairs.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.url, "sqlite:data/mxr.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_pool_size() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
