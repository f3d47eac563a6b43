//! Backoffice API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                   | Default                              |
//! |----------------------------|--------------------------------------|
//! | `BACKOFFICE_PORT`          | `8080`                               |
//! | `BACKOFFICE_DB_PATH`       | `<data dir>/backoffice.db`, `:memory:` |
//! | `JWT_SECRET`               | development secret                   |
//! | `JWT_ACCESS_LIFETIME_SECS` | `3600`                               |
//! | `LOW_STOCK_THRESHOLD`      | `20`                                 |
//! | `CORS_ALLOW_ORIGIN`        | any origin                           |

use std::env;
use std::path::PathBuf;

use autoparts_core::DEFAULT_LOW_STOCK_THRESHOLD;
use autoparts_db::DbConfig;
use directories::ProjectDirs;

/// Value of `BACKOFFICE_DB_PATH` selecting a throwaway in-memory store.
pub const IN_MEMORY_DB: &str = ":memory:";

const DEV_JWT_SECRET: &str = "autoparts-dev-secret-change-in-production";

/// Backoffice API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP server port
    pub port: u16,

    /// SQLite file for the key-value store, or `:memory:`
    pub database_path: String,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,

    /// Dashboard low-stock alert threshold (units)
    pub low_stock_threshold: i64,

    /// Allowed browser origin; any origin when unset
    pub cors_allow_origin: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("BACKOFFICE_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BACKOFFICE_PORT".to_string()))?,

            database_path: match env::var("BACKOFFICE_DB_PATH") {
                Ok(path) => path,
                Err(_) => default_database_path()?,
            },

            // In production, this MUST be set via environment variable
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),

            jwt_access_lifetime_secs: env::var("JWT_ACCESS_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()))?,

            low_stock_threshold: env::var("LOW_STOCK_THRESHOLD")
                .unwrap_or_else(|_| DEFAULT_LOW_STOCK_THRESHOLD.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LOW_STOCK_THRESHOLD".to_string()))?,

            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration for tests: in-memory store, fixed secret.
    pub fn for_tests() -> Self {
        ApiConfig {
            port: 0,
            database_path: IN_MEMORY_DB.to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_access_lifetime_secs: 3600,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            cors_allow_origin: None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }
        if self.jwt_access_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()));
        }
        if self.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue("LOW_STOCK_THRESHOLD".to_string()));
        }
        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// Data-layer settings for the configured store.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path == IN_MEMORY_DB {
            DbConfig::in_memory()
        } else {
            DbConfig::new(PathBuf::from(&self.database_path))
        }
    }
}

fn default_database_path() -> Result<String, ConfigError> {
    let dirs = ProjectDirs::from("com", "autoparts", "backoffice")
        .ok_or_else(|| ConfigError::MissingRequired("BACKOFFICE_DB_PATH".to_string()))?;
    let dir = dirs.data_dir();
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir.join("backoffice.db").to_string_lossy().into_owned())
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Cannot create data directory: {0}")]
    DataDir(String),
}
