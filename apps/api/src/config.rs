//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! A `.env` file in the working directory is read first, when present.

use serde::{Deserialize, Serialize};
use std::env;

use forkful_core::DEFAULT_DELIVERY_MINUTES;

const DEV_JWT_SECRET: &str = "forkful-dev-secret-change-in-production";

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Socket address the HTTP server binds to
    pub bind_addr: String,

    /// SQLite database file
    pub database_path: String,

    /// Upper bound of the SQLite pool
    pub db_max_connections: u32,

    /// JWT secret key for signing tokens
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// JWT lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Estimated delivery time written on new deliveries, in minutes
    pub default_delivery_minutes: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if cfg!(debug_assertions) => DEV_JWT_SECRET.to_string(),
            _ => return Err(ConfigError::MissingRequired("JWT_SECRET".to_string())),
        };

        let config = ApiConfig {
            bind_addr: env::var("FORKFUL_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),

            database_path: env::var("FORKFUL_DB_PATH").unwrap_or_else(|_| "forkful.db".to_string()),

            db_max_connections: env::var("FORKFUL_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FORKFUL_DB_MAX_CONNECTIONS".to_string()))?,

            jwt_secret,

            jwt_lifetime_secs: env::var("JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))?,

            default_delivery_minutes: env::var("DEFAULT_DELIVERY_MINUTES")
                .unwrap_or_else(|_| DEFAULT_DELIVERY_MINUTES.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DEFAULT_DELIVERY_MINUTES".to_string()))?,
        };

        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()));
        }

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("FORKFUL_DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Configuration for tests: dev secret, in-memory database.
    pub fn for_tests() -> Self {
        ApiConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            database_path: ":memory:".to_string(),
            db_max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            jwt_lifetime_secs: 3600,
            default_delivery_minutes: DEFAULT_DELIVERY_MINUTES,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
