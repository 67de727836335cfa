//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use crate::stats::DEFAULT_STATS_COLLECTION;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL; the in-memory store is used when absent
    pub database_url: Option<String>,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Collection holding the aggregate statistics documents
    pub stats_collection: String,

    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let stats_collection =
            env::var("STATS_COLLECTION").unwrap_or_else(|_| DEFAULT_STATS_COLLECTION.to_string());
        if stats_collection.is_empty() || stats_collection.contains('/') {
            return Err(ConfigError::InvalidValue("STATS_COLLECTION"));
        }

        let json_logs = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => true,
            Ok("text") | Err(_) => false,
            Ok(_) => return Err(ConfigError::InvalidValue("LOG_FORMAT")),
        };

        let config = Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            stats_collection,
            json_logs,
        };

        // Production requires the PostgreSQL store
        if config.is_production() && !config.uses_database() {
            return Err(ConfigError::MissingEnv("DATABASE_URL"));
        }

        Ok(config)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if statistics are kept in PostgreSQL
    pub fn uses_database(&self) -> bool {
        self.database_url.is_some()
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
