//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

/// FarmaPOS server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Maximum database connections in the pool
    pub max_db_connections: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("FARMA_HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FARMA_HTTP_PORT".to_string()))?,

            database_path: env::var("FARMA_DATABASE_PATH")
                .unwrap_or_else(|_| "farma.db".to_string()),

            max_db_connections: env::var("FARMA_MAX_DB_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FARMA_MAX_DB_CONNECTIONS".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only read defaults when the variables are absent in the test env.
        if env::var("FARMA_HTTP_PORT").is_err() {
            let config = ServerConfig::load().unwrap();
            assert_eq!(config.http_port, 3000);
            assert_eq!(config.database_path, "farma.db");
            assert_eq!(config.max_db_connections, 5);
        }
    }
}
