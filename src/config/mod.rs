//! Configuration module for the Trip Planner backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TRIP_PLANNER_BIND_ADDR '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Origin allowed to call the API from a browser. Any origin when unset.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("TRIP_PLANNER_DB_PATH")
            .unwrap_or_else(|_| "./data/trips.sqlite".to_string())
            .into();

        let bind_value =
            env::var("TRIP_PLANNER_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind_value
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let log_level = env::var("TRIP_PLANNER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_origin = env::var("TRIP_PLANNER_CORS_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share one test so they never race on the process environment.
    #[test]
    fn test_config_from_env() {
        env::remove_var("TRIP_PLANNER_DB_PATH");
        env::remove_var("TRIP_PLANNER_BIND_ADDR");
        env::remove_var("TRIP_PLANNER_LOG_LEVEL");
        env::remove_var("TRIP_PLANNER_CORS_ORIGIN");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/trips.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(config.cors_origin.is_none());

        env::set_var("TRIP_PLANNER_BIND_ADDR", "not-an-address");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("not-an-address"));
        env::remove_var("TRIP_PLANNER_BIND_ADDR");
    }
}
