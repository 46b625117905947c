use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Server configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `PORT` is not a valid port number
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listening port (`PORT`, default 3000)
    pub port: u16,
    /// Directory holding the SQLite database (`DATA_DIR`, default `data`)
    pub data_dir: PathBuf,
    /// Deployment environment (`APP_ENV`, default `development`)
    pub app_env: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
            app_env: "development".to_string(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidPort(value))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            port,
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            app_env: env::var("APP_ENV").unwrap_or(defaults.app_env),
        })
    }

    /// Address to bind on all interfaces
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Default SQLite file inside the data directory
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("care_dashboard.db")
    }
}
