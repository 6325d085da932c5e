//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COVERBOOK_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `COVERBOOK_HOST` - Bind address (default: 127.0.0.1)
//! - `COVERBOOK_PORT` - Listen port (default: 5056)
//! - `COVERBOOK_ALLOWED_ORIGINS` - Comma-separated browser origins
//!   allowed by CORS (default: <http://localhost:4200>)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Registry server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Browser origins allowed to call the API
    pub allowed_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("COVERBOOK_DATABASE_URL")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("COVERBOOK_DATABASE_URL".to_owned()))?;

        let host = match std::env::var("COVERBOOK_HOST") {
            Ok(raw) => raw.parse::<IpAddr>().map_err(|e| {
                ConfigError::InvalidEnvVar("COVERBOOK_HOST".to_owned(), e.to_string())
            })?,
            Err(_) => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match std::env::var("COVERBOOK_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("COVERBOOK_PORT".to_owned(), e.to_string())
            })?,
            Err(_) => 5056,
        };

        let allowed_origins = std::env::var("COVERBOOK_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_else(|_| vec!["http://localhost:4200".to_owned()]);

        let sentry_dsn = std::env::var("SENTRY_DSN").ok();

        Ok(Self {
            database_url,
            host,
            port,
            allowed_origins,
            sentry_dsn,
        })
    }

    /// The socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// A configuration suitable for tests: no database, no Sentry,
    /// loopback origins.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            database_url: SecretString::from(String::new()),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            allowed_origins: vec!["http://localhost:4200".to_owned()],
            sentry_dsn: None,
        }
    }
}
