//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Default PostgreSQL pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Unknown LOG_FORMAT '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL; the in-memory store is used when unset
    pub database_url: Option<String>,

    /// Upper bound on pooled PostgreSQL connections
    pub database_max_connections: u32,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            rust_log: "roster=info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Self::default();

        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be a positive integer")
            })?,
            Err(_) => defaults.database_max_connections,
        };
        if database_max_connections == 0 {
            return Err(anyhow::anyhow!(
                "DATABASE_MAX_CONNECTIONS must be a positive integer"
            ));
        }

        let log_format = match env::var("LOG_FORMAT") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.log_format,
        };

        let config = Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            database_max_connections,
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            log_format,
        };

        Ok(config)
    }

    /// Whether a PostgreSQL store is configured
    pub fn uses_database(&self) -> bool {
        self.database_url.is_some()
    }
}
