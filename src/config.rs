//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::{AppError, Result};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field output.
    #[default]
    #[strum(to_string = "pretty", serialize = "PRETTY")]
    #[serde(alias = "PRETTY")]
    Pretty,
    /// One JSON object per line.
    #[strum(to_string = "json", serialize = "JSON")]
    #[serde(alias = "JSON")]
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Database ===
    /// sqlx connection URL.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    // === Server Configuration ===
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Comma-separated list of origins allowed by CORS; empty allows any.
    #[serde(default)]
    pub cors_allowed_origins: String,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log line format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_database_url() -> String {
    "sqlite://items.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            database_max_connections: default_max_connections(),
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: String::new(),
            rust_log: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from `KEY=value` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Validate, reporting failures as [`AppError::InvalidConfig`].
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate().map_err(AppError::InvalidConfig)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL must not be empty".to_string());
        }

        if !self.database_url.starts_with("sqlite:") {
            return Err("DATABASE_URL must be a sqlite: URL".to_string());
        }

        if self.database_max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be at least 1".to_string());
        }

        if self.host.parse::<IpAddr>().is_err() {
            return Err(format!("HOST is not a valid IP address: {}", self.host));
        }

        for origin in self.cors_origins() {
            if HeaderValue::from_str(origin).is_err() {
                return Err(format!("CORS_ALLOWED_ORIGINS contains invalid origin: {origin}"));
            }
        }

        Ok(())
    }

    /// Socket address the HTTP server binds to.
    ///
    /// Falls back to all interfaces when `host` does not parse; `validate`
    /// reports that case.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .parse::<IpAddr>()
            .unwrap_or(IpAddr::from([0, 0, 0, 0]));
        SocketAddr::new(ip, self.port)
    }

    /// Configured CORS origins, trimmed, with empty entries dropped.
    pub fn cors_origins(&self) -> Vec<&str> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}
