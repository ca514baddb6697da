//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; without a database URL the server keeps its
//! data in memory (useful for demos and tests, lost on restart).
//!
//! - `PMS_HOST` - Bind address (default: 127.0.0.1)
//! - `PMS_PORT` - Listen port (default: 8080)
//! - `PMS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `PMS_AUTH_HEADER` - Header carrying the auth token (default: `x-auth-token`)
//! - `PMS_TOKEN_TTL_SECS` - Idle lifetime of an auth token (default: 3600)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;
use secrecy::SecretString;
use thiserror::Error;

/// Default header used to carry auth tokens.
pub const DEFAULT_AUTH_HEADER: &str = "x-auth-token";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// `PostgreSQL` database connection URL; `None` selects in-memory storage
    pub database_url: Option<SecretString>,
    /// Request header that carries the auth token
    pub auth_header: HeaderName,
    /// How long an unused token stays valid
    pub token_ttl: Duration,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            database_url: None,
            auth_header: HeaderName::from_static(DEFAULT_AUTH_HEADER),
            token_ttl: Duration::from_secs(3600),
            sentry: SentryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = get_parsed_or("PMS_HOST", defaults.host)?;
        let port = get_parsed_or("PMS_PORT", defaults.port)?;
        let database_url = get_database_url("PMS_DATABASE_URL");
        let auth_header = get_parsed_or("PMS_AUTH_HEADER", defaults.auth_header)?;
        let token_ttl = Duration::from_secs(get_parsed_or(
            "PMS_TOKEN_TTL_SECS",
            defaults.token_ttl.as_secs(),
        )?);

        let sentry = SentryConfig {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: get_rate("SENTRY_SAMPLE_RATE", defaults.sentry.sample_rate)?,
            traces_sample_rate: get_rate(
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry.traces_sample_rate,
            )?,
        };

        Ok(Self {
            host,
            port,
            database_url,
            auth_header,
            token_ttl,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
}

/// Parse an environment variable, using `default` when it is unset.
fn get_parsed_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

/// Parse a sample rate and check it lies within 0.0-1.0.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let rate = get_parsed_or(key, default)?;
    check_rate(key, rate)
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn check_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert!(config.database_url.is_none());
        assert_eq!(config.auth_header.as_str(), DEFAULT_AUTH_HEADER);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("PMS_PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PMS_PORT"));

        let port: u16 = parse_value("PMS_PORT", " 9000 ").unwrap();
        assert_eq!(port, 9000);
    }

    #[test]
    fn test_header_name_parsing() {
        let header: HeaderName = parse_value("PMS_AUTH_HEADER", "X-Token").unwrap();
        assert_eq!(header.as_str(), "x-token");
        assert!(parse_value::<HeaderName>("PMS_AUTH_HEADER", "bad header").is_err());
    }

    #[test]
    fn test_rate_bounds() {
        assert!(check_rate("SENTRY_SAMPLE_RATE", 0.5).is_ok());
        assert!(check_rate("SENTRY_SAMPLE_RATE", 1.5).is_err());
        assert!(check_rate("SENTRY_SAMPLE_RATE", -0.1).is_err());
    }
}
