//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Database (one of)
//! - `CLIENT_MANAGER_DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_URL` - Generic fallback connection string
//! - `DATABASE_HOST`, `DATABASE_PORT` (default 5432), `DATABASE_NAME`,
//!   `DATABASE_USER`, `DATABASE_PASSWORD` - Assembled into a connection string
//!
//! ## Optional
//! - `CLIENT_MANAGER_HOST` - Bind address (default: 127.0.0.1)
//! - `CLIENT_MANAGER_PORT` - Listen port (default: 3080)
//! - `CLIENT_MANAGER_BASE_URL` - Public URL (default: `http://localhost:3080`)
//! - `ADMIN_NAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD` - Bootstrap admin, all or none
//! - `LOG_FORMAT` - `json` or `text` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; an `https` scheme marks the session cookie `Secure`
    pub base_url: String,
    /// Admin account created at startup when absent
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Credentials for the admin seeded on startup.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CLIENT_MANAGER_DATABASE_URL")?;
        let host = get_env_or_default("CLIENT_MANAGER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CLIENT_MANAGER_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("CLIENT_MANAGER_PORT", "3080")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CLIENT_MANAGER_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("CLIENT_MANAGER_BASE_URL", "http://localhost:3080");
        let bootstrap_admin = get_bootstrap_admin()?;
        let log_format = parse_log_format(get_optional_env("LOG_FORMAT").as_deref())?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_sample_rate("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            bootstrap_admin,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over TLS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get database URL with fallback to generic `DATABASE_URL`, then to the
/// discrete `DATABASE_*` variables.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    if std::env::var("DATABASE_HOST").is_err() {
        return Err(ConfigError::MissingEnvVar(primary_key.to_string()));
    }

    let port = get_env_or_default("DATABASE_PORT", "5432")
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar("DATABASE_PORT".to_string(), e.to_string()))?;
    let url = build_database_url(
        &get_required_env("DATABASE_HOST")?,
        port,
        &get_required_env("DATABASE_NAME")?,
        &get_required_env("DATABASE_USER")?,
        &get_required_env("DATABASE_PASSWORD")?,
    )?;
    Ok(SecretString::from(url))
}

/// Assemble a connection URL, percent-encoding the user, password and
/// database name.
fn build_database_url(
    host: &str,
    port: u16,
    name: &str,
    user: &str,
    password: &str,
) -> Result<String, ConfigError> {
    let invalid = |key: &str| {
        ConfigError::InvalidEnvVar(key.to_string(), "not usable in a connection URL".to_string())
    };

    let mut url = Url::parse("postgres://localhost").map_err(|_| invalid("DATABASE_HOST"))?;
    url.set_host(Some(host))
        .map_err(|e| ConfigError::InvalidEnvVar("DATABASE_HOST".to_string(), e.to_string()))?;
    url.set_port(Some(port))
        .map_err(|()| invalid("DATABASE_PORT"))?;
    url.set_username(user)
        .map_err(|()| invalid("DATABASE_USER"))?;
    url.set_password(Some(password))
        .map_err(|()| invalid("DATABASE_PASSWORD"))?;
    url.path_segments_mut()
        .map_err(|()| invalid("DATABASE_NAME"))?
        .clear()
        .push(name);
    Ok(url.into())
}

/// All three `ADMIN_*` variables, or none of them.
fn get_bootstrap_admin() -> Result<Option<BootstrapAdmin>, ConfigError> {
    let name = get_optional_env("ADMIN_NAME");
    let email = get_optional_env("ADMIN_EMAIL");
    let password = get_optional_env("ADMIN_PASSWORD");

    match (name, email, password) {
        (None, None, None) => Ok(None),
        (Some(name), Some(email), Some(password)) => Ok(Some(BootstrapAdmin {
            name,
            email,
            password: SecretString::from(password),
        })),
        (name, email, _) => {
            let missing = if name.is_none() {
                "ADMIN_NAME"
            } else if email.is_none() {
                "ADMIN_EMAIL"
            } else {
                "ADMIN_PASSWORD"
            };
            Err(ConfigError::MissingEnvVar(missing.to_string()))
        }
    }
}

fn parse_log_format(value: Option<&str>) -> Result<LogFormat, ConfigError> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None | Some("text") => Ok(LogFormat::Text),
        Some("json") => Ok(LogFormat::Json),
        Some(other) => Err(ConfigError::InvalidEnvVar(
            "LOG_FORMAT".to_string(),
            format!("expected `json` or `text`, got `{other}`"),
        )),
    }
}

fn parse_sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be between 0.0 and 1.0".to_string(),
        ));
    }
    Ok(rate)
}
