//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHEETS_SPREADSHEET_ID` - ID of the spreadsheet receiving lookup rows
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 5000)
//! - `MAX_UPLOAD_BYTES` - Batch upload body limit (default: 2 MiB)
//! - `CERT_LOOKUP_BASE_URL` - Grading site base URL (default: <https://www.psacard.com>)
//! - `CERT_LOOKUP_TIMEOUT_SECS` - Per-fetch timeout in seconds (default: 10)
//! - `CERT_LOOKUP_ACCEPT_INVALID_CERTS` - Skip TLS certificate validation (default: false)
//! - `CERT_LOOKUP_USER_AGENT` - Outbound User-Agent header
//! - `SHEETS_RANGE` - A1 range rows are appended after (default: A1, the first worksheet)
//! - `GOOGLE_SERVICE_ACCOUNT_KEY` - Service-account key file (default: credentials.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Default grading site queried for certificate pages.
pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://www.psacard.com";

/// Default per-fetch timeout in seconds.
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Default batch upload body limit in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Maximum accepted request body for batch uploads
    pub max_upload_bytes: usize,
    /// Grading site lookup configuration
    pub lookup: LookupConfig,
    /// Spreadsheet persistence configuration
    pub sheets: SheetsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Grading site lookup configuration.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Base URL; pages are fetched from `{base_url}/cert/{cert}`
    pub base_url: Url,
    /// Per-fetch timeout in seconds
    pub timeout_secs: u64,
    /// Accept invalid TLS certificates from the grading site.
    ///
    /// Off unless explicitly enabled; turning it on exposes lookups to
    /// interception.
    pub accept_invalid_certs: bool,
    /// User-Agent sent with each fetch
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_LOOKUP_BASE_URL).expect("Invalid default base URL"),
            timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
            accept_invalid_certs: false,
            user_agent: default_user_agent(),
        }
    }
}

/// Google Sheets persistence configuration.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Target spreadsheet ID
    pub spreadsheet_id: String,
    /// A1 range rows are appended after
    pub range: String,
    /// Path to the service-account key JSON
    pub service_account_key: PathBuf,
}

impl AppConfig {
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
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_or_default(&vars, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or_default(&vars, "PORT", 5000)?,
            max_upload_bytes: parse_or_default(&vars, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            lookup: LookupConfig::from_vars(&vars)?,
            sheets: SheetsConfig::from_vars(&vars)?,
            sentry_dsn: vars("SENTRY_DSN"),
            sentry_environment: vars("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl LookupConfig {
    /// Load lookup configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    /// Load lookup configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_vars(vars: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            base_url: parse_or_default(vars, "CERT_LOOKUP_BASE_URL", defaults.base_url)?,
            timeout_secs: parse_or_default(vars, "CERT_LOOKUP_TIMEOUT_SECS", defaults.timeout_secs)?,
            accept_invalid_certs: get_bool(vars, "CERT_LOOKUP_ACCEPT_INVALID_CERTS", false)?,
            user_agent: vars("CERT_LOOKUP_USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }
}

impl SheetsConfig {
    /// Load spreadsheet configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the spreadsheet ID is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    /// Load spreadsheet configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the spreadsheet ID is missing.
    pub fn from_vars(vars: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            spreadsheet_id: get_required(vars, "SHEETS_SPREADSHEET_ID")?,
            range: get_or_default(vars, "SHEETS_RANGE", "A1"),
            service_account_key: PathBuf::from(get_or_default(
                vars,
                "GOOGLE_SERVICE_ACCOUNT_KEY",
                "credentials.json",
            )),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Get a required variable; blank values count as missing.
fn get_required(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    vars(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn get_or_default(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    vars(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when it is unset.
fn parse_or_default<T>(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    vars(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`).
fn get_bool(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = vars(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
