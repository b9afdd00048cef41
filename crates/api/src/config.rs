//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `REGISTRY_HOST` - Bind address (default: 127.0.0.1)
//! - `REGISTRY_PORT` - Listen port (default: 3000)
//! - `REGISTRY_DATA_FILE` - JSON data file, relative to the working directory
//!   (default: data/clients.json)
//! - `REGISTRY_PERSIST` - Write every mutation to the data file (default: true).
//!   When false the registry starts from the seed records and keeps them in
//!   memory only.
//! - `POSTAL_LOOKUP_BASE_URL` - ViaCEP-compatible lookup service
//!   (default: <https://viacep.com.br/ws>)
//! - `POSTAL_LOOKUP_TIMEOUT_SECS` - Lookup request timeout (default: 10)
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_DATA_FILE: &str = "data/clients.json";
const DEFAULT_POSTAL_LOOKUP_BASE_URL: &str = "https://viacep.com.br/ws";
const DEFAULT_POSTAL_LOOKUP_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Registry API configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where and whether client records are persisted
    pub storage: StorageConfig,
    /// Postal code lookup service settings
    pub postal_lookup: PostalLookupConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Persistence settings for the client repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// JSON snapshot file
    pub data_file: PathBuf,
    /// Whether mutations are written to `data_file`
    pub persist: bool,
}

/// Settings for the external postal code lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalLookupConfig {
    /// Service root; lookups go to `{base_url}/{cep}/json/`
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let host = vars.parsed::<IpAddr>("REGISTRY_HOST", DEFAULT_HOST)?;
        let port = vars.parsed::<u16>("REGISTRY_PORT", DEFAULT_PORT)?;

        let storage = StorageConfig {
            data_file: PathBuf::from(vars.or_default("REGISTRY_DATA_FILE", DEFAULT_DATA_FILE)),
            persist: vars.flag("REGISTRY_PERSIST", true)?,
        };

        let base_url =
            vars.parsed::<Url>("POSTAL_LOOKUP_BASE_URL", DEFAULT_POSTAL_LOOKUP_BASE_URL)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "POSTAL_LOOKUP_BASE_URL".to_string(),
                format!("unsupported scheme `{}`", base_url.scheme()),
            ));
        }
        let timeout_secs = vars.parsed::<u64>(
            "POSTAL_LOOKUP_TIMEOUT_SECS",
            DEFAULT_POSTAL_LOOKUP_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "POSTAL_LOOKUP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let log_format = vars.parsed::<LogFormat>("LOG_FORMAT", "text")?;

        Ok(Self {
            host,
            port,
            storage,
            postal_lookup: PostalLookupConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            log_format,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: vars.rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: vars.rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
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

/// Variable source with typed accessors.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default) with `FromStr`.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Parse a boolean flag.
    fn flag(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };

        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got `{other}`"),
            )),
        }
    }

    /// Parse a sample rate in `[0.0, 1.0]`.
    fn rate(&self, key: &str, default: &str) -> Result<f32, ConfigError> {
        let rate = self.parsed::<f32>(key, default)?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ))
        }
    }
}
