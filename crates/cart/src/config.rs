//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `INVENTORY_API_URL` - Base URL of the inventory service (serves `/products` and `/stock`)
//!
//! ## Optional
//! - `INVENTORY_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `CART_STORAGE_PATH` - JSON file backing the persisted cart (default: .rocketshoes/storage.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory service configuration
    pub inventory: InventoryConfig,
    /// File holding the persisted key-value slots
    pub storage_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Inventory service configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL, always ending in `/` so relative paths join beneath it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl CartConfig {
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

        let inventory = InventoryConfig::from_env()?;
        let storage_path = PathBuf::from(get_env_or_default(
            "CART_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            inventory,
            storage_path,
            sentry_dsn,
        })
    }
}

impl InventoryConfig {
    /// Build an inventory configuration from a base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is not
    /// `http`/`https`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("INVENTORY_API_URL", base_url)?,
            timeout,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("INVENTORY_API_URL")?;
        let timeout = parse_timeout(
            "INVENTORY_TIMEOUT_SECS",
            &get_env_or_default("INVENTORY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        )?;
        Self::new(&base_url, timeout)
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
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and normalize a service base URL.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    // Url::join replaces the last segment unless the path ends in '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Parse a timeout given in whole seconds.
fn parse_timeout(var_name: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be greater than zero".to_string(),
        ));
    }

    Ok(Duration::from_secs(secs))
}
