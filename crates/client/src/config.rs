//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `NEWTAB_API_BASE_URL` - Backend API base URL (default: `http://localhost:3000`)
//! - `NEWTAB_APP_URL` - Client application URL, target of the post-login redirect
//!   (default: `http://localhost:5173`)
//! - `NEWTAB_STORAGE_PATH` - Durable client storage file (default: `.newtab/storage.json`)
//! - `NEWTAB_STAGING_MODE` - Gate every route behind the staging login (default: false)
//! - `NEWTAB_STAGING_PASSWORD` - Staging login password (required when staging mode is on)
//! - `NEWTAB_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: none)
//! - `BRAVE_SUGGEST_URL` - Brave suggest endpoint (suggestions disabled if unset)
//! - `BRAVE_API_KEY` - Brave subscription token (suggestions disabled if unset)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_STAGING_PASSWORD_LENGTH: usize = 12;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// newtab client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API base URL
    pub api_base_url: Url,
    /// Client application URL
    pub app_url: Url,
    /// Durable client storage file
    pub storage_path: PathBuf,
    /// Staging deployment gate
    pub staging: StagingConfig,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Search suggestion API, if configured
    pub suggest: Option<SuggestConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Staging deployment gate configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Default)]
pub struct StagingConfig {
    pub enabled: bool,
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for StagingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingConfig")
            .field("enabled", &self.enabled)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Brave search suggestion API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SuggestConfig {
    pub url: String,
    pub api_key: SecretString,
}

impl std::fmt::Debug for SuggestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed, or if staging mode is
    /// on without an acceptable staging password.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_url("NEWTAB_API_BASE_URL", "http://localhost:3000")?;
        let app_url = get_url("NEWTAB_APP_URL", "http://localhost:5173")?;
        let storage_path =
            PathBuf::from(get_env_or_default("NEWTAB_STORAGE_PATH", ".newtab/storage.json"));
        let staging = StagingConfig::from_env()?;
        let request_timeout = get_optional_env("NEWTAB_REQUEST_TIMEOUT_SECS")
            .map(|value| {
                value.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "NEWTAB_REQUEST_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;
        let suggest = SuggestConfig::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_base_url,
            app_url,
            storage_path,
            staging,
            request_timeout,
            suggest,
            sentry_dsn,
        })
    }
}

impl StagingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let enabled = parse_bool(
            "NEWTAB_STAGING_MODE",
            &get_env_or_default("NEWTAB_STAGING_MODE", "false"),
        )?;
        if !enabled {
            return Ok(Self::default());
        }

        let key = "NEWTAB_STAGING_PASSWORD";
        let password = get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
        validate_staging_password(&password, key)?;

        Ok(Self {
            enabled,
            password: Some(SecretString::from(password)),
        })
    }
}

impl SuggestConfig {
    fn from_env() -> Option<Self> {
        Some(Self {
            url: get_optional_env("BRAVE_SUGGEST_URL")?,
            api_key: SecretString::from(get_optional_env("BRAVE_API_KEY")?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a URL environment variable with a default value.
fn get_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    Url::parse(&get_env_or_default(key, default))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

/// Validate that a staging password is long enough and not a placeholder.
fn validate_staging_password(password: &str, var_name: &str) -> Result<(), ConfigError> {
    if password.len() < MIN_STAGING_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_STAGING_PASSWORD_LENGTH,
                password.len()
            ),
        ));
    }

    let lower = password.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Whether a candidate matches the configured staging password.
pub(crate) fn staging_password_matches(expected: &SecretString, candidate: &str) -> bool {
    let expected = expected.expose_secret().as_bytes();
    let candidate = candidate.as_bytes();
    // Compare every byte so timing does not depend on the mismatch position.
    expected.len() == candidate.len()
        && expected
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
