//! Integration tests for the newtab client.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (no backend needed)
//! cargo test -p newtab-integration-tests
//!
//! # Live backend tests
//! NEWTAB_API_BASE_URL=http://localhost:3000 \
//! NEWTAB_TEST_EMAIL=me@example.com NEWTAB_TEST_PASSWORD=... \
//!     cargo test -p newtab-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `navigation` - Staging gate and route guard through [`AppState`]
//! - `backend_api` - Raw backend endpoints (`#[ignore]`, live backend)

use std::path::PathBuf;
use std::time::Duration;

use newtab_client::config::StagingConfig;
use newtab_client::{AppState, ClientConfig, StateError};
use secrecy::SecretString;
use url::Url;

/// Base URL for the backend API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("NEWTAB_API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Credentials of an existing backend account, if provided.
#[must_use]
pub fn test_credentials() -> Option<(String, String)> {
    let email = std::env::var("NEWTAB_TEST_EMAIL").ok()?;
    let password = std::env::var("NEWTAB_TEST_PASSWORD").ok()?;
    Some((email, password))
}

/// A client configuration with isolated storage under the temp directory.
pub struct TestContext {
    pub config: ClientConfig,
}

impl TestContext {
    /// Create a context whose storage file is unique to `name`.
    ///
    /// # Panics
    ///
    /// Panics if the backend URL is malformed.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn new(name: &str) -> Self {
        let storage_path = storage_dir(name).join("storage.json");
        let _ = std::fs::remove_file(&storage_path);

        Self {
            config: ClientConfig {
                api_base_url: Url::parse(&api_base_url()).unwrap(),
                app_url: Url::parse("http://localhost:5173").unwrap(),
                storage_path,
                staging: StagingConfig::default(),
                request_timeout: Some(Duration::from_secs(10)),
                suggest: None,
                sentry_dsn: None,
            },
        }
    }

    /// Turn the staging gate on with `password`.
    #[must_use]
    pub fn with_staging(mut self, password: &str) -> Self {
        self.config.staging = StagingConfig {
            enabled: true,
            password: Some(SecretString::from(password)),
        };
        self
    }

    /// Open application state over this context's storage.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client or storage cannot be opened.
    pub fn open(&self) -> Result<AppState, StateError> {
        AppState::from_config(&self.config)
    }
}

fn storage_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("newtab-it-{}-{name}", std::process::id()))
}
