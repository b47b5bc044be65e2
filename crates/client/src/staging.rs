//! Staging deployment gate.
//!
//! Staging builds hide every page behind a shared password. Entering it on
//! the staging login page sets a flag in durable client storage; until then
//! every other route redirects to the staging login page. This gate is
//! independent of the user session.

use std::sync::Arc;

use newtab_core::Route;
use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{StagingConfig, staging_password_matches};
use crate::guard::Navigation;
use crate::storage::{ClientStorage, StorageError, keys};

/// Errors that can occur during staging login.
#[derive(Debug, Error)]
pub enum StagingError {
    /// Staging mode is off; there is nothing to log in to.
    #[error("staging mode is disabled")]
    Disabled,

    #[error("incorrect staging password")]
    IncorrectPassword,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The staging gate.
pub struct StagingGate {
    enabled: bool,
    password: Option<SecretString>,
    storage: Arc<dyn ClientStorage>,
}

impl StagingGate {
    #[must_use]
    pub fn new(config: &StagingConfig, storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            enabled: config.enabled,
            password: config.password.clone(),
            storage,
        }
    }

    /// Whether the staging flag is set. Unreadable storage counts as unset.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        match self.storage.get(keys::STAGING_AUTHENTICATED) {
            Ok(flag) => flag.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "staging flag unreadable");
                false
            }
        }
    }

    /// Decide whether navigation to `to` must be diverted to the staging login.
    ///
    /// Returns `None` when the gate lets the navigation through to the route guard.
    #[must_use]
    pub fn check(&self, to: Route) -> Option<Navigation> {
        if !self.enabled || to == Route::StagingLogin || self.is_unlocked() {
            return None;
        }
        Some(Navigation::Redirect(Route::StagingLogin))
    }

    /// Unlock the gate with the staging password.
    ///
    /// # Errors
    ///
    /// Returns error if staging mode is off, the password is wrong, or the
    /// flag cannot be persisted.
    pub fn login(&self, candidate: &str) -> Result<(), StagingError> {
        let expected = match (&self.password, self.enabled) {
            (Some(expected), true) => expected,
            _ => return Err(StagingError::Disabled),
        };
        if !staging_password_matches(expected, candidate) {
            warn!("staging login rejected");
            return Err(StagingError::IncorrectPassword);
        }
        self.storage.set(keys::STAGING_AUTHENTICATED, "true")?;
        info!("staging gate unlocked");
        Ok(())
    }

    /// Clear the staging flag.
    ///
    /// # Errors
    ///
    /// Returns error if the flag cannot be removed.
    pub fn lock(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::STAGING_AUTHENTICATED)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const PASSWORD: &str = "tB7!kq2#Lw9zR";

    fn gate(enabled: bool) -> StagingGate {
        let config = StagingConfig {
            enabled,
            password: enabled.then(|| SecretString::from(PASSWORD)),
        };
        StagingGate::new(&config, Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_disabled_gate_never_redirects() {
        let gate = gate(false);
        for route in Route::ALL {
            assert_eq!(gate.check(route), None);
        }
    }

    #[test]
    fn test_locked_gate_redirects_home_to_staging_login() {
        let gate = gate(true);
        assert_eq!(
            gate.check(Route::from_path("/").unwrap()),
            Some(Navigation::Redirect(Route::StagingLogin))
        );
        assert_eq!(
            gate.check(Route::Login),
            Some(Navigation::Redirect(Route::StagingLogin))
        );
    }

    #[test]
    fn test_staging_login_page_is_always_reachable() {
        assert_eq!(gate(true).check(Route::StagingLogin), None);
    }

    #[test]
    fn test_login_unlocks_gate() {
        let gate = gate(true);
        gate.login(PASSWORD).unwrap();
        assert!(gate.is_unlocked());
        assert_eq!(gate.check(Route::Home), None);

        gate.lock().unwrap();
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn test_wrong_password_keeps_gate_locked() {
        let gate = gate(true);
        assert!(matches!(
            gate.login("guess"),
            Err(StagingError::IncorrectPassword)
        ));
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn test_login_when_disabled() {
        assert!(matches!(gate(false).login(PASSWORD), Err(StagingError::Disabled)));
    }
}
