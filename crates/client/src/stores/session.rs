//! Session store.
//!
//! Holds the session token. The token is mirrored into durable client storage
//! so a restart resumes the session.

use std::sync::Arc;

use newtab_core::UserRecord;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::api::Transport;
use crate::services::auth::{AuthError, AuthService, Credentials};
use crate::storage::{ClientStorage, StorageError, keys};

/// An authenticated session returned by login or registration.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: UserRecord,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.expose_secret().is_empty()
    }
}

/// Owns the session token.
pub struct SessionStore {
    storage: Arc<dyn ClientStorage>,
    token: Option<SecretString>,
}

impl SessionStore {
    /// Create a store, resuming any token persisted in `storage`.
    ///
    /// A corrupt store resumes signed out.
    ///
    /// # Errors
    ///
    /// Returns error if storage cannot be read.
    pub fn restore(storage: Arc<dyn ClientStorage>) -> Result<Self, StorageError> {
        let persisted = match storage.get(keys::TOKEN) {
            Err(StorageError::Corrupt { path, source }) => {
                warn!(path = %path.display(), error = %source, "client storage corrupt, starting signed out");
                None
            }
            other => other?,
        };
        let token = persisted
            .filter(|token| !token.is_empty())
            .map(SecretString::from);
        if token.is_some() {
            info!("resumed persisted session");
        }
        Ok(Self { storage, token })
    }

    /// Log in with email and password and persist the issued token.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the credentials, issues an empty
    /// token, or the token cannot be persisted.
    #[instrument(skip_all)]
    pub async fn login<T: Transport>(
        &mut self,
        auth: &AuthService<T>,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let response = auth.login(credentials).await?;
        self.start(response.token, response.user)
    }

    /// Register a new account and persist the issued token.
    ///
    /// # Errors
    ///
    /// Returns error if registration fails, the backend issues an empty token,
    /// or the token cannot be persisted.
    #[instrument(skip_all)]
    pub async fn register<T: Transport>(
        &mut self,
        auth: &AuthService<T>,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let response = auth.register(credentials).await?;
        self.start(response.token, response.user)
    }

    fn start(&mut self, token: String, user: UserRecord) -> Result<Session, AuthError> {
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        self.storage.set(keys::TOKEN, &token)?;
        let token = SecretString::from(token);
        self.token = Some(token.clone());
        Ok(Session { token, user })
    }

    /// Drop the session token.
    ///
    /// The in-memory token is cleared even if storage fails. Resetting the
    /// stores derived from the session is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns error if the persisted token cannot be removed.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.token = None;
        self.storage.remove(keys::TOKEN)
    }

    /// True iff a non-empty token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::StatusCode;
    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::storage::{FileStorage, MemoryStorage};
    use crate::testing::ScriptedTransport;

    fn auth_service(status: StatusCode, body: &str) -> AuthService<ScriptedTransport> {
        let transport = ScriptedTransport::new();
        transport.push(status, body);
        AuthService::new(
            ApiClient::new(transport),
            Url::parse("http://localhost:5173").unwrap(),
        )
    }

    fn credentials() -> Credentials {
        Credentials::new("a@b.com", "hunter22hunter22").unwrap()
    }

    #[test]
    fn test_restore_without_token() {
        let store = SessionStore::restore(Arc::new(MemoryStorage::new())).unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_restore_ignores_empty_token() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::TOKEN, "").unwrap();
        let store = SessionStore::restore(storage).unwrap();
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = SessionStore::restore(storage.clone()).unwrap();
        let auth = auth_service(
            StatusCode::OK,
            r#"{"token":"tok_1","user":{"id":"u_1","email":"a@b.com"}}"#,
        );

        let session = store.login(&auth, &credentials()).await.unwrap();

        assert!(session.is_authenticated());
        assert!(store.is_authenticated());
        assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("tok_1"));
        assert!(SessionStore::restore(storage).unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_with_empty_token_fails() {
        let mut store = SessionStore::restore(Arc::new(MemoryStorage::new())).unwrap();
        let auth = auth_service(
            StatusCode::OK,
            r#"{"token":"","user":{"id":"u_1","email":"a@b.com"}}"#,
        );

        let err = store.login(&auth, &credentials()).await.unwrap_err();

        assert!(matches!(err, AuthError::EmptyToken));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_untouched() {
        let mut store = SessionStore::restore(Arc::new(MemoryStorage::new())).unwrap();
        let auth = auth_service(StatusCode::UNAUTHORIZED, "");

        assert!(store.login(&auth, &credentials()).await.is_err());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_restore_from_corrupt_file_is_signed_out() {
        let path = std::env::temp_dir()
            .join(format!("newtab-session-{}-corrupt", std::process::id()))
            .join("storage.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"token": "tok_"#).unwrap();
        let storage = Arc::new(FileStorage::new(&path));

        let mut store = SessionStore::restore(storage.clone()).unwrap();
        assert!(!store.is_authenticated());

        store.logout().unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_logout_clears_persisted_token() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::TOKEN, "tok_1").unwrap();
        let mut store = SessionStore::restore(storage.clone()).unwrap();
        assert!(store.is_authenticated());

        store.logout().unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }
}
