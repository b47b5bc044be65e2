//! Application state.
//!
//! [`AppState`] owns every store and service for one client session. It is
//! passed by `&mut` to the route guard, so only one navigation runs at a time.

use std::sync::Arc;

use newtab_core::{Link, Route};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::api::{ApiClient, ApiError, ReqwestTransport, Transport};
use crate::config::{ClientConfig, StagingConfig};
use crate::guard::{self, Navigation};
use crate::identity::{BackendIdentity, IdentityProvider};
use crate::services::auth::{AuthError, AuthService, Credentials};
use crate::services::plans::PlanCache;
use crate::staging::StagingGate;
use crate::storage::{ClientStorage, FileStorage, StorageError};
use crate::stores::{Session, SessionStore, SettingsError, SettingsStore, UserStore};

/// Error building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("api client: {0}")]
    Api(#[from] ApiError),
    #[error("client storage: {0}")]
    Storage(#[from] StorageError),
}

/// Stores and services for one client session.
pub struct AppState<T: Transport = ReqwestTransport, P: IdentityProvider = BackendIdentity<T>> {
    pub(crate) api: ApiClient<T>,
    pub(crate) auth: AuthService<T>,
    pub(crate) identity: P,
    pub(crate) plans: PlanCache,
    pub(crate) staging: StagingGate,
    pub(crate) session: SessionStore,
    pub(crate) user: UserStore,
    pub(crate) settings: SettingsStore,
}

impl AppState {
    /// Build the production state: `reqwest` transport, file-backed storage,
    /// backend identity provider.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built or storage is unreadable.
    pub fn from_config(config: &ClientConfig) -> Result<Self, StateError> {
        let transport = ReqwestTransport::new(&config.api_base_url, config.request_timeout)?;
        let api = ApiClient::new(transport);
        let identity = BackendIdentity::new(api.clone());
        let storage: Arc<dyn ClientStorage> = Arc::new(FileStorage::new(&config.storage_path));

        Ok(Self::new(
            api,
            config.app_url.clone(),
            identity,
            storage,
            &config.staging,
        )?)
    }
}

impl<T: Transport, P: IdentityProvider> AppState<T, P> {
    /// Assemble state from its parts, resuming any persisted session.
    ///
    /// # Errors
    ///
    /// Returns error if the persisted session cannot be read.
    pub fn new(
        mut api: ApiClient<T>,
        app_url: Url,
        identity: P,
        storage: Arc<dyn ClientStorage>,
        staging: &StagingConfig,
    ) -> Result<Self, StorageError> {
        let session = SessionStore::restore(Arc::clone(&storage))?;
        let auth = AuthService::new(api.clone(), app_url);
        if let Some(token) = session.token() {
            api.set_token(token.clone());
        }

        Ok(Self {
            api,
            auth,
            identity,
            plans: PlanCache::new(),
            staging: StagingGate::new(staging, storage),
            session,
            user: UserStore::new(),
            settings: SettingsStore::new(),
        })
    }

    /// Run the staging gate and the route guard for a navigation to `to`.
    pub async fn navigate(&mut self, to: Route) -> Navigation {
        if let Some(redirect) = self.staging.check(to) {
            return redirect;
        }
        guard::before_each(self, to).await
    }

    /// Log in and start a fresh session.
    ///
    /// # Errors
    ///
    /// Returns error if the login fails; the previous state is kept.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self.session.login(&self.auth, credentials).await?;
        self.begin(&session);
        Ok(session)
    }

    /// Register an account and start a fresh session.
    ///
    /// # Errors
    ///
    /// Returns error if registration fails; the previous state is kept.
    pub async fn register(&mut self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self.session.register(&self.auth, credentials).await?;
        self.begin(&session);
        Ok(session)
    }

    fn begin(&mut self, session: &Session) {
        self.user.reset();
        self.settings.reset();
        self.api.set_token(session.token.clone());
        info!(user_id = %session.user.id, "session started");
    }

    /// End the session and reset every store derived from it.
    pub fn logout(&mut self) {
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "logout could not clear persisted token");
        }
        self.api.clear_token();
        self.user.reset();
        self.settings.reset();
        info!("session ended");
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthService<T> {
        &self.auth
    }

    #[must_use]
    pub const fn staging(&self) -> &StagingGate {
        &self.staging
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub const fn user(&self) -> &UserStore {
        &self.user
    }

    #[must_use]
    pub const fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// The signed-in user's quick-links.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotAuthenticated`] unless the session has a
    /// resolved profile, or an API error if the fetch fails.
    pub async fn links(&mut self) -> Result<&[Link], SettingsError> {
        let user_id = self
            .user
            .user_id()
            .cloned()
            .ok_or(SettingsError::NotAuthenticated)?;
        self.settings
            .fetch_links(&self.api, &self.session, &user_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use newtab_core::{Email, IdentityUser, UserId};
    use reqwest::StatusCode;
    use secrecy::{ExposeSecret, SecretString};

    use super::*;
    use crate::storage::{MemoryStorage, keys};
    use crate::testing::{ScriptedTransport, StaticIdentity};

    const STAGING_PASSWORD: &str = "tB7!kq2#Lw9zR";

    fn app(
        transport: ScriptedTransport,
        storage: Arc<MemoryStorage>,
        staging: &StagingConfig,
    ) -> AppState<ScriptedTransport, StaticIdentity> {
        let identity = IdentityUser {
            id: UserId::new("u_1"),
            first_name: Some("Ada".to_string()),
            last_name: None,
            email_addresses: vec![Email::parse("a@b.com").unwrap()],
        };
        AppState::new(
            ApiClient::new(transport),
            Url::parse("http://localhost:5173").unwrap(),
            StaticIdentity(Some(identity)),
            storage,
            staging,
        )
        .unwrap()
    }

    fn staging_on() -> StagingConfig {
        StagingConfig {
            enabled: true,
            password: Some(SecretString::from(STAGING_PASSWORD)),
        }
    }

    #[tokio::test]
    async fn test_staging_redirects_before_guard() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = app(ScriptedTransport::new(), storage, &staging_on());

        assert_eq!(
            state.navigate(Route::from_path("/").unwrap()).await,
            Navigation::Redirect(Route::StagingLogin)
        );
        assert_eq!(
            state.navigate(Route::StagingLogin).await,
            Navigation::Allow
        );
    }

    #[tokio::test]
    async fn test_staging_flag_lets_guard_decide() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::STAGING_AUTHENTICATED, "true").unwrap();
        let mut state = app(ScriptedTransport::new(), storage, &staging_on());

        assert_eq!(state.navigate(Route::Home).await, Navigation::Allow);
        assert_eq!(
            state.navigate(Route::Settings).await,
            Navigation::Redirect(Route::Login)
        );
    }

    #[tokio::test]
    async fn test_resumed_session_injects_token() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::TOKEN, "tok_1").unwrap();
        let transport = ScriptedTransport::new();
        transport.push(StatusCode::OK, r#"{"id":"u_1","email":"a@b.com"}"#);
        let state = app(transport, storage, &StagingConfig::default());

        state.api().get_user(&UserId::new("u_1")).await.unwrap();

        let calls = state.api().transport().calls();
        assert_eq!(
            calls[0].bearer.as_ref().map(|t| t.expose_secret().to_string()),
            Some("tok_1".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_continues_at_app_url() {
        let transport = ScriptedTransport::new();
        transport.push(
            StatusCode::OK,
            r#"{"token":"tok_9","user":{"id":"u_1","email":"a@b.com"}}"#,
        );
        let mut state = app(
            transport,
            Arc::new(MemoryStorage::new()),
            &StagingConfig::default(),
        );

        let credentials = Credentials::new("a@b.com", "hunter22hunter22").unwrap();
        state.login(&credentials).await.unwrap();

        assert_eq!(state.auth().app_url().as_str(), "http://localhost:5173/");
    }

    #[tokio::test]
    async fn test_login_then_logout_resets_everything() {
        let storage = Arc::new(MemoryStorage::new());
        let transport = ScriptedTransport::new();
        transport.push(
            StatusCode::OK,
            r#"{"token":"tok_9","user":{"id":"u_1","email":"a@b.com"}}"#,
        );
        transport.push(StatusCode::OK, r#"{"id":"u_1","email":"a@b.com"}"#);
        transport.push(StatusCode::OK, "{}");
        let mut state = app(transport, storage.clone(), &StagingConfig::default());

        let credentials = Credentials::new("a@b.com", "hunter22hunter22").unwrap();
        state.login(&credentials).await.unwrap();
        assert!(state.api().has_token());
        assert_eq!(state.navigate(Route::Settings).await, Navigation::Allow);
        assert!(state.user().is_loaded());

        state.logout();

        assert!(!state.session().is_authenticated());
        assert!(!state.api().has_token());
        assert!(!state.user().is_loaded());
        assert!(!state.settings().is_loaded());
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }
}
