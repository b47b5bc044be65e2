//! Settings store.
//!
//! Preferences are fetched at most once per authenticated session; later
//! reads are served from the store until logout resets it.

use newtab_core::{Link, Settings, UserId};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError, Transport};
use crate::stores::SessionStore;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings are only available to authenticated sessions.
    #[error("settings require an authenticated session")]
    NotAuthenticated,

    /// Backend API error.
    #[error("api error: {0}")]
    Api(#[from] ApiError),
}

/// Owns the user's [`Settings`] and quick-links.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: Option<Settings>,
    links: Option<Vec<Link>>,
}

impl SettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings for `user_id`, unless already loaded this session.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotAuthenticated`] without any request when the
    /// session is not authenticated, or an API error if the fetch fails.
    #[instrument(skip(self, api, session))]
    pub async fn fetch<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        session: &SessionStore,
        user_id: &UserId,
    ) -> Result<&Settings, SettingsError> {
        if !session.is_authenticated() {
            return Err(SettingsError::NotAuthenticated);
        }
        if self.settings.is_none() {
            let settings = api.user_settings(user_id).await?;
            debug!(empty = settings.is_empty(), "settings loaded");
            self.settings = Some(settings);
        }
        Ok(&*self.settings.get_or_insert_default())
    }

    /// Load the user's quick-links, unless already loaded this session.
    ///
    /// # Errors
    ///
    /// Same as [`SettingsStore::fetch`].
    #[instrument(skip(self, api, session))]
    pub async fn fetch_links<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        session: &SessionStore,
        user_id: &UserId,
    ) -> Result<&[Link], SettingsError> {
        if !session.is_authenticated() {
            return Err(SettingsError::NotAuthenticated);
        }
        if self.links.is_none() {
            self.links = Some(api.user_links(user_id).await?);
        }
        Ok(self.links.get_or_insert_default().as_slice())
    }

    #[must_use]
    pub const fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.settings.is_some()
    }

    /// Forget everything (logout).
    pub fn reset(&mut self) {
        self.settings = None;
        self.links = None;
    }
}
