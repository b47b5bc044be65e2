//! Route guard.
//!
//! Runs before every navigation and decides whether it proceeds or is
//! redirected. For auth-required routes it also bootstraps the session's
//! user profile and settings on first entry.
//!
//! The guard fails closed: any error while bootstrapping logs the session out
//! and redirects to the login page.

use newtab_core::{Access, Route};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::Transport;
use crate::identity::IdentityProvider;
use crate::services::auth::AuthError;
use crate::state::AppState;
use crate::stores::{SessionStore, SettingsError, UserError, UserStore};

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Render the requested route.
    Allow,
    /// Navigate to another route instead.
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up rendered when `requested` was asked for.
    #[must_use]
    pub const fn destination(self, requested: Route) -> Route {
        match self {
            Self::Allow => requested,
            Self::Redirect(route) => route,
        }
    }
}

/// Session state as seen by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    AuthenticatedNoProfile,
    AuthenticatedWithProfile,
}

impl GuardState {
    #[must_use]
    pub fn of(session: &SessionStore, user: &UserStore) -> Self {
        if !session.is_authenticated() {
            Self::Unauthenticated
        } else if user.is_loaded() {
            Self::AuthenticatedWithProfile
        } else {
            Self::AuthenticatedNoProfile
        }
    }
}

/// Why a profile bootstrap failed.
#[derive(Debug, Error)]
enum BootstrapError {
    #[error("session is no longer signed in")]
    SignedOut,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Decide the navigation to `to`.
///
/// Public routes are always allowed. Guest-only routes send authenticated
/// sessions home. Auth-required routes send unauthenticated sessions to the
/// login page; an authenticated session without a profile first resolves the
/// profile (fetch-or-create) and then settings, and is logged out and sent to
/// the login page if either fails.
#[instrument(skip(state))]
pub async fn before_each<T, P>(state: &mut AppState<T, P>, to: Route) -> Navigation
where
    T: Transport,
    P: IdentityProvider,
{
    let guard_state = GuardState::of(&state.session, &state.user);
    debug!(?guard_state, "guarding navigation");

    match (to.access(), guard_state) {
        (Access::Public, _) => Navigation::Allow,
        (Access::GuestOnly, GuardState::Unauthenticated) => Navigation::Allow,
        (Access::GuestOnly, _) => Navigation::Redirect(Route::Home),
        (Access::RequiresAuth, GuardState::Unauthenticated) => Navigation::Redirect(Route::Login),
        (Access::RequiresAuth, GuardState::AuthenticatedWithProfile) => Navigation::Allow,
        (Access::RequiresAuth, GuardState::AuthenticatedNoProfile) => {
            match bootstrap(state).await {
                Ok(()) => Navigation::Allow,
                Err(e) => {
                    warn!(error = %e, "profile bootstrap failed, logging out");
                    state.logout();
                    Navigation::Redirect(Route::Login)
                }
            }
        }
    }
}

/// Resolve identity, user record and settings for the current session.
async fn bootstrap<T, P>(state: &mut AppState<T, P>) -> Result<(), BootstrapError>
where
    T: Transport,
    P: IdentityProvider,
{
    let token = state
        .session
        .token()
        .cloned()
        .ok_or(BootstrapError::SignedOut)?;
    let identity = state
        .identity
        .load(&token)
        .await?
        .ok_or(BootstrapError::SignedOut)?;

    state.user.fetch_user_data(&state.api, &identity).await?;
    let user_id = state.user.user_id().cloned().ok_or(UserError::NotLoaded)?;
    state
        .settings
        .fetch(&state.api, &state.session, &user_id)
        .await?;
    info!(user_id = %user_id, "profile loaded");

    // The plan only decorates the profile; failing to load it is not fatal.
    if state.user.plan().is_none()
        && let Err(e) = state
            .user
            .confirm_subscription(&state.api, &state.plans)
            .await
    {
        warn!(error = %e, "plan unavailable");
    }

    Ok(())
}
