//! Subcommand implementations.

use newtab_client::{AppState, ClientConfig, Navigation, StateError};
use newtab_core::Route;
use thiserror::Error;

pub mod navigate;
pub mod search;
pub mod session;

/// Errors raised by the commands themselves.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command needs a signed-in session with a loaded profile.
    #[error("Not signed in (redirected to {0})")]
    NotSignedIn(Route),

    #[error("Unknown search engine: {0}")]
    UnknownEngine(String),

    /// `BRAVE_SUGGEST_URL` / `BRAVE_API_KEY` are not configured.
    #[error("Search suggestions are not configured")]
    SuggestDisabled,
}

fn open(config: &ClientConfig) -> Result<AppState, StateError> {
    AppState::from_config(config)
}

/// Run the guard for an auth-required page so the profile and settings
/// are loaded.
async fn bootstrap(state: &mut AppState) -> Result<(), CommandError> {
    match state.navigate(Route::Settings).await {
        Navigation::Allow => Ok(()),
        Navigation::Redirect(route) => Err(CommandError::NotSignedIn(route)),
    }
}
