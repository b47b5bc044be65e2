//! Session commands.
//!
//! The session token is persisted under `NEWTAB_STORAGE_PATH`, so each
//! invocation resumes where the previous one left off.

use newtab_client::{ClientConfig, Credentials};
use tracing::info;

use super::{bootstrap, open};

/// Sign in with email and password.
///
/// # Errors
///
/// Returns an error if the email is invalid, the credentials are rejected,
/// or the session cannot be persisted.
pub async fn login(
    config: &ClientConfig,
    email: &str,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Credentials::new(email, password)?;
    let mut state = open(config)?;

    let session = state.login(&credentials).await?;
    info!(user_id = %session.user.id, email = %session.user.email, "Signed in");
    info!(app_url = %state.auth().app_url(), "Continue in the app");
    Ok(())
}

/// Create an account and sign in.
///
/// # Errors
///
/// Returns an error if the email is invalid, the account exists, or the
/// session cannot be persisted.
pub async fn register(
    config: &ClientConfig,
    email: &str,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Credentials::new(email, password)?;
    let mut state = open(config)?;

    let session = state.register(&credentials).await?;
    info!(user_id = %session.user.id, email = %session.user.email, "Account created");
    info!(app_url = %state.auth().app_url(), "Continue in the app");
    Ok(())
}

/// Sign out.
///
/// # Errors
///
/// Returns an error if the persisted session cannot be opened.
pub fn logout(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = open(config)?;
    state.logout();
    info!("Signed out");
    Ok(())
}

/// Show the signed-in user's profile, bootstrapping it if needed.
///
/// # Errors
///
/// Returns an error if there is no signed-in session.
pub async fn whoami(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = open(config)?;
    bootstrap(&mut state).await?;

    let profile = state.user().profile();
    info!(
        user_id = ?profile.user_id.as_ref().map(ToString::to_string),
        email = ?profile.email.as_ref().map(ToString::to_string),
        name = ?profile.display_name(),
        plan = ?profile.plan.as_ref().map(|plan| plan.plan_id.to_string()),
        "Signed-in user"
    );
    Ok(())
}

/// List the signed-in user's quick-links.
///
/// # Errors
///
/// Returns an error if there is no signed-in session or the fetch fails.
pub async fn links(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = open(config)?;
    bootstrap(&mut state).await?;

    let links = state.links().await?;
    if links.is_empty() {
        info!("No quick-links");
    }
    for link in links {
        info!(title = %link.title, url = %link.url, "Link");
    }
    Ok(())
}
