//! Navigation commands.

use newtab_client::{ClientConfig, Navigation};
use newtab_core::Route;
use tracing::{info, warn};

use super::open;

/// Resolve a navigation to `path` through the staging gate and route guard.
///
/// # Errors
///
/// Returns an error if the path names no page or the state cannot be opened.
pub async fn navigate(config: &ClientConfig, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let requested = Route::from_path(path)?;
    let mut state = open(config)?;

    let navigation = state.navigate(requested).await;
    let rendered = navigation.destination(requested);
    match navigation {
        Navigation::Allow => info!(route = %rendered, "Allowed"),
        Navigation::Redirect(_) => warn!(route = %requested, redirect = %rendered, "Redirected"),
    }
    Ok(())
}

/// Unlock a staging deployment.
///
/// # Errors
///
/// Returns an error if staging mode is off or the password is wrong.
pub fn staging_login(config: &ClientConfig, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let state = open(config)?;
    state.staging().login(password)?;
    info!("Staging access granted");
    Ok(())
}
