//! Search commands.

use newtab_client::ClientConfig;
use newtab_client::services::suggest::SuggestClient;
use newtab_core::search::{self, SEARCH_ENGINES};
use newtab_core::{SearchEngine, Settings};
use tracing::{debug, info};

use super::{CommandError, bootstrap, open};

/// List the built-in engines; the first is the default.
pub fn engines() {
    for engine in SEARCH_ENGINES {
        info!(name = engine.name, icon = engine.icon, url = engine.url, "Engine");
    }
}

/// Build the search URL for `query`.
///
/// Without an explicit engine, a signed-in user's preference is used, falling
/// back to the default engine.
///
/// # Errors
///
/// Returns an error if the named engine does not exist.
pub async fn search(
    config: &ClientConfig,
    query: &str,
    engine: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = match engine {
        Some(name) => {
            search::find(name).ok_or_else(|| CommandError::UnknownEngine(name.to_owned()))?
        }
        None => preferred_engine(config).await,
    };

    info!(engine = engine.name, url = %engine.query_url(query), "Search");
    Ok(())
}

async fn preferred_engine(config: &ClientConfig) -> &'static SearchEngine {
    let Ok(mut state) = open(config) else {
        return search::default_engine();
    };
    if !state.session().is_authenticated() {
        return search::default_engine();
    }
    if let Err(e) = bootstrap(&mut state).await {
        debug!(error = %e, "Using default engine");
        return search::default_engine();
    }
    state
        .settings()
        .settings()
        .map_or_else(search::default_engine, Settings::search_engine)
}

/// Fetch suggestions for a partial query.
///
/// # Errors
///
/// Returns an error if suggestions are not configured or the request fails.
pub async fn suggest(config: &ClientConfig, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let suggest = config.suggest.as_ref().ok_or(CommandError::SuggestDisabled)?;
    let client = SuggestClient::new(suggest)?;

    let response = client.suggestions(query).await?;
    for suggestion in response.results {
        info!(query = %suggestion.query, "Suggestion");
    }
    Ok(())
}
