//! Brave search suggestion client.
//!
//! Feeds the search box's autocomplete. Requests carry the subscription token
//! in the `X-Subscription-Token` header and are pinned to US results.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::SuggestConfig;

/// Errors that can occur when fetching suggestions.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API key cannot be sent as a header value.
    #[error("invalid API key format")]
    InvalidApiKey,
}

/// Suggestion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestResponse {
    #[serde(rename = "type")]
    pub response_type: String,
    pub query: SuggestQuery,
    pub results: Vec<Suggestion>,
}

/// The query as understood by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestQuery {
    pub original: String,
}

/// A single completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub query: String,
}

/// Brave suggest API client.
#[derive(Clone)]
pub struct SuggestClient {
    client: reqwest::Client,
    url: String,
}

impl SuggestClient {
    /// Create a new suggestion client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP client fails to build.
    pub fn new(config: &SuggestConfig) -> Result<Self, SuggestError> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| SuggestError::InvalidApiKey)?;
        token.set_sensitive(true);
        headers.insert("X-Subscription-Token", token);
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Fetch completions for a partial query.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn suggestions(&self, query: &str) -> Result<SuggestResponse, SuggestError> {
        let response = self
            .client
            .get(&self.url)
            .query(&suggest_params(query))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SuggestError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let suggestions = response.json::<SuggestResponse>().await?;
        debug!(count = suggestions.results.len(), "suggestions received");
        Ok(suggestions)
    }
}

fn suggest_params(query: &str) -> [(&'static str, &str); 3] {
    [("q", query), ("country", "US"), ("rich", "false")]
}
