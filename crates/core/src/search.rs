//! Built-in search engines offered on the new tab page.

use serde::Serialize;

/// A search engine entry: display icon, name and query URL prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchEngine {
    /// Icon identifier (`mdi-*` font icon or a static asset path).
    pub icon: &'static str,
    pub name: &'static str,
    /// Query URL prefix; the encoded query is appended verbatim.
    pub url: &'static str,
}

impl SearchEngine {
    /// Build the search URL for a free-text query.
    #[must_use]
    pub fn query_url(&self, query: &str) -> String {
        format!("{}{}", self.url, urlencoding::encode(query))
    }
}

/// Engines in display order. The first one is the default.
pub const SEARCH_ENGINES: &[SearchEngine] = &[
    SearchEngine {
        icon: "mdi-google",
        name: "Google",
        url: "https://www.google.com/search?q=",
    },
    SearchEngine {
        icon: "mdi-microsoft-bing",
        name: "Bing",
        url: "https://www.bing.com/search?q=",
    },
    SearchEngine {
        icon: "icons/perplexity.png",
        name: "Perplexity",
        url: "https://www.perplexity.ai/search?q=",
    },
];

/// Find an engine by name, ignoring ASCII case.
#[must_use]
pub fn find(name: &str) -> Option<&'static SearchEngine> {
    SEARCH_ENGINES
        .iter()
        .find(|engine| engine.name.eq_ignore_ascii_case(name))
}

/// The default engine (first in the table).
#[must_use]
#[allow(clippy::indexing_slicing)] // SEARCH_ENGINES is a non-empty constant
pub const fn default_engine() -> &'static SearchEngine {
    &SEARCH_ENGINES[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("perplexity").map(|e| e.name), Some("Perplexity"));
        assert!(find("duckduckgo").is_none());
    }

    #[test]
    fn test_query_url_encodes_query() {
        let bing = find("bing").map(|e| e.query_url("rust async & traits"));
        assert_eq!(
            bing.as_deref(),
            Some("https://www.bing.com/search?q=rust%20async%20%26%20traits")
        );
    }

    #[test]
    fn test_default_engine_is_google() {
        assert_eq!(default_engine().name, "Google");
    }
}
