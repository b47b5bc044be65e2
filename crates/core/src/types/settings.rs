//! User preference bag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::search::{self, SearchEngine};

/// Opaque user preferences, fetched once per authenticated session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Map<String, Value>);

impl Settings {
    /// Key holding the preferred search engine name.
    pub const SEARCH_ENGINE_KEY: &'static str = "search_engine";

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The preferred search engine, falling back to the default engine when
    /// the preference is missing or names an unknown engine.
    #[must_use]
    pub fn search_engine(&self) -> &'static SearchEngine {
        self.get(Self::SEARCH_ENGINE_KEY)
            .and_then(Value::as_str)
            .and_then(search::find)
            .unwrap_or_else(search::default_engine)
    }
}
