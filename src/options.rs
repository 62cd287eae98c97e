//! Search configuration.
//!
//! Options round-trip through camelCase JSON so an embedding UI can persist
//! them as-is. Every field except the query itself has a default, and the
//! chainable setters cover the common case of tweaking one or two of them.

use serde::{Deserialize, Serialize};

use crate::results::ValueKind;

/// How the query string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Simple,
    Regex,
    Fuzzy,
    JsonPath,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub query: String,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_true")]
    pub search_in_keys: bool,
    #[serde(default = "default_true")]
    pub search_in_values: bool,
    #[serde(default)]
    pub search_in_paths: bool,
    /// Restrict results to these value types. Accepts a single type name or
    /// an array of them.
    #[serde(default, deserialize_with = "one_or_many")]
    pub search_by_type: Option<Vec<ValueKind>>,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default)]
    pub include_ancestors: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_true() -> bool {
    true
}

fn default_fuzzy_threshold() -> f64 {
    0.6
}

fn default_limit() -> usize {
    1000
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode: SearchMode::default(),
            case_sensitive: false,
            search_in_keys: true,
            search_in_values: true,
            search_in_paths: false,
            search_by_type: None,
            max_depth: None,
            fuzzy_threshold: default_fuzzy_threshold(),
            include_ancestors: false,
            limit: default_limit(),
        }
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn in_keys(mut self, yes: bool) -> Self {
        self.search_in_keys = yes;
        self
    }

    pub fn in_values(mut self, yes: bool) -> Self {
        self.search_in_values = yes;
        self
    }

    pub fn in_paths(mut self, yes: bool) -> Self {
        self.search_in_paths = yes;
        self
    }

    pub fn by_type(mut self, kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        self.search_by_type = Some(kinds.into_iter().collect());
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    pub fn include_ancestors(mut self, yes: bool) -> Self {
        self.include_ancestors = yes;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<ValueKind>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ValueKind),
        Many(Vec<ValueKind>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => None,
        Some(OneOrMany::One(kind)) => Some(vec![kind]),
        Some(OneOrMany::Many(kinds)) => Some(kinds),
    })
}
