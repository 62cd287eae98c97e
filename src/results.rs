//! Search results and aggregate statistics.
//!
//! A [`SearchResult`] borrows its `value` from the searched tree; nothing is
//! copied out of the document. Result and stats types serialize in camelCase
//! for the embedding UI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{node::PathElement, options::SearchMode};

/// The JSON type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

/// Which of a node's facets matched, and where.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    pub in_key: bool,
    pub in_value: bool,
    pub in_path: bool,
    /// Source text of whichever check matched last, in key, value, path
    /// order.
    pub matched_text: Option<String>,
    /// Byte range of the hit inside `matched_text`. Absent for fuzzy
    /// matches, which have no contiguous span.
    pub span: Option<(usize, usize)>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultContext {
    /// `$`-rooted paths of every enclosing node, root first.
    pub ancestors: Vec<String>,
}

/// One matched node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'v> {
    /// Canonical dot/bracket path. Empty at the root.
    pub path: String,
    /// `$`-rooted form of the same path.
    pub json_path: String,
    /// The typed location, one element per step.
    pub segments: Vec<PathElement>,
    /// Last segment as text. Empty at the root.
    pub key: String,
    pub value: &'v Value,
    pub parent_path: Option<String>,
    pub depth: usize,
    pub kind: ValueKind,
    /// Higher is a stronger match.
    pub score: f64,
    pub matches: MatchDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ResultContext>,
}

/// Aggregates over one search invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub total_matches: usize,
    pub matches_by_type: BTreeMap<ValueKind, usize>,
    pub matches_by_depth: BTreeMap<usize, usize>,
    /// Deepest emitted result; 0 when nothing matched.
    pub max_depth: usize,
    pub search_time_ms: f64,
    pub mode: SearchMode,
    /// True when the result limit stopped the traversal early.
    pub truncated: bool,
}

impl SearchStats {
    pub(crate) fn new(mode: SearchMode) -> Self {
        Self {
            total_matches: 0,
            matches_by_type: BTreeMap::new(),
            matches_by_depth: BTreeMap::new(),
            max_depth: 0,
            search_time_ms: 0.0,
            mode,
            truncated: false,
        }
    }

    pub(crate) fn record(&mut self, kind: ValueKind, depth: usize) {
        self.total_matches += 1;
        *self.matches_by_type.entry(kind).or_insert(0) += 1;
        *self.matches_by_depth.entry(depth).or_insert(0) += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

/// Everything one search invocation produces.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome<'v> {
    pub results: Vec<SearchResult<'v>>,
    pub stats: SearchStats,
}
