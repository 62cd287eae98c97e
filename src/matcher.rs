//! The match engine: one depth-first traversal per call, one active mode.
//!
//! Traversal visits object entries in key-insertion order and array elements
//! in index order. A node can match through its key, its string value, or
//! its `$`-rooted path; scores from those checks accumulate. Results come
//! back sorted by descending score with ties in traversal order.
//!
//! Query problems never escape this module: an unparseable path query or an
//! invalid regex pattern degrades to zero matches and a log event.

use std::time::Instant;

use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    eval::find,
    fuzzy::fuzzy_match,
    node::{ancestor_paths, canonical_path, Node, PathElement},
    options::{SearchMode, SearchOptions},
    results::{MatchDetail, ResultContext, SearchOutcome, SearchResult, SearchStats, ValueKind},
};

/// Search `root` according to `options`. The primary entry point.
pub fn search<'v>(root: &'v Value, options: &SearchOptions) -> SearchOutcome<'v> {
    let started = Instant::now();

    let mut outcome = match options.mode {
        SearchMode::JsonPath => search_json_path(root, options),
        _ => search_tree(root, options),
    };

    outcome.stats.search_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    outcome
}

fn search_json_path<'v>(root: &'v Value, options: &SearchOptions) -> SearchOutcome<'v> {
    let mut stats = SearchStats::new(options.mode);
    let mut results = Vec::new();

    match find(root, &options.query) {
        Ok(nodes) => {
            for node in &nodes {
                if results.len() >= options.limit {
                    stats.truncated = true;
                    break;
                }
                let matches = MatchDetail {
                    in_path: true,
                    matched_text: Some(node.json_path()),
                    ..MatchDetail::default()
                };
                let result = build_result(node, 1.0, matches, options.include_ancestors);
                stats.record(result.kind, result.depth);
                results.push(result);
            }
        }
        Err(error) => {
            warn!("invalid path query, returning no results: {}", error);
        }
    }

    SearchOutcome { results, stats }
}

fn search_tree<'v>(root: &'v Value, options: &SearchOptions) -> SearchOutcome<'v> {
    let needle = if options.case_sensitive {
        options.query.clone()
    } else {
        fold(&options.query)
    };

    let regex = match options.mode {
        SearchMode::Regex => compile_regex(options),
        _ => None,
    };

    let mut traversal = Traversal {
        options,
        needle,
        regex,
        results: Vec::new(),
        stats: SearchStats::new(options.mode),
    };
    traversal.walk(&Node::new_root(root));

    let Traversal {
        mut results, stats, ..
    } = traversal;

    // stable, so equal scores keep traversal order
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    SearchOutcome { results, stats }
}

fn compile_regex(options: &SearchOptions) -> Option<Regex> {
    match RegexBuilder::new(&options.query)
        .case_insensitive(!options.case_sensitive)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(error) => {
            debug!("invalid regex pattern, treating as non-match: {}", error);
            None
        }
    }
}

struct Traversal<'v, 'o> {
    options: &'o SearchOptions,
    /// Case-normalized query for the simple and fuzzy modes.
    needle: String,
    /// Compiled once per call; `None` in regex mode means the pattern was
    /// invalid and nothing matches.
    regex: Option<Regex>,
    results: Vec<SearchResult<'v>>,
    stats: SearchStats,
}

impl<'v> Traversal<'v, '_> {
    /// Returns false once the result limit stops the traversal.
    fn walk(&mut self, node: &Node<'v>) -> bool {
        if self.results.len() >= self.options.limit {
            self.stats.truncated = true;
            return false;
        }

        self.visit(node);

        if let Some(max) = self.options.max_depth {
            if node.location.len() >= max {
                return true;
            }
        }

        match node.value {
            Value::Object(obj) => {
                for (key, value) in obj {
                    if !self.walk(&node.new_object_member(value, key)) {
                        return false;
                    }
                }
            }
            Value::Array(arr) => {
                for (index, value) in arr.iter().enumerate() {
                    if !self.walk(&node.new_array_element(value, index)) {
                        return false;
                    }
                }
            }
            _ => {}
        }
        true
    }

    fn visit(&mut self, node: &Node<'v>) {
        // an excluded type keeps its subtree; it just contributes no result
        if let Some(kinds) = &self.options.search_by_type {
            if !kinds.contains(&ValueKind::of(node.value)) {
                return;
            }
        }

        let mut matches = MatchDetail::default();
        let mut score = 0.0;

        if self.options.search_in_keys {
            if let Some(element) = node.location.last() {
                let key = element.as_key();
                if let Some((hit, span)) = self.match_value(&key) {
                    matches.in_key = true;
                    matches.matched_text = Some(key);
                    matches.span = span;
                    score += hit;
                }
            }
        }

        if self.options.search_in_values {
            if let Value::String(text) = node.value {
                if let Some((hit, span)) = self.match_value(text) {
                    matches.in_value = true;
                    matches.matched_text = Some(text.clone());
                    matches.span = span;
                    score += hit;
                }
            }
        }

        if self.options.search_in_paths {
            let path = node.json_path();
            if let Some((hit, span)) = self.match_value(&path) {
                matches.in_path = true;
                matches.matched_text = Some(path);
                matches.span = span;
                score += hit;
            }
        }

        if matches.in_key || matches.in_value || matches.in_path {
            let result = build_result(node, score, matches, self.options.include_ancestors);
            self.stats.record(result.kind, result.depth);
            self.results.push(result);
        }
    }

    /// One mode-specific comparison. `Some((score, span))` on a hit; the
    /// span is a byte range into the checked text where one exists.
    fn match_value(&self, text: &str) -> Option<(f64, Option<(usize, usize)>)> {
        match self.options.mode {
            SearchMode::Simple => {
                let span = if self.options.case_sensitive {
                    text.find(&self.needle)
                        .map(|start| (start, start + self.needle.len()))
                } else {
                    find_folded(text, &self.needle)
                };
                span.map(|span| (1.0, Some(span)))
            }
            SearchMode::Regex => self
                .regex
                .as_ref()
                .and_then(|regex| regex.find(text))
                .map(|m| (1.0, Some((m.start(), m.end())))),
            SearchMode::Fuzzy => {
                let haystack = self.normalize(text);
                fuzzy_match(&haystack, &self.needle, self.options.fuzzy_threshold)
                    .then_some((0.8, None))
            }
            // handled by search_json_path, never by traversal
            SearchMode::JsonPath => None,
        }
    }

    fn normalize(&self, text: &str) -> String {
        if self.options.case_sensitive {
            text.to_string()
        } else {
            fold(text)
        }
    }
}

fn build_result<'v>(
    node: &Node<'v>,
    score: f64,
    matches: MatchDetail,
    include_ancestors: bool,
) -> SearchResult<'v> {
    let depth = node.location.len();
    let parent_path = if depth == 0 {
        None
    } else {
        Some(canonical_path(&node.location[..depth - 1]))
    };
    let key = node
        .location
        .last()
        .map(PathElement::as_key)
        .unwrap_or_default();
    let context = include_ancestors.then(|| ResultContext {
        ancestors: ancestor_paths(&node.location),
    });

    SearchResult {
        path: node.path(),
        json_path: node.json_path(),
        segments: node.location.clone(),
        key,
        value: node.value,
        parent_path,
        depth,
        kind: ValueKind::of(node.value),
        score,
        matches,
        context,
    }
}

/// Lowercases char by char. `str::to_lowercase` applies a context rule to
/// final sigma, so the same char can fold differently by position; folding
/// per char keeps needle and haystack comparable and the offsets mappable.
fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive substring search. The returned range indexes `text`
/// itself, not the folded copy: a fold can change byte lengths (`İ` becomes
/// `i` plus a combining dot), so each folded byte is traced back to the
/// source char it came from. `needle` must already be folded.
fn find_folded(text: &str, needle: &str) -> Option<(usize, usize)> {
    let mut folded = String::with_capacity(text.len());
    let mut source = Vec::with_capacity(text.len());
    for (offset, ch) in text.char_indices() {
        let span = (offset, offset + ch.len_utf8());
        for low in ch.to_lowercase() {
            for _ in 0..low.len_utf8() {
                source.push(span);
            }
            folded.push(low);
        }
    }

    let start = folded.find(needle)?;
    if needle.is_empty() {
        return Some((0, 0));
    }
    let end = start + needle.len();
    Some((source[start].0, source[end - 1].1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn simple_mode_is_case_insensitive_by_default() {
        let value = json!({"name": "Ada"});
        let outcome = search(&value, &SearchOptions::new("Name"));
        assert_eq!(outcome.results.len(), 1);
        let result = &outcome.results[0];
        assert_eq!(result.path, "name");
        assert!(result.matches.in_key);
        assert!(!result.matches.in_value);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.matches.matched_text.as_deref(), Some("name"));
        assert_eq!(result.matches.span, Some((0, 4)));
    }

    #[test]
    fn case_sensitive_simple_mode() {
        let value = json!({"name": "Ada"});
        let outcome = search(&value, &SearchOptions::new("Name").case_sensitive(true));
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.stats.total_matches, 0);
    }

    #[test]
    fn simple_span_indexes_the_source_text_across_case_folds() {
        // "İd" is 3 bytes but its lowercase form is 4; the span must stay
        // valid inside `matched_text`, not the folded copy
        let value = json!({"İd": 1});
        let outcome = search(&value, &SearchOptions::new("D"));
        assert_eq!(outcome.results.len(), 1);
        let matches = &outcome.results[0].matches;
        assert_eq!(matches.matched_text.as_deref(), Some("İd"));
        assert_eq!(matches.span, Some((2, 3)));
        assert_eq!(&"İd"[2..3], "d");
    }

    #[test]
    fn simple_span_widens_to_the_char_a_fold_expanded() {
        let value = json!({"İd": 1});
        let outcome = search(&value, &SearchOptions::new("i"));
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].matches.span, Some((0, 2)));
        assert_eq!(&"İd"[0..2], "İ");
    }

    #[test]
    fn find_folded_edge_cases() {
        assert_eq!(find_folded("İd", ""), Some((0, 0)));
        assert_eq!(find_folded("value", "zz"), None);
        // ẞ shrinks from 3 bytes to 2 when folded
        assert_eq!(find_folded("ẞd", "ß"), Some((0, 3)));
        assert_eq!(find_folded("ẞd", "d"), Some((3, 4)));
    }

    #[test]
    fn values_match_only_strings() {
        let value = json!({"a": 42, "b": "42"});
        let outcome = search(&value, &SearchOptions::new("42").in_keys(false));
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].path, "b");
        assert!(outcome.results[0].matches.in_value);
    }

    #[test]
    fn array_indices_match_as_keys() {
        let value = json!({"items": ["a", "b"]});
        let outcome = search(&value, &SearchOptions::new("1").in_values(false));
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].path, "items[1]");
        assert!(outcome.results[0].matches.in_key);
        assert_eq!(outcome.results[0].key, "1");
    }

    #[test]
    fn key_and_value_hits_accumulate_and_sort_first() {
        let value = json!({"id": "an id", "other": "id too"});
        let outcome = search(&value, &SearchOptions::new("id"));
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].path, "id");
        assert_eq!(outcome.results[0].score, 2.0);
        assert_eq!(outcome.results[1].path, "other");
        assert_eq!(outcome.results[1].score, 1.0);
        // value was checked after the key
        assert_eq!(
            outcome.results[0].matches.matched_text.as_deref(),
            Some("an id")
        );
    }

    #[test]
    fn equal_scores_keep_traversal_order() {
        let value = json!({"b_name": 1, "a_name": 2, "c_name": 3});
        let outcome = search(&value, &SearchOptions::new("name").in_values(false));
        let paths: Vec<&str> = outcome.results.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["b_name", "a_name", "c_name"]);
    }

    #[test]
    fn regex_mode_matches_patterns() {
        let value = json!({"id": 1, "uuid": 2});
        let options = SearchOptions::new("^id$")
            .mode(SearchMode::Regex)
            .in_values(false);
        let outcome = search(&value, &options);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].path, "id");
        assert_eq!(outcome.results[0].matches.span, Some((0, 2)));
    }

    #[test]
    fn invalid_regex_degrades_to_no_matches() {
        let value = json!({"id": 1});
        let options = SearchOptions::new("(unclosed").mode(SearchMode::Regex);
        let outcome = search(&value, &options);
        assert!(outcome.results.is_empty());
        assert!(!outcome.stats.truncated);
    }

    #[test]
    fn fuzzy_mode_scores_hits_at_point_eight() {
        let value = json!({"configuration": true});
        let options = SearchOptions::new("cfg")
            .mode(SearchMode::Fuzzy)
            .in_values(false);
        let outcome = search(&value, &options);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].score, 0.8);
        assert_eq!(outcome.results[0].matches.span, None);
    }

    #[test]
    fn path_matching_uses_the_rooted_form() {
        let value = json!({"users": [{"name": "ada"}]});
        let options = SearchOptions::new("users[0]")
            .in_keys(false)
            .in_values(false)
            .in_paths(true);
        let outcome = search(&value, &options);
        let paths: Vec<&str> = outcome
            .results
            .iter()
            .map(|r| r.json_path.as_str())
            .collect();
        assert_eq!(paths, vec!["$.users[0]", "$.users[0].name"]);
        assert!(outcome.results.iter().all(|r| r.matches.in_path));
    }

    #[test]
    fn type_filter_prunes_results_not_subtrees() {
        let value = json!({"outer": {"name": "x", "count": 7}});
        let options = SearchOptions::new("count")
            .in_values(false)
            .by_type([ValueKind::Number]);
        let outcome = search(&value, &options);
        // "outer" is an object and excluded, but its children were visited
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].path, "outer.count");
        assert_eq!(outcome.results[0].kind, ValueKind::Number);
    }

    #[test]
    fn max_depth_stops_recursion() {
        let value = json!({"name": {"name": {"name": 1}}});
        let options = SearchOptions::new("name").in_values(false).max_depth(2);
        let outcome = search(&value, &options);
        let paths: Vec<&str> = outcome.results.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "name.name"]);
    }

    #[test]
    fn limit_truncates_and_reports_it() {
        let value = json!({"a": "hit", "b": "hit", "c": "hit"});
        let options = SearchOptions::new("hit").limit(2);
        let outcome = search(&value, &options);
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.stats.truncated);
    }

    #[test]
    fn exact_limit_without_remaining_nodes_is_not_truncated() {
        let value = json!({"a": "hit", "b": "hit"});
        let options = SearchOptions::new("hit").limit(2);
        let outcome = search(&value, &options);
        assert_eq!(outcome.results.len(), 2);
        assert!(!outcome.stats.truncated);
    }

    #[test]
    fn json_path_mode_wraps_evaluator_nodes() {
        let value = json!({"users": [{"name": "ada"}, {"name": "grace"}]});
        let options = SearchOptions::new("$.users[*].name").mode(SearchMode::JsonPath);
        let outcome = search(&value, &options);
        assert_eq!(outcome.results.len(), 2);
        let first = &outcome.results[0];
        assert_eq!(first.json_path, "$.users[0].name");
        assert_eq!(first.score, 1.0);
        assert!(first.matches.in_path);
        assert!(!first.matches.in_key);
        assert_eq!(first.matches.matched_text.as_deref(), Some("$.users[0].name"));
        assert_eq!(outcome.stats.total_matches, 2);
    }

    #[test]
    fn json_path_mode_swallows_syntax_errors() {
        let value = json!({"users": []});
        let options = SearchOptions::new("users").mode(SearchMode::JsonPath);
        let outcome = search(&value, &options);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.stats.total_matches, 0);
    }

    #[test]
    fn ancestors_are_included_on_request() {
        let value = json!({"users": [{"name": "ada"}]});
        let options = SearchOptions::new("name")
            .in_values(false)
            .include_ancestors(true);
        let outcome = search(&value, &options);
        assert_eq!(outcome.results.len(), 1);
        let context = outcome.results[0].context.as_ref().unwrap();
        assert_eq!(context.ancestors, vec!["$", "$.users", "$.users[0]"]);
    }

    #[test]
    fn root_string_value_matches_at_depth_zero() {
        let value = json!("hello");
        let outcome = search(&value, &SearchOptions::new("hello"));
        assert_eq!(outcome.results.len(), 1);
        let result = &outcome.results[0];
        assert_eq!(result.depth, 0);
        assert_eq!(result.key, "");
        assert_eq!(result.parent_path, None);
        assert_eq!(result.path, "");
    }

    #[test]
    fn stats_aggregate_per_emitted_result() {
        let value = json!({"name": "ada", "names": {"name": 1}});
        let outcome = search(&value, &SearchOptions::new("name").in_values(false));
        assert_eq!(outcome.stats.total_matches, 3);
        assert_eq!(outcome.stats.matches_by_type[&ValueKind::String], 1);
        assert_eq!(outcome.stats.matches_by_type[&ValueKind::Object], 1);
        assert_eq!(outcome.stats.matches_by_type[&ValueKind::Number], 1);
        assert_eq!(outcome.stats.matches_by_depth[&1], 2);
        assert_eq!(outcome.stats.matches_by_depth[&2], 1);
        assert_eq!(outcome.stats.max_depth, 2);
        assert_eq!(outcome.stats.mode, SearchMode::Simple);
    }
}
