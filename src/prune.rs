//! Rebuild a tree containing only matched nodes and their ancestors.
//!
//! The pruned tree answers the same paths as the original: a surviving
//! array element keeps its index, with `null` standing in for dropped
//! elements before it. Elements after the last survivor are cut.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::{
    node::{json_path, PathElement},
    results::SearchResult,
};

/// Keep every result node and the chain of containers leading to it.
///
/// A result node is kept verbatim, matched containers included: nothing
/// inside a matched container is pruned. Containers left with no surviving
/// descendant are dropped rather than kept empty. With no results at all
/// the original tree comes back unchanged.
pub fn prune(root: &Value, results: &[SearchResult<'_>]) -> Value {
    if results.is_empty() {
        return root.clone();
    }

    let mut included = HashSet::new();
    let mut matched = HashSet::new();
    for result in results {
        for end in 0..=result.segments.len() {
            included.insert(json_path(&result.segments[..end]));
        }
        matched.insert(result.json_path.clone());
    }

    let mut location = Vec::new();
    prune_value(root, &mut location, &included, &matched).unwrap_or_else(|| empty_like(root))
}

fn prune_value(
    value: &Value,
    location: &mut Vec<PathElement>,
    included: &HashSet<String>,
    matched: &HashSet<String>,
) -> Option<Value> {
    let path = json_path(location);
    if !included.contains(&path) {
        return None;
    }
    if matched.contains(&path) {
        return Some(value.clone());
    }

    match value {
        Value::Object(entries) => {
            let mut pruned = Map::new();
            for (key, child) in entries {
                location.push(PathElement::Key(key.clone()));
                let kept = prune_value(child, location, included, matched);
                location.pop();
                if let Some(kept) = kept {
                    pruned.insert(key.clone(), kept);
                }
            }
            (!pruned.is_empty()).then_some(Value::Object(pruned))
        }
        Value::Array(elements) => {
            let mut pruned: Vec<Value> = Vec::new();
            for (index, child) in elements.iter().enumerate() {
                location.push(PathElement::Index(index));
                let kept = prune_value(child, location, included, matched);
                location.pop();
                if let Some(kept) = kept {
                    while pruned.len() < index {
                        pruned.push(Value::Null);
                    }
                    pruned.push(kept);
                }
            }
            (!pruned.is_empty()).then_some(Value::Array(pruned))
        }
        scalar => Some(scalar.clone()),
    }
}

fn empty_like(root: &Value) -> Value {
    match root {
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(_) => Value::Object(Map::new()),
        scalar => scalar.clone(),
    }
}
