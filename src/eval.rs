//! Path query evaluation over a value tree.
//!
//! Evaluation consumes one token at a time against a (value, location)
//! pair. A token that does not apply to the current value contributes
//! nothing; absence is an empty node list, never an error. The input value
//! is never mutated and result nodes borrow from it.

use std::cmp;

use serde_json::Value;

use crate::{
    errors::QueryError,
    lexer::tokenize,
    node::{Node, NodeList},
    token::PathToken,
};

/// Tokenize `path` and evaluate it against `root`.
pub fn find<'v>(root: &'v Value, path: &str) -> Result<NodeList<'v>, QueryError> {
    Ok(evaluate(root, &tokenize(path)?))
}

/// Evaluate a token sequence against `root`, in document order.
pub fn evaluate<'v>(root: &'v Value, tokens: &[PathToken]) -> NodeList<'v> {
    let mut results = NodeList::new();
    eval_step(&Node::new_root(root), tokens, &mut results);
    results
}

fn eval_step<'v>(node: &Node<'v>, tokens: &[PathToken], results: &mut NodeList<'v>) {
    let Some((token, rest)) = tokens.split_first() else {
        results.push(node.clone());
        return;
    };

    match token {
        PathToken::Root => eval_step(&Node::new_root(node.value), rest, results),
        PathToken::Property(name) => {
            if let Some(value) = node.value.get(name) {
                eval_step(&node.new_object_member(value, name), rest, results);
            }
        }
        PathToken::Index(index) => {
            if let Some(value) = node.value.get(*index) {
                eval_step(&node.new_array_element(value, *index), rest, results);
            }
        }
        PathToken::Wildcard => match node.value {
            Value::Array(arr) => {
                for (index, value) in arr.iter().enumerate() {
                    eval_step(&node.new_array_element(value, index), rest, results);
                }
            }
            Value::Object(obj) => {
                for (key, value) in obj {
                    eval_step(&node.new_object_member(value, key), rest, results);
                }
            }
            _ => {}
        },
        PathToken::RecursiveDescent => {
            // the node itself, then every child with the descent still in
            // effect, so `$..name` matches at any depth
            eval_step(node, rest, results);
            match node.value {
                Value::Array(arr) => {
                    for (index, value) in arr.iter().enumerate() {
                        eval_step(&node.new_array_element(value, index), tokens, results);
                    }
                }
                Value::Object(obj) => {
                    for (key, value) in obj {
                        eval_step(&node.new_object_member(value, key), tokens, results);
                    }
                }
                _ => {}
            }
        }
        PathToken::Filter(expr) => {
            if let (Some(expr), Value::Array(arr)) = (expr, node.value) {
                for (index, value) in arr.iter().enumerate() {
                    if expr.selects(value) {
                        eval_step(&node.new_array_element(value, index), rest, results);
                    }
                }
            }
        }
        PathToken::Slice { start, end, step } => {
            if let Value::Array(arr) = node.value {
                for (index, value) in slice(arr, *start, *end, *step) {
                    eval_step(&node.new_array_element(value, index), rest, results);
                }
            }
        }
    }
}

/// Select array elements python-style: missing parts fall back to their
/// defaults, out-of-range bounds are clamped, negative bounds count from
/// the end and a zero step selects nothing. Selected elements keep their
/// original indices.
fn slice<'v>(
    array: &'v [Value],
    start: Option<isize>,
    end: Option<isize>,
    step: Option<isize>,
) -> Vec<(usize, &'v Value)> {
    let length = array.len() as isize;
    if length == 0 {
        return Vec::new();
    }

    let step = step.unwrap_or(1);
    if step == 0 {
        return Vec::new();
    }

    let (start, end) = if step > 0 {
        (
            normalize(start.unwrap_or(0), length, 0, length),
            normalize(end.unwrap_or(length), length, 0, length),
        )
    } else {
        (
            normalize(start.unwrap_or(length - 1), length, -1, length - 1),
            normalize(end.unwrap_or(-1 - length), length, -1, length - 1),
        )
    };

    let mut selected = Vec::new();
    if step > 0 {
        let mut i = start;
        while i < end {
            if let Some(value) = array.get(i as usize) {
                selected.push((i as usize, value));
            }
            i += step;
        }
    } else {
        let mut i = start;
        while i > end {
            if let Some(value) = array.get(i as usize) {
                selected.push((i as usize, value));
            }
            i += step;
        }
    }
    selected
}

fn normalize(index: isize, length: isize, lower: isize, upper: isize) -> isize {
    if index < 0 {
        cmp::max(length + index, lower)
    } else {
        cmp::min(index, upper)
    }
}
