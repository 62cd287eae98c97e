//! Values paired with their location in the tree.
//!
//! A location is the sequence of object keys and array indices leading from
//! the root to a value. Locations render in two forms: a canonical
//! dot/bracket form (`users[0].name`, empty at the root) and a `$`-rooted
//! form (`$.users[0].name`). Keys that are not identifier-shaped are
//! bracket-quoted in both forms, so `a.b` the key never reads like `a.b`
//! the path.

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

lazy_static! {
    static ref IDENT: Regex =
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern");
}

pub type NodeList<'v> = Vec<Node<'v>>;

/// An array element index or object member key in a node's location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathElement {
    Index(usize),
    Key(String),
}

impl PathElement {
    /// The element as displayed in a result's `key` field.
    pub fn as_key(&self) -> String {
        match self {
            PathElement::Index(i) => i.to_string(),
            PathElement::Key(k) => k.clone(),
        }
    }

    fn render(&self, first: bool) -> String {
        match self {
            PathElement::Index(i) => format!("[{}]", i),
            PathElement::Key(k) if IDENT.is_match(k) => {
                if first {
                    k.clone()
                } else {
                    format!(".{}", k)
                }
            }
            PathElement::Key(k) => format!("['{}']", k),
        }
    }
}

/// A value and where it lives.
#[derive(Debug, Clone)]
pub struct Node<'v> {
    pub value: &'v Value,
    pub location: Vec<PathElement>,
}

impl<'v> Node<'v> {
    pub fn new_root(value: &'v Value) -> Self {
        Node {
            value,
            location: Vec::new(),
        }
    }

    pub fn new_object_member(&self, value: &'v Value, key: &str) -> Self {
        let mut location = self.location.clone();
        location.push(PathElement::Key(key.to_string()));
        Node { value, location }
    }

    pub fn new_array_element(&self, value: &'v Value, index: usize) -> Self {
        let mut location = self.location.clone();
        location.push(PathElement::Index(index));
        Node { value, location }
    }

    /// Canonical dot/bracket path. Empty at the root.
    pub fn path(&self) -> String {
        canonical_path(&self.location)
    }

    /// `$`-rooted path.
    pub fn json_path(&self) -> String {
        json_path(&self.location)
    }
}

pub fn canonical_path(location: &[PathElement]) -> String {
    location
        .iter()
        .enumerate()
        .map(|(i, element)| element.render(i == 0))
        .join("")
}

pub fn json_path(location: &[PathElement]) -> String {
    format!(
        "${}",
        location.iter().map(|element| element.render(false)).join("")
    )
}

/// `$`-rooted paths of every enclosing node, root first. Empty for the root
/// itself.
pub fn ancestor_paths(location: &[PathElement]) -> Vec<String> {
    (0..location.len())
        .map(|end| json_path(&location[..end]))
        .collect()
}
