//! Query and search engine for parsed JSON documents, built on
//! [`serde_json::Value`] trees with insertion-ordered object keys.
//!
//! Three entry points cover the three jobs:
//!
//! - [`find`] evaluates a `$`-rooted path query and returns the selected
//!   nodes with their locations.
//! - [`search`] traverses a whole document in one of four modes (substring,
//!   regex, fuzzy, or path query) and returns scored results plus
//!   aggregate statistics.
//! - [`prune`] rebuilds a document down to a previous result set and the
//!   containers leading to it.
//!
//! All three are pure functions over borrowed input; nothing is cached
//! between calls and the document is never mutated.
//!
//! ## Searching
//!
//! ```
//! use json_scout::{search, SearchOptions};
//! use serde_json::json;
//!
//! fn main() {
//!     let doc = json!({"users": [{"name": "Ada"}, {"name": "Grace"}]});
//!     let outcome = search(&doc, &SearchOptions::new("ada"));
//!     for result in &outcome.results {
//!         println!("{} = {}", result.json_path, result.value);
//!     }
//! }
//! ```
//!
//! The example above prints one scored match:
//!
//! ```text
//! $.users[0].name = "Ada"
//! ```
//!
//! Matching is case-insensitive by default, and every knob on
//! [`SearchOptions`] (mode, key/value/path targets, type allow-list, depth
//! and result limits) is independently optional.
//!
//! ## Path queries
//!
//! The path dialect is a forgiving JSONPath variant: `$` root, `.name` and
//! `['name']` member access, `[0]` indexes, `.*`/`[*]` wildcards, `..`
//! recursive descent, Python-style `[start:end:step]` slices, and
//! `[?@.prop op literal]` comparison filters. Apart from a missing `$`,
//! malformed input never raises: unrecognized pieces are dropped and the
//! rest of the query still runs.
//!
//! ```
//! use json_scout::{errors::QueryError, find};
//! use serde_json::json;
//!
//! fn main() -> Result<(), QueryError> {
//!     let doc = json!({"items": [10, 20, 30, 40]});
//!     let nodes = find(&doc, "$.items[1:3]")?;
//!
//!     let paths: Vec<String> = nodes.iter().map(|node| node.path()).collect();
//!     assert_eq!(paths, vec!["items[1]", "items[2]"]);
//!     assert_eq!(nodes[0].value, &json!(20));
//!     Ok(())
//! }
//! ```
//!
//! ## Pruning
//!
//! ```
//! use json_scout::{prune, search, SearchOptions};
//! use serde_json::json;
//!
//! fn main() {
//!     let doc = json!({"config": {"debug": true}, "users": [{"name": "Ada"}]});
//!     let outcome = search(&doc, &SearchOptions::new("name").in_values(false));
//!     let filtered = prune(&doc, &outcome.results);
//!     assert_eq!(filtered, json!({"users": [{"name": "Ada"}]}));
//! }
//! ```
pub mod errors;
pub mod eval;
pub mod filter;
pub mod fuzzy;
pub mod lexer;
pub mod matcher;
pub mod node;
pub mod options;
pub mod prune;
pub mod results;
pub mod token;

pub use errors::QueryError;
pub use eval::evaluate;
pub use eval::find;
pub use fuzzy::fuzzy_match;
pub use fuzzy::fuzzy_score;
pub use lexer::tokenize;
pub use matcher::search;
pub use node::Node;
pub use node::NodeList;
pub use node::PathElement;
pub use options::SearchMode;
pub use options::SearchOptions;
pub use prune::prune;
pub use results::MatchDetail;
pub use results::SearchOutcome;
pub use results::SearchResult;
pub use results::SearchStats;
pub use results::ValueKind;
pub use token::PathToken;
