use core::fmt;

use crate::filter::FilterExpr;

pub const EOQ: char = '\0';

/// One step of a path query, as produced by the lexer.
///
/// A token stream is flat. Bracket groups are classified while scanning, so
/// `$.items[1:3]` lexes to `[Root, Property("items"), Slice { .. }]` with no
/// intermediate punctuation tokens.
#[derive(Debug, PartialEq, Clone)]
pub enum PathToken {
    Root,
    Property(String),
    Index(usize),
    Wildcard,
    RecursiveDescent,
    /// `None` when the filter body failed to parse; such a filter selects
    /// nothing at evaluation time.
    Filter(Option<FilterExpr>),
    Slice {
        start: Option<isize>,
        end: Option<isize>,
        step: Option<isize>,
    },
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Root => f.write_str("'$'"),
            PathToken::Property(name) => write!(f, "'{}'", name),
            PathToken::Index(index) => write!(f, "[{}]", index),
            PathToken::Wildcard => f.write_str("'*'"),
            PathToken::RecursiveDescent => f.write_str("'..'"),
            PathToken::Filter(Some(expr)) => write!(f, "[?{}]", expr),
            PathToken::Filter(None) => f.write_str("'?'"),
            PathToken::Slice { start, end, step } => {
                f.write_str("[")?;
                if let Some(start) = start {
                    write!(f, "{}", start)?;
                }
                f.write_str(":")?;
                if let Some(end) = end {
                    write!(f, "{}", end)?;
                }
                f.write_str(":")?;
                if let Some(step) = step {
                    write!(f, "{}", step)?;
                }
                f.write_str("]")
            }
        }
    }
}
