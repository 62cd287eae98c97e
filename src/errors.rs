use thiserror::Error;

/// Errors produced while turning a path query into tokens. Absence of a
/// match is never an error.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("invalid path syntax: {msg} ({index})")]
    InvalidPathSyntax { msg: String, index: usize },
}

impl QueryError {
    pub fn syntax(msg: impl Into<String>, index: usize) -> Self {
        Self::InvalidPathSyntax {
            msg: msg.into(),
            index,
        }
    }
}
