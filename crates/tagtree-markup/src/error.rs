use thiserror::Error;

/// Errors that stop a parse.
///
/// Malformed markup is never one of them: the builder absorbs it and records
/// a [`ParseIssue`](crate::ParseIssue) instead.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input is empty, or its first tag is not an opening tag.
    #[error("no root tag: the document must start with an opening tag")]
    NoRootTag,
    /// A dialect description could not be read.
    #[error("invalid dialect description: {0}")]
    InvalidDialect(#[from] serde_json::Error),
}
