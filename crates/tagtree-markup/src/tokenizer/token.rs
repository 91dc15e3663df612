use std::ops::Range;

use strum_macros::Display;

/// The shape of a tag-like token, as written in the source.
///
/// This is purely syntactic. What a token means depends on the parse mode
/// and is decided by the [`TagClassifier`](crate::TagClassifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    /// `<name ...>`
    Open,
    /// `<name .../>`
    SelfClosing,
    /// `</name>`
    Close,
    /// `<!--`
    CommentStart,
    /// `-->`
    CommentEnd,
}

/// One tag-like token borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagToken<'a> {
    /// Syntactic shape.
    pub kind: TokenKind,
    /// Tag name; empty for the comment markers.
    pub name: &'a str,
    /// The whole token text, brackets included.
    pub raw: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the last character.
    pub end: usize,
}

impl TagToken<'_> {
    /// Byte range of the token in the source.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns true for `<!--` and `-->`.
    #[must_use]
    pub const fn is_comment_marker(&self) -> bool {
        matches!(self.kind, TokenKind::CommentStart | TokenKind::CommentEnd)
    }
}
