use tracing::trace;

use super::helpers::{
    Scanner, is_attribute_name_char, is_attribute_name_start, is_tag_name_char, is_tag_name_start,
};
use super::token::{TagToken, TokenKind};

/// Finds tag-like tokens in a markup string.
///
/// Matching is leftmost-first and non-overlapping. A `<` that does not start
/// one of the recognized shapes is ordinary text, and so is any `-` that does
/// not start `-->`. Quoted attribute values may contain `<`, `>` and
/// newlines without ending the tag.
///
/// The tokenizer is a cheap cursor: clone it to scan ahead, or call
/// [`TagTokenizer::reset`] to start over.
#[derive(Debug, Clone)]
pub struct TagTokenizer<'a> {
    input: &'a str,
    current_pos: usize,
}

impl<'a> TagTokenizer<'a> {
    /// Create a tokenizer positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            current_pos: 0,
        }
    }

    /// The text being tokenized.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Go back to the start of the input.
    pub const fn reset(&mut self) {
        self.current_pos = 0;
    }

    /// Turn this tokenizer into a stream of text and tag segments covering
    /// the rest of the input.
    #[must_use]
    pub const fn segments(self) -> Segments<'a> {
        Segments {
            text_start: self.current_pos,
            tokens: self,
            pending: None,
        }
    }

    /// Try every token shape at byte offset `start`.
    fn match_at(&self, start: usize) -> Option<TagToken<'a>> {
        let mut scanner = Scanner::new(self.input, start);

        if scanner.consume_str("<!--") {
            return Some(self.token(TokenKind::CommentStart, "", start, scanner.pos()));
        }
        if scanner.consume_str("-->") {
            return Some(self.token(TokenKind::CommentEnd, "", start, scanner.pos()));
        }
        if !scanner.consume_if('<') {
            return None;
        }

        if scanner.consume_if('/') {
            let name = scanner.consume_name(is_tag_name_start, is_tag_name_char)?;
            let _ = scanner.skip_whitespace();
            return scanner
                .consume_if('>')
                .then(|| self.token(TokenKind::Close, name, start, scanner.pos()));
        }

        let name = scanner.consume_name(is_tag_name_start, is_tag_name_char)?;
        loop {
            let skipped = scanner.skip_whitespace();
            if scanner.consume_if('>') {
                return Some(self.token(TokenKind::Open, name, start, scanner.pos()));
            }
            if scanner.consume_str("/>") {
                return Some(self.token(TokenKind::SelfClosing, name, start, scanner.pos()));
            }
            // Attributes must be separated from what precedes them.
            if skipped == 0 {
                return None;
            }
            skip_attribute(&mut scanner)?;
        }
    }

    fn token(&self, kind: TokenKind, name: &'a str, start: usize, end: usize) -> TagToken<'a> {
        TagToken {
            kind,
            name,
            raw: &self.input[start..end],
            start,
            end,
        }
    }
}

/// Consume `name` or `name ws? = ws? "value"` (either quote character).
///
/// Returns `None` if the attribute is malformed, which means the enclosing
/// `<` does not start a tag.
fn skip_attribute(scanner: &mut Scanner<'_>) -> Option<()> {
    let _ = scanner.consume_name(is_attribute_name_start, is_attribute_name_char)?;
    let before_value = scanner.pos();
    let _ = scanner.skip_whitespace();
    if !scanner.consume_if('=') {
        scanner.rewind(before_value);
        return Some(());
    }
    let _ = scanner.skip_whitespace();
    let quote = scanner.consume().filter(|c| matches!(c, '"' | '\''))?;
    scanner.consume_until(quote).map(|_| ())
}

impl<'a> Iterator for TagTokenizer<'a> {
    type Item = TagToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_pos < self.input.len() {
            let Some(offset) = self.input[self.current_pos..].find(['<', '-']) else {
                self.current_pos = self.input.len();
                return None;
            };
            let start = self.current_pos + offset;
            if let Some(token) = self.match_at(start) {
                trace!(kind = %token.kind, name = token.name, start, "tag token");
                self.current_pos = token.end;
                return Some(token);
            }
            // Both triggers are single-byte ASCII.
            self.current_pos = start + 1;
        }
        None
    }
}

/// A piece of the document: either gap text or a tag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Non-empty text between two tokens (or before the first / after the last).
    Text(&'a str),
    /// A tag-like token.
    Tag(TagToken<'a>),
}

/// Iterator over the text and tag segments of a document, in order.
///
/// Concatenating the source text of every segment gives back the input.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    tokens: TagTokenizer<'a>,
    text_start: usize,
    pending: Option<TagToken<'a>>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            self.text_start = token.end;
            return Some(Segment::Tag(token));
        }
        let input = self.tokens.input();
        match self.tokens.next() {
            Some(token) if token.start > self.text_start => {
                let text = &input[self.text_start..token.start];
                self.pending = Some(token);
                Some(Segment::Text(text))
            }
            Some(token) => {
                self.text_start = token.end;
                Some(Segment::Tag(token))
            }
            None if self.text_start < input.len() => {
                let text = &input[self.text_start..];
                self.text_start = input.len();
                Some(Segment::Text(text))
            }
            None => None,
        }
    }
}
