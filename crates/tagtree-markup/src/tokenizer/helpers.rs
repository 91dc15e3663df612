//! Byte cursor shared by the tag matcher and the attribute extractor.
//!
//! All the characters these grammars care about are ASCII, so the cursor
//! steps over bytes for them and over whole characters everywhere else. It
//! never splits a UTF-8 sequence.

/// A forward-only cursor into a string slice.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Start scanning `input` at byte offset `pos`.
    #[must_use]
    pub const fn new(input: &'a str, pos: usize) -> Self {
        Self { input, pos }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Move back to an earlier offset obtained from [`Scanner::pos`].
    pub const fn rewind(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// The input from the current position onwards.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Returns true once every character has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Look at the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// "Consume the next input character"
    pub fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `expected` if it is the next character.
    pub fn consume_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Returns true if the remaining input starts with `target`.
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.rest().starts_with(target)
    }

    /// Consume `target` if the remaining input starts with it.
    pub fn consume_str(&mut self, target: &str) -> bool {
        if self.next_few_characters_are(target) {
            self.pos += target.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds and return them.
    pub fn consume_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    /// Skip whitespace and return how many bytes were skipped.
    pub fn skip_whitespace(&mut self) -> usize {
        self.consume_while(char::is_whitespace).len()
    }

    /// Consume everything up to the next `terminator` and the terminator
    /// itself, returning the text before it.
    ///
    /// If `terminator` never appears nothing is consumed and `None` is
    /// returned.
    pub fn consume_until(&mut self, terminator: char) -> Option<&'a str> {
        let rest = self.rest();
        let offset = rest.find(terminator)?;
        self.pos += offset + terminator.len_utf8();
        Some(&rest[..offset])
    }

    /// Consume a name: one character accepted by `first`, then any run of
    /// characters accepted by `rest`. Returns `None` without consuming
    /// anything if the first character does not fit.
    pub fn consume_name(
        &mut self,
        first: impl Fn(char) -> bool,
        rest: impl Fn(char) -> bool,
    ) -> Option<&'a str> {
        let start = self.pos;
        if !self.peek().is_some_and(first) {
            return None;
        }
        let _ = self.consume();
        let _ = self.consume_while(rest);
        Some(&self.input[start..self.pos])
    }
}

/// First character of a tag name.
#[must_use]
pub const fn is_tag_name_start(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Any later character of a tag name.
#[must_use]
pub const fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '.' | '-')
}

/// First character of an attribute name.
#[must_use]
pub const fn is_attribute_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | ':' | '@')
}

/// Any later character of an attribute name.
#[must_use]
pub const fn is_attribute_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '.' | '@' | '-')
}
