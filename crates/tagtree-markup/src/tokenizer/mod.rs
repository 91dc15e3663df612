//! Tag tokenizer module.
//!
//! Scans a flat markup string for tag-like boundaries: open tags, close
//! tags, self-closing tags and the bare comment markers `<!--` / `-->`.
//! Everything between two tokens is gap text, which [`Segments`] exposes
//! alongside the tokens.

/// Low-level cursor over the input used by the matchers.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;
/// The leftmost-first tag matcher.
pub mod tag_tokenizer;

pub use tag_tokenizer::{Segment, Segments, TagTokenizer};
pub use token::{TagToken, TokenKind};
