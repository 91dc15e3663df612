//! Markup tokenizer, tree builder and serializer for tagtree.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tag Tokenizer** - finds open, close, self-closing and comment-marker
//!   tokens in a flat string; everything between them is gap text
//! - **Attribute Extractor** - turns one tag token into an ordered,
//!   name-unique attribute list
//! - **Tag Classifier** - decides what a token means in the current parse
//!   mode (normal, inside a comment, inside a raw-text element)
//! - **Tree Builder** - drives the token loop, recovers from mismatched close
//!   tags by walking up the ancestors, and attributes gap text to nodes
//! - **Serializer** - writes a tree back out as indented markup
//!
//! Parsing is permissive: stray close tags, malformed attributes and
//! unmatched angle brackets are absorbed, never reported as failures. The only
//! parse failure is a document that does not start with an opening tag.
//!
//! # Not Implemented
//!
//! - DOCTYPE, namespaces, encodings and entity references
//! - Streaming or incremental input

/// Error types.
pub mod error;
/// Attribute extraction from a single tag token.
pub mod attributes;
/// Dialect configuration tables (void, non-void, raw-text names).
pub mod dialect;
/// Tag classification and tree construction.
pub mod parser;
/// Tree-to-markup serialization.
pub mod serializer;
/// Tag tokenizer.
pub mod tokenizer;

pub use attributes::{extract_attributes, tag_name};
pub use dialect::Dialect;
pub use error::ParseError;
pub use parser::{
    ParseIssue, ParseMode, TagClassifier, TagShape, TagState, TreeBuilder, parse, parse_html,
    parse_into, parse_xml,
};
pub use serializer::{DEFAULT_INDENT, Serializer, hierarchy, normalize_text, to_markup};
pub use tokenizer::{Segment, Segments, TagToken, TagTokenizer, TokenKind};
