//! Tag tree implementation for tagtree.
//!
//! This crate provides an arena-based tree of tagged nodes. Every node owns
//! a tag name, an ordered attribute list and a text stream in which
//! [`PLACEHOLDER`] characters mark where its children sit relative to the
//! surrounding text.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and O(depth) ancestor walks without ownership cycles.
//! Removing a node only detaches it: it stays allocated in the arena but is no
//! longer reachable from the root.

mod attribute;
mod error;
mod node;
mod tree;

pub use attribute::Attribute;
pub use error::DomError;
pub use node::{Node, NodeKind};
pub use tree::{AncestorIterator, DescendantIterator, Tree};

/// The in-band marker written into a node's text wherever a child node was
/// positioned.
///
/// U+FFFC OBJECT REPLACEMENT CHARACTER: it stands for an embedded object and
/// never appears in the text of a document worth round-tripping.
pub const PLACEHOLDER: char = '\u{FFFC}';

/// Reserved tag name of the synthetic node that holds a comment region.
pub const COMMENT_TAG: &str = "comment";

/// A type-safe index into the tree arena.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);
