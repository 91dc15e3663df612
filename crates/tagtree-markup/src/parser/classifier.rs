use strum_macros::Display;
use tagtree_dom::{NodeId, Tree};

use crate::Dialect;
use crate::tokenizer::{TagToken, TokenKind};

/// Where the token loop currently is.
///
/// Inside a comment or raw-text region every token except the region's
/// terminator is [`TagState::Useless`] and stays part of the text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Display)]
pub enum ParseMode {
    /// Tags build the tree.
    #[default]
    Normal,
    /// Between `<!--` (or an open comment tag) and its terminator.
    InComment,
    /// Inside a raw-text element, until `</tag_name>`.
    InRawText {
        /// Name of the element whose close tag ends the region.
        tag_name: String,
    },
}

/// What a token means in context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TagState {
    /// Changes nothing: a stray close tag, or any tag inside an opaque region.
    Useless,
    /// Opens a child of the cursor and descends into it.
    Open,
    /// Adds a childless child to the cursor.
    OpenClose,
    /// Closes `target`, which is the cursor or one of its ancestors.
    Close {
        /// The element being closed.
        target: NodeId,
    },
    /// Opens a comment region.
    CommentOpen,
    /// Ends the comment region.
    CommentClose,
    /// Opens a raw-text element.
    RawTextOpen,
    /// Ends the raw-text element.
    RawTextClose,
}

/// The three-way form of a [`TagState`] used to decide where gap text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TagShape {
    /// Descends into a new node.
    Open,
    /// Adds a node without descending.
    OpenClose,
    /// Leaves a node.
    Close,
}

impl TagState {
    /// Collapse the comment and raw-text states onto plain open and close.
    /// Returns `None` for [`TagState::Useless`].
    #[must_use]
    pub const fn shape(self) -> Option<TagShape> {
        match self {
            Self::Useless => None,
            Self::Open | Self::CommentOpen | Self::RawTextOpen => Some(TagShape::Open),
            Self::OpenClose => Some(TagShape::OpenClose),
            Self::Close { .. } | Self::CommentClose | Self::RawTextClose => Some(TagShape::Close),
        }
    }
}

/// Decides the [`TagState`] of each token and moves between parse modes.
#[derive(Debug, Clone, Copy)]
pub struct TagClassifier<'d> {
    dialect: &'d Dialect,
}

impl<'d> TagClassifier<'d> {
    /// Create a classifier for `dialect`.
    #[must_use]
    pub const fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }

    /// Classify `token` given the parse `mode` and the builder's `cursor`.
    ///
    /// `mode` is updated when the token enters or leaves a comment or
    /// raw-text region. The tree is only read, to resolve close tags against
    /// the cursor and its ancestors.
    pub fn classify(
        &self,
        token: &TagToken<'_>,
        mode: &mut ParseMode,
        cursor: NodeId,
        tree: &Tree,
    ) -> TagState {
        let state = match &*mode {
            ParseMode::Normal => self.classify_normal(token, cursor, tree),
            ParseMode::InComment => {
                let ends_comment = token.kind == TokenKind::CommentEnd
                    || (token.kind == TokenKind::Close && self.dialect.is_comment(token.name));
                if ends_comment {
                    TagState::CommentClose
                } else {
                    TagState::Useless
                }
            }
            ParseMode::InRawText { tag_name } => {
                if token.kind == TokenKind::Close && token.name == tag_name.as_str() {
                    TagState::RawTextClose
                } else {
                    TagState::Useless
                }
            }
        };

        match state {
            TagState::CommentOpen => *mode = ParseMode::InComment,
            TagState::RawTextOpen => {
                *mode = ParseMode::InRawText {
                    tag_name: token.name.to_string(),
                };
            }
            TagState::CommentClose | TagState::RawTextClose => *mode = ParseMode::Normal,
            _ => {}
        }
        state
    }

    /// The mode a document enters when its root element is `token`.
    #[must_use]
    pub fn mode_for_root(&self, token: &TagToken<'_>) -> ParseMode {
        if token.kind != TokenKind::Open {
            ParseMode::Normal
        } else if self.dialect.is_comment(token.name) {
            ParseMode::InComment
        } else if self.dialect.is_raw_text(token.name) {
            ParseMode::InRawText {
                tag_name: token.name.to_string(),
            }
        } else {
            ParseMode::Normal
        }
    }

    fn classify_normal(&self, token: &TagToken<'_>, cursor: NodeId, tree: &Tree) -> TagState {
        match token.kind {
            TokenKind::SelfClosing => TagState::OpenClose,
            TokenKind::CommentStart => TagState::CommentOpen,
            TokenKind::CommentEnd => TagState::Useless,
            TokenKind::Open if self.dialect.is_comment(token.name) => TagState::CommentOpen,
            TokenKind::Open if self.dialect.is_raw_text(token.name) => TagState::RawTextOpen,
            TokenKind::Open if self.dialect.is_void(token.name) => TagState::OpenClose,
            TokenKind::Open => TagState::Open,
            TokenKind::Close => find_open_element(token.name, cursor, tree)
                .map_or(TagState::Useless, |target| TagState::Close { target }),
        }
    }
}

/// Walk from `cursor` up to the root and return the first node named `name`.
fn find_open_element(name: &str, cursor: NodeId, tree: &Tree) -> Option<NodeId> {
    std::iter::once(cursor)
        .chain(tree.ancestors(cursor))
        .find(|&id| tree[id].tag_name() == name)
}
