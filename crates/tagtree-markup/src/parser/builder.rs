//! Tree construction.
//!
//! The builder walks the token stream once. For every token that is not
//! [`TagState::Useless`] it applies the structural change (attach a child,
//! move the cursor) and then hands the text between the previous token and
//! this one to a node:
//!
//! | current shape | gap text goes to                 | placeholder |
//! |---------------|----------------------------------|-------------|
//! | `Open`        | the node the new child joined    | yes         |
//! | `OpenClose`   | the cursor                       | yes         |
//! | `Close`       | the node that was just closed    | no          |
//!
//! Mismatched close tags are resolved by walking up from the cursor; a close
//! tag that matches nothing is dropped. Nothing in the markup itself can make
//! a parse fail once a root tag has been found.

use tagtree_dom::{Node, NodeId, Tree};
use tracing::{debug, trace};

use super::classifier::{ParseMode, TagClassifier, TagShape, TagState};
use crate::tokenizer::{TagToken, TagTokenizer, TokenKind};
use crate::{Dialect, ParseError, extract_attributes};

/// A recoverable problem found while building the tree.
///
/// Issues never stop a parse; they are collected for callers that want to
/// report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index of the token being processed, counting the root tag as 0.
    pub token_index: usize,
    /// True when the markup was malformed, false when the builder merely
    /// applied a dialect rule or dropped insignificant input.
    pub is_error: bool,
}

/// Everything that changes while one document is parsed.
#[derive(Debug)]
struct ParseContext {
    mode: ParseMode,
    /// Node new children attach to.
    cursor: NodeId,
    /// Last node left by a close.
    previous_closed: NodeId,
    last_shape: TagShape,
    /// Byte offset just past the last token that was not skipped.
    start_index: usize,
    /// Text seen before a dropped stray close tag, waiting for the next gap.
    carried_text: String,
}

/// Builds a [`Tree`] from markup text.
///
/// A builder is used for exactly one document; all parse state lives in the
/// call to [`TreeBuilder::run`] and nothing is shared between parses.
#[derive(Debug)]
pub struct TreeBuilder<'a, 'd> {
    input: &'a str,
    dialect: &'d Dialect,
    issues: Vec<ParseIssue>,
    token_index: usize,
}

impl<'a, 'd> TreeBuilder<'a, 'd> {
    /// Create a builder for `input` under `dialect`.
    #[must_use]
    pub const fn new(input: &'a str, dialect: &'d Dialect) -> Self {
        Self {
            input,
            dialect,
            issues: Vec::new(),
            token_index: 0,
        }
    }

    /// Build the tree, discarding parse issues.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoRootTag`] if the input has no tag at all or its
    /// first tag is not an opening or self-closing element tag.
    pub fn run(self) -> Result<Tree, ParseError> {
        self.run_with_issues().map(|(tree, _)| tree)
    }

    /// Build the tree and return it together with every issue found.
    ///
    /// # Errors
    ///
    /// Same as [`TreeBuilder::run`].
    pub fn run_with_issues(mut self) -> Result<(Tree, Vec<ParseIssue>), ParseError> {
        let input = self.input;
        let classifier = TagClassifier::new(self.dialect);
        let mut tokens = TagTokenizer::new(input);

        let root_token = tokens.next().ok_or(ParseError::NoRootTag)?;
        if !matches!(root_token.kind, TokenKind::Open | TokenKind::SelfClosing) {
            return Err(ParseError::NoRootTag);
        }
        if !input[..root_token.start].trim().is_empty() {
            self.record(false, "discarded text before the root tag".to_string());
        }

        let mut tree = Tree::with_root(self.element_for(&root_token));
        let root = tree.root();
        let mut ctx = ParseContext {
            mode: classifier.mode_for_root(&root_token),
            cursor: root,
            previous_closed: root,
            last_shape: TagShape::Open,
            start_index: root_token.end,
            carried_text: String::new(),
        };

        for token in tokens {
            self.token_index += 1;
            self.process_token(&classifier, &token, &mut ctx, &mut tree);
        }
        self.finish(ctx, &mut tree);
        Ok((tree, self.issues))
    }

    fn process_token(
        &mut self,
        classifier: &TagClassifier<'_>,
        token: &TagToken<'_>,
        ctx: &mut ParseContext,
        tree: &mut Tree,
    ) {
        let input = self.input;
        let state = classifier.classify(token, &mut ctx.mode, ctx.cursor, tree);
        trace!(
            index = self.token_index,
            token = token.raw,
            %state,
            last = %ctx.last_shape,
            "classified tag"
        );

        let Some(shape) = state.shape() else {
            // Inside opaque regions useless tokens stay in the text; outside
            // them a stray close tag is dropped altogether.
            if ctx.mode == ParseMode::Normal && token.kind == TokenKind::Close {
                debug!(name = token.name, "ignoring stray closing tag");
                self.record(true, format!("ignored stray closing tag </{}>", token.name));
                ctx.carried_text.push_str(&input[ctx.start_index..token.start]);
                ctx.start_index = token.end;
            }
            return;
        };

        let mut gap = std::mem::take(&mut ctx.carried_text);
        gap.push_str(&input[ctx.start_index..token.start]);

        let destination = self.apply(state, token, ctx, tree);
        let node = &mut tree[destination];
        node.add_text(&gap);
        if shape != TagShape::Close {
            node.push_placeholder();
        }

        ctx.start_index = token.end;
        ctx.last_shape = shape;
    }

    /// Make the structural change for `state` and return the node that
    /// receives the gap text.
    fn apply(
        &mut self,
        state: TagState,
        token: &TagToken<'_>,
        ctx: &mut ParseContext,
        tree: &mut Tree,
    ) -> NodeId {
        match state {
            TagState::Open | TagState::CommentOpen | TagState::RawTextOpen => {
                self.apply_implied_ends(token.name, ctx, tree);
                let parent = ctx.cursor;
                let child = tree.alloc(self.element_for(token));
                tree.append_child(parent, child);
                ctx.cursor = child;
                parent
            }
            TagState::OpenClose => {
                self.apply_implied_ends(token.name, ctx, tree);
                let child = tree.alloc(self.element_for(token));
                tree.append_child(ctx.cursor, child);
                ctx.cursor
            }
            TagState::Close { target } => {
                ctx.previous_closed = ctx.cursor;
                if target != ctx.cursor {
                    let skipped = tree.depth(ctx.cursor) - tree.depth(target);
                    debug!(name = token.name, skipped, "recovering from mismatched closing tag");
                    self.record(
                        true,
                        format!(
                            "</{}> implicitly closed {skipped} unclosed element(s)",
                            token.name
                        ),
                    );
                }
                ctx.cursor = tree.parent(target).unwrap_or(target);
                ctx.previous_closed
            }
            TagState::CommentClose | TagState::RawTextClose => {
                ctx.previous_closed = ctx.cursor;
                ctx.cursor = tree.parent(ctx.cursor).unwrap_or(ctx.cursor);
                ctx.previous_closed
            }
            TagState::Useless => ctx.cursor,
        }
    }

    /// Leave every cursor element that opening `opener` implicitly ends.
    fn apply_implied_ends(&mut self, opener: &str, ctx: &mut ParseContext, tree: &Tree) {
        while self.dialect.implies_end_of(opener, tree[ctx.cursor].tag_name()) {
            let Some(parent) = tree.parent(ctx.cursor) else {
                break;
            };
            let closed = tree[ctx.cursor].tag_name();
            debug!(opener, closed, "implied end tag");
            self.record(false, format!("<{opener}> implicitly closed <{closed}>"));
            ctx.previous_closed = ctx.cursor;
            ctx.cursor = parent;
        }
    }

    /// Attach trailing text and note anything left open.
    fn finish(&mut self, ctx: ParseContext, tree: &mut Tree) {
        let mut trailing = ctx.carried_text;
        trailing.push_str(&self.input[ctx.start_index..]);
        if !trailing.trim().is_empty() {
            tree[ctx.cursor].add_text(&trailing);
        }

        match &ctx.mode {
            ParseMode::Normal => {}
            ParseMode::InComment => {
                self.record(true, "comment not terminated before end of input".to_string());
            }
            ParseMode::InRawText { tag_name } => {
                self.record(true, format!("<{tag_name}> not closed before end of input"));
            }
        }
        let open = tree.depth(ctx.cursor);
        if open > 0 {
            self.record(false, format!("{open} element(s) left unclosed at end of input"));
        }
        debug_assert_eq!(tree.root_of(ctx.cursor), tree.root());
    }

    /// The detached node a token creates.
    fn element_for(&self, token: &TagToken<'_>) -> Node {
        if token.kind == TokenKind::CommentStart {
            return Node::new(self.dialect.comment_name());
        }
        Node::new(token.name).with_attributes(extract_attributes(token.raw))
    }

    fn record(&mut self, is_error: bool, message: String) {
        self.issues.push(ParseIssue {
            message,
            token_index: self.token_index,
            is_error,
        });
    }
}

/// Parse `input` under `dialect`.
///
/// # Errors
///
/// Returns [`ParseError::NoRootTag`] if the input does not start with an
/// opening tag.
pub fn parse(input: &str, dialect: &Dialect) -> Result<Tree, ParseError> {
    TreeBuilder::new(input, dialect).run()
}

/// Parse `input` as loose HTML.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_html(input: &str) -> Result<Tree, ParseError> {
    parse(input, &Dialect::html())
}

/// Parse `input` as XML.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_xml(input: &str) -> Result<Tree, ParseError> {
    parse(input, &Dialect::xml())
}

/// Parse `input` as a fragment and add its root as the last child of
/// `parent` in `tree`. Returns the fragment root's ID in `tree`.
///
/// # Errors
///
/// See [`parse`]. On error `tree` is left unchanged.
///
/// # Panics
///
/// Panics if `parent` is not in `tree`.
pub fn parse_into(
    tree: &mut Tree,
    parent: NodeId,
    input: &str,
    dialect: &Dialect,
) -> Result<NodeId, ParseError> {
    let fragment = parse(input, dialect)?;
    Ok(tree.graft(parent, fragment))
}
