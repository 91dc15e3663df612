//! Tree-to-markup serialization.
//!
//! Every tag goes on its own line, indented one unit per depth. Text is
//! normalized on the way out: each line is trimmed, blank lines are dropped
//! and what remains is re-indented one level below its element. Parsing the
//! output again gives a tree with the same names, attributes, child order and
//! (whitespace-normalized) text.

use std::fmt::Write as _;

use tagtree_dom::{Node, NodeId, Tree};

use crate::Dialect;

/// Indentation unit used unless [`Serializer::with_indent`] says otherwise.
pub const DEFAULT_INDENT: &str = "\t";

/// Indentation unit of [`hierarchy`].
const HIERARCHY_INDENT: &str = "   ";

/// Writes a tree back out as markup.
#[derive(Debug, Clone)]
pub struct Serializer<'d> {
    dialect: &'d Dialect,
    indent: String,
}

impl<'d> Serializer<'d> {
    /// Create a serializer that indents with [`DEFAULT_INDENT`].
    #[must_use]
    pub fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            indent: DEFAULT_INDENT.to_string(),
        }
    }

    /// Builder-style: use `unit` for each level of indentation.
    #[must_use]
    pub fn with_indent(mut self, unit: impl Into<String>) -> Self {
        self.indent = unit.into();
        self
    }

    /// Serialize the whole tree.
    #[must_use]
    pub fn serialize(&self, tree: &Tree) -> String {
        self.serialize_node(tree, tree.root(), 0)
    }

    /// Serialize the subtree at `id` as if it sat `depth` levels deep.
    #[must_use]
    pub fn serialize_node(&self, tree: &Tree, id: NodeId, depth: usize) -> String {
        let mut out = String::new();
        self.write_node(tree, id, depth, &mut out);
        out
    }

    /// `<name attr="value">`, or `<!--` for a comment node.
    #[must_use]
    pub fn open_tag(&self, node: &Node) -> String {
        if self.is_comment(node) {
            return "<!--".to_string();
        }
        format!("<{}{}>", node.tag_name(), render_attributes(node))
    }

    /// `</name>`, or `-->` for a comment node.
    #[must_use]
    pub fn close_tag(&self, node: &Node) -> String {
        if self.is_comment(node) {
            return "-->".to_string();
        }
        format!("</{}>", node.tag_name())
    }

    /// The form of a node with no children and no text.
    ///
    /// Non-void names get an empty open+close pair, everything else is
    /// self-closed.
    #[must_use]
    pub fn empty_tag(&self, node: &Node) -> String {
        if self.is_comment(node) {
            return "<!---->".to_string();
        }
        if self.dialect.is_non_void(node.tag_name()) {
            format!("{}{}", self.open_tag(node), self.close_tag(node))
        } else {
            format!("<{}{}/>", node.tag_name(), render_attributes(node))
        }
    }

    fn is_comment(&self, node: &Node) -> bool {
        self.dialect.is_comment(node.tag_name())
    }

    fn write_node(&self, tree: &Tree, id: NodeId, depth: usize, out: &mut String) {
        let node = &tree[id];
        let children = tree.children(id);

        if children.is_empty() {
            // Any placeholders left without a child are simply dropped.
            let body: String = node.text_blocks().collect();
            if body.trim().is_empty() {
                self.write_line(out, depth, &self.empty_tag(node));
            } else {
                self.write_line(out, depth, &self.open_tag(node));
                out.push_str(&normalize_text(&body, depth + 1, &self.indent));
                self.write_line(out, depth, &self.close_tag(node));
            }
            return;
        }

        self.write_line(out, depth, &self.open_tag(node));

        let blocks: Vec<&str> = node.text_blocks().collect();
        let paired = blocks.len().min(children.len());
        for (block, &child) in blocks.iter().zip(children) {
            out.push_str(&normalize_text(block, depth + 1, &self.indent));
            self.write_node(tree, child, depth + 1, out);
        }
        // More children than blocks: the rest follow with no text before them.
        for &child in &children[paired..] {
            self.write_node(tree, child, depth + 1, out);
        }
        // More blocks than children: the rest become trailing text.
        let trailing: String = blocks[paired..].concat();
        out.push_str(&normalize_text(&trailing, depth + 1, &self.indent));

        self.write_line(out, depth, &self.close_tag(node));
    }

    fn write_line(&self, out: &mut String, depth: usize, line: &str) {
        for _ in 0..depth {
            out.push_str(&self.indent);
        }
        out.push_str(line.trim());
        out.push('\n');
    }
}

/// Serialize `tree` under `dialect` with the default indentation.
#[must_use]
pub fn to_markup(tree: &Tree, dialect: &Dialect) -> String {
    Serializer::new(dialect).serialize(tree)
}

/// Trim every line of `text`, drop the blank ones and indent the rest by
/// `depth` copies of `unit`. Each kept line ends with a newline.
#[must_use]
pub fn normalize_text(text: &str, depth: usize, unit: &str) -> String {
    let prefix = unit.repeat(depth);
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .fold(String::new(), |mut out, line| {
            let _ = writeln!(out, "{prefix}{line}");
            out
        })
}

/// Debugging view of the element structure below `id`: one open tag per
/// line, its children indented three spaces deeper, then its close tag.
/// Text is left out.
#[must_use]
pub fn hierarchy(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    write_hierarchy(tree, id, 0, &mut out);
    out
}

fn write_hierarchy(tree: &Tree, id: NodeId, depth: usize, out: &mut String) {
    let node = &tree[id];
    let prefix = HIERARCHY_INDENT.repeat(depth);
    if node.is_comment() {
        let _ = writeln!(out, "{prefix}<!--");
    } else {
        let _ = writeln!(out, "{prefix}<{}{}>", node.tag_name(), render_attributes(node));
    }
    for &child in tree.children(id) {
        write_hierarchy(tree, child, depth + 1, out);
    }
    if node.is_comment() {
        let _ = writeln!(out, "{prefix}-->");
    } else {
        let _ = writeln!(out, "{prefix}</{}>", node.tag_name());
    }
}

/// ` name="value"` for every attribute, in order.
///
/// Values that contain `"` but no `'` are single-quoted. A value with both
/// has its `"` written as `&quot;`.
fn render_attributes(node: &Node) -> String {
    let mut out = String::new();
    for attribute in node.attributes() {
        let value = &attribute.value;
        if value.contains('"') && !value.contains('\'') {
            let _ = write!(out, " {}='{value}'", attribute.name);
        } else {
            let _ = write!(out, " {}=\"{}\"", attribute.name, value.replace('"', "&quot;"));
        }
    }
    out
}
