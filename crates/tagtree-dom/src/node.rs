use strum_macros::Display;

use crate::{Attribute, COMMENT_TAG, DomError, NodeId, PLACEHOLDER};

/// Shape a node takes when written back out, derived from its child count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NodeKind {
    /// No children: may self-close, or degenerate to open+close around its text.
    OpenClose,
    /// At least one child: must render as a tag pair.
    Open,
}

/// One tagged element of the tree.
///
/// The structural links (`parent`, `children`) are only changed through
/// [`Tree`](crate::Tree), which keeps `child.parent == parent` for every edge.
/// Text and attributes are edited here directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    tag_name: String,
    /// Literal text interleaved with [`PLACEHOLDER`]s.
    text: String,
    attributes: Vec<Attribute>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// Create a detached node with no text, attributes or children.
    ///
    /// # Panics
    ///
    /// Panics if `tag_name` is empty.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        let tag_name = tag_name.into();
        assert!(!tag_name.is_empty(), "node tag name must not be empty");
        Self {
            tag_name,
            text: String::new(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder-style: set the attribute list.
    ///
    /// Later attributes whose name already appeared are dropped so that names
    /// stay unique.
    #[must_use]
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        for attribute in attributes {
            if self.attribute(&attribute.name).is_none() {
                self.attributes.push(attribute);
            }
        }
        self
    }

    /// Builder-style: set the text.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// The node's tag name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Returns true if this node holds a comment region.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.tag_name == COMMENT_TAG
    }

    /// The enclosing node, or `None` for a root or detached node.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's children in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Derived render shape: `Open` once the node has any child.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        if self.children.is_empty() {
            NodeKind::OpenClose
        } else {
            NodeKind::Open
        }
    }

    // ===== Text =====

    /// The raw text, including placeholders.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text split on placeholders.
    ///
    /// There is always one more block than there are placeholders, so a text
    /// with no placeholder yields exactly one (possibly empty) block.
    pub fn text_blocks(&self) -> impl Iterator<Item = &str> {
        self.text.split(PLACEHOLDER)
    }

    /// Number of placeholders in the text.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.text.matches(PLACEHOLDER).count()
    }

    /// Text with the placeholders removed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.text.replace(PLACEHOLDER, "")
    }

    /// Append literal text. Placeholder characters in `text` are dropped.
    pub fn add_text(&mut self, text: &str) {
        self.text.extend(text.chars().filter(|&c| c != PLACEHOLDER));
    }

    /// Replace the text. Placeholder characters in `text` are dropped, so the
    /// node is left with no placeholders at all.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.add_text(text);
    }

    /// Append one placeholder to the text.
    pub fn push_placeholder(&mut self) {
        self.text.push(PLACEHOLDER);
    }

    /// Remove the `n`-th placeholder, joining the blocks on either side.
    /// Returns false if there are not that many placeholders.
    pub(crate) fn remove_placeholder(&mut self, n: usize) -> bool {
        match self.text.match_indices(PLACEHOLDER).nth(n) {
            Some((at, _)) => {
                let _ = self.text.remove(at);
                true
            }
            None => false,
        }
    }

    /// Insert a placeholder right before the `n`-th existing one, or at the
    /// end when there are at most `n` placeholders.
    pub(crate) fn insert_placeholder(&mut self, n: usize) {
        match self.text.match_indices(PLACEHOLDER).nth(n) {
            Some((at, _)) => self.text.insert(at, PLACEHOLDER),
            None => self.text.push(PLACEHOLDER),
        }
    }

    /// Remove every placeholder, keeping the text around them.
    pub(crate) fn strip_placeholders(&mut self) {
        self.text.retain(|c| c != PLACEHOLDER);
    }

    // ===== Attributes =====

    /// The attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Look up an attribute by position.
    #[must_use]
    pub fn attribute_at(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// Append a new attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::DuplicateAttribute`] if an attribute with the same
    /// name already exists; the attribute list is left unchanged.
    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<(), DomError> {
        if self.attribute(&attribute.name).is_some() {
            return Err(DomError::DuplicateAttribute {
                name: attribute.name,
            });
        }
        self.attributes.push(attribute);
        Ok(())
    }

    /// Set an attribute's value in place, appending it if it is not present.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// Change the value of the attribute at `index`.
    /// Returns false if there is no attribute at that position.
    pub fn modify_attribute(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.attributes.get_mut(index) {
            Some(attr) => {
                attr.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Remove the attribute at `index`.
    pub fn remove_attribute(&mut self, index: usize) -> Option<Attribute> {
        (index < self.attributes.len()).then(|| self.attributes.remove(index))
    }

    /// Remove the attribute called `name`.
    pub fn remove_attribute_named(&mut self, name: &str) -> Option<Attribute> {
        let index = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(index))
    }

    /// Remove every attribute.
    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }
}
