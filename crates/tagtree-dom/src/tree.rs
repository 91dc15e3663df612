use std::ops::{Index, IndexMut};

use crate::{Node, NodeId};

/// Arena-based tag tree with O(1) node access.
///
/// All nodes live in one contiguous vector and refer to each other by
/// [`NodeId`]. This provides:
/// - O(1) access to any node by `NodeId`
/// - O(depth) ancestor walks through the stored parent index
/// - No ownership cycles (indices instead of references)
///
/// Two families of structural mutation exist:
/// - [`Tree::append_child`] only links nodes; the tree builder uses it and
///   writes placeholders itself.
/// - [`Tree::add_child`], [`Tree::insert_child`], [`Tree::remove_child`] and
///   [`Tree::clear_children`] also keep the parent's placeholders in step
///   with its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    /// All nodes ever allocated, indexed by `NodeId`.
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding a single root node named `root_tag`.
    ///
    /// # Panics
    ///
    /// Panics if `root_tag` is empty.
    #[must_use]
    pub fn new(root_tag: &str) -> Self {
        Self::with_root(Node::new(root_tag))
    }

    /// Create a tree whose root is `root`.
    ///
    /// Any structural links already present on `root` are discarded.
    #[must_use]
    pub fn with_root(mut root: Node) -> Self {
        root.parent = None;
        root.children.clear();
        root.strip_placeholders();
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes allocated in the arena, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        node.strip_placeholders();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Allocate a detached node named `tag_name`.
    ///
    /// # Panics
    ///
    /// Panics if `tag_name` is empty.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(Node::new(tag_name))
    }

    // ===== Navigation =====

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Get the child at `index`.
    #[must_use]
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Follow parent links from `id` to the node that has no parent.
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Number of ancestors between `id` and its root.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over `id` and everything below it in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: vec![id],
        }
    }

    /// First node named `tag_name` at or below the root, in document order.
    #[must_use]
    pub fn find_by_tag_name(&self, tag_name: &str) -> Option<NodeId> {
        self.descendants(self.root).find(|&id| self[id].tag_name() == tag_name)
    }

    // ===== Structural mutation =====

    /// Appends `child` as the last child of `parent` without touching the
    /// parent's text.
    ///
    /// If `child` is attached elsewhere it is detached first. This is the raw
    /// link used while building a tree; editing code normally wants
    /// [`Tree::add_child`].
    ///
    /// # Panics
    ///
    /// Panics if either ID is not in this tree, if `child` is the root, or if
    /// `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.check_attachable(parent, child);
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Appends `child` to `parent` and writes a matching placeholder at the
    /// end of the parent's text.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Tree::append_child`].
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.append_child(parent, child);
        self.nodes[parent.0].push_placeholder();
    }

    /// Inserts `child` at position `index` among `parent`'s children, with a
    /// placeholder inserted before the `index`-th existing one.
    ///
    /// An `index` past the end appends.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Tree::append_child`].
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.check_attachable(parent, child);
        self.detach(child);
        let node = &mut self.nodes[parent.0];
        let index = index.min(node.children.len());
        node.children.insert(index, child);
        node.insert_placeholder(index);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detaches the child at `index` and returns it.
    ///
    /// The `index`-th placeholder of the parent's text is removed and the text
    /// blocks on either side are joined. If the parent's text has already
    /// drifted to fewer placeholders than that, the text is left alone.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let node = self.nodes.get_mut(parent.0)?;
        if index >= node.children.len() {
            return None;
        }
        let child = node.children.remove(index);
        let _ = node.remove_placeholder(index);
        self.nodes[child.0].parent = None;
        Some(child)
    }

    /// Detaches every child of `parent` and strips its placeholders.
    /// Returns the detached children in their former order.
    pub fn clear_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get_mut(parent.0) else {
            return Vec::new();
        };
        let children = std::mem::take(&mut node.children);
        node.strip_placeholders();
        for &child in &children {
            self.nodes[child.0].parent = None;
        }
        children
    }

    /// Restores "one placeholder per child" on `id`.
    ///
    /// Missing placeholders are appended at the end of the text; surplus
    /// placeholders are removed from the end, keeping the text around them.
    pub fn normalize_placeholders(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        let wanted = node.children.len();
        let mut present = node.placeholder_count();
        while present < wanted {
            node.push_placeholder();
            present += 1;
        }
        while present > wanted {
            present -= 1;
            let _ = node.remove_placeholder(present);
        }
    }

    /// Moves every node of `other` into this arena and adds its root as the
    /// last child of `parent`. Returns the new ID of `other`'s root.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in this tree.
    pub fn graft(&mut self, parent: NodeId, other: Self) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "unknown parent {parent:?}");
        let offset = self.nodes.len();
        let shift = |id: NodeId| NodeId(id.0 + offset);
        let grafted_root = shift(other.root);
        self.nodes.extend(other.nodes.into_iter().map(|mut node| {
            node.parent = node.parent.map(shift);
            for child in &mut node.children {
                *child = shift(*child);
            }
            node
        }));
        self.add_child(parent, grafted_root);
        grafted_root
    }

    /// Unlink `id` from its current parent, if any, dropping the matching
    /// placeholder.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        if let Some(index) = self.nodes[parent.0].children.iter().position(|&c| c == id) {
            let _ = self.remove_child(parent, index);
        }
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) {
        assert!(parent.0 < self.nodes.len(), "unknown parent {parent:?}");
        assert!(child.0 < self.nodes.len(), "unknown child {child:?}");
        assert!(child != self.root, "the root cannot become a child");
        assert!(
            parent != child && !self.is_descendant_of(parent, child),
            "attaching {child:?} under {parent:?} would create a cycle"
        );
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantIterator<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
