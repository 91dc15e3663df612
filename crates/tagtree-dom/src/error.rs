use thiserror::Error;

/// Errors surfaced by the tree mutation API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// An attribute with this name already exists on the node.
    ///
    /// Recoverable: use [`Node::set_attribute`](crate::Node::set_attribute)
    /// or [`Node::modify_attribute`](crate::Node::modify_attribute) to change
    /// the existing value instead.
    #[error("attribute `{name}` already exists; modify the existing attribute instead")]
    DuplicateAttribute {
        /// The name that was already present.
        name: String,
    },
}
