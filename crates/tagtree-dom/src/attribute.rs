/// A `(name, value)` pair on a node.
///
/// Bare attributes (`<input disabled>`) carry an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// Attribute name, unique within one node.
    pub name: String,
    /// Attribute value with surrounding quotes removed.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true if the attribute has no value.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.value.is_empty()
    }
}
