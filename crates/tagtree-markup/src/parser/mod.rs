//! Tree construction: classifying tag tokens and building the tree.

/// Tree builder and the `parse*` entry points.
pub mod builder;
/// Tag classification state machine.
pub mod classifier;

pub use builder::{ParseIssue, TreeBuilder, parse, parse_html, parse_into, parse_xml};
pub use classifier::{ParseMode, TagClassifier, TagShape, TagState};
