//! Per-dialect name tables.
//!
//! HTML-flavoured and XML-flavoured markup go through the same tokenizer,
//! classifier, builder and serializer; they differ only in the tables held
//! by a [`Dialect`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tagtree_dom::COMMENT_TAG;

use crate::ParseError;

/// HTML names that never take a body.
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// HTML names written as an empty open+close pair rather than self-closed.
const HTML_NON_VOID_ELEMENTS: &[&str] = &[
    "a", "div", "iframe", "p", "script", "span", "style", "textarea", "title",
];

/// HTML names whose body is opaque text.
const HTML_RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Name tables that parameterize parsing and serialization.
///
/// Any table may be empty. Missing fields in a JSON description fall back to
/// the [`Dialect::xml`] values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Tag name of the synthetic node that holds a comment region. An open
    /// tag with this name also starts a comment region.
    pub comment_tag: String,
    /// Names that never take a body: an open tag is complete on its own, and
    /// an empty node is written self-closed.
    pub void_elements: BTreeSet<String>,
    /// Names whose empty form is written as `<name></name>`.
    ///
    /// Empty nodes named in neither this set nor `void_elements` are written
    /// self-closed.
    pub non_void_elements: BTreeSet<String>,
    /// Names whose content is opaque until the matching close tag.
    pub raw_text_elements: BTreeSet<String>,
    /// Opening tag name → cursor tag names it implicitly closes first.
    pub implied_end_tags: BTreeMap<String, Vec<String>>,
}

impl Dialect {
    /// Plain XML: every table empty.
    #[must_use]
    pub fn xml() -> Self {
        Self {
            comment_tag: COMMENT_TAG.to_string(),
            void_elements: BTreeSet::new(),
            non_void_elements: BTreeSet::new(),
            raw_text_elements: BTreeSet::new(),
            implied_end_tags: BTreeMap::new(),
        }
    }

    /// Loose HTML.
    #[must_use]
    pub fn html() -> Self {
        Self::xml()
            .with_void_elements(HTML_VOID_ELEMENTS.iter().copied())
            .with_non_void_elements(HTML_NON_VOID_ELEMENTS.iter().copied())
            .with_raw_text_elements(HTML_RAW_TEXT_ELEMENTS.iter().copied())
            .with_implied_end_tag("body", "head")
    }

    /// Read a dialect from its JSON description.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidDialect`] if `json` is not a valid
    /// description or names an empty comment tag.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let dialect: Self = serde_json::from_str(json)?;
        if dialect.comment_tag.is_empty() {
            return Err(ParseError::InvalidDialect(serde::de::Error::custom(
                "comment_tag must not be empty",
            )));
        }
        Ok(dialect)
    }

    /// Builder-style: add void names.
    #[must_use]
    pub fn with_void_elements<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.void_elements.extend(names.into_iter().map(str::to_string));
        self
    }

    /// Builder-style: add non-void names.
    #[must_use]
    pub fn with_non_void_elements<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.non_void_elements
            .extend(names.into_iter().map(str::to_string));
        self
    }

    /// Builder-style: add raw-text names.
    #[must_use]
    pub fn with_raw_text_elements<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.raw_text_elements
            .extend(names.into_iter().map(str::to_string));
        self
    }

    /// Builder-style: opening `opener` while the cursor is `closes` closes it.
    #[must_use]
    pub fn with_implied_end_tag(mut self, opener: &str, closes: &str) -> Self {
        self.implied_end_tags
            .entry(opener.to_string())
            .or_default()
            .push(closes.to_string());
        self
    }

    /// Returns true if `name` never takes a body.
    #[must_use]
    pub fn is_void(&self, name: &str) -> bool {
        self.void_elements.contains(name)
    }

    /// Returns true if an empty `name` is written as an open+close pair.
    #[must_use]
    pub fn is_non_void(&self, name: &str) -> bool {
        !self.is_void(name) && self.non_void_elements.contains(name)
    }

    /// Returns true if `name` holds opaque text.
    #[must_use]
    pub fn is_raw_text(&self, name: &str) -> bool {
        self.raw_text_elements.contains(name)
    }

    /// Tag name given to comment nodes. An empty `comment_tag` falls back to
    /// [`COMMENT_TAG`].
    #[must_use]
    pub fn comment_name(&self) -> &str {
        if self.comment_tag.is_empty() {
            COMMENT_TAG
        } else {
            &self.comment_tag
        }
    }

    /// Returns true if `name` is the reserved comment tag.
    #[must_use]
    pub fn is_comment(&self, name: &str) -> bool {
        self.comment_name() == name
    }

    /// Returns true if opening `opener` implicitly closes an open `current`.
    #[must_use]
    pub fn implies_end_of(&self, opener: &str, current: &str) -> bool {
        self.implied_end_tags
            .get(opener)
            .is_some_and(|closes| closes.iter().any(|name| *name == current))
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::xml()
    }
}
