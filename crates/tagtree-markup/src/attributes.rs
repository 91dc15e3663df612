//! Attribute extraction.
//!
//! Works on the raw text of a single tag token. This side is lenient: it
//! accepts unquoted values, skips anything it cannot read, and never fails.

use tagtree_common::warning::warn_once;
use tagtree_dom::Attribute;

use crate::tokenizer::helpers::{
    Scanner, is_attribute_name_char, is_attribute_name_start, is_tag_name_char, is_tag_name_start,
};

const COMPONENT: &str = "Attributes";

/// The tag name of a tag token such as `<div class="x">` or `</div>`.
///
/// Returns `""` for comment markers and for text that is not a tag.
#[must_use]
pub fn tag_name(tag: &str) -> &str {
    let mut scanner = Scanner::new(tag, 0);
    if !scanner.consume_if('<') {
        return "";
    }
    let _ = scanner.consume_if('/');
    scanner
        .consume_name(is_tag_name_start, is_tag_name_char)
        .unwrap_or("")
}

/// Extract the attributes of a tag token, in source order.
///
/// - `name="value"` and `name='value'` have their quotes stripped
/// - `name=value` (unquoted) runs to the next whitespace or `>`
/// - a bare `name`, or `name=""`, gives an empty value
/// - a repeated name keeps its first value
///
/// Characters that cannot start an attribute name are skipped and logged.
#[must_use]
pub fn extract_attributes(tag: &str) -> Vec<Attribute> {
    let mut attributes: Vec<Attribute> = Vec::new();
    if tag_name(tag).is_empty() {
        return attributes;
    }

    let mut scanner = Scanner::new(tag, 0);
    let _ = scanner.consume_if('<');
    let _ = scanner.consume_if('/');
    let _ = scanner.consume_name(is_tag_name_start, is_tag_name_char);

    loop {
        let _ = scanner.skip_whitespace();
        if scanner.is_at_end() || scanner.rest() == ">" || scanner.rest() == "/>" {
            break;
        }
        let Some(name) = scanner.consume_name(is_attribute_name_start, is_attribute_name_char)
        else {
            if let Some(stray) = scanner.consume() {
                let _ = warn_once(COMPONENT, &format!("skipping stray character {stray:?} in {tag}"));
            }
            continue;
        };
        let Some(value) = read_value(&mut scanner, tag) else {
            break;
        };

        if attributes.iter().any(|existing| existing.name == name) {
            let _ = warn_once(COMPONENT, &format!("dropping duplicate attribute {name} in {tag}"));
            continue;
        }
        attributes.push(Attribute::new(name, value));
    }
    attributes
}

/// Read the optional `= value` after an attribute name.
///
/// Returns `None` when the value is an unterminated quote; the rest of the
/// tag is then unreadable.
fn read_value<'a>(scanner: &mut Scanner<'a>, tag: &str) -> Option<&'a str> {
    let before_value = scanner.pos();
    let _ = scanner.skip_whitespace();
    if !scanner.consume_if('=') {
        scanner.rewind(before_value);
        return Some("");
    }
    let _ = scanner.skip_whitespace();

    match scanner.peek() {
        Some(quote @ ('"' | '\'')) => {
            let _ = scanner.consume();
            let value = scanner.consume_until(quote);
            if value.is_none() {
                let _ = warn_once(COMPONENT, &format!("unterminated {quote} quote in {tag}"));
            }
            value
        }
        _ => {
            let value = scanner.consume_while(|c| !c.is_whitespace() && c != '>');
            if scanner.rest() == ">"
                && let Some(trimmed) = value.strip_suffix('/')
            {
                scanner.rewind(scanner.pos() - 1);
                return Some(trimmed);
            }
            Some(value)
        }
    }
}
