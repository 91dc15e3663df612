//! Property tests: serialized trees parse back to the same structure, and
//! arbitrary tag soup never makes the parser or serializer panic.

#![allow(clippy::needless_pass_by_value)]

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use tagtree_dom::{NodeId, Tree};
use tagtree_markup::{Dialect, TreeBuilder, parse, parse_html, to_markup};

const NAMES: &[&str] = &["a", "b", "item", "x1", "ns:el", "my-tag"];
const ATTRIBUTE_NAMES: &[&str] = &["id", "class", "data-x", "href"];
const WORDS: &[&str] = &["alpha", "beta", "gamma", "42", "x", "y.z", "é"];

/// A balanced document generated for the round-trip property.
#[derive(Debug, Clone)]
struct GenElement {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    /// One more block than there are children.
    blocks: Vec<String>,
    children: Vec<GenElement>,
}

impl GenElement {
    fn generate(g: &mut Gen, depth: usize) -> Self {
        let name = *g.choose(NAMES).unwrap();
        let mut attributes: Vec<(&'static str, String)> = Vec::new();
        for _ in 0..usize::arbitrary(g) % 3 {
            let attribute = *g.choose(ATTRIBUTE_NAMES).unwrap();
            if attributes.iter().all(|(existing, _)| *existing != attribute) {
                attributes.push((attribute, words(g)));
            }
        }
        let child_count = if depth == 0 { 0 } else { usize::arbitrary(g) % 4 };
        let children = (0..child_count)
            .map(|_| Self::generate(g, depth - 1))
            .collect();
        let blocks = (0..=child_count).map(|_| words(g)).collect();
        Self {
            name,
            attributes,
            blocks,
            children,
        }
    }

    fn render(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {name}=\"{value}\""));
        }
        out.push('>');
        for (block, child) in self.blocks.iter().zip(&self.children) {
            out.push_str(block);
            child.render(out);
        }
        if let Some(last) = self.blocks.last() {
            out.push_str(last);
        }
        out.push_str(&format!("</{}>", self.name));
    }
}

fn words(g: &mut Gen) -> String {
    let count = usize::arbitrary(g) % 4;
    (0..count)
        .map(|_| *g.choose(WORDS).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Arbitrary for GenElement {
    fn arbitrary(g: &mut Gen) -> Self {
        Self::generate(g, 3)
    }
}

/// Whitespace-insensitive view of a subtree.
#[derive(Debug, PartialEq, Eq)]
struct Shape {
    name: String,
    attributes: Vec<(String, String)>,
    blocks: Vec<String>,
    children: Vec<Shape>,
}

fn shape(tree: &Tree, id: NodeId) -> Shape {
    let node = &tree[id];
    let children: Vec<Shape> = tree.children(id).iter().map(|&c| shape(tree, c)).collect();
    let mut blocks: Vec<String> = node
        .text_blocks()
        .map(|block| block.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    // A childless node with no text has nothing to compare.
    if children.is_empty() && blocks.iter().all(String::is_empty) {
        blocks.clear();
    }
    Shape {
        name: node.tag_name().to_string(),
        attributes: node
            .attributes()
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect(),
        blocks,
        children,
    }
}

#[quickcheck]
fn prop_serialize_then_parse_preserves_structure(doc: GenElement) -> bool {
    let mut markup = String::new();
    doc.render(&mut markup);
    let dialect = Dialect::xml();

    let Ok(first) = parse(&markup, &dialect) else {
        return false;
    };
    let Ok(second) = parse(&to_markup(&first, &dialect), &dialect) else {
        return false;
    };
    shape(&first, first.root()) == shape(&second, second.root())
}

#[quickcheck]
fn prop_serialization_is_stable(doc: GenElement) -> bool {
    let mut markup = String::new();
    doc.render(&mut markup);
    let dialect = Dialect::xml();

    let Ok(first) = parse(&markup, &dialect) else {
        return false;
    };
    let once = to_markup(&first, &dialect);
    let Ok(second) = parse(&once, &dialect) else {
        return false;
    };
    once == to_markup(&second, &dialect)
}

/// A sequence of markup fragments, including malformed ones.
#[derive(Debug, Clone)]
struct TagSoup(String);

const FRAGMENTS: &[&str] = &[
    "<a>", "</a>", "<b/>", "</b>", "<!--", "-->", "text", " ", "\n", "<", ">", "\"", "'",
    "<c x=\"1\">", "</c>", "<script>", "</script>", "<br>", "<body>", "<head>", "é", "--",
];

impl Arbitrary for TagSoup {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 24;
        let soup = (0..len).map(|_| *g.choose(FRAGMENTS).unwrap()).collect();
        Self(soup)
    }
}

#[quickcheck]
fn prop_tag_soup_never_panics(soup: TagSoup) -> bool {
    let Ok((tree, _issues)) = TreeBuilder::new(&soup.0, &Dialect::html()).run_with_issues() else {
        return true;
    };
    let _ = to_markup(&tree, &Dialect::html());
    tree.descendants(tree.root()).all(|id| {
        tree.children(id)
            .iter()
            .all(|&child| tree.parent(child) == Some(id))
    })
}

#[quickcheck]
fn prop_arbitrary_strings_never_panic(input: String) -> bool {
    let _ = parse_html(&input);
    true
}

#[test]
fn test_known_document_roundtrips() {
    let markup = "<html><head><title>T</title></head><body class=\"main\">\
                  <p>one <b>two</b> three<br>four</p><!-- note --></body></html>";
    let html = Dialect::html();
    let first = parse(markup, &html).unwrap();
    let second = parse(&to_markup(&first, &html), &html).unwrap();
    assert_eq!(shape(&first, first.root()), shape(&second, second.root()));
}
