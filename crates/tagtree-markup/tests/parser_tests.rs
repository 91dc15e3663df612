//! Integration tests for tag classification and tree building.

use tagtree_dom::{NodeId, PLACEHOLDER, Tree};
use tagtree_markup::{
    Dialect, ParseError, ParseIssue, ParseMode, TagClassifier, TagShape, TagState, TagTokenizer,
    TreeBuilder, parse, parse_html, parse_into, parse_xml,
};

/// Helper to parse with the HTML preset and return the tree plus issues.
fn parse_html_with_issues(input: &str) -> (Tree, Vec<ParseIssue>) {
    TreeBuilder::new(input, &Dialect::html())
        .run_with_issues()
        .unwrap()
}

/// Helper to get a node's text with placeholders made visible.
fn visible_text(tree: &Tree, id: NodeId) -> String {
    tree[id].text().replace(PLACEHOLDER, "{P}")
}

/// Helper to get the tag names of a node's children.
fn child_names(tree: &Tree, id: NodeId) -> Vec<&str> {
    tree.children(id)
        .iter()
        .map(|&child| tree[child].tag_name())
        .collect()
}

/// Helper to find a node that must exist.
fn find(tree: &Tree, tag: &str) -> NodeId {
    tree.find_by_tag_name(tag)
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

// ========== structure ==========

#[test]
fn test_nested_elements_and_gap_text() {
    let tree = parse_xml("<a>x<b>y</b>z<c/>w</a>").unwrap();
    let root = tree.root();

    assert_eq!(tree[root].tag_name(), "a");
    assert_eq!(child_names(&tree, root), vec!["b", "c"]);
    assert_eq!(visible_text(&tree, root), "x{P}z{P}w");
    assert_eq!(tree[find(&tree, "b")].text(), "y");
    assert_eq!(tree[find(&tree, "c")].text(), "");
}

#[test]
fn test_attributes_are_attached() {
    let tree = parse_xml("<a href=\"/x\" href=\"/y\" data-id='7'><b flag/></a>").unwrap();
    let root = tree.root();
    assert_eq!(tree[root].attributes().len(), 2);
    assert_eq!(tree[root].attribute("href").map(|a| a.value.as_str()), Some("/x"));
    assert_eq!(tree[root].attribute("data-id").map(|a| a.value.as_str()), Some("7"));
    let b = find(&tree, "b");
    assert!(tree[b].attribute("flag").is_some_and(|a| a.is_bare()));
}

#[test]
fn test_every_child_links_back_to_its_parent() {
    let tree = parse_html("<html><head><title>t</title></head><body><p>a<b>b</b></p></body></html>")
        .unwrap();
    for id in tree.descendants(tree.root()) {
        for &child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
        }
        assert_eq!(tree[id].placeholder_count(), tree.children(id).len());
    }
}

// ========== recovery ==========

#[test]
fn test_mismatched_close_recovers_through_ancestors() {
    let (tree, issues) = TreeBuilder::new("<a><b><c>text</a>", &Dialect::xml())
        .run_with_issues()
        .unwrap();
    let root = tree.root();
    let b = find(&tree, "b");
    let c = find(&tree, "c");

    assert_eq!(tree[root].tag_name(), "a");
    assert_eq!(tree.children(root), &[b]);
    assert_eq!(tree.children(b), &[c]);
    assert_eq!(tree[c].text(), "text");
    assert!(tree.children(c).is_empty());

    assert_eq!(issues.len(), 1);
    assert!(issues[0].is_error);
    assert!(issues[0].message.contains("2 unclosed"));
}

#[test]
fn test_stray_close_tag_is_ignored() {
    let (tree, issues) = TreeBuilder::new("<a></b></a>", &Dialect::xml())
        .run_with_issues()
        .unwrap();
    let root = tree.root();

    assert_eq!(tree[root].tag_name(), "a");
    assert!(tree.children(root).is_empty());
    assert_eq!(tree[root].text(), "");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].token_index, 1);
    assert!(issues[0].message.contains("</b>"));
}

#[test]
fn test_stray_close_tag_keeps_surrounding_text() {
    let tree = parse_xml("<a>one</b> two</a>").unwrap();
    assert_eq!(tree[tree.root()].text(), "one two");
}

#[test]
fn test_recovery_continues_after_close() {
    let tree = parse_xml("<r><a><b>x</a><c>y</c></r>").unwrap();
    let root = tree.root();
    assert_eq!(child_names(&tree, root), vec!["a", "c"]);
    assert_eq!(tree[find(&tree, "c")].text(), "y");
}

#[test]
fn test_closing_the_root_keeps_it_as_cursor() {
    let tree = parse_xml("<a></a><b/>").unwrap();
    let root = tree.root();
    assert_eq!(child_names(&tree, root), vec!["b"]);
}

#[test]
fn test_tag_names_are_case_sensitive() {
    let (tree, issues) = TreeBuilder::new("<A>x</a></A>", &Dialect::xml())
        .run_with_issues()
        .unwrap();
    assert_eq!(tree[tree.root()].text(), "x");
    assert_eq!(issues.len(), 1);
}

// ========== comments and raw text ==========

#[test]
fn test_comment_content_is_opaque() {
    let tree = parse_xml("<a><!-- <b> x > y </b> --></a>").unwrap();
    let root = tree.root();
    let comment = find(&tree, "comment");

    assert_eq!(tree.children(root), &[comment]);
    assert!(tree[comment].is_comment());
    assert_eq!(tree[comment].text(), " <b> x > y </b> ");
    assert!(tree.children(comment).is_empty());
    assert_eq!(visible_text(&tree, root), "{P}");
}

#[test]
fn test_comment_tag_opens_comment_mode() {
    let tree = parse_xml("<a><comment>hidden <b></comment>after</a>").unwrap();
    let comment = find(&tree, "comment");
    assert_eq!(tree[comment].text(), "hidden <b>");
    assert_eq!(visible_text(&tree, tree.root()), "{P}after");
}

#[test]
fn test_unterminated_comment_takes_the_rest() {
    let (tree, issues) = TreeBuilder::new("<a><!-- never closed <b>", &Dialect::xml())
        .run_with_issues()
        .unwrap();
    let comment = find(&tree, "comment");
    assert_eq!(tree[comment].text(), " never closed <b>");
    assert!(issues.iter().any(|issue| issue.message.contains("comment")));
}

#[test]
fn test_stray_comment_end_is_text() {
    let tree = parse_xml("<a>x --> y</a>").unwrap();
    assert_eq!(tree[tree.root()].text(), "x --> y");
}

#[test]
fn test_script_body_is_raw_text() {
    let tree =
        parse_html("<html><script>if (a < b && c > d) { x = \"</div>\"; }</script><p/></html>")
            .unwrap();
    let script = find(&tree, "script");
    assert_eq!(tree[script].text(), "if (a < b && c > d) { x = \"</div>\"; }");
    assert!(tree.children(script).is_empty());
    assert_eq!(child_names(&tree, tree.root()), vec!["script", "p"]);
}

#[test]
fn test_raw_text_root() {
    let tree = parse_html("<script>a<b>c</script>").unwrap();
    assert_eq!(tree[tree.root()].text(), "a<b>c");
    assert!(tree.children(tree.root()).is_empty());
}

#[test]
fn test_script_is_ordinary_in_xml() {
    let tree = parse_xml("<r><script><b/></script></r>").unwrap();
    let script = find(&tree, "script");
    assert_eq!(child_names(&tree, script), vec!["b"]);
}

// ========== dialect rules ==========

#[test]
fn test_void_elements_do_not_take_content() {
    let tree = parse_html("<p>a<br>b<img src=\"x.png\">c</p>").unwrap();
    let root = tree.root();
    assert_eq!(child_names(&tree, root), vec!["br", "img"]);
    assert_eq!(visible_text(&tree, root), "a{P}b{P}c");
}

#[test]
fn test_void_names_nest_in_xml() {
    let tree = parse_xml("<p>a<br>b</p>").unwrap();
    let br = find(&tree, "br");
    assert_eq!(tree[br].text(), "b");
}

#[test]
fn test_body_implicitly_closes_head() {
    let (tree, issues) = parse_html_with_issues(
        "<html><head><title>T</title><body><p>x</p></body></html>",
    );
    let root = tree.root();
    assert_eq!(child_names(&tree, root), vec!["head", "body"]);
    assert_eq!(child_names(&tree, find(&tree, "head")), vec!["title"]);
    assert!(
        issues
            .iter()
            .any(|issue| !issue.is_error && issue.message.contains("<head>"))
    );
}

#[test]
fn test_custom_dialect_from_json() {
    let dialect = Dialect::from_json(
        r#"{ "void_elements": ["pb"], "raw_text_elements": ["code"] }"#,
    )
    .unwrap();
    let tree = parse("<doc>a<pb>b<code><x></code></doc>", &dialect).unwrap();
    let root = tree.root();
    assert_eq!(child_names(&tree, root), vec!["pb", "code"]);
    assert_eq!(tree[find(&tree, "code")].text(), "<x>");
}

// ========== document edges ==========

#[test]
fn test_no_root_tag() {
    for input in ["", "just text", "</a>", "<!-- c --><a/>", "--> <a/>"] {
        assert!(
            matches!(parse_xml(input), Err(ParseError::NoRootTag)),
            "expected NoRootTag for {input:?}"
        );
    }
}

#[test]
fn test_leading_text_is_discarded_with_issue() {
    let (tree, issues) = parse_html_with_issues("junk <a>x</a>");
    assert_eq!(tree[tree.root()].text(), "x");
    assert_eq!(issues.len(), 1);
    assert!(!issues[0].is_error);
    assert_eq!(issues[0].token_index, 0);
}

#[test]
fn test_leading_whitespace_is_silent() {
    let (_, issues) = parse_html_with_issues("\n  <a>x</a>");
    assert!(issues.is_empty());
}

#[test]
fn test_trailing_text() {
    assert_eq!(parse_xml("<a>x</a> tail").unwrap()[NodeId(0)].text(), "x tail");
    assert_eq!(parse_xml("<a>x</a>\n\n").unwrap()[NodeId(0)].text(), "x");
}

#[test]
fn test_unclosed_elements_end_implicitly() {
    let (tree, issues) = TreeBuilder::new("<a><b>text", &Dialect::xml())
        .run_with_issues()
        .unwrap();
    let b = find(&tree, "b");
    assert_eq!(tree[b].text(), "text");
    assert_eq!(tree.children(tree.root()), &[b]);
    assert!(issues.iter().any(|issue| issue.message.contains("unclosed")));
}

#[test]
fn test_self_closing_root() {
    let tree = parse_xml("<a x=\"1\"/>").unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[tree.root()].attribute("x").map(|a| a.value.as_str()), Some("1"));
}

#[test]
fn test_concurrent_parses_do_not_share_state() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let input = format!("<r{i}><a><b>{i}</r{i}>");
                let tree = parse_xml(&input).unwrap();
                (tree[tree.root()].tag_name().to_string(), tree.len())
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), (format!("r{i}"), 3));
    }
}

// ========== parse_into ==========

#[test]
fn test_parse_into_grafts_fragment() {
    let mut tree = parse_xml("<root><x/></root>").unwrap();
    let root = tree.root();
    let frag = parse_into(&mut tree, root, "<frag a=\"1\">t<y/></frag>", &Dialect::xml()).unwrap();

    assert_eq!(child_names(&tree, root), vec!["x", "frag"]);
    assert_eq!(tree[root].placeholder_count(), 2);
    assert_eq!(tree.parent(frag), Some(root));
    assert_eq!(tree[frag].attribute("a").map(|a| a.value.as_str()), Some("1"));
    assert_eq!(child_names(&tree, frag), vec!["y"]);
}

#[test]
fn test_parse_into_error_leaves_tree_alone() {
    let mut tree = parse_xml("<root/>").unwrap();
    let root = tree.root();
    let before = tree.clone();
    assert!(parse_into(&mut tree, root, "no tags", &Dialect::xml()).is_err());
    assert_eq!(tree, before);
}

// ========== classifier ==========

#[test]
fn test_classifier_mode_transitions() {
    let dialect = Dialect::html();
    let classifier = TagClassifier::new(&dialect);
    let tree = Tree::new("html");
    let cursor = tree.root();
    let mut mode = ParseMode::Normal;

    let states: Vec<TagState> = TagTokenizer::new("<script><b></b></script><!--</html>--><br></html></x>")
        .map(|token| classifier.classify(&token, &mut mode, cursor, &tree))
        .collect();

    assert_eq!(
        states,
        vec![
            TagState::RawTextOpen,
            TagState::Useless,
            TagState::Useless,
            TagState::RawTextClose,
            TagState::CommentOpen,
            TagState::Useless,
            TagState::CommentClose,
            TagState::OpenClose,
            TagState::Close { target: cursor },
            TagState::Useless,
        ]
    );
    assert_eq!(mode, ParseMode::Normal);
}

#[test]
fn test_classifier_leaves_mode_set_inside_region() {
    let dialect = Dialect::html();
    let classifier = TagClassifier::new(&dialect);
    let tree = Tree::new("html");
    let mut mode = ParseMode::Normal;
    let token = TagTokenizer::new("<style>").next().unwrap();

    assert_eq!(
        classifier.classify(&token, &mut mode, tree.root(), &tree),
        TagState::RawTextOpen
    );
    assert_eq!(
        mode,
        ParseMode::InRawText {
            tag_name: "style".to_string()
        }
    );
}

#[test]
fn test_state_shapes() {
    assert_eq!(TagState::Useless.shape(), None);
    assert_eq!(TagState::CommentOpen.shape(), Some(TagShape::Open));
    assert_eq!(TagState::RawTextClose.shape(), Some(TagShape::Close));
    assert_eq!(TagState::OpenClose.shape(), Some(TagShape::OpenClose));
}
