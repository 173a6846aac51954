//! Integration tests for the HTML parser.

use koala_dom::{DomTree, Node, NodeId, NodeType};
use koala_html::{HTMLParser, HTMLTokenizer};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    let parser = HTMLParser::new(tokenizer.into_tokens());
    parser.run()
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to get text content of a node (concatenated)
fn text_content(tree: &DomTree, id: NodeId) -> String {
    let mut result = String::new();
    if let Some(node) = tree.get(id) {
        match &node.node_type {
            NodeType::Text(data) => result.push_str(data),
            _ => {
                for &child_id in tree.children(id) {
                    result.push_str(&text_content(tree, child_id));
                }
            }
        }
    }
    result
}

/// Helper to get a node reference
fn get_node(tree: &DomTree, id: NodeId) -> &Node {
    tree.get(id).expect("Node not found")
}

#[test]
fn test_document_structure() {
    let tree = parse("<!DOCTYPE html><html><head></head><body></body></html>");

    // Root should be Document
    let root = get_node(&tree, NodeId::ROOT);
    assert!(matches!(root.node_type, NodeType::Document));

    // Document should have html child
    let html_id = find_element(&tree, NodeId::ROOT, "html");
    assert!(html_id.is_some());

    // html should have head and body
    let html_id = html_id.unwrap();
    let head_id = find_element(&tree, html_id, "head");
    let body_id = find_element(&tree, html_id, "body");
    assert!(head_id.is_some());
    assert!(body_id.is_some());
}

#[test]
fn test_text_node() {
    let tree = parse("<html><body>Hello World</body></html>");
    let body_id = find_element(&tree, NodeId::ROOT, "body").unwrap();

    let text = text_content(&tree, body_id);
    assert_eq!(text, "Hello World");
}

#[test]
fn test_comment_node() {
    let tree = parse("<html><body><!-- test comment --></body></html>");
    let body_id = find_element(&tree, NodeId::ROOT, "body").unwrap();

    // Body should have a comment child
    let has_comment = tree.children(body_id).iter().any(|&child_id| {
        tree.get(child_id).map_or(
            false,
            |node| matches!(&node.node_type, NodeType::Comment(data) if data == " test comment "),
        )
    });
    assert!(has_comment);
}

#[test]
fn test_nested_elements() {
    let tree = parse("<html><body><div><p>Text</p></div></body></html>");

    let div_id = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let p_id = find_element(&tree, div_id, "p").unwrap();
    let text = text_content(&tree, p_id);

    assert_eq!(text, "Text");
}

#[test]
fn test_element_attributes() {
    let tree = parse(r#"<html><body><div id="main" class="container"></div></body></html>"#);
    let div_id = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let div = get_node(&tree, div_id);

    if let NodeType::Element(data) = &div.node_type {
        assert_eq!(data.attrs.get("id"), Some(&"main".to_string()));
        assert_eq!(data.attrs.get("class"), Some(&"container".to_string()));
    } else {
        panic!("Expected Element");
    }
}

#[test]
fn test_void_elements() {
    let tree = parse(r#"<html><body><input type="text"><br></body></html>"#);
    let body_id = find_element(&tree, NodeId::ROOT, "body").unwrap();

    // Both input and br should be children of body (void elements don't nest)
    let element_names: Vec<_> = tree
        .children(body_id)
        .iter()
        .filter_map(|&child_id| tree.as_element(child_id).map(|data| data.tag_name.as_str()))
        .collect();

    assert!(element_names.contains(&"input"));
    assert!(element_names.contains(&"br"));
}

#[test]
fn test_title_element() {
    let tree = parse("<html><head><title>My Page</title></head><body></body></html>");
    let title_id = find_element(&tree, NodeId::ROOT, "title").unwrap();
    let text = text_content(&tree, title_id);

    assert_eq!(text, "My Page");
}

#[test]
fn test_meta_element() {
    let tree = parse(r#"<html><head><meta charset="UTF-8"></head><body></body></html>"#);
    let meta_id = find_element(&tree, NodeId::ROOT, "meta").unwrap();
    let meta = get_node(&tree, meta_id);

    if let NodeType::Element(data) = &meta.node_type {
        assert_eq!(data.attrs.get("charset"), Some(&"UTF-8".to_string()));
    } else {
        panic!("Expected Element");
    }
}

#[test]
fn test_whitespace_preserved_in_text() {
    let tree = parse("<html><body>  hello  world  </body></html>");
    let body_id = find_element(&tree, NodeId::ROOT, "body").unwrap();
    let text = text_content(&tree, body_id);

    // Whitespace should be preserved
    assert_eq!(text, "  hello  world  ");
}

#[test]
fn test_multiple_text_nodes_merged() {
    // Adjacent character tokens should become a single text node
    let tree = parse("<html><body>abc</body></html>");
    let body_id = find_element(&tree, NodeId::ROOT, "body").unwrap();

    // Should have exactly one text node child (merged from a, b, c)
    let text_nodes: Vec<_> = tree
        .children(body_id)
        .iter()
        .filter(|&&child_id| {
            tree.get(child_id)
                .map(|n| matches!(n.node_type, NodeType::Text(_)))
                .unwrap_or(false)
        })
        .collect();

    assert_eq!(text_nodes.len(), 1);
    assert_eq!(text_content(&tree, body_id), "abc");
}

#[test]
fn test_simple_html_file() {
    // Test parsing of the actual simple.html structure
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <!-- This is a comment -->
    <title>Test</title>
</head>
<body class="main" id="content">
    <!-- TODO: add more content -->
    <div data-value='single quoted'>Hello</div>
    <input type="text" disabled />
</body>
</html>"#;

    let tree = parse(html);

    // Check basic structure
    let root = get_node(&tree, NodeId::ROOT);
    assert!(matches!(root.node_type, NodeType::Document));

    let html_id = find_element(&tree, NodeId::ROOT, "html").unwrap();
    let html_elem = get_node(&tree, html_id);
    if let NodeType::Element(data) = &html_elem.node_type {
        assert_eq!(data.attrs.get("lang"), Some(&"en".to_string()));
    }

    // Check head elements
    let title_id = find_element(&tree, NodeId::ROOT, "title").unwrap();
    assert_eq!(text_content(&tree, title_id), "Test");

    let meta_id = find_element(&tree, NodeId::ROOT, "meta").unwrap();
    let meta = get_node(&tree, meta_id);
    if let NodeType::Element(data) = &meta.node_type {
        assert_eq!(data.attrs.get("charset"), Some(&"UTF-8".to_string()));
    }

    // Check body elements
    let body_id = find_element(&tree, NodeId::ROOT, "body").unwrap();
    let body = get_node(&tree, body_id);
    if let NodeType::Element(data) = &body.node_type {
        assert_eq!(data.attrs.get("class"), Some(&"main".to_string()));
        assert_eq!(data.attrs.get("id"), Some(&"content".to_string()));
    }

    // Check div with single-quoted attribute
    let div_id = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let div = get_node(&tree, div_id);
    if let NodeType::Element(data) = &div.node_type {
        assert_eq!(
            data.attrs.get("data-value"),
            Some(&"single quoted".to_string())
        );
    }
    assert_eq!(text_content(&tree, div_id), "Hello");

    // Check input with boolean attribute
    let input_id = find_element(&tree, NodeId::ROOT, "input").unwrap();
    let input = get_node(&tree, input_id);
    if let NodeType::Element(data) = &input.node_type {
        assert_eq!(data.attrs.get("type"), Some(&"text".to_string()));
        assert_eq!(data.attrs.get("disabled"), Some(&"".to_string()));
    }
}

// ========== Raw text element tests at parser level ==========

#[test]
fn test_style_element_content_preserved() {
    // Style content should be preserved as text, not parsed as HTML
    let html = r#"<!DOCTYPE html>
<html>
<head>
<style>
body { color: red; }
.container { margin: 0; }
</style>
</head>
<body></body>
</html>"#;

    let tree = parse(html);
    let style = find_element(&tree, tree.root(), "style").unwrap();
    let content = text_content(&tree, style);

    // The CSS should be preserved as text
    assert!(content.contains("body { color: red; }"));
    assert!(content.contains(".container { margin: 0; }"));
}

#[test]
fn test_style_with_html_like_content() {
    // HTML-like content inside style should NOT be interpreted as tags
    let html = "<html><head><style><div>not a tag</div></style></head><body></body></html>";

    let tree = parse(html);
    let style = find_element(&tree, tree.root(), "style").unwrap();
    let content = text_content(&tree, style);

    // The <div> should appear as literal text
    assert_eq!(content, "<div>not a tag</div>");

    // There should be no div element in the document (since it's inside style)
    let body = find_element(&tree, tree.root(), "body").unwrap();
    let div_in_body = find_element(&tree, body, "div");
    assert!(div_in_body.is_none());
}

#[test]
fn test_title_content_preserved() {
    let html = "<html><head><title>My <test> Title</title></head><body></body></html>";

    let tree = parse(html);
    let title = find_element(&tree, tree.root(), "title").unwrap();
    let content = text_content(&tree, title);

    // Title content including < should be preserved
    assert_eq!(content, "My <test> Title");
}

// ========== Table construction tests ==========

#[test]
fn test_table_implies_tbody_and_rows() {
    // <tr> appearing directly in <table> must get an implied <tbody>.
    let html = "<table><tr><td>a</td><td>b</td></tr></table>";
    let tree = parse(html);

    let table_id = find_element(&tree, tree.root(), "table").unwrap();
    let tbody_id = find_element(&tree, table_id, "tbody").unwrap();
    let tr_id = find_element(&tree, tbody_id, "tr").unwrap();

    let cells: Vec<_> = tree
        .children(tr_id)
        .iter()
        .filter_map(|&id| tree.as_element(id).map(|d| d.tag_name.as_str()))
        .collect();
    assert_eq!(cells, vec!["td", "td"]);
}

#[test]
fn test_table_cell_text_content() {
    let html = "<table><tbody><tr><td>one</td><th>two</th></tr></tbody></table>";
    let tree = parse(html);

    let td_id = find_element(&tree, tree.root(), "td").unwrap();
    let th_id = find_element(&tree, tree.root(), "th").unwrap();
    assert_eq!(text_content(&tree, td_id), "one");
    assert_eq!(text_content(&tree, th_id), "two");
}

#[test]
fn test_text_before_table_is_foster_parented() {
    // Misplaced text inside <table> (outside any cell) must be moved
    // before the table rather than becoming a child of it.
    let html = "<body><table>stray<tr><td>cell</td></tr></table></body>";
    let tree = parse(html);

    let body_id = find_element(&tree, tree.root(), "body").unwrap();
    let table_id = find_element(&tree, body_id, "table").unwrap();

    // The stray text is not inside the table at all.
    assert!(
        !text_content(&tree, table_id).contains("stray"),
        "foster-parented text ended up inside the table"
    );

    // It should appear as a text-node sibling of the table, before it.
    let siblings = tree.children(body_id);
    let table_pos = siblings.iter().position(|&id| id == table_id).unwrap();
    let has_preceding_stray_text = siblings[..table_pos].iter().any(|&id| {
        tree.as_text(id).is_some_and(|t| t.contains("stray"))
    });
    assert!(has_preceding_stray_text);
}

#[test]
fn test_nested_tables() {
    let html = "<table><tr><td><table><tr><td>inner</td></tr></table></td></tr></table>";
    let tree = parse(html);

    let outer_table = find_element(&tree, tree.root(), "table").unwrap();
    let outer_td = find_element(&tree, outer_table, "td").unwrap();
    let inner_table = find_element(&tree, outer_td, "table").unwrap();
    let inner_td = find_element(&tree, inner_table, "td").unwrap();

    assert_eq!(text_content(&tree, inner_td), "inner");
}

#[test]
fn test_quirks_mode_from_doctype() {
    let html = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">
<html><body></body></html>"#;
    let tree = parse(html);
    assert_eq!(tree.quirks_mode(), koala_dom::QuirksMode::Quirks);
}

#[test]
fn test_no_quirks_mode_for_html5_doctype() {
    let tree = parse("<!DOCTYPE html><html><body></body></html>");
    assert_eq!(tree.quirks_mode(), koala_dom::QuirksMode::NoQuirks);
    assert_eq!(tree.doctype().unwrap().name, "html");
}

#[test]
fn test_noscript_parsed_as_html_when_scripting_disabled() {
    let tree = koala_html::parse(
        "<body><noscript><span>",
        koala_html::ParseOptions { scripting: false, include_comments: true },
        koala_html::Callbacks::default(),
    );
    let noscript_id = find_element(&tree, tree.root(), "noscript").unwrap();
    let span_id = find_element(&tree, noscript_id, "span");
    assert!(span_id.is_some(), "scripting disabled: <span> should be a real child element");
}

#[test]
fn test_noscript_is_raw_text_when_scripting_enabled() {
    let tree = koala_html::parse(
        "<body><noscript><span>",
        koala_html::ParseOptions { scripting: true, include_comments: true },
        koala_html::Callbacks::default(),
    );
    let noscript_id = find_element(&tree, tree.root(), "noscript").unwrap();
    assert!(
        find_element(&tree, noscript_id, "span").is_none(),
        "scripting enabled: <span> should not be parsed as a real element"
    );
    assert_eq!(text_content(&tree, noscript_id), "<span>");
}

#[test]
fn test_script_literal_content_preserved() {
    let tree = koala_html::parse(
        "<script><hello></script>",
        koala_html::ParseOptions::new(),
        koala_html::Callbacks::default(),
    );
    let script_id = find_element(&tree, tree.root(), "script").unwrap();
    assert_eq!(text_content(&tree, script_id), "<hello>");
}

#[test]
fn test_parse_strips_comments_when_disabled() {
    let html = "<html><!-- hidden --><body></body></html>";
    let with_comments = koala_html::parse(
        html,
        koala_html::ParseOptions { scripting: false, include_comments: true },
        koala_html::Callbacks::default(),
    );
    let without_comments = koala_html::parse(
        html,
        koala_html::ParseOptions { scripting: false, include_comments: false },
        koala_html::Callbacks::default(),
    );
    let has_comment = |tree: &DomTree| {
        tree.iter_all().any(|id| matches!(tree.get(id).map(|n| &n.node_type), Some(NodeType::Comment(_))))
    };
    assert!(has_comment(&with_comments));
    assert!(!has_comment(&without_comments));
}

#[test]
fn test_parse_fragment_title_context_is_rcdata() {
    let tree = koala_html::parse_fragment(
        "title",
        "&lt;b&gt;not bold&lt;/b&gt;",
        koala_html::ParseOptions::new(),
        koala_html::Callbacks::default(),
    );
    let context_id = tree
        .children(tree.root())
        .first()
        .copied()
        .expect("context element present");
    assert_eq!(text_content(&tree, context_id), "<b>not bold</b>");
}

#[test]
fn test_parse_fragment_div_context_parses_html() {
    let tree = koala_html::parse_fragment(
        "div",
        "<p>hi</p>",
        koala_html::ParseOptions::new(),
        koala_html::Callbacks::default(),
    );
    let context_id = tree.children(tree.root()).first().copied().unwrap();
    assert!(find_element(&tree, context_id, "p").is_some());
}

#[test]
fn test_parse_reports_errors_via_callback() {
    let mut seen = Vec::new();
    koala_html::parse(
        "<p>\0</p>",
        koala_html::ParseOptions::new(),
        koala_html::Callbacks {
            on_error: Some(Box::new(|err| seen.push(err))),
            on_element_closed: None,
        },
    );
    assert!(!seen.is_empty(), "null character should raise UnexpectedNullCharacter");
}

#[test]
fn test_parse_reports_closed_elements_via_callback() {
    let closed_count = std::cell::Cell::new(0usize);
    koala_html::parse(
        "<!doctype html><p>a<p>b",
        koala_html::ParseOptions::new(),
        koala_html::Callbacks {
            on_error: None,
            on_element_closed: Some(Box::new(|_tree, _id| {
                closed_count.set(closed_count.get() + 1);
            })),
        },
    );
    assert!(closed_count.get() > 0, "the first <p> should be implicitly closed");
}

#[test]
fn test_adoption_agency_reparents_misnested_formatting_element() {
    // The canonical adoption-agency example: <p> is a special element, so
    // </b> must walk past it and split "2" and "3" across a reopened <b>
    // that ends up a child of <p>, rather than just popping the stack.
    let tree = parse("<html><body><b>1<p>2</b>3</p></body></html>");
    let body_id = find_element(&tree, NodeId::ROOT, "body").unwrap();

    let outer_b = find_element(&tree, body_id, "b").unwrap();
    assert_eq!(text_content(&tree, outer_b), "1");

    let p_id = find_element(&tree, body_id, "p").unwrap();
    let inner_b = find_element(&tree, p_id, "b").unwrap();
    assert_eq!(text_content(&tree, inner_b), "2");

    // "3" lands in <p> alongside the reopened <b>, not back inside <b>.
    let p_text: String = tree
        .children(p_id)
        .iter()
        .filter_map(|&id| match &tree.get(id).unwrap().node_type {
            NodeType::Text(data) => Some(data.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(p_text, "3");
}

#[test]
fn test_adoption_agency_closes_nested_anchor_on_reopen() {
    // Per the WHATWG "in body" <a> start-tag handler: an <a> already open
    // (and on the list of active formatting elements) must be closed via
    // the adoption agency algorithm before a second <a> opens, so the two
    // never nest.
    let tree = parse(r#"<html><body><a href="1">one<a href="2">two</a></body></html>"#);
    let body_id = find_element(&tree, NodeId::ROOT, "body").unwrap();

    let anchors: Vec<NodeId> = tree
        .children(body_id)
        .iter()
        .copied()
        .filter(|&id| tree.as_element(id).is_some_and(|data| data.tag_name == "a"))
        .collect();
    assert_eq!(anchors.len(), 2, "the two <a> elements must be siblings, not nested");
    assert_eq!(text_content(&tree, anchors[0]), "one");
    assert_eq!(text_content(&tree, anchors[1]), "two");
}
