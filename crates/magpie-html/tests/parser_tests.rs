//! Integration tests for the HTML parser.

use std::cell::RefCell;
use std::rc::Rc;

use magpie_html::errors::ParseErrorKind;
use magpie_html::{
    DomTree, NodeData, NodeId, Parser, QuirksMode, parse, parse_with_errors, print_tree, serialize,
};

/// Helper to get element by tag name (first match, depth-first).
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if tree.tag_name(from) == Some(tag) {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to collect the concatenated text of a subtree.
fn text_content(tree: &DomTree, from: NodeId) -> String {
    let mut out = String::new();
    if let Some(text) = tree.as_text(from) {
        out.push_str(text);
    }
    for &child_id in tree.children(from) {
        out.push_str(&text_content(tree, child_id));
    }
    out
}

/// Helper to list an element's children's tag names, skipping text nodes.
fn child_tags<'a>(tree: &'a DomTree, from: NodeId) -> Vec<&'a str> {
    tree.children(from)
        .iter()
        .filter_map(|&id| tree.tag_name(id))
        .collect()
}

// ========== document shape ==========

#[test]
fn test_basic_document_shape() {
    let tree = parse("<!DOCTYPE html><html><head><title>T</title></head><body><p>x</p></body></html>");

    assert!(tree.doctype().is_some());
    let html = tree.document_element().unwrap();
    assert_eq!(tree.tag_name(html), Some("html"));
    assert_eq!(child_tags(&tree, html), ["head", "body"]);

    let title = find_element(&tree, NodeId::ROOT, "title").unwrap();
    assert_eq!(text_content(&tree, title), "T");
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
}

#[test]
fn test_synthesized_skeleton() {
    // No html, head, or body tags anywhere in the input.
    let tree = parse("<!DOCTYPE html>just text");
    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), ["head", "body"]);
    let body = tree.body().unwrap();
    assert_eq!(text_content(&tree, body), "just text");
}

#[test]
fn test_missing_doctype_is_quirks_and_reported() {
    let (tree, errors) = parse_with_errors("<p>A");
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::MissingDoctype)
    );
}

#[test]
fn test_legacy_doctype_is_limited_quirks() {
    let tree = parse(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"><p>x"#,
    );
    assert_eq!(tree.quirks_mode(), QuirksMode::LimitedQuirks);
}

// ========== implied tags ==========

#[test]
fn test_paragraph_start_closes_open_paragraph() {
    let tree = parse("<!DOCTYPE html><p>A<p>B");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), ["p", "p"]);
    let children = tree.children(body).to_vec();
    assert_eq!(text_content(&tree, children[0]), "A");
    assert_eq!(text_content(&tree, children[1]), "B");
}

#[test]
fn test_list_items_close_each_other() {
    let tree = parse("<!DOCTYPE html><ul><li>a<li>b</ul>");
    let ul = find_element(&tree, NodeId::ROOT, "ul").unwrap();
    assert_eq!(child_tags(&tree, ul), ["li", "li"]);
}

#[test]
fn test_headings_do_not_nest() {
    let (tree, errors) = parse_with_errors("<!DOCTYPE html><h1>A<h2>B");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), ["h1", "h2"]);
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedStartTag("h2".to_string()))
    );
}

#[test]
fn test_unclosed_elements_closed_at_eof() {
    let tree = parse("<!DOCTYPE html><div><p>text");
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let p = find_element(&tree, div, "p").unwrap();
    assert_eq!(text_content(&tree, p), "text");
}

// ========== text handling ==========

#[test]
fn test_adjacent_characters_become_one_text_node() {
    let tree = parse("<!DOCTYPE html><body>abc &amp; def</body>");
    let body = tree.body().unwrap();
    let text_nodes: Vec<_> = tree
        .children(body)
        .iter()
        .filter(|&&id| tree.as_text(id).is_some())
        .collect();
    assert_eq!(text_nodes.len(), 1);
    assert_eq!(text_content(&tree, body), "abc & def");
}

#[test]
fn test_newline_after_pre_is_dropped() {
    let tree = parse("<!DOCTYPE html><pre>\nkeep\nthis</pre>");
    let pre = find_element(&tree, NodeId::ROOT, "pre").unwrap();
    assert_eq!(text_content(&tree, pre), "keep\nthis");
}

#[test]
fn test_newline_after_textarea_is_dropped() {
    let tree = parse("<!DOCTYPE html><textarea>\nabc</textarea>");
    let textarea = find_element(&tree, NodeId::ROOT, "textarea").unwrap();
    assert_eq!(text_content(&tree, textarea), "abc");
}

#[test]
fn test_style_content_is_not_parsed() {
    let tree = parse("<!DOCTYPE html><style>p > a { color: red; }</style>");
    let style = find_element(&tree, NodeId::ROOT, "style").unwrap();
    assert_eq!(text_content(&tree, style), "p > a { color: red; }");
    assert!(find_element(&tree, NodeId::ROOT, "a").is_none());
}

#[test]
fn test_comment_node() {
    let tree = parse("<!DOCTYPE html><body><!-- note --></body>");
    let body = tree.body().unwrap();
    let has_comment = tree.children(body).iter().any(|&id| {
        matches!(
            tree.get(id).map(|n| &n.data),
            Some(NodeData::Comment(data)) if data == " note "
        )
    });
    assert!(has_comment);
}

#[test]
fn test_comment_after_document_end() {
    let tree = parse("<!DOCTYPE html><html><body></body></html><!--end-->");
    let last = *tree.children(NodeId::ROOT).last().unwrap();
    assert!(matches!(
        tree.get(last).map(|n| &n.data),
        Some(NodeData::Comment(data)) if data == "end"
    ));
}

// ========== attributes ==========

#[test]
fn test_duplicate_attribute_keeps_first() {
    let (tree, errors) = parse_with_errors(r#"<!DOCTYPE html><div id="a" id="b">"#);
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let element = tree.as_element(div).unwrap();
    assert_eq!(element.attributes.get("id"), Some("a"));
    assert_eq!(element.attributes.len(), 1);
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::DuplicateAttribute)
    );
}

// ========== tables ==========

#[test]
fn test_table_synthesizes_tbody_and_tr() {
    let tree = parse("<!DOCTYPE html><table><tr><td>x");
    let table = find_element(&tree, NodeId::ROOT, "table").unwrap();
    assert_eq!(child_tags(&tree, table), ["tbody"]);
    let tbody = find_element(&tree, table, "tbody").unwrap();
    assert_eq!(child_tags(&tree, tbody), ["tr"]);
    let td = find_element(&tree, tbody, "td").unwrap();
    assert_eq!(text_content(&tree, td), "x");
}

#[test]
fn test_stray_text_is_foster_parented_before_table() {
    let (tree, errors) = parse_with_errors("<!DOCTYPE html><table>oops<tr><td>x</table>");
    let body = tree.body().unwrap();
    let children = tree.children(body).to_vec();
    // The stray text lands before the table element.
    assert_eq!(tree.as_text(children[0]), Some("oops"));
    assert_eq!(tree.tag_name(children[1]), Some("table"));
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedCharacters)
    );
}

#[test]
fn test_stray_col_end_tag_is_ignored() {
    let (tree, errors) =
        parse_with_errors("<!DOCTYPE html><table><colgroup><col></col></colgroup></table>");
    let colgroup = find_element(&tree, NodeId::ROOT, "colgroup").unwrap();
    assert_eq!(child_tags(&tree, colgroup), ["col"]);
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedEndTag("col".to_string()))
    );
}

#[test]
fn test_cell_end_implied_by_next_row() {
    let tree = parse("<!DOCTYPE html><table><tr><td>a<tr><td>b</table>");
    let tbody = find_element(&tree, NodeId::ROOT, "tbody").unwrap();
    assert_eq!(child_tags(&tree, tbody), ["tr", "tr"]);
}

// ========== formatting elements ==========

#[test]
fn test_adoption_agency_splits_misnested_formatting() {
    let tree = parse("<!DOCTYPE html><p><b>X<i>Y</b>Z</i>");
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(child_tags(&tree, p), ["b", "i"]);

    let b = find_element(&tree, p, "b").unwrap();
    assert_eq!(text_content(&tree, b), "XY");
    let inner_i = find_element(&tree, b, "i").unwrap();
    assert_eq!(text_content(&tree, inner_i), "Y");

    // The italic reopened after </b> and caught the trailing text.
    let reopened = *tree.children(p).last().unwrap();
    assert_eq!(tree.tag_name(reopened), Some("i"));
    assert_eq!(text_content(&tree, reopened), "Z");
}

#[test]
fn test_formatting_reopens_after_block_close() {
    let tree = parse("<!DOCTYPE html><p><b>bold<p>still bold");
    let body = tree.body().unwrap();
    let second_p = tree.children(body)[1];
    let b = find_element(&tree, second_p, "b").unwrap();
    assert_eq!(text_content(&tree, b), "still bold");
}

// ========== select ==========

#[test]
fn test_select_options() {
    let tree = parse("<!DOCTYPE html><select><option>a<option>b</select>");
    let select = find_element(&tree, NodeId::ROOT, "select").unwrap();
    assert_eq!(child_tags(&tree, select), ["option", "option"]);
}

#[test]
fn test_table_part_closes_select_in_table() {
    let tree =
        parse("<!DOCTYPE html><table><tr><td><select><option>x<tr><td>y</table>");
    let tbody = find_element(&tree, NodeId::ROOT, "tbody").unwrap();
    assert_eq!(child_tags(&tree, tbody), ["tr", "tr"]);
    let select = find_element(&tree, tbody, "select").unwrap();
    assert_eq!(text_content(&tree, select), "x");
}

// ========== template ==========

#[test]
fn test_template_holds_table_parts() {
    let tree = parse("<!DOCTYPE html><template><tr><td>t</td></tr></template>");
    let head = tree.head().unwrap();
    let template = find_element(&tree, head, "template").unwrap();
    let td = find_element(&tree, template, "td").unwrap();
    assert_eq!(text_content(&tree, td), "t");
    // Nothing leaked out of the template.
    assert!(find_element(&tree, tree.body().unwrap(), "td").is_none());
}

// ========== frameset ==========

#[test]
fn test_frameset_document_has_no_body() {
    let tree = parse("<!DOCTYPE html><frameset><frame></frameset>");
    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), ["head", "frameset"]);
    let frameset = find_element(&tree, NodeId::ROOT, "frameset").unwrap();
    assert_eq!(child_tags(&tree, frameset), ["frame"]);
}

// ========== scripts ==========

#[test]
fn test_script_content_is_inert_text() {
    let tree = parse("<!DOCTYPE html><script>if (a < b) document.write('<p>');</script>");
    let script = find_element(&tree, NodeId::ROOT, "script").unwrap();
    assert_eq!(
        text_content(&tree, script),
        "if (a < b) document.write('<p>');"
    );
    assert!(find_element(&tree, NodeId::ROOT, "p").is_none());
}

#[test]
fn test_script_hook_fires_per_script() {
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut parser = Parser::new();
    parser.set_script_hook(Box::new(move |node, tree| {
        let tag = tree.tag_name(node).unwrap_or_default().to_string();
        sink.borrow_mut().push(tag);
    }));
    parser.feed("<!DOCTYPE html><script>one()</script><body><script>two()</script>");
    let _ = parser.finish();

    assert_eq!(*seen.borrow(), ["script", "script"]);
}

// ========== recovery ==========

#[test]
fn test_eof_inside_tag_drops_the_tag() {
    let (tree, errors) = parse_with_errors("<!DOCTYPE html><div");
    assert!(find_element(&tree, NodeId::ROOT, "div").is_none());
    assert!(tree.body().is_some());
    assert!(errors.iter().any(|e| e.kind == ParseErrorKind::EofInTag));
}

#[test]
fn test_errors_are_in_input_order() {
    let (_, errors) = parse_with_errors("<p>a\0b");
    let positions: Vec<_> = errors.iter().map(|e| e.position).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(!errors.is_empty());
}

// ========== streaming ==========

/// Parse `input` one character per chunk and compare with the one-shot
/// result.
fn assert_chunked_matches(input: &str) {
    let expected = print_tree(&parse(input));
    let mut parser = Parser::new();
    let mut buffer = [0u8; 4];
    for c in input.chars() {
        parser.feed(c.encode_utf8(&mut buffer));
    }
    let chunked = print_tree(&parser.finish());
    assert_eq!(chunked, expected, "chunked parse diverged for {input:?}");
}

#[test]
fn test_chunked_parse_matches_one_shot() {
    assert_chunked_matches("<!DOCTYPE html><p id=\"a\">x &amp; y</p><!-- c -->");
    assert_chunked_matches("<!DOCTYPE html><table><tr><td>cell</table>");
    assert_chunked_matches("<!DOCTYPE html><script>a < b</script>");
    assert_chunked_matches("<title>t &notin; s</title>");
    assert_chunked_matches("plain text, no markup at all");
}

#[test]
fn test_crlf_split_across_chunks() {
    let mut parser = Parser::new();
    parser.feed("<!DOCTYPE html><pre>a\r");
    parser.feed("\nb</pre>");
    let tree = parser.finish();
    let pre = find_element(&tree, NodeId::ROOT, "pre").unwrap();
    assert_eq!(text_content(&tree, pre), "a\nb");
}

#[test]
fn test_streaming_errors_match_one_shot() {
    let input = "<p>a\0b<p";
    let (_, expected) = parse_with_errors(input);

    let mut parser = Parser::new();
    for c in input.chars() {
        let mut buffer = [0u8; 4];
        parser.feed(c.encode_utf8(&mut buffer));
    }
    let (_, chunked) = parser.finish_with_errors();
    assert_eq!(chunked, expected);
}

// ========== serialization ==========

#[test]
fn test_serialize_round_trip_is_stable() {
    let inputs = [
        "<!DOCTYPE html><p class=\"x\">a &amp; b</p>",
        "<!DOCTYPE html><table><tr><td>1<td>2</table>",
        "<!DOCTYPE html><ul><li>one<li>two</ul><!-- done -->",
    ];
    for input in inputs {
        let once = parse(input);
        let twice = parse(&serialize(&once));
        assert_eq!(
            print_tree(&once),
            print_tree(&twice),
            "reparse changed the tree for {input:?}"
        );
    }
}
