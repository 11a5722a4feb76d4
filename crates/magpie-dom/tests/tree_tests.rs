//! Tests for DOM tree mutation methods: append_child, insert_before,
//! remove_child, move_children, and the traversal accessors.

use magpie_dom::{Attributes, DomTree, ElementData, ElementKind, NodeData, NodeId};

/// Helper to create a detached element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeData::Element(ElementData::new(
        tag.to_string(),
        Attributes::new(),
    )))
}

// ========== append_child / sibling links ==========

#[test]
fn test_append_child_maintains_sibling_links() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(parent, a);
    tree.append_child(parent, b);

    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(b));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.parent(a), Some(parent));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, c);

    let b = alloc_element(&mut tree, "b");
    tree.insert_before(parent, b, c);

    let tags: Vec<_> = tree
        .children(parent)
        .iter()
        .filter_map(|&id| tree.tag_name(id))
        .collect();
    assert_eq!(tags, ["a", "b", "c"]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_insert_before_missing_reference_appends() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let stranger = alloc_element(&mut tree, "em");

    let child = alloc_element(&mut tree, "p");
    tree.insert_before(parent, child, stranger);

    assert_eq!(tree.last_child(parent), Some(child));
}

// ========== remove_child ==========

#[test]
fn test_remove_child_detaches_completely() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(b);

    assert_eq!(tree.children(parent).len(), 2);
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));

    // The node itself stays allocated.
    assert!(tree.get(b).is_some());
}

// ========== move_children ==========

#[test]
fn test_move_children_preserves_order() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "td");
    let to = alloc_element(&mut tree, "b");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let x = alloc_element(&mut tree, "x");
    let y = alloc_element(&mut tree, "y");
    tree.append_child(from, x);
    tree.append_child(from, y);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    let tags: Vec<_> = tree
        .children(to)
        .iter()
        .filter_map(|&id| tree.tag_name(id))
        .collect();
    assert_eq!(tags, ["x", "y"]);
    assert_eq!(tree.parent(x), Some(to));
}

// ========== traversal ==========

#[test]
fn test_ancestors_walks_to_root() {
    let mut tree = DomTree::new();
    let outer = alloc_element(&mut tree, "div");
    let inner = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, outer);
    tree.append_child(outer, inner);

    let chain: Vec<_> = tree.ancestors(inner).collect();
    assert_eq!(chain, [outer, NodeId::ROOT]);
    assert!(tree.is_descendant_of(inner, outer));
    assert!(!tree.is_descendant_of(outer, inner));
}

#[test]
fn test_document_accessors() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
}

// ========== attributes ==========

#[test]
fn test_insert_if_absent_keeps_first_value() {
    let mut attrs = Attributes::new();
    assert!(attrs.insert_if_absent("id".to_string(), "one".to_string()));
    assert!(!attrs.insert_if_absent("id".to_string(), "two".to_string()));
    assert_eq!(attrs.get("id"), Some("one"));
    assert_eq!(attrs.len(), 1);
}

// ========== element interfaces ==========

#[test]
fn test_interface_resolution_never_fails() {
    assert_eq!(ElementKind::from_tag_name("a"), ElementKind::Anchor);
    assert_eq!(ElementKind::from_tag_name("template"), ElementKind::Template);
    // Known elements without a dedicated interface fall back to the
    // generic kind; unknown names are still elements.
    assert_eq!(ElementKind::from_tag_name("section"), ElementKind::Generic);
    assert_eq!(
        ElementKind::from_tag_name("x-totally-custom"),
        ElementKind::Unknown
    );
}

#[test]
fn test_element_data_id_and_classes() {
    let mut attrs = Attributes::new();
    let _ = attrs.insert_if_absent("id".to_string(), "main".to_string());
    let _ = attrs.insert_if_absent("class".to_string(), "a  b".to_string());
    let data = ElementData::new("div".to_string(), attrs);

    assert_eq!(data.id(), Some("main"));
    assert_eq!(
        data.classes(),
        std::collections::HashSet::from(["a", "b"])
    );
}
