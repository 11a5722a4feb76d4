//! HTML fragment serialization.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)

use std::fmt::Write;

use magpie_dom::{DomTree, NodeData, NodeId};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are serialized verbatim.
const RAW_TEXT_PARENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serialize a document back to HTML source.
///
/// Reparsing the output yields the same tree; the original source is not
/// recovered (the parser has already repaired it).
#[must_use]
pub fn serialize(tree: &DomTree) -> String {
    let mut out = String::new();
    for &child in tree.children(tree.root()) {
        serialize_node(tree, child, &mut out);
    }
    out
}

fn serialize_node(tree: &DomTree, node: NodeId, out: &mut String) {
    let Some(data) = tree.get(node).map(|n| &n.data) else {
        return;
    };
    match data {
        NodeData::Document => {
            for &child in tree.children(node) {
                serialize_node(tree, child, out);
            }
        }
        NodeData::DocumentType { name, .. } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Element(element) => {
            out.push('<');
            out.push_str(&element.tag_name);
            for attr in &element.attributes {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
                return;
            }
            let raw = RAW_TEXT_PARENTS.contains(&element.tag_name.as_str());
            for &child in tree.children(node) {
                if raw {
                    if let Some(text) = tree.as_text(child) {
                        out.push_str(text);
                        continue;
                    }
                }
                serialize_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag_name);
            out.push('>');
        }
        NodeData::Text(text) => escape(text, false, out),
        NodeData::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
    }
}

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Escaping a string" for text and attribute values.
fn escape(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// An indented one-node-per-line outline of the tree, for debugging and the
/// CLI's dump output.
#[must_use]
pub fn print_tree(tree: &DomTree) -> String {
    let mut out = String::new();
    print_node(tree, tree.root(), 0, &mut out);
    out
}

fn print_node(tree: &DomTree, node: NodeId, depth: usize, out: &mut String) {
    let Some(data) = tree.get(node).map(|n| &n.data) else {
        return;
    };
    for _ in 0..depth {
        out.push_str("  ");
    }
    match data {
        NodeData::Document => out.push_str("#document"),
        NodeData::DocumentType { name, .. } => {
            let _ = write!(out, "<!DOCTYPE {name}>");
        }
        NodeData::Element(element) => {
            let _ = write!(out, "<{}", element.tag_name);
            for attr in &element.attributes {
                let _ = write!(out, " {}=\"{}\"", attr.name, attr.value);
            }
            out.push('>');
        }
        NodeData::Text(text) => {
            let _ = write!(out, "{text:?}");
        }
        NodeData::Comment(comment) => {
            let _ = write!(out, "<!-- {comment} -->");
        }
    }
    out.push('\n');
    for &child in tree.children(node) {
        print_node(tree, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::escape;

    #[test]
    fn escapes_text_but_not_quotes() {
        let mut out = String::new();
        escape("a < b & c \"d\"", false, &mut out);
        assert_eq!(out, "a &lt; b &amp; c \"d\"");
    }

    #[test]
    fn escapes_attribute_quotes() {
        let mut out = String::new();
        escape("say \"hi\" <now>", true, &mut out);
        assert_eq!(out, "say &quot;hi&quot; <now>");
    }
}
