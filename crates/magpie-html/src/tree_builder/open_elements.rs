//! The stack of open elements.
//!
//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows
//! downwards; the topmost node on the stack is the first one added to the
//! stack, and the bottommost node of the stack is the most recently added
//! node." Index 0 holds the `<html>` element; the current node is the last
//! entry.

use magpie_dom::{DomTree, NodeId};

/// The scope a [`OpenElements::has_tag_in_scope`] query runs under.
///
/// "The stack of open elements is said to have an element target node in a
/// specific scope consisting of a list of element types ..." Each variant
/// names one of the spec's scope definitions, which differ only in their
/// boundary list. [`Scope::Select`] inverts the test: every element type is
/// a boundary except `optgroup` and `option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The default "in scope" boundary list.
    Default,
    /// "in list item scope": default plus `ol` and `ul`.
    ListItem,
    /// "in button scope": default plus `button`.
    Button,
    /// "in table scope": `html`, `table` and `template` only.
    Table,
    /// "in select scope": everything but `optgroup` and `option` terminates.
    Select,
}

/// Boundary element types shared by the default, list item and button scopes.
const BASE_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// The stack of open elements.
#[derive(Debug, Default)]
pub struct OpenElements {
    entries: Vec<NodeId>,
}

impl OpenElements {
    /// An empty stack.
    #[must_use]
    pub const fn new() -> Self {
        OpenElements {
            entries: Vec::new(),
        }
    }

    /// Push a newly opened element.
    pub fn push(&mut self, node: NodeId) {
        self.entries.push(node);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.entries.pop()
    }

    /// "The current node is the bottommost node in this stack."
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.entries.last().copied()
    }

    /// The number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no elements are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`, counting from the top (the `<html>` element).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.entries.get(index).copied()
    }

    /// Position of `node` on the stack, if present.
    #[must_use]
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(|&n| n == node)
    }

    /// Whether `node` is on the stack.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains(&node)
    }

    /// Whether any open element has the given tag name.
    #[must_use]
    pub fn contains_tag(&self, tree: &DomTree, tag: &str) -> bool {
        self.entries
            .iter()
            .any(|&n| tree.tag_name(n) == Some(tag))
    }

    /// Remove `node` from wherever it sits on the stack.
    pub fn remove(&mut self, node: NodeId) {
        self.entries.retain(|&n| n != node);
    }

    /// Insert `node` immediately below `reference` (towards the bottom).
    /// Appends when the reference is not on the stack.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        match self.index_of(reference) {
            Some(index) => self.entries.insert(index + 1, node),
            None => self.entries.push(node),
        }
    }

    /// Replace `old` with `new` in place.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if let Some(index) = self.index_of(old) {
            self.entries[index] = new;
        }
    }

    /// Pop elements until one with the given tag name has been popped.
    pub fn pop_until_tag(&mut self, tree: &DomTree, tag: &str) {
        while let Some(node) = self.entries.pop() {
            if tree.tag_name(node) == Some(tag) {
                break;
            }
        }
    }

    /// Pop elements until one whose tag name is in `tags` has been popped.
    pub fn pop_until_one_of(&mut self, tree: &DomTree, tags: &[&str]) {
        while let Some(node) = self.entries.pop() {
            if tree.tag_name(node).is_some_and(|t| tags.contains(&t)) {
                break;
            }
        }
    }

    /// Pop elements until `node` has been popped.
    pub fn pop_until_node(&mut self, node: NodeId) {
        while let Some(popped) = self.entries.pop() {
            if popped == node {
                break;
            }
        }
    }

    /// Pop elements while the current node's tag name is not in `context`.
    /// Used by the clear-back-to-table/table-body/row-context algorithms.
    pub fn pop_to_context(&mut self, tree: &DomTree, context: &[&str]) {
        while let Some(node) = self.current() {
            if tree.tag_name(node).is_some_and(|t| context.contains(&t)) {
                break;
            }
            let _ = self.entries.pop();
        }
    }

    /// Iterate from the `<html>` element down to the current node.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.entries.iter()
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// Walk from the current node upwards: the target tag matching first
    /// means in scope; a boundary element matching first means not.
    #[must_use]
    pub fn has_tag_in_scope(&self, tree: &DomTree, tag: &str, scope: Scope) -> bool {
        for &node in self.entries.iter().rev() {
            let Some(name) = tree.tag_name(node) else {
                continue;
            };
            if name == tag {
                return true;
            }
            if Self::is_scope_boundary(name, scope) {
                return false;
            }
        }
        false
    }

    /// Scope query for a specific node rather than a tag name. The adoption
    /// agency algorithm needs this form.
    #[must_use]
    pub fn has_node_in_scope(&self, tree: &DomTree, target: NodeId, scope: Scope) -> bool {
        for &node in self.entries.iter().rev() {
            if node == target {
                return true;
            }
            let Some(name) = tree.tag_name(node) else {
                continue;
            };
            if Self::is_scope_boundary(name, scope) {
                return false;
            }
        }
        false
    }

    fn is_scope_boundary(name: &str, scope: Scope) -> bool {
        match scope {
            Scope::Default => BASE_SCOPE.contains(&name),
            Scope::ListItem => BASE_SCOPE.contains(&name) || matches!(name, "ol" | "ul"),
            Scope::Button => BASE_SCOPE.contains(&name) || name == "button",
            Scope::Table => matches!(name, "html" | "table" | "template"),
            Scope::Select => !matches!(name, "optgroup" | "option"),
        }
    }
}

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// Whether a tag name belongs to the special elements category.
#[must_use]
pub fn is_special(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "applet"
            | "area"
            | "article"
            | "aside"
            | "base"
            | "basefont"
            | "bgsound"
            | "blockquote"
            | "body"
            | "br"
            | "button"
            | "caption"
            | "center"
            | "col"
            | "colgroup"
            | "dd"
            | "details"
            | "dir"
            | "div"
            | "dl"
            | "dt"
            | "embed"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "frame"
            | "frameset"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "head"
            | "header"
            | "hgroup"
            | "hr"
            | "html"
            | "iframe"
            | "img"
            | "input"
            | "keygen"
            | "li"
            | "link"
            | "listing"
            | "main"
            | "marquee"
            | "menu"
            | "meta"
            | "nav"
            | "noembed"
            | "noframes"
            | "noscript"
            | "object"
            | "ol"
            | "p"
            | "param"
            | "plaintext"
            | "pre"
            | "script"
            | "search"
            | "section"
            | "select"
            | "source"
            | "style"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "template"
            | "textarea"
            | "tfoot"
            | "th"
            | "thead"
            | "title"
            | "tr"
            | "track"
            | "ul"
            | "wbr"
            | "xmp"
    )
}

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// Whether a tag name belongs to the formatting elements category.
#[must_use]
pub fn is_formatting(name: &str) -> bool {
    matches!(
        name,
        "a" | "b"
            | "big"
            | "code"
            | "em"
            | "font"
            | "i"
            | "nobr"
            | "s"
            | "small"
            | "strike"
            | "strong"
            | "tt"
            | "u"
    )
}
