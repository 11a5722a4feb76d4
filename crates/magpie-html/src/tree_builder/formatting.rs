//! The list of active formatting elements.
//!
//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used
//! to handle mis-nested formatting element tags."

use magpie_dom::{DomTree, NodeData, NodeId};

use super::{TreeBuilder, is_special};
use crate::errors::ParseErrorKind;

/// One entry in the list: a formatting element, or a marker delimiting the
/// reach of reconstruction (inserted for `applet`, `object`, `marquee`,
/// `template`, `td`, `th` and `caption`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormattingEntry {
    Marker,
    Element(NodeId),
}

#[derive(Debug, Default)]
pub(crate) struct FormattingList {
    entries: Vec<FormattingEntry>,
}

impl FormattingList {
    pub fn new() -> Self {
        FormattingList {
            entries: Vec::new(),
        }
    }

    pub fn push_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// Push an element, enforcing the Noah's Ark clause: at most three
    /// entries with the same tag name and attribute set after the last
    /// marker; the earliest is dropped when a fourth arrives.
    pub fn push_element(&mut self, tree: &DomTree, node: NodeId) {
        let Some(element) = tree.as_element(node) else {
            return;
        };
        let mut matching = Vec::new();
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => break,
                FormattingEntry::Element(existing) => {
                    if let Some(other) = tree.as_element(*existing) {
                        if other.tag_name == element.tag_name
                            && other.attributes == element.attributes
                        {
                            matching.push(index);
                        }
                    }
                }
            }
        }
        if matching.len() >= 3 {
            // matching is in reverse order; the last index is the earliest.
            if let Some(&earliest) = matching.last() {
                let _ = self.entries.remove(earliest);
            }
        }
        self.entries.push(FormattingEntry::Element(node));
    }

    /// The last element with the given tag name after the last marker.
    pub fn find_after_last_marker(&self, tree: &DomTree, tag: &str) -> Option<NodeId> {
        for entry in self.entries.iter().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element(node) => {
                    if tree.tag_name(*node) == Some(tag) {
                        return Some(*node);
                    }
                }
            }
        }
        None
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains(&FormattingEntry::Element(node))
    }

    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| *e == FormattingEntry::Element(node))
    }

    pub fn remove_node(&mut self, node: NodeId) {
        self.entries.retain(|e| *e != FormattingEntry::Element(node));
    }

    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        for entry in &mut self.entries {
            if *entry == FormattingEntry::Element(old) {
                *entry = FormattingEntry::Element(new);
            }
        }
    }

    pub fn insert_at(&mut self, index: usize, node: NodeId) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, FormattingEntry::Element(node));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<FormattingEntry> {
        self.entries.get(index).copied()
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if entry == FormattingEntry::Marker {
                break;
            }
        }
    }
}

/// Inner-loop bound of the adoption agency algorithm.
const ADOPTION_INNER_LIMIT: usize = 3;
/// Outer-loop bound of the adoption agency algorithm.
const ADOPTION_OUTER_LIMIT: usize = 8;

impl TreeBuilder {
    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// Reopen formatting elements that were implicitly closed, so that text
    /// following `<p><b>x</p>y` still lands inside a `<b>`.
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        let Some(last) = self.formatting.get(self.formatting.len().wrapping_sub(1)) else {
            return;
        };
        if last == FormattingEntry::Marker {
            return;
        }
        if let FormattingEntry::Element(node) = last {
            if self.open.contains(node) {
                return;
            }
        }

        // Rewind to the first entry that needs reopening.
        let mut index = self.formatting.len() - 1;
        loop {
            match self.formatting.get(index) {
                Some(FormattingEntry::Marker) => {
                    index += 1;
                    break;
                }
                Some(FormattingEntry::Element(node)) if self.open.contains(node) => {
                    index += 1;
                    break;
                }
                _ => {}
            }
            if index == 0 {
                break;
            }
            index -= 1;
        }

        // Advance, cloning each entry back onto the tree and the stack.
        while index < self.formatting.len() {
            let Some(FormattingEntry::Element(node)) = self.formatting.get(index) else {
                index += 1;
                continue;
            };
            let Some(data) = self.tree.as_element(node).cloned() else {
                index += 1;
                continue;
            };
            let clone = self.tree.alloc(NodeData::Element(data));
            let (parent, before) = self.insertion_location(None);
            match before {
                Some(reference) => self.tree.insert_before(parent, clone, reference),
                None => self.tree.append_child(parent, clone),
            }
            self.open.push(clone);
            self.formatting.replace(node, clone);
            index += 1;
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// The adoption agency algorithm for an end tag whose tag name is
    /// `subject`. Returns `false` when the caller should fall back to the
    /// "any other end tag" steps.
    pub(crate) fn run_adoption_agency(&mut self, subject: &str) -> bool {
        // Shortcut: the current node matches and is not in the list.
        if let Some(current) = self.open.current() {
            if self.tree.tag_name(current) == Some(subject) && !self.formatting.contains(current) {
                let _ = self.open.pop();
                return true;
            }
        }

        for _ in 0..ADOPTION_OUTER_LIMIT {
            let Some(formatting_element) =
                self.formatting.find_after_last_marker(&self.tree, subject)
            else {
                return false;
            };
            if !self.open.contains(formatting_element) {
                self.error(ParseErrorKind::MisnestedEndTag(subject.to_string()));
                self.formatting.remove_node(formatting_element);
                return true;
            }
            if !self
                .open
                .has_node_in_scope(&self.tree, formatting_element, super::Scope::Default)
            {
                self.error(ParseErrorKind::MisnestedEndTag(subject.to_string()));
                return true;
            }
            if self.open.current() != Some(formatting_element) {
                self.error(ParseErrorKind::MisnestedEndTag(subject.to_string()));
            }

            let formatting_index = self
                .open
                .index_of(formatting_element)
                .unwrap_or(0);

            // "the topmost node in the stack of open elements that is lower
            // in the stack than formatting element, and is an element in the
            // special category"
            let furthest_block = self
                .open
                .iter()
                .enumerate()
                .skip(formatting_index + 1)
                .find(|&(_, &node)| {
                    self.tree
                        .tag_name(node)
                        .is_some_and(is_special)
                })
                .map(|(index, &node)| (index, node));

            let Some((furthest_index, furthest_block)) = furthest_block else {
                self.open.pop_until_node(formatting_element);
                self.formatting.remove_node(formatting_element);
                return true;
            };

            let common_ancestor = self
                .open
                .get(formatting_index.saturating_sub(1))
                .unwrap_or(NodeId::ROOT);
            let mut bookmark = self.formatting.position(formatting_element).unwrap_or(0);

            let mut node_index = furthest_index;
            let mut last_node = furthest_block;

            let mut inner = 0;
            loop {
                inner += 1;
                node_index -= 1;
                let mut node = match self.open.get(node_index) {
                    Some(above) => above,
                    None => break,
                };
                if node == formatting_element {
                    break;
                }
                if inner > ADOPTION_INNER_LIMIT && self.formatting.contains(node) {
                    self.formatting.remove_node(node);
                }
                if !self.formatting.contains(node) {
                    self.open.remove(node);
                    continue;
                }

                // Replace node with a fresh clone in the list, the stack and
                // the tree.
                let Some(data) = self.tree.as_element(node).cloned() else {
                    self.open.remove(node);
                    continue;
                };
                let clone = self.tree.alloc(NodeData::Element(data));
                self.formatting.replace(node, clone);
                self.open.replace(node, clone);
                node = clone;

                if last_node == furthest_block {
                    bookmark = self.formatting.position(clone).map_or(bookmark, |p| p + 1);
                }

                self.tree.remove_child(last_node);
                self.tree.append_child(node, last_node);
                last_node = node;
            }

            // Reparent last node below the common ancestor, honoring foster
            // parenting when the ancestor is table plumbing.
            self.tree.remove_child(last_node);
            let was_fostering = self.foster_parenting;
            self.foster_parenting = true;
            let (parent, before) = self.insertion_location(Some(common_ancestor));
            self.foster_parenting = was_fostering;
            match before {
                Some(reference) => self.tree.insert_before(parent, last_node, reference),
                None => self.tree.append_child(parent, last_node),
            }

            // Move the furthest block's children into a clone of the
            // formatting element, then hang the clone off the furthest block.
            let Some(data) = self.tree.as_element(formatting_element).cloned() else {
                return true;
            };
            let clone = self.tree.alloc(NodeData::Element(data));
            self.tree.move_children(furthest_block, clone);
            self.tree.append_child(furthest_block, clone);

            self.formatting.remove_node(formatting_element);
            self.formatting.insert_at(bookmark, clone);
            self.open.remove(formatting_element);
            self.open.insert_after(furthest_block, clone);
        }
        true
    }
}
