//! HTML tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! "The input to the tree construction stage is a sequence of tokens from
//! the tokenization stage. The tree construction stage is associated with a
//! DOM Document object when a parser is created."

mod formatting;
mod modes;
mod open_elements;

use magpie_dom::{Attributes, DomTree, ElementData, NodeData, NodeId, QuirksMode};
use strum_macros::Display;

use crate::errors::{ParseError, ParseErrorKind};
use crate::tokenizer::{Attribute, State, Token};
use formatting::FormattingList;
pub use open_elements::{OpenElements, Scope, is_formatting, is_special};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary
/// operation of the tree construction stage."
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// What a mode handler decided about the token it was handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    /// The token has been fully handled.
    Done,
    /// The insertion mode changed; run the same token through again.
    Reprocess,
}

/// Reprocessing bound. A token can bounce between modes at most a handful
/// of times (each hop either changes the mode or inserts a synthesized
/// element); this bound turns a would-be infinite loop into a dropped token.
const REPROCESS_LIMIT: usize = 32;

/// Tag names whose start tags in head are handled by the in-head rules when
/// they show up after `</head>`.
pub(crate) const IN_HEAD_DEFERRED: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

/// The tree construction stage.
///
/// Feed tokens through [`TreeBuilder::process`]; the builder owns the
/// document tree until [`TreeBuilder::finish`] hands it back together with
/// the collected parse errors.
pub struct TreeBuilder {
    pub(crate) tree: DomTree,
    pub(crate) mode: InsertionMode,
    pub(crate) original_mode: Option<InsertionMode>,
    pub(crate) template_modes: Vec<InsertionMode>,
    pub(crate) open: OpenElements,
    pub(crate) formatting: FormattingList,
    pub(crate) head: Option<NodeId>,
    pub(crate) form: Option<NodeId>,
    pub(crate) frameset_ok: bool,
    pub(crate) foster_parenting: bool,
    pub(crate) pending_table_text: Vec<char>,
    pub(crate) ignore_next_lf: bool,
    pub(crate) done: bool,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) position: usize,
    pub(crate) forced_tokenizer_state: Option<State>,
    pub(crate) script_hook: Option<Box<dyn FnMut(NodeId, &DomTree)>>,
}

impl TreeBuilder {
    /// A builder in the initial insertion mode over a fresh document.
    #[must_use]
    pub fn new() -> Self {
        TreeBuilder {
            tree: DomTree::new(),
            mode: InsertionMode::Initial,
            original_mode: None,
            template_modes: Vec::new(),
            open: OpenElements::new(),
            formatting: FormattingList::new(),
            head: None,
            form: None,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_text: Vec::new(),
            ignore_next_lf: false,
            done: false,
            errors: Vec::new(),
            position: 0,
            forced_tokenizer_state: None,
            script_hook: None,
        }
    }

    /// Install the script callback, invoked with each `<script>` element
    /// when its end tag is handled. Execution is synchronous and has no
    /// effect on parsing.
    pub fn set_script_hook(&mut self, hook: Box<dyn FnMut(NodeId, &DomTree)>) {
        self.script_hook = Some(hook);
    }

    /// Handle one token.
    ///
    /// `position` is the byte offset where the token started; parse errors
    /// found during tree construction are recorded against it. Returns the
    /// tokenizer state the token forced, if any (RAWTEXT after `<style>`,
    /// script data after `<script>` and so on).
    pub fn process(&mut self, token: &Token, position: usize) -> Option<State> {
        self.position = position;
        if self.done {
            return None;
        }
        // "If the next token is a U+000A LINE FEED character token, then
        // ignore that token" after <pre>, <listing> and <textarea>.
        if std::mem::take(&mut self.ignore_next_lf) && matches!(token, Token::Character('\n')) {
            return self.forced_tokenizer_state.take();
        }
        let mut hops = 0;
        loop {
            match self.dispatch(token) {
                Control::Done => break,
                Control::Reprocess => {
                    hops += 1;
                    if hops >= REPROCESS_LIMIT {
                        break;
                    }
                }
            }
        }
        self.forced_tokenizer_state.take()
    }

    /// Whether an end-of-file token has been handled.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Hand back the document tree and the tree-construction parse errors.
    #[must_use]
    pub fn finish(self) -> (DomTree, Vec<ParseError>) {
        (self.tree, self.errors)
    }

    fn dispatch(&mut self, token: &Token) -> Control {
        match self.mode {
            InsertionMode::Initial => self.initial_mode(token),
            InsertionMode::BeforeHtml => self.before_html_mode(token),
            InsertionMode::BeforeHead => self.before_head_mode(token),
            InsertionMode::InHead => self.in_head_mode(token),
            InsertionMode::AfterHead => self.after_head_mode(token),
            InsertionMode::InBody => self.in_body_mode(token),
            InsertionMode::Text => self.text_mode(token),
            InsertionMode::InTable => self.in_table_mode(token),
            InsertionMode::InTableText => self.in_table_text_mode(token),
            InsertionMode::InCaption => self.in_caption_mode(token),
            InsertionMode::InColumnGroup => self.in_column_group_mode(token),
            InsertionMode::InTableBody => self.in_table_body_mode(token),
            InsertionMode::InRow => self.in_row_mode(token),
            InsertionMode::InCell => self.in_cell_mode(token),
            InsertionMode::InSelect => self.in_select_mode(token),
            InsertionMode::InSelectInTable => self.in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.in_template_mode(token),
            InsertionMode::AfterBody => self.after_body_mode(token),
            InsertionMode::InFrameset => self.in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.after_after_frameset_mode(token),
        }
    }

    pub(crate) fn error(&mut self, kind: ParseErrorKind) {
        self.errors.push(ParseError::new(kind, self.position));
    }

    /// The current node: the bottommost entry on the stack of open elements.
    pub(crate) fn current_node(&self) -> NodeId {
        self.open.current().unwrap_or(NodeId::ROOT)
    }

    pub(crate) fn current_tag(&self) -> Option<&str> {
        self.open.current().and_then(|n| self.tree.tag_name(n))
    }

    // Insertion locations.

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// The appropriate place for inserting a node: a parent plus an optional
    /// child to insert before. Foster parenting redirects insertions that
    /// would land inside table plumbing.
    pub(crate) fn insertion_location(
        &self,
        override_target: Option<NodeId>,
    ) -> (NodeId, Option<NodeId>) {
        let target = override_target.unwrap_or_else(|| self.current_node());
        let target_is_table_part = self
            .tree
            .tag_name(target)
            .is_some_and(|t| matches!(t, "table" | "tbody" | "tfoot" | "thead" | "tr"));
        if self.foster_parenting && target_is_table_part {
            // "Let last table be the last table element in the stack of open
            // elements, if any."
            let last_table = self
                .open
                .iter()
                .rev()
                .copied()
                .find(|&n| self.tree.tag_name(n) == Some("table"));
            match last_table {
                Some(table) => match self.tree.parent(table) {
                    // "insert into last table's parent node, immediately
                    // before last table"
                    Some(parent) => (parent, Some(table)),
                    None => {
                        let index = self.open.index_of(table).unwrap_or(0);
                        let above = self.open.get(index.saturating_sub(1)).unwrap_or(target);
                        (above, None)
                    }
                },
                None => (self.open.get(0).unwrap_or(target), None),
            }
        } else {
            (target, None)
        }
    }

    // Node creation and insertion.

    pub(crate) fn attributes_from_token(attributes: &[Attribute]) -> Attributes {
        attributes
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect()
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Create an element for a start tag token. Detached until inserted.
    pub(crate) fn create_element_for_token(
        &mut self,
        name: &str,
        attributes: &[Attribute],
    ) -> NodeId {
        let data = ElementData::new(name.to_string(), Self::attributes_from_token(attributes));
        self.tree.alloc(NodeData::Element(data))
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// Insert an element at the appropriate place and push it onto the
    /// stack of open elements.
    pub(crate) fn insert_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let element = self.create_element_for_token(name, attributes);
        let (parent, before) = self.insertion_location(None);
        match before {
            Some(reference) => self.tree.insert_before(parent, element, reference),
            None => self.tree.append_child(parent, element),
        }
        self.open.push(element);
        element
    }

    /// Insert an element with no attributes (the synthesized `<head>`,
    /// `<body>`, `<tbody>` and friends).
    pub(crate) fn insert_phantom(&mut self, name: &str) -> NodeId {
        self.insert_element(name, &[])
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// Insert a character, coalescing with an existing text node immediately
    /// before the insertion point.
    pub(crate) fn insert_character(&mut self, c: char) {
        let (parent, before) = self.insertion_location(None);
        // "If the adjusted insertion location is in a Document node, then
        // return."
        if matches!(
            self.tree.get(parent).map(|n| &n.data),
            Some(NodeData::Document) | None
        ) {
            return;
        }
        let neighbor = match before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(parent),
        };
        if let Some(text_node) = neighbor {
            if let Some(NodeData::Text(data)) = self.tree.get_mut(text_node).map(|n| &mut n.data) {
                data.push(c);
                return;
            }
        }
        let text = self.tree.alloc(NodeData::Text(c.to_string()));
        match before {
            Some(reference) => self.tree.insert_before(parent, text, reference),
            None => self.tree.append_child(parent, text),
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(crate) fn insert_comment(&mut self, data: &str) {
        let comment = self.tree.alloc(NodeData::Comment(data.to_string()));
        let (parent, before) = self.insertion_location(None);
        match before {
            Some(reference) => self.tree.insert_before(parent, comment, reference),
            None => self.tree.append_child(parent, comment),
        }
    }

    /// Insert a comment as the last child of a specific node (the document
    /// or the `<html>` element, per mode).
    pub(crate) fn insert_comment_into(&mut self, data: &str, parent: NodeId) {
        let comment = self.tree.alloc(NodeData::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// Add each attribute the element does not already have. The `<html>`
    /// and `<body>` merge rule for duplicate start tags.
    pub(crate) fn merge_attributes(&mut self, node: NodeId, attributes: &[Attribute]) {
        for attr in attributes {
            if let Some(NodeData::Element(data)) = self.tree.get_mut(node).map(|n| &mut n.data) {
                let _ = data
                    .attributes
                    .insert_if_absent(attr.name.clone(), attr.value.clone());
            }
        }
    }

    // Generic text element parsing.

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
    pub(crate) fn parse_generic_rcdata(&mut self, name: &str, attributes: &[Attribute]) {
        let _ = self.insert_element(name, attributes);
        self.forced_tokenizer_state = Some(State::RcData);
        self.original_mode = Some(self.mode);
        self.mode = InsertionMode::Text;
    }

    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    pub(crate) fn parse_generic_raw_text(&mut self, name: &str, attributes: &[Attribute]) {
        let _ = self.insert_element(name, attributes);
        self.forced_tokenizer_state = Some(State::RawText);
        self.original_mode = Some(self.mode);
        self.mode = InsertionMode::Text;
    }

    // Closing helpers.

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    pub(crate) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(tag) = self.current_tag() {
            if Some(tag) == except {
                break;
            }
            if matches!(
                tag,
                "dd" | "dt" | "li" | "optgroup" | "option" | "p" | "rb" | "rp" | "rt" | "rtc"
            ) {
                let _ = self.open.pop();
            } else {
                break;
            }
        }
    }

    /// "Generate all implied end tags thoroughly" (the template end tag
    /// path), which also closes table plumbing.
    pub(crate) fn generate_implied_end_tags_thoroughly(&mut self) {
        while let Some(tag) = self.current_tag() {
            if matches!(
                tag,
                "caption"
                    | "colgroup"
                    | "dd"
                    | "dt"
                    | "li"
                    | "optgroup"
                    | "option"
                    | "p"
                    | "rb"
                    | "rp"
                    | "rt"
                    | "rtc"
                    | "tbody"
                    | "td"
                    | "tfoot"
                    | "th"
                    | "thead"
                    | "tr"
            ) {
                let _ = self.open.pop();
            } else {
                break;
            }
        }
    }

    /// Close a `<p>` element: generate implied end tags except `p`, then
    /// pop until the `p` is gone.
    pub(crate) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if self.current_tag() != Some("p") {
            self.error(ParseErrorKind::MisnestedEndTag("p".to_string()));
        }
        self.open.pop_until_tag(&self.tree, "p");
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    pub(crate) fn close_the_cell(&mut self) {
        self.generate_implied_end_tags(None);
        if !matches!(self.current_tag(), Some("td" | "th")) {
            self.error(ParseErrorKind::MisnestedEndTag("td".to_string()));
        }
        self.open.pop_until_one_of(&self.tree, &["td", "th"]);
        self.formatting.clear_to_last_marker();
        self.mode = InsertionMode::InRow;
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    pub(crate) fn clear_back_to_table_context(&mut self) {
        self.open
            .pop_to_context(&self.tree, &["table", "template", "html"]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    pub(crate) fn clear_back_to_table_body_context(&mut self) {
        self.open.pop_to_context(
            &self.tree,
            &["tbody", "tfoot", "thead", "template", "html"],
        );
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    pub(crate) fn clear_back_to_table_row_context(&mut self) {
        self.open
            .pop_to_context(&self.tree, &["tr", "template", "html"]);
    }

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(crate) fn reset_insertion_mode(&mut self) {
        for (index, &node) in self.open.iter().enumerate().rev() {
            let last = index == 0;
            let Some(tag) = self.tree.tag_name(node) else {
                continue;
            };
            match tag {
                "select" => {
                    // Check the ancestors for a table; a select inside a
                    // table keeps its table-aware mode.
                    let mut mode = InsertionMode::InSelect;
                    for &ancestor in self.open.iter().take(index).rev() {
                        match self.tree.tag_name(ancestor) {
                            Some("template") => break,
                            Some("table") => {
                                mode = InsertionMode::InSelectInTable;
                                break;
                            }
                            _ => {}
                        }
                    }
                    self.mode = mode;
                    return;
                }
                "td" | "th" if !last => {
                    self.mode = InsertionMode::InCell;
                    return;
                }
                "tr" => {
                    self.mode = InsertionMode::InRow;
                    return;
                }
                "tbody" | "thead" | "tfoot" => {
                    self.mode = InsertionMode::InTableBody;
                    return;
                }
                "caption" => {
                    self.mode = InsertionMode::InCaption;
                    return;
                }
                "colgroup" => {
                    self.mode = InsertionMode::InColumnGroup;
                    return;
                }
                "table" => {
                    self.mode = InsertionMode::InTable;
                    return;
                }
                "template" => {
                    self.mode = *self
                        .template_modes
                        .last()
                        .unwrap_or(&InsertionMode::InBody);
                    return;
                }
                "head" if !last => {
                    self.mode = InsertionMode::InHead;
                    return;
                }
                "body" => {
                    self.mode = InsertionMode::InBody;
                    return;
                }
                "frameset" => {
                    self.mode = InsertionMode::InFrameset;
                    return;
                }
                "html" => {
                    self.mode = if self.head.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                    return;
                }
                _ if last => {
                    self.mode = InsertionMode::InBody;
                    return;
                }
                _ => {}
            }
        }
        self.mode = InsertionMode::InBody;
    }

    /// [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    ///
    /// Map a DOCTYPE token onto a document mode. Matching is ASCII
    /// case-insensitive; the public identifier prefix list carries the
    /// well-known legacy DTDs.
    pub(crate) fn quirks_mode_for_doctype(
        name: Option<&str>,
        public_id: Option<&str>,
        system_id: Option<&str>,
        force_quirks: bool,
    ) -> QuirksMode {
        const QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
            "-//w3c//dtd html 3.2",
            "-//w3c//dtd html 4.0 frameset//",
            "-//w3c//dtd html 4.0 transitional//",
            "-//w3o//dtd w3 html//",
            "-//ietf//dtd html",
            "-//netscape comm. corp.//dtd html",
            "-//microsoft//dtd internet explorer",
            "-//sun microsystems corp.//dtd hotjava html//",
            "-//softquad software//dtd hotmetal pro",
            "-//sq//dtd html 2.0",
            "-//spyglass//dtd html 2.0",
            "-//webtechs//dtd mozilla html",
            "+//silmaril//dtd html pro",
        ];
        const QUIRKY_PUBLIC_EXACT: &[&str] = &[
            "-//w3o//dtd w3 html strict 3.0//en//",
            "-/w3c/dtd html 4.0 transitional/en",
            "html",
        ];

        if force_quirks || name != Some("html") {
            return QuirksMode::Quirks;
        }
        let public = public_id.map(str::to_ascii_lowercase);
        let system = system_id.map(str::to_ascii_lowercase);

        if let Some(public) = &public {
            if QUIRKY_PUBLIC_EXACT.contains(&public.as_str())
                || QUIRKY_PUBLIC_PREFIXES.iter().any(|p| public.starts_with(p))
            {
                return QuirksMode::Quirks;
            }
            let html401 = public.starts_with("-//w3c//dtd html 4.01 frameset//")
                || public.starts_with("-//w3c//dtd html 4.01 transitional//");
            if html401 && system.is_none() {
                return QuirksMode::Quirks;
            }
            if public.starts_with("-//w3c//dtd xhtml 1.0 frameset//")
                || public.starts_with("-//w3c//dtd xhtml 1.0 transitional//")
                || (html401 && system.is_some())
            {
                return QuirksMode::LimitedQuirks;
            }
        }
        if system.as_deref() == Some("http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd") {
            return QuirksMode::Quirks;
        }
        QuirksMode::NoQuirks
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TreeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("mode", &self.mode)
            .field("open", &self.open)
            .field("frameset_ok", &self.frameset_ok)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
