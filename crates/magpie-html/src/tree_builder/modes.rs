//! The per-mode token handling rules.
//!
//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! Each handler implements one insertion mode. "Using the rules for" another
//! mode is a direct call to that mode's handler with `self.mode` unchanged;
//! switching modes and asking for the token again is a [`Control::Reprocess`]
//! hop in the caller's loop.

use magpie_dom::{NodeData, NodeId, QuirksMode};

use super::open_elements::is_special;
use super::{Control, IN_HEAD_DEFERRED, InsertionMode, Scope, TreeBuilder};
use crate::errors::ParseErrorKind;
use crate::tokenizer::{State, Token};

/// "ASCII whitespace" as the tree construction stage sees it; input
/// normalization has already removed carriage returns.
fn is_parser_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | ' ')
}

/// Elements an EOF or `</body>` may leave open without a parse error.
fn may_remain_open(tag: &str) -> bool {
    matches!(
        tag,
        "dd" | "dt"
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
            | "body"
            | "html"
    )
}

const FORMATTING_START: &[&str] = &[
    "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u",
];

const BLOCK_START: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "search",
    "section",
    "summary",
    "ul",
];

const BLOCK_END: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "button",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "listing",
    "main",
    "menu",
    "nav",
    "ol",
    "pre",
    "search",
    "section",
    "summary",
    "ul",
];

impl TreeBuilder {
    // § 13.2.6.4.1 initial

    pub(crate) fn initial_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(c) if is_parser_whitespace(*c) => Control::Done,
            Token::Comment(data) => {
                self.insert_comment_into(data, NodeId::ROOT);
                Control::Done
            }
            Token::Doctype {
                name,
                public_id,
                system_id,
                force_quirks,
            } => {
                let clean = name.as_deref() == Some("html")
                    && public_id.is_none()
                    && (system_id.is_none()
                        || system_id.as_deref() == Some("about:legacy-compat"));
                if !clean {
                    self.error(ParseErrorKind::UnexpectedDoctype);
                }
                let doctype = self.tree.alloc(NodeData::DocumentType {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_id.clone().unwrap_or_default(),
                    system_id: system_id.clone().unwrap_or_default(),
                });
                self.tree.append_child(NodeId::ROOT, doctype);
                let mode = Self::quirks_mode_for_doctype(
                    name.as_deref(),
                    public_id.as_deref(),
                    system_id.as_deref(),
                    *force_quirks,
                );
                self.tree.set_quirks_mode(mode);
                self.mode = InsertionMode::BeforeHtml;
                Control::Done
            }
            _ => {
                self.error(ParseErrorKind::MissingDoctype);
                self.tree.set_quirks_mode(QuirksMode::Quirks);
                self.mode = InsertionMode::BeforeHtml;
                Control::Reprocess
            }
        }
    }

    // § 13.2.6.4.2 before html

    pub(crate) fn before_html_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::Comment(data) => {
                self.insert_comment_into(data, NodeId::ROOT);
                Control::Done
            }
            Token::Character(c) if is_parser_whitespace(*c) => Control::Done,
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let element = self.create_element_for_token(name, attributes);
                self.tree.append_child(NodeId::ROOT, element);
                self.open.push(element);
                self.mode = InsertionMode::BeforeHead;
                Control::Done
            }
            Token::EndTag { name, .. }
                if !matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                Control::Done
            }
            _ => {
                let element = self.create_element_for_token("html", &[]);
                self.tree.append_child(NodeId::ROOT, element);
                self.open.push(element);
                self.mode = InsertionMode::BeforeHead;
                Control::Reprocess
            }
        }
    }

    // § 13.2.6.4.3 before head

    pub(crate) fn before_head_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(c) if is_parser_whitespace(*c) => Control::Done,
            Token::Comment(data) => {
                self.insert_comment(data);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                let head = self.insert_element(name, attributes);
                self.head = Some(head);
                self.mode = InsertionMode::InHead;
                Control::Done
            }
            Token::EndTag { name, .. }
                if !matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                Control::Done
            }
            _ => {
                let head = self.insert_phantom("head");
                self.head = Some(head);
                self.mode = InsertionMode::InHead;
                Control::Reprocess
            }
        }
    }

    // § 13.2.6.4.4 in head

    pub(crate) fn in_head_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(c) if is_parser_whitespace(*c) => {
                self.insert_character(*c);
                Control::Done
            }
            Token::Comment(data) => {
                self.insert_comment(data);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.in_body_mode(token),
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    let _ = self.insert_element(name, attributes);
                    let _ = self.open.pop();
                    Control::Done
                }
                "title" => {
                    self.parse_generic_rcdata(name, attributes);
                    Control::Done
                }
                // Without script execution noscript holds opaque text, the
                // same as noframes.
                "noscript" | "noframes" | "style" => {
                    self.parse_generic_raw_text(name, attributes);
                    Control::Done
                }
                "script" => {
                    let _ = self.insert_element(name, attributes);
                    self.forced_tokenizer_state = Some(State::ScriptData);
                    self.original_mode = Some(self.mode);
                    self.mode = InsertionMode::Text;
                    Control::Done
                }
                "template" => {
                    let _ = self.insert_element(name, attributes);
                    self.formatting.push_marker();
                    self.frameset_ok = false;
                    self.mode = InsertionMode::InTemplate;
                    self.template_modes.push(InsertionMode::InTemplate);
                    Control::Done
                }
                "head" => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    Control::Done
                }
                _ => {
                    let _ = self.open.pop();
                    self.mode = InsertionMode::AfterHead;
                    Control::Reprocess
                }
            },
            Token::EndTag { name, .. } => match name.as_str() {
                "head" => {
                    let _ = self.open.pop();
                    self.mode = InsertionMode::AfterHead;
                    Control::Done
                }
                "template" => {
                    self.close_template_element(name);
                    Control::Done
                }
                "body" | "html" | "br" => {
                    let _ = self.open.pop();
                    self.mode = InsertionMode::AfterHead;
                    Control::Reprocess
                }
                _ => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
            },
            _ => {
                let _ = self.open.pop();
                self.mode = InsertionMode::AfterHead;
                Control::Reprocess
            }
        }
    }

    /// The `</template>` steps shared by several modes.
    fn close_template_element(&mut self, name: &str) {
        if !self.open.contains_tag(&self.tree, "template") {
            self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
            return;
        }
        self.generate_implied_end_tags_thoroughly();
        if self.current_tag() != Some("template") {
            self.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
        }
        self.open.pop_until_tag(&self.tree, "template");
        self.formatting.clear_to_last_marker();
        let _ = self.template_modes.pop();
        self.reset_insertion_mode();
    }

    // § 13.2.6.4.6 after head

    pub(crate) fn after_head_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(c) if is_parser_whitespace(*c) => {
                self.insert_character(*c);
                Control::Done
            }
            Token::Comment(data) => {
                self.insert_comment(data);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.in_body_mode(token),
                "body" => {
                    let _ = self.insert_element(name, attributes);
                    self.frameset_ok = false;
                    self.mode = InsertionMode::InBody;
                    Control::Done
                }
                "frameset" => {
                    let _ = self.insert_element(name, attributes);
                    self.mode = InsertionMode::InFrameset;
                    Control::Done
                }
                _ if IN_HEAD_DEFERRED.contains(&name.as_str()) => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    // Put the head back on the stack for the duration of the
                    // in-head rules.
                    if let Some(head) = self.head {
                        self.open.push(head);
                        let control = self.in_head_mode(token);
                        self.open.remove(head);
                        control
                    } else {
                        Control::Done
                    }
                }
                "head" => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    Control::Done
                }
                _ => {
                    let _ = self.insert_phantom("body");
                    self.mode = InsertionMode::InBody;
                    Control::Reprocess
                }
            },
            Token::EndTag { name, .. } => match name.as_str() {
                "template" => self.in_head_mode(token),
                "body" | "html" | "br" => {
                    let _ = self.insert_phantom("body");
                    self.mode = InsertionMode::InBody;
                    Control::Reprocess
                }
                _ => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
            },
            _ => {
                let _ = self.insert_phantom("body");
                self.mode = InsertionMode::InBody;
                Control::Reprocess
            }
        }
    }

    // § 13.2.6.4.7 in body

    pub(crate) fn in_body_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                Control::Done
            }
            Token::Character(c) if is_parser_whitespace(*c) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*c);
                Control::Done
            }
            Token::Character(c) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*c);
                self.frameset_ok = false;
                Control::Done
            }
            Token::Comment(data) => {
                self.insert_comment(data);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag {
                name, attributes, ..
            } => {
                if IN_HEAD_DEFERRED.contains(&name.as_str()) {
                    return self.in_head_mode(token);
                }
                self.in_body_start_tag(name, attributes)
            }
            Token::EndTag { name, .. } => {
                if name == "template" {
                    return self.in_head_mode(token);
                }
                self.in_body_end_tag(name)
            }
            Token::EndOfFile => {
                if !self.template_modes.is_empty() {
                    return self.in_template_mode(token);
                }
                let stray = self
                    .open
                    .iter()
                    .any(|&n| self.tree.tag_name(n).is_some_and(|t| !may_remain_open(t)));
                if stray {
                    self.error(ParseErrorKind::UnexpectedEof);
                }
                self.done = true;
                Control::Done
            }
        }
    }

    fn in_body_start_tag(
        &mut self,
        name: &str,
        attributes: &[crate::tokenizer::Attribute],
    ) -> Control {
        match name {
            "html" => {
                self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                if !self.open.contains_tag(&self.tree, "template") {
                    if let Some(html) = self.open.get(0) {
                        self.merge_attributes(html, attributes);
                    }
                }
                Control::Done
            }
            "body" => {
                self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                let body = self.open.get(1);
                let body_ok = body.is_some_and(|n| self.tree.tag_name(n) == Some("body"));
                if body_ok && !self.open.contains_tag(&self.tree, "template") {
                    self.frameset_ok = false;
                    if let Some(body) = body {
                        self.merge_attributes(body, attributes);
                    }
                }
                Control::Done
            }
            "frameset" => {
                self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                let body = self.open.get(1);
                let body_ok = body.is_some_and(|n| self.tree.tag_name(n) == Some("body"));
                if body_ok && self.frameset_ok {
                    if let Some(body) = body {
                        self.tree.remove_child(body);
                    }
                    while self.open.len() > 1 {
                        let _ = self.open.pop();
                    }
                    let _ = self.insert_element(name, attributes);
                    self.mode = InsertionMode::InFrameset;
                }
                Control::Done
            }
            _ if BLOCK_START.contains(&name) => {
                if self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.close_p_element();
                }
                let _ = self.insert_element(name, attributes);
                Control::Done
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.close_p_element();
                }
                if matches!(
                    self.current_tag(),
                    Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6")
                ) {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                    let _ = self.open.pop();
                }
                let _ = self.insert_element(name, attributes);
                Control::Done
            }
            "pre" | "listing" => {
                if self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.close_p_element();
                }
                let _ = self.insert_element(name, attributes);
                self.ignore_next_lf = true;
                self.frameset_ok = false;
                Control::Done
            }
            "form" => {
                let has_template = self.open.contains_tag(&self.tree, "template");
                if self.form.is_some() && !has_template {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                    return Control::Done;
                }
                if self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.close_p_element();
                }
                let form = self.insert_element(name, attributes);
                if !has_template {
                    self.form = Some(form);
                }
                Control::Done
            }
            "li" => {
                self.frameset_ok = false;
                for index in (0..self.open.len()).rev() {
                    let Some(node) = self.open.get(index) else {
                        break;
                    };
                    let Some(tag) = self.tree.tag_name(node) else {
                        continue;
                    };
                    if tag == "li" {
                        self.generate_implied_end_tags(Some("li"));
                        if self.current_tag() != Some("li") {
                            self.error(ParseErrorKind::MisnestedEndTag("li".to_string()));
                        }
                        self.open.pop_until_tag(&self.tree, "li");
                        break;
                    }
                    if is_special(tag) && !matches!(tag, "address" | "div" | "p") {
                        break;
                    }
                }
                if self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.close_p_element();
                }
                let _ = self.insert_element(name, attributes);
                Control::Done
            }
            "dd" | "dt" => {
                self.frameset_ok = false;
                for index in (0..self.open.len()).rev() {
                    let Some(node) = self.open.get(index) else {
                        break;
                    };
                    let Some(tag) = self.tree.tag_name(node) else {
                        continue;
                    };
                    if matches!(tag, "dd" | "dt") {
                        let tag = tag.to_string();
                        self.generate_implied_end_tags(Some(&tag));
                        if self.current_tag() != Some(tag.as_str()) {
                            self.error(ParseErrorKind::MisnestedEndTag(tag.clone()));
                        }
                        self.open.pop_until_tag(&self.tree, &tag);
                        break;
                    }
                    if is_special(tag) && !matches!(tag, "address" | "div" | "p") {
                        break;
                    }
                }
                if self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.close_p_element();
                }
                let _ = self.insert_element(name, attributes);
                Control::Done
            }
            "plaintext" => {
                if self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.close_p_element();
                }
                let _ = self.insert_element(name, attributes);
                self.forced_tokenizer_state = Some(State::Plaintext);
                Control::Done
            }
            "button" => {
                if self.open.has_tag_in_scope(&self.tree, "button", Scope::Default) {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                    self.generate_implied_end_tags(None);
                    self.open.pop_until_tag(&self.tree, "button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
                self.frameset_ok = false;
                Control::Done
            }
            "a" => {
                if let Some(existing) = self.formatting.find_after_last_marker(&self.tree, "a") {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                    let _ = self.run_adoption_agency("a");
                    self.formatting.remove_node(existing);
                    self.open.remove(existing);
                }
                self.reconstruct_active_formatting_elements();
                let element = self.insert_element(name, attributes);
                self.formatting.push_element(&self.tree, element);
                Control::Done
            }
            _ if FORMATTING_START.contains(&name) => {
                self.reconstruct_active_formatting_elements();
                let element = self.insert_element(name, attributes);
                self.formatting.push_element(&self.tree, element);
                Control::Done
            }
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.open.has_tag_in_scope(&self.tree, "nobr", Scope::Default) {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                    let _ = self.run_adoption_agency("nobr");
                    self.reconstruct_active_formatting_elements();
                }
                let element = self.insert_element(name, attributes);
                self.formatting.push_element(&self.tree, element);
                Control::Done
            }
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
                self.formatting.push_marker();
                self.frameset_ok = false;
                Control::Done
            }
            "table" => {
                if self.tree.quirks_mode() != QuirksMode::Quirks
                    && self.open.has_tag_in_scope(&self.tree, "p", Scope::Button)
                {
                    self.close_p_element();
                }
                let _ = self.insert_element(name, attributes);
                self.frameset_ok = false;
                self.mode = InsertionMode::InTable;
                Control::Done
            }
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
                let _ = self.open.pop();
                self.frameset_ok = false;
                Control::Done
            }
            "input" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
                let _ = self.open.pop();
                let hidden = attributes.iter().any(|a| {
                    a.name == "type" && a.value.eq_ignore_ascii_case("hidden")
                });
                if !hidden {
                    self.frameset_ok = false;
                }
                Control::Done
            }
            "param" | "source" | "track" => {
                let _ = self.insert_element(name, attributes);
                let _ = self.open.pop();
                Control::Done
            }
            "hr" => {
                if self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.close_p_element();
                }
                let _ = self.insert_element(name, attributes);
                let _ = self.open.pop();
                self.frameset_ok = false;
                Control::Done
            }
            "image" => {
                // "Don't ask."
                self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element("img", attributes);
                let _ = self.open.pop();
                self.frameset_ok = false;
                Control::Done
            }
            "textarea" => {
                let _ = self.insert_element(name, attributes);
                self.ignore_next_lf = true;
                self.forced_tokenizer_state = Some(State::RcData);
                self.original_mode = Some(self.mode);
                self.frameset_ok = false;
                self.mode = InsertionMode::Text;
                Control::Done
            }
            "xmp" => {
                if self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.close_p_element();
                }
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_generic_raw_text(name, attributes);
                Control::Done
            }
            "iframe" => {
                self.frameset_ok = false;
                self.parse_generic_raw_text(name, attributes);
                Control::Done
            }
            "noembed" => {
                self.parse_generic_raw_text(name, attributes);
                Control::Done
            }
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
                self.frameset_ok = false;
                self.mode = if matches!(
                    self.mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                ) {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                };
                Control::Done
            }
            "optgroup" | "option" => {
                if self.current_tag() == Some("option") {
                    let _ = self.open.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
                Control::Done
            }
            "rb" | "rtc" => {
                if self.open.has_tag_in_scope(&self.tree, "ruby", Scope::Default) {
                    self.generate_implied_end_tags(None);
                    if self.current_tag() != Some("ruby") {
                        self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                    }
                }
                let _ = self.insert_element(name, attributes);
                Control::Done
            }
            "rp" | "rt" => {
                if self.open.has_tag_in_scope(&self.tree, "ruby", Scope::Default) {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !matches!(self.current_tag(), Some("ruby" | "rtc")) {
                        self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                    }
                }
                let _ = self.insert_element(name, attributes);
                Control::Done
            }
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot"
            | "th" | "thead" | "tr" => {
                self.error(ParseErrorKind::UnexpectedStartTag(name.to_string()));
                Control::Done
            }
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
                Control::Done
            }
        }
    }

    fn in_body_end_tag(&mut self, name: &str) -> Control {
        match name {
            "body" | "html" => {
                if !self.open.has_tag_in_scope(&self.tree, "body", Scope::Default) {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                    return Control::Done;
                }
                let stray = self
                    .open
                    .iter()
                    .any(|&n| self.tree.tag_name(n).is_some_and(|t| !may_remain_open(t)));
                if stray {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                }
                self.mode = InsertionMode::AfterBody;
                if name == "html" {
                    Control::Reprocess
                } else {
                    Control::Done
                }
            }
            _ if BLOCK_END.contains(&name) => {
                if !self.open.has_tag_in_scope(&self.tree, name, Scope::Default) {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                    return Control::Done;
                }
                self.generate_implied_end_tags(None);
                if self.current_tag() != Some(name) {
                    self.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
                }
                self.open.pop_until_tag(&self.tree, name);
                Control::Done
            }
            "form" => {
                if self.open.contains_tag(&self.tree, "template") {
                    if !self.open.has_tag_in_scope(&self.tree, "form", Scope::Default) {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                        return Control::Done;
                    }
                    self.generate_implied_end_tags(None);
                    if self.current_tag() != Some("form") {
                        self.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
                    }
                    self.open.pop_until_tag(&self.tree, "form");
                } else {
                    let node = self.form.take();
                    let in_scope = node.is_some_and(|n| {
                        self.open.has_node_in_scope(&self.tree, n, Scope::Default)
                    });
                    let Some(node) = node.filter(|_| in_scope) else {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                        return Control::Done;
                    };
                    self.generate_implied_end_tags(None);
                    if self.open.current() != Some(node) {
                        self.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
                    }
                    self.open.remove(node);
                }
                Control::Done
            }
            "p" => {
                if !self.open.has_tag_in_scope(&self.tree, "p", Scope::Button) {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                    let _ = self.insert_phantom("p");
                }
                self.close_p_element();
                Control::Done
            }
            "li" => {
                if !self.open.has_tag_in_scope(&self.tree, "li", Scope::ListItem) {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                    return Control::Done;
                }
                self.generate_implied_end_tags(Some("li"));
                if self.current_tag() != Some("li") {
                    self.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
                }
                self.open.pop_until_tag(&self.tree, "li");
                Control::Done
            }
            "dd" | "dt" => {
                if !self.open.has_tag_in_scope(&self.tree, name, Scope::Default) {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                    return Control::Done;
                }
                self.generate_implied_end_tags(Some(name));
                if self.current_tag() != Some(name) {
                    self.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
                }
                self.open.pop_until_tag(&self.tree, name);
                Control::Done
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
                let any_open = HEADINGS
                    .iter()
                    .any(|h| self.open.has_tag_in_scope(&self.tree, h, Scope::Default));
                if !any_open {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                    return Control::Done;
                }
                self.generate_implied_end_tags(None);
                if self.current_tag() != Some(name) {
                    self.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
                }
                self.open.pop_until_one_of(&self.tree, HEADINGS);
                Control::Done
            }
            "a" | "b" | "big" | "code" | "em" | "font" | "i" | "nobr" | "s" | "small"
            | "strike" | "strong" | "tt" | "u" => {
                if self.run_adoption_agency(name) {
                    Control::Done
                } else {
                    self.any_other_end_tag(name);
                    Control::Done
                }
            }
            "applet" | "marquee" | "object" => {
                if !self.open.has_tag_in_scope(&self.tree, name, Scope::Default) {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                    return Control::Done;
                }
                self.generate_implied_end_tags(None);
                if self.current_tag() != Some(name) {
                    self.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
                }
                self.open.pop_until_tag(&self.tree, name);
                self.formatting.clear_to_last_marker();
                Control::Done
            }
            "br" => {
                // An end tag br is retagged as a start tag.
                self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_phantom("br");
                let _ = self.open.pop();
                self.frameset_ok = false;
                Control::Done
            }
            _ => {
                self.any_other_end_tag(name);
                Control::Done
            }
        }
    }

    /// The "any other end tag" steps of the in-body mode.
    fn any_other_end_tag(&mut self, name: &str) {
        for index in (0..self.open.len()).rev() {
            let Some(node) = self.open.get(index) else {
                break;
            };
            let Some(tag) = self.tree.tag_name(node) else {
                continue;
            };
            if tag == name {
                self.generate_implied_end_tags(Some(name));
                if self.open.current() != Some(node) {
                    self.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
                }
                self.open.pop_until_node(node);
                return;
            }
            if is_special(tag) {
                self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                return;
            }
        }
    }

    // § 13.2.6.4.8 text

    pub(crate) fn text_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(c) => {
                self.insert_character(*c);
                Control::Done
            }
            Token::EndOfFile => {
                self.error(ParseErrorKind::UnexpectedEof);
                let _ = self.open.pop();
                self.mode = self.original_mode.take().unwrap_or(InsertionMode::InBody);
                Control::Reprocess
            }
            Token::EndTag { name, .. } => {
                let node = self.open.pop();
                self.mode = self.original_mode.take().unwrap_or(InsertionMode::InBody);
                if name == "script" {
                    if let (Some(node), Some(hook)) = (node, self.script_hook.as_mut()) {
                        hook(node, &self.tree);
                    }
                }
                Control::Done
            }
            _ => Control::Done,
        }
    }

    // § 13.2.6.4.9 in table

    pub(crate) fn in_table_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(_)
                if matches!(
                    self.current_tag(),
                    Some("table" | "tbody" | "template" | "tfoot" | "thead" | "tr")
                ) =>
            {
                self.pending_table_text.clear();
                self.original_mode = Some(self.mode);
                self.mode = InsertionMode::InTableText;
                Control::Reprocess
            }
            Token::Character(_) => self.in_table_anything_else(token),
            Token::Comment(data) => {
                self.insert_comment(data);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "caption" => {
                    self.clear_back_to_table_context();
                    self.formatting.push_marker();
                    let _ = self.insert_element(name, attributes);
                    self.mode = InsertionMode::InCaption;
                    Control::Done
                }
                "colgroup" => {
                    self.clear_back_to_table_context();
                    let _ = self.insert_element(name, attributes);
                    self.mode = InsertionMode::InColumnGroup;
                    Control::Done
                }
                "col" => {
                    self.clear_back_to_table_context();
                    let _ = self.insert_phantom("colgroup");
                    self.mode = InsertionMode::InColumnGroup;
                    Control::Reprocess
                }
                "tbody" | "tfoot" | "thead" => {
                    self.clear_back_to_table_context();
                    let _ = self.insert_element(name, attributes);
                    self.mode = InsertionMode::InTableBody;
                    Control::Done
                }
                "td" | "th" | "tr" => {
                    self.clear_back_to_table_context();
                    let _ = self.insert_phantom("tbody");
                    self.mode = InsertionMode::InTableBody;
                    Control::Reprocess
                }
                "table" => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    if !self.open.has_tag_in_scope(&self.tree, "table", Scope::Table) {
                        return Control::Done;
                    }
                    self.open.pop_until_tag(&self.tree, "table");
                    self.reset_insertion_mode();
                    Control::Reprocess
                }
                "style" | "script" | "template" => self.in_head_mode(token),
                "input" => {
                    let hidden = attributes.iter().any(|a| {
                        a.name == "type" && a.value.eq_ignore_ascii_case("hidden")
                    });
                    if hidden {
                        self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                        let _ = self.insert_element(name, attributes);
                        let _ = self.open.pop();
                        Control::Done
                    } else {
                        self.in_table_anything_else(token)
                    }
                }
                "form" => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    if self.form.is_none() && !self.open.contains_tag(&self.tree, "template") {
                        let form = self.insert_element(name, attributes);
                        self.form = Some(form);
                        let _ = self.open.pop();
                    }
                    Control::Done
                }
                _ => self.in_table_anything_else(token),
            },
            Token::EndTag { name, .. } => match name.as_str() {
                "table" => {
                    if !self.open.has_tag_in_scope(&self.tree, "table", Scope::Table) {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                        return Control::Done;
                    }
                    self.open.pop_until_tag(&self.tree, "table");
                    self.reset_insertion_mode();
                    Control::Done
                }
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
                "template" => self.in_head_mode(token),
                _ => self.in_table_anything_else(token),
            },
            Token::EndOfFile => self.in_body_mode(token),
        }
    }

    /// Anything-else in table context: process with the in-body rules while
    /// foster parenting is enabled.
    fn in_table_anything_else(&mut self, token: &Token) -> Control {
        self.error(ParseErrorKind::UnexpectedCharacters);
        self.foster_parenting = true;
        let control = self.in_body_mode(token);
        self.foster_parenting = false;
        control
    }

    // § 13.2.6.4.10 in table text

    pub(crate) fn in_table_text_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                Control::Done
            }
            Token::Character(c) => {
                self.pending_table_text.push(*c);
                Control::Done
            }
            _ => {
                let pending = std::mem::take(&mut self.pending_table_text);
                if pending.iter().all(|c| is_parser_whitespace(*c)) {
                    for c in pending {
                        self.insert_character(c);
                    }
                } else {
                    // Non-whitespace leaked out of the table; foster-parent
                    // the run like any other stray content.
                    self.error(ParseErrorKind::UnexpectedCharacters);
                    self.foster_parenting = true;
                    for c in pending {
                        self.reconstruct_active_formatting_elements();
                        self.insert_character(c);
                        if !is_parser_whitespace(c) {
                            self.frameset_ok = false;
                        }
                    }
                    self.foster_parenting = false;
                }
                self.mode = self.original_mode.take().unwrap_or(InsertionMode::InTable);
                Control::Reprocess
            }
        }
    }

    // § 13.2.6.4.11 in caption

    pub(crate) fn in_caption_mode(&mut self, token: &Token) -> Control {
        let close_caption = |builder: &mut Self, name: &str| -> bool {
            if !builder
                .open
                .has_tag_in_scope(&builder.tree, "caption", Scope::Table)
            {
                builder.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
                return false;
            }
            builder.generate_implied_end_tags(None);
            if builder.current_tag() != Some("caption") {
                builder.error(ParseErrorKind::MisnestedEndTag(name.to_string()));
            }
            builder.open.pop_until_tag(&builder.tree, "caption");
            builder.formatting.clear_to_last_marker();
            builder.mode = InsertionMode::InTable;
            true
        };

        match token {
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th"
                        | "thead" | "tr"
                ) =>
            {
                if close_caption(self, name) {
                    Control::Reprocess
                } else {
                    Control::Done
                }
            }
            Token::EndTag { name, .. } => match name.as_str() {
                "caption" => {
                    let _ = close_caption(self, name);
                    Control::Done
                }
                "table" => {
                    if close_caption(self, name) {
                        Control::Reprocess
                    } else {
                        Control::Done
                    }
                }
                "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                | "thead" | "tr" => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
                _ => self.in_body_mode(token),
            },
            _ => self.in_body_mode(token),
        }
    }

    // § 13.2.6.4.12 in column group

    pub(crate) fn in_column_group_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(c) if is_parser_whitespace(*c) => {
                self.insert_character(*c);
                Control::Done
            }
            Token::Comment(data) => {
                self.insert_comment(data);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.in_body_mode(token),
                "col" => {
                    let _ = self.insert_element(name, attributes);
                    let _ = self.open.pop();
                    Control::Done
                }
                "template" => self.in_head_mode(token),
                _ => self.in_column_group_anything_else(token),
            },
            Token::EndTag { name, .. } => match name.as_str() {
                "colgroup" => {
                    if self.current_tag() == Some("colgroup") {
                        let _ = self.open.pop();
                        self.mode = InsertionMode::InTable;
                    } else {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    }
                    Control::Done
                }
                // A col element is never on the stack, so its end tag has
                // nothing to close.
                "col" => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
                "template" => self.in_head_mode(token),
                _ => self.in_column_group_anything_else(token),
            },
            Token::EndOfFile => self.in_body_mode(token),
            Token::Character(_) => self.in_column_group_anything_else(token),
        }
    }

    fn in_column_group_anything_else(&mut self, token: &Token) -> Control {
        if self.current_tag() == Some("colgroup") {
            let _ = self.open.pop();
            self.mode = InsertionMode::InTable;
            Control::Reprocess
        } else {
            match token {
                Token::StartTag { name, .. } => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                }
                Token::EndTag { name, .. } => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                }
                _ => self.error(ParseErrorKind::UnexpectedCharacters),
            }
            Control::Done
        }
    }

    // § 13.2.6.4.13 in table body

    pub(crate) fn in_table_body_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "tr" => {
                    self.clear_back_to_table_body_context();
                    let _ = self.insert_element(name, attributes);
                    self.mode = InsertionMode::InRow;
                    Control::Done
                }
                "th" | "td" => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    self.clear_back_to_table_body_context();
                    let _ = self.insert_phantom("tr");
                    self.mode = InsertionMode::InRow;
                    Control::Reprocess
                }
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.leave_table_body(name)
                }
                _ => self.in_table_mode(token),
            },
            Token::EndTag { name, .. } => match name.as_str() {
                "tbody" | "tfoot" | "thead" => {
                    if !self.open.has_tag_in_scope(&self.tree, name, Scope::Table) {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                        return Control::Done;
                    }
                    self.clear_back_to_table_body_context();
                    let _ = self.open.pop();
                    self.mode = InsertionMode::InTable;
                    Control::Done
                }
                "table" => self.leave_table_body(name),
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr" => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
                _ => self.in_table_mode(token),
            },
            _ => self.in_table_mode(token),
        }
    }

    /// Close the current table section and hand the token back to the
    /// in-table mode.
    fn leave_table_body(&mut self, name: &str) -> Control {
        let any_section = ["tbody", "thead", "tfoot"]
            .iter()
            .any(|t| self.open.has_tag_in_scope(&self.tree, t, Scope::Table));
        if !any_section {
            self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
            return Control::Done;
        }
        self.clear_back_to_table_body_context();
        let _ = self.open.pop();
        self.mode = InsertionMode::InTable;
        Control::Reprocess
    }

    // § 13.2.6.4.14 in row

    pub(crate) fn in_row_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "th" | "td" => {
                    self.clear_back_to_table_row_context();
                    let _ = self.insert_element(name, attributes);
                    self.mode = InsertionMode::InCell;
                    self.formatting.push_marker();
                    Control::Done
                }
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
                    self.leave_row(name)
                }
                _ => self.in_table_mode(token),
            },
            Token::EndTag { name, .. } => match name.as_str() {
                "tr" => {
                    if !self.open.has_tag_in_scope(&self.tree, "tr", Scope::Table) {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                        return Control::Done;
                    }
                    self.clear_back_to_table_row_context();
                    let _ = self.open.pop();
                    self.mode = InsertionMode::InTableBody;
                    Control::Done
                }
                "table" => self.leave_row(name),
                "tbody" | "tfoot" | "thead" => {
                    if !self.open.has_tag_in_scope(&self.tree, name, Scope::Table) {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                        return Control::Done;
                    }
                    if !self.open.has_tag_in_scope(&self.tree, "tr", Scope::Table) {
                        return Control::Done;
                    }
                    self.clear_back_to_table_row_context();
                    let _ = self.open.pop();
                    self.mode = InsertionMode::InTableBody;
                    Control::Reprocess
                }
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
                _ => self.in_table_mode(token),
            },
            _ => self.in_table_mode(token),
        }
    }

    /// Close the current row and hand the token back to the in-table-body
    /// mode.
    fn leave_row(&mut self, name: &str) -> Control {
        if !self.open.has_tag_in_scope(&self.tree, "tr", Scope::Table) {
            self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
            return Control::Done;
        }
        self.clear_back_to_table_row_context();
        let _ = self.open.pop();
        self.mode = InsertionMode::InTableBody;
        Control::Reprocess
    }

    // § 13.2.6.4.15 in cell

    pub(crate) fn in_cell_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th"
                        | "thead" | "tr"
                ) =>
            {
                let open_cell = ["td", "th"]
                    .iter()
                    .any(|t| self.open.has_tag_in_scope(&self.tree, t, Scope::Table));
                if !open_cell {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    return Control::Done;
                }
                self.close_the_cell();
                Control::Reprocess
            }
            Token::EndTag { name, .. } => match name.as_str() {
                "td" | "th" => {
                    if !self.open.has_tag_in_scope(&self.tree, name, Scope::Table) {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                        return Control::Done;
                    }
                    self.generate_implied_end_tags(None);
                    if self.current_tag() != Some(name.as_str()) {
                        self.error(ParseErrorKind::MisnestedEndTag(name.clone()));
                    }
                    self.open.pop_until_tag(&self.tree, name);
                    self.formatting.clear_to_last_marker();
                    self.mode = InsertionMode::InRow;
                    Control::Done
                }
                "body" | "caption" | "col" | "colgroup" | "html" => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
                "table" | "tbody" | "tfoot" | "thead" | "tr" => {
                    if !self.open.has_tag_in_scope(&self.tree, name, Scope::Table) {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                        return Control::Done;
                    }
                    self.close_the_cell();
                    Control::Reprocess
                }
                _ => self.in_body_mode(token),
            },
            _ => self.in_body_mode(token),
        }
    }

    // § 13.2.6.4.16 in select

    pub(crate) fn in_select_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                Control::Done
            }
            Token::Character(c) => {
                self.insert_character(*c);
                Control::Done
            }
            Token::Comment(data) => {
                self.insert_comment(data);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.in_body_mode(token),
                "option" => {
                    if self.current_tag() == Some("option") {
                        let _ = self.open.pop();
                    }
                    let _ = self.insert_element(name, attributes);
                    Control::Done
                }
                "optgroup" => {
                    if self.current_tag() == Some("option") {
                        let _ = self.open.pop();
                    }
                    if self.current_tag() == Some("optgroup") {
                        let _ = self.open.pop();
                    }
                    let _ = self.insert_element(name, attributes);
                    Control::Done
                }
                "hr" => {
                    if self.current_tag() == Some("option") {
                        let _ = self.open.pop();
                    }
                    if self.current_tag() == Some("optgroup") {
                        let _ = self.open.pop();
                    }
                    let _ = self.insert_element(name, attributes);
                    let _ = self.open.pop();
                    Control::Done
                }
                "select" => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    if self.open.has_tag_in_scope(&self.tree, "select", Scope::Select) {
                        self.open.pop_until_tag(&self.tree, "select");
                        self.reset_insertion_mode();
                    }
                    Control::Done
                }
                "input" | "keygen" | "textarea" => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    if !self.open.has_tag_in_scope(&self.tree, "select", Scope::Select) {
                        return Control::Done;
                    }
                    self.open.pop_until_tag(&self.tree, "select");
                    self.reset_insertion_mode();
                    Control::Reprocess
                }
                "script" | "template" => self.in_head_mode(token),
                _ => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    Control::Done
                }
            },
            Token::EndTag { name, .. } => match name.as_str() {
                "optgroup" => {
                    if self.current_tag() == Some("option") && self.open.len() >= 2 {
                        let above = self.open.get(self.open.len() - 2);
                        if above.and_then(|n| self.tree.tag_name(n)) == Some("optgroup") {
                            let _ = self.open.pop();
                        }
                    }
                    if self.current_tag() == Some("optgroup") {
                        let _ = self.open.pop();
                    } else {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    }
                    Control::Done
                }
                "option" => {
                    if self.current_tag() == Some("option") {
                        let _ = self.open.pop();
                    } else {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    }
                    Control::Done
                }
                "select" => {
                    if !self.open.has_tag_in_scope(&self.tree, "select", Scope::Select) {
                        self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                        return Control::Done;
                    }
                    self.open.pop_until_tag(&self.tree, "select");
                    self.reset_insertion_mode();
                    Control::Done
                }
                "template" => self.in_head_mode(token),
                _ => {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
            },
            Token::EndOfFile => self.in_body_mode(token),
        }
    }

    // § 13.2.6.4.17 in select in table

    pub(crate) fn in_select_in_table_mode(&mut self, token: &Token) -> Control {
        const TABLE_PARTS: &[&str] = &[
            "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
        ];
        match token {
            Token::StartTag { name, .. } if TABLE_PARTS.contains(&name.as_str()) => {
                self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                self.open.pop_until_tag(&self.tree, "select");
                self.reset_insertion_mode();
                Control::Reprocess
            }
            Token::EndTag { name, .. } if TABLE_PARTS.contains(&name.as_str()) => {
                self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                if !self.open.has_tag_in_scope(&self.tree, name, Scope::Table) {
                    return Control::Done;
                }
                self.open.pop_until_tag(&self.tree, "select");
                self.reset_insertion_mode();
                Control::Reprocess
            }
            _ => self.in_select_mode(token),
        }
    }

    // § 13.2.6.4.18 in template

    pub(crate) fn in_template_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(_) | Token::Comment(_) | Token::Doctype { .. } => {
                self.in_body_mode(token)
            }
            Token::StartTag { name, .. } => match name.as_str() {
                _ if IN_HEAD_DEFERRED.contains(&name.as_str()) => self.in_head_mode(token),
                "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.retarget_template(InsertionMode::InTable)
                }
                "col" => self.retarget_template(InsertionMode::InColumnGroup),
                "tr" => self.retarget_template(InsertionMode::InTableBody),
                "td" | "th" => self.retarget_template(InsertionMode::InRow),
                _ => self.retarget_template(InsertionMode::InBody),
            },
            Token::EndTag { name, .. } => {
                if name == "template" {
                    self.in_head_mode(token)
                } else {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    Control::Done
                }
            }
            Token::EndOfFile => {
                if !self.open.contains_tag(&self.tree, "template") {
                    self.done = true;
                    return Control::Done;
                }
                self.error(ParseErrorKind::UnexpectedEof);
                self.open.pop_until_tag(&self.tree, "template");
                self.formatting.clear_to_last_marker();
                let _ = self.template_modes.pop();
                self.reset_insertion_mode();
                Control::Reprocess
            }
        }
    }

    /// Swap the current template insertion mode and reprocess.
    fn retarget_template(&mut self, mode: InsertionMode) -> Control {
        let _ = self.template_modes.pop();
        self.template_modes.push(mode);
        self.mode = mode;
        Control::Reprocess
    }

    // § 13.2.6.4.19 after body

    pub(crate) fn after_body_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(c) if is_parser_whitespace(*c) => self.in_body_mode(token),
            Token::Comment(data) => {
                // Comments after the body land on the html element itself.
                let html = self.open.get(0).unwrap_or(NodeId::ROOT);
                self.insert_comment_into(data, html);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),
            Token::EndTag { name, .. } if name == "html" => {
                self.mode = InsertionMode::AfterAfterBody;
                Control::Done
            }
            Token::EndOfFile => {
                self.done = true;
                Control::Done
            }
            _ => {
                self.error(ParseErrorKind::UnexpectedCharacters);
                self.mode = InsertionMode::InBody;
                Control::Reprocess
            }
        }
    }

    // § 13.2.6.4.20 in frameset

    pub(crate) fn in_frameset_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(c) if is_parser_whitespace(*c) => {
                self.insert_character(*c);
                Control::Done
            }
            Token::Comment(data) => {
                self.insert_comment(data);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.in_body_mode(token),
                "frameset" => {
                    let _ = self.insert_element(name, attributes);
                    Control::Done
                }
                "frame" => {
                    let _ = self.insert_element(name, attributes);
                    let _ = self.open.pop();
                    Control::Done
                }
                "noframes" => self.in_head_mode(token),
                _ => {
                    self.error(ParseErrorKind::UnexpectedStartTag(name.clone()));
                    Control::Done
                }
            },
            Token::EndTag { name, .. } if name == "frameset" => {
                if self.current_tag() == Some("html") {
                    self.error(ParseErrorKind::UnexpectedEndTag(name.clone()));
                    return Control::Done;
                }
                let _ = self.open.pop();
                if self.current_tag() != Some("frameset") {
                    self.mode = InsertionMode::AfterFrameset;
                }
                Control::Done
            }
            Token::EndOfFile => {
                if self.current_tag() != Some("html") {
                    self.error(ParseErrorKind::UnexpectedEof);
                }
                self.done = true;
                Control::Done
            }
            _ => {
                self.error(ParseErrorKind::UnexpectedCharacters);
                Control::Done
            }
        }
    }

    // § 13.2.6.4.21 after frameset

    pub(crate) fn after_frameset_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Character(c) if is_parser_whitespace(*c) => {
                self.insert_character(*c);
                Control::Done
            }
            Token::Comment(data) => {
                self.insert_comment(data);
                Control::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                Control::Done
            }
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),
            Token::StartTag { name, .. } if name == "noframes" => self.in_head_mode(token),
            Token::EndTag { name, .. } if name == "html" => {
                self.mode = InsertionMode::AfterAfterFrameset;
                Control::Done
            }
            Token::EndOfFile => {
                self.done = true;
                Control::Done
            }
            _ => {
                self.error(ParseErrorKind::UnexpectedCharacters);
                Control::Done
            }
        }
    }

    // § 13.2.6.4.22 after after body

    pub(crate) fn after_after_body_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Comment(data) => {
                self.insert_comment_into(data, NodeId::ROOT);
                Control::Done
            }
            Token::Doctype { .. } => self.in_body_mode(token),
            Token::Character(c) if is_parser_whitespace(*c) => self.in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),
            Token::EndOfFile => {
                self.done = true;
                Control::Done
            }
            _ => {
                self.error(ParseErrorKind::UnexpectedCharacters);
                self.mode = InsertionMode::InBody;
                Control::Reprocess
            }
        }
    }

    // § 13.2.6.4.23 after after frameset

    pub(crate) fn after_after_frameset_mode(&mut self, token: &Token) -> Control {
        match token {
            Token::Comment(data) => {
                self.insert_comment_into(data, NodeId::ROOT);
                Control::Done
            }
            Token::Doctype { .. } => self.in_body_mode(token),
            Token::Character(c) if is_parser_whitespace(*c) => self.in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),
            Token::StartTag { name, .. } if name == "noframes" => self.in_head_mode(token),
            Token::EndOfFile => {
                self.done = true;
                Control::Done
            }
            _ => {
                self.error(ParseErrorKind::UnexpectedCharacters);
                Control::Done
            }
        }
    }
}
