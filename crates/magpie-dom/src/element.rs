//! Element data and element-interface resolution.

use std::collections::HashSet;

use crate::attributes::Attributes;

/// The namespace an element was created in.
///
/// [§ 1.4 Namespaces](https://dom.spec.whatwg.org/#namespaces)
///
/// This parser only builds HTML-namespace elements; the variant is recorded
/// so consumers can distinguish content once foreign-content support exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Namespace {
    /// `http://www.w3.org/1999/xhtml`
    #[default]
    Html,
    /// `http://www.w3.org/2000/svg`
    Svg,
    /// `http://www.w3.org/1998/Math/MathML`
    MathMl,
}

/// The element interface a tag name resolves to.
///
/// [§ 3.2.2 Elements in the DOM](https://html.spec.whatwg.org/multipage/dom.html#elements-in-the-dom)
///
/// "The basic interface, from which all the HTML elements' interfaces inherit
/// ... is the HTMLElement interface." Tag names with a specialized interface
/// get their own variant; recognized names without one resolve to [`Generic`]
/// and unrecognized names to [`Unknown`]. Resolution never fails.
///
/// [`Generic`]: ElementKind::Generic
/// [`Unknown`]: ElementKind::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<a>`
    Anchor,
    /// `<body>`
    Body,
    /// `<br>`
    Break,
    /// `<button>`
    Button,
    /// `<caption>`
    TableCaption,
    /// `<col>` and `<colgroup>`
    TableColumn,
    /// `<div>`
    Division,
    /// `<dl>`
    DescriptionList,
    /// `<form>`
    Form,
    /// `<frame>`
    Frame,
    /// `<frameset>`
    FrameSet,
    /// `<head>`
    Head,
    /// `<h1>` through `<h6>`
    Heading,
    /// `<hr>`
    HorizontalRule,
    /// `<html>`
    Html,
    /// `<iframe>`
    InlineFrame,
    /// `<img>`
    Image,
    /// `<input>`
    Input,
    /// `<label>`
    Label,
    /// `<li>`
    ListItem,
    /// `<link>`
    Link,
    /// `<meta>`
    Meta,
    /// `<object>`
    Object,
    /// `<ol>`
    OrderedList,
    /// `<optgroup>`
    OptionGroup,
    /// `<option>`
    OptionItem,
    /// `<p>`
    Paragraph,
    /// `<pre>`
    Preformatted,
    /// `<script>`
    Script,
    /// `<select>`
    Select,
    /// `<span>`
    Span,
    /// `<style>`
    Style,
    /// `<table>`
    Table,
    /// `<td>` and `<th>`
    TableCell,
    /// `<tr>`
    TableRow,
    /// `<thead>`, `<tbody>` and `<tfoot>`
    TableSection,
    /// `<template>`
    Template,
    /// `<textarea>`
    TextArea,
    /// `<title>`
    Title,
    /// `<ul>`
    UnorderedList,
    /// A recognized HTML element using the base interface (e.g. `<section>`).
    Generic,
    /// A tag name with no HTML meaning (custom or misspelled).
    Unknown,
}

impl ElementKind {
    /// Resolve a lowercase tag name to its element interface.
    ///
    /// Unrecognized names resolve to [`ElementKind::Unknown`]; this function
    /// cannot fail.
    #[must_use]
    pub fn from_tag_name(tag_name: &str) -> Self {
        match tag_name {
            "a" => ElementKind::Anchor,
            "body" => ElementKind::Body,
            "br" => ElementKind::Break,
            "button" => ElementKind::Button,
            "caption" => ElementKind::TableCaption,
            "col" | "colgroup" => ElementKind::TableColumn,
            "div" => ElementKind::Division,
            "dl" => ElementKind::DescriptionList,
            "form" => ElementKind::Form,
            "frame" => ElementKind::Frame,
            "frameset" => ElementKind::FrameSet,
            "head" => ElementKind::Head,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => ElementKind::Heading,
            "hr" => ElementKind::HorizontalRule,
            "html" => ElementKind::Html,
            "iframe" => ElementKind::InlineFrame,
            "img" => ElementKind::Image,
            "input" => ElementKind::Input,
            "label" => ElementKind::Label,
            "li" => ElementKind::ListItem,
            "link" => ElementKind::Link,
            "meta" => ElementKind::Meta,
            "object" => ElementKind::Object,
            "ol" => ElementKind::OrderedList,
            "optgroup" => ElementKind::OptionGroup,
            "option" => ElementKind::OptionItem,
            "p" => ElementKind::Paragraph,
            "pre" => ElementKind::Preformatted,
            "script" => ElementKind::Script,
            "select" => ElementKind::Select,
            "span" => ElementKind::Span,
            "style" => ElementKind::Style,
            "table" => ElementKind::Table,
            "td" | "th" => ElementKind::TableCell,
            "tr" => ElementKind::TableRow,
            "thead" | "tbody" | "tfoot" => ElementKind::TableSection,
            "template" => ElementKind::Template,
            "textarea" => ElementKind::TextArea,
            "title" => ElementKind::Title,
            "ul" => ElementKind::UnorderedList,
            name if is_base_interface_element(name) => ElementKind::Generic,
            _ => ElementKind::Unknown,
        }
    }
}

/// Recognized HTML element names that use the base element interface.
fn is_base_interface_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "abbr"
            | "address"
            | "article"
            | "aside"
            | "b"
            | "bdi"
            | "bdo"
            | "big"
            | "center"
            | "cite"
            | "code"
            | "dd"
            | "dfn"
            | "dt"
            | "em"
            | "figcaption"
            | "figure"
            | "footer"
            | "header"
            | "hgroup"
            | "i"
            | "kbd"
            | "main"
            | "mark"
            | "nav"
            | "nobr"
            | "noembed"
            | "noframes"
            | "noscript"
            | "plaintext"
            | "rb"
            | "rp"
            | "rt"
            | "rtc"
            | "ruby"
            | "s"
            | "samp"
            | "section"
            | "small"
            | "strike"
            | "strong"
            | "sub"
            | "summary"
            | "sup"
            | "tt"
            | "u"
            | "var"
            | "wbr"
            | "xmp"
    )
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace ... local name" and "an associated
/// attribute list".
#[derive(Debug, Clone)]
pub struct ElementData {
    /// The element's local name, lowercase.
    pub tag_name: String,
    /// The interface the tag name resolved to at creation time.
    pub kind: ElementKind,
    /// The namespace the element was created in.
    pub namespace: Namespace,
    /// The element's attribute list, in source order.
    pub attributes: Attributes,
}

impl ElementData {
    /// Create element data, resolving the interface from the tag name.
    #[must_use]
    pub fn new(tag_name: String, attributes: Attributes) -> Self {
        let kind = ElementKind::from_tag_name(&tag_name);
        ElementData {
            tag_name,
            kind,
            namespace: Namespace::Html,
            attributes,
        }
    }

    /// The element's id attribute value, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id")
    }

    /// The set of class names from the class attribute.
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        match self.attributes.get("class") {
            Some(classlist) => classlist.split_ascii_whitespace().collect(),
            None => HashSet::new(),
        }
    }
}
