// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small owned SVG element tree.
//!
//! Parsing goes through `roxmltree` and keeps only what renders: elements in
//! the SVG namespace (or no namespace), their plain, `xlink:` and `xml:`
//! attributes, and non-blank text. Editor metadata in foreign namespaces is
//! dropped with its whole subtree.

use core::fmt::{self, Write as _};

use crate::error::SvgError;

/// The SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// The XLink namespace URI.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A child of an [`Element`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data.
    Text(String),
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Self::Element(e)
    }
}

/// An element with ordered attributes and children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses an SVG document and returns its `<svg>` root.
    pub fn parse_svg(text: &str) -> Result<Self, SvgError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        let root = doc.root_element();
        match convert(root) {
            Some(el) if el.name == "svg" => Ok(el),
            _ => Err(SvgError::MissingSvgRoot {
                found: root.tag_name().name().to_owned(),
            }),
        }
    }

    /// Local element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of attribute `name`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets attribute `name`, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_owned(), value)),
        }
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct child elements.
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Self> + '_ {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Appends a child.
    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push(child);
        self
    }

    /// Appends a text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Concatenated text of every descendant text node.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// This element and all descendant elements, in document order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First element in document order with the given id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Self> {
        self.descendants().find(|e| e.id() == Some(id))
    }

    /// Calls `f` on this element and every descendant element.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Self)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(e) = child {
                e.for_each_mut(f);
            }
        }
    }

    /// Removes every descendant element (with its subtree) for which `keep`
    /// returns false. The element itself is never removed.
    pub fn retain(&mut self, keep: &mut impl FnMut(&Self) -> bool) {
        self.children.retain(|n| match n {
            Node::Element(e) => keep(e),
            Node::Text(_) => true,
        });
        for child in &mut self.children {
            if let Node::Element(e) = child {
                e.retain(keep);
            }
        }
    }

    /// Serializes as a standalone document, declaring the SVG and XLink
    /// namespaces on the root.
    #[must_use]
    pub fn to_document_string(&self) -> String {
        let mut extra = Vec::new();
        if self.attr("xmlns").is_none() {
            extra.push(("xmlns", SVG_NS));
        }
        if self.attr("xmlns:xlink").is_none() {
            extra.push(("xmlns:xlink", XLINK_NS));
        }
        let mut out = String::new();
        let _ = write_element(&mut out, self, &extra);
        out
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_element(f, self, &[])
    }
}

/// Pre-order iterator returned by [`Element::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.child_elements().rev());
        Some(next)
    }
}

/// Formats a coordinate for an attribute: at most three decimals, no
/// trailing zeros, never `-0`.
#[must_use]
pub fn number(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_owned();
    }
    let r = (v * 1000.0).round() / 1000.0;
    let r = if r == 0.0 { 0.0 } else { r };
    format!("{r}")
}

fn convert(node: roxmltree::Node<'_, '_>) -> Option<Element> {
    let ns = node.tag_name().namespace();
    if !matches!(ns, None | Some(SVG_NS)) {
        return None;
    }
    let mut el = Element::new(node.tag_name().name());
    for a in node.attributes() {
        let name = match a.namespace() {
            None => a.name().to_owned(),
            Some(XLINK_NS) => format!("xlink:{}", a.name()),
            Some(XML_NS) => format!("xml:{}", a.name()),
            Some(_) => continue,
        };
        el.attributes.push((name, a.value().to_owned()));
    }
    for child in node.children() {
        if child.is_element() {
            if let Some(c) = convert(child) {
                el.children.push(Node::Element(c));
            }
        } else if child.is_text() {
            if let Some(text) = child.text().filter(|t| !t.trim().is_empty()) {
                el.children.push(Node::Text(text.to_owned()));
            }
        }
    }
    Some(el)
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Element(e) => collect_text(e, out),
            Node::Text(t) => out.push_str(t),
        }
    }
}

fn write_element(out: &mut impl fmt::Write, el: &Element, extra: &[(&str, &str)]) -> fmt::Result {
    write!(out, "<{}", el.name)?;
    for (k, v) in extra.iter().copied().chain(el.attributes()) {
        write!(out, " {k}=\"")?;
        escape(out, v, true)?;
        out.write_char('"')?;
    }
    if el.children.is_empty() {
        return out.write_str("/>");
    }
    out.write_char('>')?;
    for child in &el.children {
        match child {
            Node::Element(e) => write_element(out, e, &[])?,
            Node::Text(t) => escape(out, t, false)?,
        }
    }
    write!(out, "</{}>", el.name)
}

fn escape(out: &mut impl fmt::Write, s: &str, attr: bool) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' if attr => out.write_str("&quot;")?,
            _ => out.write_char(c)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAWING: &str = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" viewBox="0 0 10 10">
  <inkscape:grid spacing="2"/>
  <g id="layer" inkscape:label="Layer 1">
    <use xlink:href="#dot"/>
    <text x="1">A &amp; B</text>
  </g>
</svg>"#;

    #[test]
    fn parse_keeps_svg_and_drops_foreign() {
        let root = Element::parse_svg(DRAWING).unwrap();
        assert_eq!(root.name(), "svg");
        assert_eq!(root.attr("viewBox"), Some("0 0 10 10"));
        let names: Vec<&str> = root.descendants().map(Element::name).collect();
        assert_eq!(names, ["svg", "g", "use", "text"]);
        let layer = root.find_by_id("layer").unwrap();
        assert_eq!(layer.attributes().count(), 1);
        let usage = layer.child_elements().next().unwrap();
        assert_eq!(usage.attr("xlink:href"), Some("#dot"));
        assert_eq!(root.text(), "A & B");
    }

    #[test]
    fn non_svg_root_is_rejected() {
        let err = Element::parse_svg("<html/>").unwrap_err();
        assert!(matches!(err, SvgError::MissingSvgRoot { ref found } if found == "html"));
        assert!(matches!(Element::parse_svg("<svg"), Err(SvgError::Parse(_))));
    }

    #[test]
    fn serialization_escapes_and_declares_namespaces() {
        let el = Element::new("svg").with_child(
            Element::new("text")
                .with_attr("data-note", "say \"hi\"")
                .with_text("1 < 2"),
        );
        assert_eq!(
            el.to_document_string(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" \
             xmlns:xlink=\"http://www.w3.org/1999/xlink\">\
             <text data-note=\"say &quot;hi&quot;\">1 &lt; 2</text></svg>"
        );
        assert_eq!(Element::new("g").to_string(), "<g/>");
    }

    #[test]
    fn reparse_of_serialized_tree_is_equal() {
        let root = Element::parse_svg(DRAWING).unwrap();
        let again = Element::parse_svg(&root.to_document_string()).unwrap();
        assert_eq!(root, again);
    }

    #[test]
    fn retain_and_set_attr() {
        let mut root = Element::parse_svg(DRAWING).unwrap();
        root.retain(&mut |e| e.name() != "use");
        assert_eq!(root.descendants().count(), 3);
        root.set_attr("viewBox", "0 0 5 5");
        assert_eq!(root.attributes().next(), Some(("viewBox", "0 0 5 5")));
        root.set_attr("viewBox", "0 0 9 9");
        assert_eq!(root.attr("viewBox"), Some("0 0 9 9"));
        assert_eq!(root.attributes().count(), 1);
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(number(2000.0), "2000");
        assert_eq!(number(0.1 + 0.2), "0.3");
        assert_eq!(number(-0.0001), "0");
        assert_eq!(number(f64::NAN), "0");
        assert_eq!(number(-12.3456), "-12.346");
    }
}
