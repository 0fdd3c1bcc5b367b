//! HTML5 parser front end using html5ever's TreeSink.
//!
//! html5ever drives tree construction (with browser-compatible error recovery)
//! into an indextree arena; the finished arena is then folded into the owned
//! [`Document`] / [`MarkupNode`] tree the transpiler consumes.

use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, Namespace, QualName, parse_document as html5ever_parse};
use indextree::{Arena, NodeId};
use std::borrow::Cow;
use std::cell::RefCell;
use tendril::{StrTendril, TendrilSink};

use crate::markup::{
    self, Document, Element, MarkupNode, PROCESSING_INSTRUCTION_NODE, UnrecognizedNode,
};

/// Parse an HTML string into a [`Document`].
///
/// Parsing never fails: like a browser, html5ever recovers from malformed input,
/// so the result always has an `<html>` root with `<head>` and `<body>`.
///
/// Nesting depth is not capped. Building the tree, and transpiling it later,
/// recurse once per level, so input nested tens of thousands of elements deep
/// can exhaust the thread's stack.
///
/// ```rust
/// let doc = html2dream::parse_document("<!DOCTYPE html><p class=lead>Hi");
/// assert_eq!(doc.doctype.as_deref(), Some("html"));
/// assert_eq!(doc.root().map(|e| e.tag.as_str()), Some("html"));
/// ```
pub fn parse_document(html: &str) -> Document {
    let sink = ArenaSink::new();
    html5ever_parse(sink, Default::default()).one(StrTendril::from(html))
}

/// Parse an HTML snippet and return its top-level nodes.
///
/// html5ever hoists metadata content (`<meta>`, `<link>`, `<title>`, ...) into
/// `<head>`, so the children of `<head>` come first, followed by the children
/// of `<body>`.
pub fn parse_fragment(html: &str) -> Vec<MarkupNode> {
    let doc = parse_document(html);
    let root = doc.children.into_iter().find_map(|node| match node {
        MarkupNode::Element(e) => Some(e),
        _ => None,
    });
    root.into_iter()
        .flat_map(|root| root.children)
        .filter_map(|child| match child {
            MarkupNode::Element(e) if e.tag == "head" || e.tag == "body" => Some(e.children),
            _ => None,
        })
        .flatten()
        .collect()
}

/// What goes in each arena slot while parsing
#[derive(Debug, Clone)]
enum ParseNode {
    /// Document root (invisible, parent of `<html>`)
    Document,
    Element {
        name: QualName,
        /// Source order, first occurrence wins
        attrs: Vec<(String, String)>,
    },
    Text(StrTendril),
    Comment(StrTendril),
    ProcessingInstruction { target: StrTendril },
}

/// Owned element name handed back to html5ever
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink building into an arena, wrapped in RefCell for interior mutability
struct ArenaSink {
    arena: RefCell<Arena<ParseNode>>,
    /// Document node (parent of `<html>`)
    document: NodeId,
    doctype: RefCell<Option<StrTendril>>,
}

impl ArenaSink {
    fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(ParseNode::Document);
        ArenaSink {
            arena: RefCell::new(arena),
            document,
            doctype: RefCell::new(None),
        }
    }

    fn new_text(&self, text: StrTendril) -> NodeId {
        self.arena.borrow_mut().new_node(ParseNode::Text(text))
    }
}

/// Attribute name as written in the source.
///
/// html5ever splits foreign attributes like `xlink:href` into a prefix and a
/// local name; the prefix goes back on so they don't collide with `href`.
fn attr_key(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.to_string(),
    }
}

/// Fold an arena subtree into an owned markup node.
fn build_node(arena: &Arena<ParseNode>, id: NodeId) -> Option<MarkupNode> {
    match arena[id].get() {
        ParseNode::Document => None,
        ParseNode::Element { name, attrs } => {
            let mut element = Element::new(name.local.to_string());
            element.attrs = attrs
                .iter()
                .map(|(k, v)| markup::Attribute::new(k.clone(), v.clone()))
                .collect();
            element.children = id
                .children(arena)
                .filter_map(|child| build_node(arena, child))
                .collect();
            Some(MarkupNode::Element(element))
        }
        ParseNode::Text(t) => Some(MarkupNode::Text(t.to_string())),
        ParseNode::Comment(t) => Some(MarkupNode::Comment(t.to_string())),
        ParseNode::ProcessingInstruction { target } => Some(MarkupNode::Unrecognized(
            UnrecognizedNode::new(PROCESSING_INSTRUCTION_NODE, target.to_string()),
        )),
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        let arena = self.arena.into_inner();
        let children = self
            .document
            .children(&arena)
            .filter_map(|id| build_node(&arena, id))
            .collect();

        Document {
            doctype: self.doctype.into_inner().map(|d| d.to_string()),
            children,
        }
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // html5ever recovers on its own
        debug!(msg = %_msg, "html parse error");
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let arena = self.arena.borrow();
        match arena[*target].get() {
            ParseNode::Element { name, .. } => OwnedElemName(name.clone()),
            // html5ever only asks for names of elements
            _ => OwnedElemName(QualName::new(None, Namespace::from(""), LocalName::from(""))),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let mut list: Vec<(String, String)> = Vec::with_capacity(attrs.len());
        for attr in attrs {
            let key = attr_key(&attr.name);
            if !list.iter().any(|(k, _)| k == &key) {
                list.push((key, attr.value.to_string()));
            }
        }

        self.arena
            .borrow_mut()
            .new_node(ParseNode::Element { name, attrs: list })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.arena.borrow_mut().new_node(ParseNode::Comment(text))
    }

    fn create_pi(&self, target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.arena
            .borrow_mut()
            .new_node(ParseNode::ProcessingInstruction { target })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut self.arena.borrow_mut());
            }
            NodeOrText::AppendText(text) => {
                let mut arena = self.arena.borrow_mut();
                // Merge with a preceding text node, like the DOM does
                if let Some(last) = parent.children(&arena).next_back()
                    && let ParseNode::Text(existing) = arena[last].get_mut()
                {
                    existing.push_tendril(&text);
                    return;
                }
                let text_node = arena.new_node(ParseNode::Text(text));
                parent.append(text_node, &mut arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => self.new_text(text),
        };
        sibling.insert_before(node, &mut self.arena.borrow_mut());
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        _prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        self.append(element, child);
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        *self.doctype.borrow_mut() = Some(name);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template content stays inline under the <template> element
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let ParseNode::Element { attrs: existing, .. } = arena[*target].get_mut() {
            for attr in attrs {
                let key = attr_key(&attr.name);
                if !existing.iter().any(|(k, _)| k == &key) {
                    existing.push((key, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(doc: &Document) -> &Element {
        doc.body().expect("should have body")
    }

    #[test]
    fn test_parse_simple_html() {
        let doc = parse_document("<html><body><p>Hello</p></body></html>");

        let root = doc.root().expect("should have root");
        assert_eq!(root.tag, "html");

        let p = body(&doc).children[0].as_element().expect("body should have p");
        assert_eq!(p.tag, "p");
        assert_eq!(p.children, vec![MarkupNode::Text("Hello".to_string())]);
    }

    #[test]
    fn test_parse_attributes_keep_source_order() {
        let doc = parse_document(r#"<div id="main" class="container" data-x="1">x</div>"#);
        let div = body(&doc).children[0].as_element().unwrap();

        let names: Vec<&str> = div.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["id", "class", "data-x"]);
        assert_eq!(div.get_attr("class"), Some("container"));
    }

    #[test]
    fn test_parse_duplicate_attribute_first_wins() {
        let doc = parse_document(r#"<p class="a" class="b"></p>"#);
        let p = body(&doc).children[0].as_element().unwrap();
        assert_eq!(p.attrs.len(), 1);
        assert_eq!(p.get_attr("class"), Some("a"));
    }

    #[test]
    fn test_parse_boolean_attribute_is_empty_string() {
        let doc = parse_document("<input type=checkbox checked>");
        let input = body(&doc).children[0].as_element().unwrap();
        assert_eq!(input.get_attr("checked"), Some(""));
    }

    #[test]
    fn test_parse_doctype() {
        let doc = parse_document("<!DOCTYPE html><html><body></body></html>");
        assert_eq!(doc.doctype.as_deref(), Some("html"));
    }

    #[test]
    fn test_parse_comment() {
        let doc = parse_document("<html><body><!-- This is a comment --></body></html>");
        assert_eq!(
            body(&doc).children,
            vec![MarkupNode::Comment(" This is a comment ".to_string())]
        );
    }

    #[test]
    fn test_parse_merges_adjacent_text() {
        let doc = parse_document("<p>a &amp; b</p>");
        let p = body(&doc).children[0].as_element().unwrap();
        assert_eq!(p.children, vec![MarkupNode::Text("a & b".to_string())]);
    }

    #[test]
    fn test_parse_uppercase_tags_are_lowered() {
        let doc = parse_document("<DIV CLASS=x></DIV>");
        let div = body(&doc).children[0].as_element().unwrap();
        assert_eq!(div.tag, "div");
        assert_eq!(div.attrs[0].name, "class");
    }

    #[test]
    fn test_parse_foreign_attributes_keep_prefix() {
        let doc = parse_document(
            r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a" href="#b"/></svg>"##,
        );
        let svg = body(&doc).children[0].as_element().unwrap();
        assert_eq!(svg.get_attr("xmlns:xlink"), Some("http://www.w3.org/1999/xlink"));

        let use_elem = svg.children[0].as_element().unwrap();
        let attrs: Vec<(&str, Option<&str>)> = use_elem
            .attrs
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_deref()))
            .collect();
        assert_eq!(attrs, [("xlink:href", Some("#a")), ("href", Some("#b"))]);
    }

    #[test]
    fn test_parse_fragment_keeps_head_content() {
        let nodes = parse_fragment(r#"<meta charset="utf-8"><title>T</title><p>x</p>"#);
        let tags: Vec<&str> = nodes
            .iter()
            .filter_map(MarkupNode::as_element)
            .map(|e| e.tag.as_str())
            .collect();
        assert_eq!(tags, ["meta", "title", "p"]);
    }

    #[test]
    fn test_parse_deep_nesting() {
        let depth = 1_000;
        let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let doc = parse_document(&html);

        let mut elem = body(&doc);
        let mut seen = 0;
        while let Some(child) = elem.children.first().and_then(MarkupNode::as_element) {
            elem = child;
            seen += 1;
        }
        assert_eq!(seen, depth);
        assert_eq!(elem.text_content(), "x");
    }

    #[test]
    fn test_parse_fragment() {
        let nodes = parse_fragment("<li>One</li><li>Two</li>");
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(MarkupNode::is_element));
    }
}
