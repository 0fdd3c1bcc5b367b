//! Markup tree consumed by the transpiler.
//!
//! This is a plain owned tree, close to what a browser exposes through the DOM:
//! elements with ordered attributes and children, text, and comments. Anything
//! else a DOM can hold (processing instructions, CDATA sections, doctypes) is
//! kept as an [`UnrecognizedNode`] so the transpiler can report it instead of
//! silently dropping it.
//!
//! # Example
//!
//! ```rust
//! use html2dream::Element;
//!
//! let mut select = Element::new("select");
//! select.push_element(Element::new("option").with_text("Red"));
//! assert_eq!(select.text_content(), "Red");
//! ```

use facet::Facet;

/// DOM node-type number of a processing instruction.
pub const PROCESSING_INSTRUCTION_NODE: u16 = 7;

/// DOM node-type number of a CDATA section.
pub const CDATA_SECTION_NODE: u16 = 4;

/// A single attribute, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Attribute {
    /// Attribute name as it appears in the source.
    pub name: String,
    /// Attribute value. `None` models an absent (null) value.
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// An attribute without a value.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// A node kind the transpiler has no encoding for.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct UnrecognizedNode {
    /// DOM node-type number (see `Node.nodeType`).
    pub node_type: u16,
    /// Node name, e.g. the target of a processing instruction.
    pub name: String,
}

impl UnrecognizedNode {
    pub fn new(node_type: u16, name: impl Into<String>) -> Self {
        Self {
            node_type,
            name: name.into(),
        }
    }
}

/// Markup content - an element, text, a comment, or something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// An element node
    Element(Element),
    /// A text node
    Text(String),
    /// A comment node
    Comment(String),
    /// Any other node kind
    Unrecognized(UnrecognizedNode),
}

impl MarkupNode {
    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, MarkupNode::Element(_))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, MarkupNode::Text(_))
    }

    /// Get as element reference.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get as text reference.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MarkupNode::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get text content of this node and all descendants.
    pub fn text_content(&self) -> String {
        match self {
            MarkupNode::Text(t) => t.clone(),
            MarkupNode::Element(e) => e.text_content(),
            MarkupNode::Comment(_) | MarkupNode::Unrecognized(_) => String::new(),
        }
    }
}

impl From<Element> for MarkupNode {
    fn from(element: Element) -> Self {
        MarkupNode::Element(element)
    }
}

/// An element with its attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// The tag name, in whatever case the source used
    pub tag: String,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
    /// Child nodes in source order
    pub children: Vec<MarkupNode>,
}

impl Element {
    /// Create a new element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute with a value.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute::new(name, value));
        self
    }

    /// Add an attribute without a value.
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.attrs.push(Attribute::flag(name));
        self
    }

    /// Add a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Add an element child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.push_element(child);
        self
    }

    /// Get the first value of an attribute. Null-valued attributes read as `None`.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_deref())
    }

    /// Add a child node.
    pub fn push_child(&mut self, child: MarkupNode) {
        self.children.push(child);
    }

    /// Add a text child.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(MarkupNode::Text(text.into()));
    }

    /// Add an element child.
    pub fn push_element(&mut self, element: Element) {
        self.children.push(MarkupNode::Element(element));
    }

    /// Add a comment child.
    pub fn push_comment(&mut self, text: impl Into<String>) {
        self.children.push(MarkupNode::Comment(text.into()));
    }

    /// Get text content of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                MarkupNode::Text(t) => out.push_str(t),
                MarkupNode::Element(e) => e.collect_text(out),
                MarkupNode::Comment(_) | MarkupNode::Unrecognized(_) => {}
            }
        }
    }
}

/// A parsed document: top-level nodes plus the doctype, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// The DOCTYPE name (e.g. "html" for `<!DOCTYPE html>`)
    pub doctype: Option<String>,
    /// Top-level nodes, usually comments and the `<html>` element
    pub children: Vec<MarkupNode>,
}

impl Document {
    /// Create a document around a single root element.
    pub fn new(root: Element) -> Self {
        Self {
            doctype: None,
            children: vec![MarkupNode::Element(root)],
        }
    }

    /// The root element (usually `<html>`).
    pub fn root(&self) -> Option<&Element> {
        self.children.iter().find_map(MarkupNode::as_element)
    }

    /// Get the body element if present.
    pub fn body(&self) -> Option<&Element> {
        self.root()?
            .children
            .iter()
            .filter_map(MarkupNode::as_element)
            .find(|e| e.tag.eq_ignore_ascii_case("body"))
    }
}
