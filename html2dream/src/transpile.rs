//! Markup tree to dream-html source.
//!
//! The output mirrors the tree one node at a time, with no formatting beyond a
//! newline before each child:
//!
//! - Elements become `tag [attr value; ...] [child;...]`
//! - Void elements stop after the attribute list
//! - Raw-text elements (script, style, option, ...) take a single string literal
//!   holding their text content instead of a child list
//! - Text becomes `txt "..."`, comments become `comment "..."`
//!
//! Before any output is produced, the whole tree is checked for anchors the
//! encoding depends on (see [`PrecheckError`]). Node kinds without an encoding are
//! skipped and reported in [`Transpiled::warnings`].

use crate::literal::encode_string;
use crate::markup::{Document, Element, MarkupNode, UnrecognizedNode};
use crate::tables::{ClassificationTables, extended_tables};
use facet::Facet;
use smallvec::SmallVec;
use std::fmt;

/// Options for transpilation.
#[derive(Clone, Debug, Default)]
pub struct TranspileOptions {
    /// Fail when an `<option>` has neither text nor a `value` attribute (default: false)
    pub require_option_labels: bool,
    /// Drop whitespace-only text nodes from child lists (default: false).
    /// Raw-text elements are unaffected.
    pub skip_blank_text: bool,
}

impl TranspileOptions {
    /// Create new default options (every node is emitted, no option check).
    pub fn new() -> Self {
        Self::default()
    }

    /// Require every `<option>` to carry a label.
    pub fn require_option_labels(mut self) -> Self {
        self.require_option_labels = true;
        self
    }

    /// Skip whitespace-only text nodes.
    pub fn skip_blank_text(mut self) -> Self {
        self.skip_blank_text = true;
        self
    }
}

/// A path to a node, as child indices from the transpiled root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Facet)]
#[facet(transparent)]
pub struct NodePath(pub SmallVec<[u32; 16]>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

/// Structural problems found before transpiling.
#[derive(Facet, Debug)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum PrecheckError {
    /// document has no root element
    MissingRoot,

    /// element at {path} has an empty tag name
    EmptyTagName { path: NodePath },

    /// option at {path} has neither text nor a value attribute
    EmptyOption { path: NodePath },
}

/// A node that was skipped because it has no DSL encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the node sits in the tree
    pub path: NodePath,
    /// What was skipped
    pub node: UnrecognizedNode,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "skipped unrecognized node type {}",
            self.node.node_type
        )?;
        if !self.node.name.is_empty() {
            write!(f, " ({})", self.node.name)?;
        }
        write!(f, " at {}", self.path)
    }
}

/// Result of a successful transpilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transpiled {
    /// The generated DSL source
    pub source: String,
    /// Unrecognized nodes that were skipped, in document order, including
    /// those inside void and raw-text elements
    pub warnings: Vec<Diagnostic>,
}

/// Transpile a node with the extended tables and default options.
pub fn transpile(root: &MarkupNode) -> Result<Transpiled, PrecheckError> {
    Transpiler::new(extended_tables()).transpile(root)
}

/// Parse a full HTML document and transpile its root element with the extended tables.
///
/// Like [`parse_document`](crate::parse_document), this recurses once per
/// nesting level, so pathologically deep input can exhaust the stack.
pub fn transpile_html(html: &str) -> Result<Transpiled, PrecheckError> {
    let doc = crate::parser::parse_document(html);
    Transpiler::new(extended_tables()).transpile_document(&doc)
}

/// Tree-to-DSL transpiler over a borrowed set of tables.
#[derive(Clone, Debug)]
pub struct Transpiler<'t> {
    tables: &'t ClassificationTables,
    options: TranspileOptions,
}

impl<'t> Transpiler<'t> {
    pub fn new(tables: &'t ClassificationTables) -> Self {
        Self {
            tables,
            options: TranspileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TranspileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn tables(&self) -> &'t ClassificationTables {
        self.tables
    }

    /// Transpile the root element of a document.
    pub fn transpile_document(&self, doc: &Document) -> Result<Transpiled, PrecheckError> {
        let root = doc.root().ok_or(PrecheckError::MissingRoot)?;
        self.transpile_element(root)
    }

    /// Transpile an element and everything under it.
    pub fn transpile_element(&self, root: &Element) -> Result<Transpiled, PrecheckError> {
        self.precheck_element(root, &mut NodePath::root())?;
        let mut writer = Writer::new(self);
        writer.write_element(root);
        Ok(writer.finish())
    }

    /// Transpile any node. Non-element roots are allowed.
    pub fn transpile(&self, root: &MarkupNode) -> Result<Transpiled, PrecheckError> {
        self.precheck_node(root, &mut NodePath::root())?;
        let mut writer = Writer::new(self);
        writer.write_node(root);
        Ok(writer.finish())
    }

    fn precheck_node(&self, node: &MarkupNode, path: &mut NodePath) -> Result<(), PrecheckError> {
        match node {
            MarkupNode::Element(elem) => self.precheck_element(elem, path),
            _ => Ok(()),
        }
    }

    fn precheck_element(&self, elem: &Element, path: &mut NodePath) -> Result<(), PrecheckError> {
        if elem.tag.is_empty() {
            return Err(PrecheckError::EmptyTagName { path: path.clone() });
        }

        if self.options.require_option_labels
            && elem.tag.eq_ignore_ascii_case("option")
            && elem.text_content().is_empty()
            && elem.get_attr("value").is_none_or(str::is_empty)
        {
            return Err(PrecheckError::EmptyOption { path: path.clone() });
        }

        for (idx, child) in elem.children.iter().enumerate() {
            path.0.push(idx as u32);
            self.precheck_node(child, path)?;
            path.0.pop();
        }
        Ok(())
    }
}

/// Single-use output builder for one transpilation.
struct Writer<'a, 't> {
    transpiler: &'a Transpiler<'t>,
    out: String,
    path: NodePath,
    warnings: Vec<Diagnostic>,
}

impl<'a, 't> Writer<'a, 't> {
    fn new(transpiler: &'a Transpiler<'t>) -> Self {
        Self {
            transpiler,
            out: String::new(),
            path: NodePath::root(),
            warnings: Vec::new(),
        }
    }

    fn finish(self) -> Transpiled {
        debug!(
            bytes = self.out.len(),
            warnings = self.warnings.len(),
            "transpiled tree"
        );
        Transpiled {
            source: self.out,
            warnings: self.warnings,
        }
    }

    fn tables(&self) -> &'t ClassificationTables {
        self.transpiler.tables
    }

    /// Whether a child contributes a statement to its parent's child list.
    fn emits(&self, node: &MarkupNode) -> bool {
        match node {
            MarkupNode::Unrecognized(_) => false,
            MarkupNode::Text(t) if self.transpiler.options.skip_blank_text => {
                !t.trim().is_empty()
            }
            _ => true,
        }
    }

    fn write_node(&mut self, node: &MarkupNode) {
        match node {
            MarkupNode::Element(elem) => self.write_element(elem),
            MarkupNode::Text(text) => {
                self.out.push_str("txt ");
                self.out.push_str(&encode_string(text));
            }
            MarkupNode::Comment(text) => {
                self.out.push_str("comment ");
                self.out.push_str(&encode_string(text));
            }
            MarkupNode::Unrecognized(node) => self.report(node),
        }
    }

    fn report(&mut self, node: &UnrecognizedNode) {
        let diagnostic = Diagnostic {
            path: self.path.clone(),
            node: node.clone(),
        };
        warn!("{}", diagnostic);
        self.warnings.push(diagnostic);
    }

    /// Report unrecognized descendants of an element whose children are not emitted.
    fn report_nested(&mut self, elem: &Element) {
        for (idx, child) in elem.children.iter().enumerate() {
            self.path.0.push(idx as u32);
            match child {
                MarkupNode::Unrecognized(node) => self.report(node),
                MarkupNode::Element(e) => self.report_nested(e),
                MarkupNode::Text(_) | MarkupNode::Comment(_) => {}
            }
            self.path.0.pop();
        }
    }

    fn write_element(&mut self, elem: &Element) {
        let tables = self.tables();
        let tag = elem.tag.to_lowercase();
        trace!(tag = %tag, path = %self.path, "element");

        self.out.push_str(&tag);
        self.out.push_str(" [");
        for attr in &elem.attrs {
            self.out.push_str(&tables.attr_name(&attr.name));
            self.out.push(' ');
            self.out
                .push_str(&tables.attr_value(attr.value.as_deref(), &attr.name));
            self.out.push_str("; ");
        }
        self.out.push_str("] ");

        if tables.is_void(&tag) {
            self.report_nested(elem);
            return;
        }

        if tables.is_raw_text(&tag) {
            self.out.push_str(&encode_string(&elem.text_content()));
            self.report_nested(elem);
            return;
        }

        self.out.push('[');
        for (idx, child) in elem.children.iter().enumerate() {
            self.path.0.push(idx as u32);
            if self.emits(child) {
                self.out.push('\n');
                self.write_node(child);
                self.out.push(';');
            } else if let MarkupNode::Unrecognized(node) = child {
                self.report(node);
            }
            self.path.0.pop();
        }
        self.out.push(']');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Attribute, CDATA_SECTION_NODE, PROCESSING_INSTRUCTION_NODE};

    fn run(node: impl Into<MarkupNode>) -> String {
        transpile(&node.into()).unwrap().source
    }

    #[test]
    fn test_void_element_with_flag() {
        let input = Element::new("input")
            .with_attr("type", "checkbox")
            .with_flag("checked");
        assert_eq!(run(input), "input [type_ \"checkbox\"; checked ; ] ");
    }

    #[test]
    fn test_void_element_ignores_children() {
        let mut br = Element::new("br");
        br.push_text("should not appear");
        assert_eq!(run(br), "br [] ");
    }

    #[test]
    fn test_raw_text_element() {
        let option = Element::new("option").with_text("Red");
        assert_eq!(run(option), "option [] \"Red\"");
    }

    #[test]
    fn test_raw_text_flattens_descendants() {
        let mut script = Element::new("script");
        script.push_text("let a = ");
        script.push_element(Element::new("b").with_text("\"x\""));
        script.push_comment("dropped");
        assert_eq!(run(script), "script [] {|let a = \"x\"|}");
    }

    #[test]
    fn test_comment_with_quote() {
        let node = MarkupNode::Comment("He said \"hi\"".to_string());
        assert_eq!(run(node), "comment {|He said \"hi\"|}");
    }

    #[test]
    fn test_text_node() {
        assert_eq!(run(MarkupNode::Text("hello".to_string())), "txt \"hello\"");
    }

    #[test]
    fn test_nested_children() {
        let ul = Element::new("ul")
            .with_attr("class", "menu")
            .with_child(Element::new("li").with_text("One"))
            .with_child(Element::new("li").with_text("Two"));
        assert_eq!(
            run(ul),
            "ul [class_ \"menu\"; ] [\nli [] [\ntxt \"One\";];\nli [] [\ntxt \"Two\";];]"
        );
    }

    #[test]
    fn test_empty_child_list() {
        assert_eq!(run(Element::new("div")), "div [] []");
    }

    #[test]
    fn test_tag_is_lowercased() {
        let div = Element::new("DIV").with_child(Element::new("BR"));
        assert_eq!(run(div), "div [] [\nbr [] ;]");
    }

    #[test]
    fn test_attribute_encodings() {
        let a = Element::new("a")
            .with_attr("href", "/x")
            .with_attr("tabindex", "2")
            .with_attr("referrerpolicy", "no-referrer")
            .with_attr("hx-get", "/y")
            .with_attr("data-id", "7")
            .with_attr("aria-hidden", "true");
        assert_eq!(
            run(a),
            "a [href \"/x\"; tabindex 2; referrerpolicy `no_referrer; Hx.get \"/y\"; \
             string_attr \"data-id\" \"7\"; Aria.hidden \"true\"; ] []"
        );
    }

    #[test]
    fn test_null_value_keeps_slot() {
        let mut a = Element::new("a");
        a.attrs.push(Attribute::flag("href"));
        assert_eq!(run(a), "a [href ; ] []");
    }

    #[test]
    fn test_unrecognized_is_reported_not_emitted() {
        let mut div = Element::new("div");
        div.push_text("a");
        div.push_child(MarkupNode::Unrecognized(UnrecognizedNode::new(
            PROCESSING_INSTRUCTION_NODE,
            "xml-stylesheet",
        )));
        div.push_text("b");

        let out = transpile(&div.into()).unwrap();
        assert_eq!(out.source, "div [] [\ntxt \"a\";\ntxt \"b\";]");
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].path.to_string(), "1");
        assert_eq!(out.warnings[0].node.node_type, PROCESSING_INSTRUCTION_NODE);
        assert!(!out.source.contains("xml-stylesheet"));
    }

    #[test]
    fn test_unrecognized_under_raw_text_and_void() {
        let mut option = Element::new("option").with_text("Red");
        option.push_child(MarkupNode::Unrecognized(UnrecognizedNode::new(
            CDATA_SECTION_NODE,
            "#cdata-section",
        )));
        let mut br = Element::new("br");
        let mut span = Element::new("span");
        span.push_child(MarkupNode::Unrecognized(UnrecognizedNode::new(
            PROCESSING_INSTRUCTION_NODE,
            "pi",
        )));
        br.push_element(span);

        let select = Element::new("select").with_child(option).with_child(br);
        let out = transpile(&select.into()).unwrap();

        assert_eq!(out.source, "select [] [\noption [] \"Red\";\nbr [] ;]");
        let paths: Vec<String> = out.warnings.iter().map(|w| w.path.to_string()).collect();
        assert_eq!(paths, ["0.1", "1.0.0"]);
    }

    #[test]
    fn test_unrecognized_root() {
        let node =
            MarkupNode::Unrecognized(UnrecognizedNode::new(CDATA_SECTION_NODE, "#cdata-section"));
        let out = transpile(&node).unwrap();
        assert_eq!(out.source, "");
        assert_eq!(out.warnings[0].path, NodePath::root());
    }

    #[test]
    fn test_skip_blank_text() {
        let mut ul = Element::new("ul");
        ul.push_text("\n  ");
        ul.push_element(Element::new("li").with_text(" x "));
        ul.push_text("\n");

        let tables = ClassificationTables::extended();
        let out = Transpiler::new(&tables)
            .with_options(TranspileOptions::new().skip_blank_text())
            .transpile(&ul.into())
            .unwrap();
        assert_eq!(out.source, "ul [] [\nli [] [\ntxt \" x \";];]");
    }

    #[test]
    fn test_empty_tag_fails_before_output() {
        let div = Element::new("div").with_child(Element::new("p").with_child(Element::new("")));
        let err = transpile(&div.into()).unwrap_err();
        match err {
            PrecheckError::EmptyTagName { path } => assert_eq!(path.to_string(), "0.0"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_option_labels() {
        let select = Element::new("select")
            .with_child(Element::new("option").with_text("Red"))
            .with_child(Element::new("option").with_attr("value", "g"))
            .with_child(Element::new("option"));

        let tables = ClassificationTables::extended();
        let lenient = Transpiler::new(&tables).transpile_element(&select);
        assert!(lenient.is_ok());

        let strict = Transpiler::new(&tables)
            .with_options(TranspileOptions::new().require_option_labels())
            .transpile_element(&select);
        assert!(matches!(
            strict,
            Err(PrecheckError::EmptyOption { ref path }) if path.to_string() == "2"
        ));
    }

    #[test]
    fn test_missing_root() {
        let doc = Document {
            doctype: Some("html".to_string()),
            children: vec![MarkupNode::Comment("only a comment".to_string())],
        };
        let err = Transpiler::new(extended_tables())
            .transpile_document(&doc)
            .unwrap_err();
        assert!(matches!(err, PrecheckError::MissingRoot));
    }

    #[test]
    fn test_minimal_tables() {
        let tables = ClassificationTables::minimal();
        let div = Element::new("div")
            .with_attr("aria-hidden", "true")
            .with_attr("data-x", "1");
        let out = Transpiler::new(&tables).transpile_element(&div).unwrap();
        assert_eq!(out.source, "div [aria-hidden \"true\"; data-x \"1\"; ] []");
    }
}
