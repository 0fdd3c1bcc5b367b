//! Browser build of html2dream.
//!
//! Converts the live DOM into a markup tree, transpiles it, and hands the
//! result to the clipboard. Transpiling and copying fail independently, and
//! their errors are reported with distinct messages.

use facet::Facet;
use html2dream::{Attribute, Element as MarkupElement, MarkupNode, UnrecognizedNode};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Node};

#[wasm_bindgen(start)]
pub fn start() {
    wasm_tracing::set_as_global_default();
    tracing::debug!("html2dream-wasm loaded");
}

/// What JS gets back from a transpile call.
#[derive(Facet, Debug)]
struct Report {
    source: String,
    warnings: Vec<String>,
}

impl From<html2dream::Transpiled> for Report {
    fn from(out: html2dream::Transpiled) -> Self {
        Report {
            source: out.source,
            warnings: out.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

fn to_json(report: &Report) -> Result<String, JsValue> {
    facet_json::to_string(report).map_err(|e| JsValue::from_str(&format!("serialize: {e}")))
}

/// Convert a DOM node (and its subtree) into a markup node.
pub fn convert_node(node: &Node) -> MarkupNode {
    match node.node_type() {
        Node::ELEMENT_NODE => match node.dyn_ref::<Element>() {
            Some(elem) => MarkupNode::Element(convert_element(elem)),
            None => unrecognized(node),
        },
        Node::TEXT_NODE => MarkupNode::Text(node.node_value().unwrap_or_default()),
        Node::COMMENT_NODE => MarkupNode::Comment(node.node_value().unwrap_or_default()),
        _ => unrecognized(node),
    }
}

fn unrecognized(node: &Node) -> MarkupNode {
    MarkupNode::Unrecognized(UnrecognizedNode::new(node.node_type(), node.node_name()))
}

fn convert_element(elem: &Element) -> MarkupElement {
    let mut out = MarkupElement::new(elem.local_name());

    let attrs = elem.attributes();
    for i in 0..attrs.length() {
        if let Some(attr) = attrs.item(i) {
            out.attrs.push(Attribute::new(attr.name(), attr.value()));
        }
    }

    let children = elem.child_nodes();
    for i in 0..children.length() {
        if let Some(child) = children.item(i) {
            out.push_child(convert_node(&child));
        }
    }

    out
}

fn document_element() -> Result<Element, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .ok_or_else(|| JsValue::from_str("no document element"))
}

fn transpile_node(node: &MarkupNode) -> Result<Report, JsValue> {
    html2dream::transpile(node)
        .map(Report::from)
        .map_err(|e| JsValue::from_str(&format!("transpile failed: {e}")))
}

/// Transpile the current page. Returns `{ source, warnings }` as JSON.
#[wasm_bindgen(js_name = transpileDocument)]
pub fn transpile_document() -> Result<String, JsValue> {
    let root = MarkupNode::Element(convert_element(&document_element()?));
    to_json(&transpile_node(&root)?)
}

/// Transpile an HTML string. Returns `{ source, warnings }` as JSON.
#[wasm_bindgen(js_name = transpileHtml)]
pub fn transpile_html(html: &str) -> Result<String, JsValue> {
    let out = html2dream::transpile_html(html)
        .map_err(|e| JsValue::from_str(&format!("transpile failed: {e}")))?;
    to_json(&Report::from(out))
}

/// Transpile the current page and copy the source to the clipboard.
///
/// Resolves to the number of skipped nodes.
#[wasm_bindgen(js_name = copyDocument)]
pub async fn copy_document() -> Result<u32, JsValue> {
    let root = MarkupNode::Element(convert_element(&document_element()?));
    let report = transpile_node(&root)?;

    write_clipboard(&report.source)
        .await
        .map_err(|e| JsValue::from_str(&format!("clipboard write failed: {e:?}")))?;

    tracing::info!(
        bytes = report.source.len(),
        warnings = report.warnings.len(),
        "copied to clipboard"
    );
    Ok(report.warnings.len() as u32)
}

/// `navigator.clipboard.writeText(text)`, awaited.
async fn write_clipboard(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let clipboard = js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() {
        return Err(JsValue::from_str("clipboard API unavailable"));
    }

    let write_text: js_sys::Function =
        js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into()?;
    let promise: js_sys::Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))?
        .dyn_into()?;

    JsFuture::from(promise).await?;
    Ok(())
}
