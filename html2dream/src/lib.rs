//! Turn HTML markup into dream-html source code.
//!
//! html2dream provides:
//! - **Markup tree**: a small owned Element/Text/Comment tree to transpile from
//! - **Parsing**: browser-compatible HTML5 parsing via html5ever
//! - **Classification tables**: which attributes are reserved, namespaced, boolean,
//!   numeric or enumerated, and which tags are void or raw text
//! - **Transpiling**: a validating pre-pass and a single-pass emitter for the
//!   dream-html DSL
//!
//! # Example
//!
//! ```rust
//! use html2dream::{Element, MarkupNode, transpile};
//!
//! let form = Element::new("form")
//!     .with_attr("method", "post")
//!     .with_child(
//!         Element::new("input")
//!             .with_attr("type", "checkbox")
//!             .with_flag("checked"),
//!     );
//!
//! let out = transpile(&MarkupNode::Element(form)).unwrap();
//! assert_eq!(
//!     out.source,
//!     "form [method_ `POST; ] [\ninput [type_ \"checkbox\"; checked ; ] ;]"
//! );
//!
//! // Or go straight from an HTML string
//! let out = html2dream::transpile_html("<p>Hi</p>").unwrap();
//! assert!(out.source.starts_with("html [] [\nhead [] [];\nbody [] [\np [] [\ntxt \"Hi\";"));
//! ```

#[macro_use]
mod tracing_macros;

pub mod literal;
pub mod markup;
mod parser;
mod policy;
pub mod tables;
pub mod transpile;

pub use literal::{encode_string, encode_variant};
pub use markup::{Attribute, Document, Element, MarkupNode, UnrecognizedNode};
pub use parser::{parse_document, parse_fragment};
pub use tables::{
    ClassificationTables, NamespaceConfig, NamespaceTable, TablesConfig, TablesError,
    extended_tables,
};
pub use transpile::{
    Diagnostic, NodePath, PrecheckError, TranspileOptions, Transpiled, Transpiler, transpile,
    transpile_html,
};
