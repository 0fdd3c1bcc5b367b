//! Classification tables driving attribute and element encoding.
//!
//! The transpiler itself knows nothing about specific attributes or tags; every
//! decision (suffixing reserved names, namespacing ARIA and htmx attributes,
//! picking a literal encoding for values, void and raw-text elements) is a lookup
//! in a [`ClassificationTables`] value. Two variants ship with the crate:
//!
//! - [`ClassificationTables::minimal`]: plain HTML attributes only.
//! - [`ClassificationTables::extended`]: adds the `Aria` and `Hx` namespaces, their
//!   value classifications, and the `string_attr` fallback for hyphenated names.
//!
//! Other variants can be loaded from JSON with [`ClassificationTables::from_json`]:
//!
//! ```rust
//! use html2dream::ClassificationTables;
//!
//! let tables = ClassificationTables::from_json(
//!     r#"{
//!         "suffix_names": ["type"],
//!         "boolean_valued": ["checked"],
//!         "void_tags": ["input"],
//!         "namespaces": [
//!             { "prefix": "aria-", "namespace": "Aria", "names": ["checked"] }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(tables.attr_name("aria-checked"), "Aria.checked");
//! ```

use facet::Facet;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Attribute names that collide with OCaml keywords or stdlib values.
const SUFFIX_NAMES: &[&str] = &[
    "cite", "class", "data", "for", "form", "label", "method", "object", "open", "slot", "span",
    "style", "title", "type",
];

const ARIA_NAMES: &[&str] = &[
    "activedescendant",
    "atomic",
    "autocomplete",
    "braillelabel",
    "brailleroledescription",
    "busy",
    "checked",
    "colcount",
    "colindextext",
    "colspan",
    "controls",
    "current",
    "describedby",
    "description",
    "details",
    "disabled",
    "errormessage",
    "expanded",
    "flowto",
    "haspopup",
    "hidden",
    "invalid",
    "keyshortcuts",
    "label",
    "labelledby",
    "level",
    "live",
    "modal",
    "multiline",
    "multiselectable",
    "orientation",
    "owns",
    "placeholder",
    "posinset",
    "pressed",
    "readonly",
    "relevant",
    "required",
    "roledescription",
    "rowcount",
    "rowindex",
    "rowindextext",
    "rowspan",
    "selected",
    "setsize",
    "sort",
    "valuemax",
    "valuemin",
    "valuenow",
    "valuetext",
];

const HX_NAMES: &[&str] = &[
    "boost",
    "confirm",
    "delete",
    "disable",
    "disinherit",
    "encoding",
    "ext",
    "get",
    "headers",
    "history",
    "history-elt",
    "include",
    "indicator",
    "on",
    "params",
    "patch",
    "post",
    "preload",
    "preserve",
    "prompt",
    "push-url",
    "put",
    "replace-url",
    "request",
    "select",
    "select-oob",
    "sse-connect",
    "sse-swap",
    "swap",
    "swap-oob",
    "sync",
    "target",
    "trigger",
    "validate",
    "vals",
    "ws-connect",
    "ws-send",
];

const VARIANT_VALUED: &[&str] = &[
    "autocapitalize",
    "autocomplete",
    "capture",
    "crossorigin",
    "decoding",
    "dir",
    "enctype",
    "fetchpriority",
    "formenctype",
    "formmethod",
    "hidden",
    "inputmode",
    "kind",
    "method",
    "preload",
    "referrerpolicy",
    "role",
    "translate",
    "wrap",
];

const ARIA_VARIANT_VALUED: &[&str] = &[
    "aria-autocomplete",
    "aria-checked",
    "aria-current",
    "aria-haspopup",
    "aria-invalid",
    "aria-live",
    "aria-orientation",
    "aria-pressed",
    "aria-relevant",
    "aria-sort",
];

const NUMERIC_VALUED: &[&str] = &[
    "cols",
    "colspan",
    "high",
    "low",
    "maxlength",
    "minlength",
    "optimum",
    "rows",
    "rowspan",
    "span",
    "start",
    "tabindex",
];

const ARIA_NUMERIC_VALUED: &[&str] = &["aria-valuemax", "aria-valuemin", "aria-valuenow"];

const BOOLEAN_VALUED: &[&str] = &[
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "default",
    "defer",
    "disabled",
    "draggable",
    "formnovalidate",
    "ismap",
    "loop",
    "multiple",
    "muted",
    "novalidate",
    "open",
    "playsinline",
    "readonly",
    "required",
    "reversed",
    "selected",
];

const ARIA_BOOLEAN_VALUED: &[&str] = &[
    "aria-atomic",
    "aria-busy",
    "aria-disabled",
    "aria-modal",
    "aria-multiline",
    "aria-multiselectable",
    "aria-readonly",
    "aria-required",
];

/// htmx flags; each is also accepted behind the `data-` alias.
const HX_BOOLEAN_VALUED: &[&str] = &[
    "hx-disable",
    "hx-history-elt",
    "hx-preload",
    "hx-preserve",
    "hx-validate",
    "hx-ws-send",
];

/// HTML5 void elements - never have children.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is a single string in the DSL.
const RAW_TEXT_TAGS: &[&str] = &["option", "script", "style", "textarea", "title"];

fn set_of(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// An attribute family rendered as `<Namespace>.<bare_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    /// Raw attribute prefix, including the trailing hyphen (e.g. `aria-`)
    pub prefix: String,
    /// DSL module the attributes live in (e.g. `Aria`)
    pub namespace: String,
    /// Recognized names, without the prefix
    pub names: HashSet<String>,
    /// Whether `data-<prefix><name>` is accepted as well
    pub data_alias: bool,
}

impl NamespaceTable {
    pub fn new(prefix: &str, namespace: &str, names: &[&str]) -> Self {
        Self {
            prefix: prefix.to_string(),
            namespace: namespace.to_string(),
            names: set_of(names),
            data_alias: false,
        }
    }

    /// Also accept the `data-` prefixed spelling.
    pub fn with_data_alias(mut self) -> Self {
        self.data_alias = true;
        self
    }

    /// Returns the bare name if `raw` is `<prefix><known name>`.
    pub(crate) fn bare_name<'a>(&self, raw: &'a str) -> Option<&'a str> {
        raw.strip_prefix(self.prefix.as_str())
            .filter(|bare| self.names.contains(*bare))
    }
}

/// Read-only lookup tables for the transpiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTables {
    /// Names that must be emitted with a trailing `_`
    pub suffix_names: HashSet<String>,
    /// Namespaced attribute families, tried in order
    pub namespaces: Vec<NamespaceTable>,
    /// Attributes whose value is a polymorphic variant
    pub variant_valued: HashSet<String>,
    /// Attributes whose value is a bare number
    pub numeric_valued: HashSet<String>,
    /// Attributes that are presence-only flags
    pub boolean_valued: HashSet<String>,
    /// Elements that never get a child list
    pub void_tags: HashSet<String>,
    /// Elements whose content collapses to one string
    pub raw_text_tags: HashSet<String>,
    /// Emit unknown hyphenated names as `string_attr "<name>"`
    pub hyphen_fallback: bool,
}

impl ClassificationTables {
    /// Tables with no entries at all. Every attribute is a plain quoted string.
    pub fn empty() -> Self {
        Self {
            suffix_names: HashSet::new(),
            namespaces: Vec::new(),
            variant_valued: HashSet::new(),
            numeric_valued: HashSet::new(),
            boolean_valued: HashSet::new(),
            void_tags: HashSet::new(),
            raw_text_tags: HashSet::new(),
            hyphen_fallback: false,
        }
    }

    /// Legacy tables: standard HTML attributes, no namespaces, no fallback.
    pub fn minimal() -> Self {
        Self {
            suffix_names: set_of(SUFFIX_NAMES),
            namespaces: Vec::new(),
            variant_valued: set_of(VARIANT_VALUED),
            numeric_valued: set_of(NUMERIC_VALUED),
            boolean_valued: set_of(BOOLEAN_VALUED),
            void_tags: set_of(VOID_TAGS),
            raw_text_tags: set_of(RAW_TEXT_TAGS),
            hyphen_fallback: false,
        }
    }

    /// Minimal tables plus ARIA, htmx, and the hyphenated-name fallback.
    pub fn extended() -> Self {
        let mut tables = Self::minimal();

        tables.namespaces = vec![
            NamespaceTable::new("aria-", "Aria", ARIA_NAMES),
            NamespaceTable::new("hx-", "Hx", HX_NAMES).with_data_alias(),
        ];
        tables.variant_valued.extend(set_of(ARIA_VARIANT_VALUED));
        tables.numeric_valued.extend(set_of(ARIA_NUMERIC_VALUED));
        tables.boolean_valued.extend(set_of(ARIA_BOOLEAN_VALUED));
        for name in HX_BOOLEAN_VALUED {
            tables.boolean_valued.insert(name.to_string());
            tables.boolean_valued.insert(format!("data-{name}"));
        }
        tables.hyphen_fallback = true;

        tables
    }

    /// Look up a built-in variant by name (`minimal` or `extended`).
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "minimal" => Some(Self::minimal()),
            "extended" => Some(Self::extended()),
            _ => None,
        }
    }

    /// Load tables from their JSON description (see [`TablesConfig`]).
    pub fn from_json(json: &str) -> Result<Self, TablesError> {
        let config: TablesConfig = facet_json::from_str(json).map_err(|e| TablesError::Json {
            message: e.to_string(),
        })?;
        Self::try_from(config)
    }

    pub fn is_void(&self, tag: &str) -> bool {
        self.void_tags.contains(tag)
    }

    pub fn is_raw_text(&self, tag: &str) -> bool {
        self.raw_text_tags.contains(tag)
    }
}

static EXTENDED: LazyLock<ClassificationTables> = LazyLock::new(ClassificationTables::extended);

/// Process-wide extended tables, built on first use.
pub fn extended_tables() -> &'static ClassificationTables {
    &EXTENDED
}

impl Default for ClassificationTables {
    fn default() -> Self {
        Self::extended()
    }
}

/// Errors from building classification tables out of configuration.
#[derive(Facet, Debug)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum TablesError {
    /// invalid tables JSON: {message}
    Json { message: String },

    /// namespace prefix must end with '-': {prefix}
    BadPrefix { prefix: String },

    /// namespace for prefix {prefix} must be a capitalized identifier
    BadNamespace { prefix: String },
}

/// One namespaced attribute family, as written in JSON.
#[derive(Facet, Debug, Default)]
#[facet(default)]
pub struct NamespaceConfig {
    pub prefix: String,
    pub namespace: String,
    pub names: Vec<String>,
    pub data_alias: bool,
}

/// JSON shape of [`ClassificationTables`]. Every field is optional.
#[derive(Facet, Debug, Default)]
#[facet(default)]
pub struct TablesConfig {
    pub suffix_names: Vec<String>,
    pub namespaces: Vec<NamespaceConfig>,
    pub variant_valued: Vec<String>,
    pub numeric_valued: Vec<String>,
    pub boolean_valued: Vec<String>,
    pub void_tags: Vec<String>,
    pub raw_text_tags: Vec<String>,
    pub hyphen_fallback: bool,
}

impl TryFrom<TablesConfig> for ClassificationTables {
    type Error = TablesError;

    fn try_from(config: TablesConfig) -> Result<Self, Self::Error> {
        let mut namespaces = Vec::with_capacity(config.namespaces.len());
        for ns in config.namespaces {
            if !ns.prefix.ends_with('-') {
                return Err(TablesError::BadPrefix { prefix: ns.prefix });
            }
            if !ns.namespace.starts_with(|c: char| c.is_ascii_uppercase()) {
                return Err(TablesError::BadNamespace { prefix: ns.prefix });
            }
            namespaces.push(NamespaceTable {
                prefix: ns.prefix,
                namespace: ns.namespace,
                names: ns.names.into_iter().collect(),
                data_alias: ns.data_alias,
            });
        }

        Ok(Self {
            suffix_names: config.suffix_names.into_iter().collect(),
            namespaces,
            variant_valued: config.variant_valued.into_iter().collect(),
            numeric_valued: config.numeric_valued.into_iter().collect(),
            boolean_valued: config.boolean_valued.into_iter().collect(),
            void_tags: config.void_tags.into_iter().collect(),
            raw_text_tags: config.raw_text_tags.into_iter().collect(),
            hyphen_fallback: config.hyphen_fallback,
        })
    }
}
