//! Attribute name and value policies.
//!
//! Both are pure lookups over [`ClassificationTables`]; unmatched inputs fall
//! through to a default spelling, so neither can fail.

use crate::literal::{encode_string, encode_variant};
use crate::tables::ClassificationTables;

const DATA_PREFIX: &str = "data-";

impl ClassificationTables {
    /// Spell an attribute name the way the DSL expects it.
    ///
    /// First match wins:
    /// 1. reserved names get a trailing `_` (`type` → `type_`)
    /// 2. `<prefix><name>` of a known namespace → `Namespace.name`
    /// 3. `data-<prefix><name>` when the namespace accepts the `data-` alias
    /// 4. any other hyphenated name → `string_attr "<name>"` (if enabled)
    /// 5. everything else unchanged
    pub fn attr_name(&self, raw: &str) -> String {
        if self.suffix_names.contains(raw) {
            return format!("{raw}_");
        }

        for ns in &self.namespaces {
            if let Some(bare) = ns.bare_name(raw) {
                return namespaced(&ns.namespace, bare);
            }
        }

        if let Some(unaliased) = raw.strip_prefix(DATA_PREFIX) {
            for ns in self.namespaces.iter().filter(|ns| ns.data_alias) {
                if let Some(bare) = ns.bare_name(unaliased) {
                    return namespaced(&ns.namespace, bare);
                }
            }
        }

        if self.hyphen_fallback && raw.contains('-') {
            return format!("string_attr {}", encode_string(raw));
        }

        raw.to_string()
    }

    /// Encode an attribute value for the attribute named `name`.
    ///
    /// Null values and boolean flags produce an empty fragment; numeric values
    /// pass through untouched; enumerated values become variant literals; the
    /// rest become string literals.
    pub fn attr_value(&self, raw: Option<&str>, name: &str) -> String {
        let Some(raw) = raw else {
            return String::new();
        };

        if self.boolean_valued.contains(name) {
            String::new()
        } else if self.numeric_valued.contains(name) {
            raw.to_string()
        } else if self.variant_valued.contains(name) {
            encode_variant(raw)
        } else {
            encode_string(raw)
        }
    }
}

fn namespaced(namespace: &str, bare: &str) -> String {
    let mut out = String::with_capacity(namespace.len() + bare.len() + 1);
    out.push_str(namespace);
    out.push('.');
    out.extend(bare.chars().map(|c| if c == '-' { '_' } else { c }));
    out
}
