//! DSL literal encoders: polymorphic variants and strings.

/// Sigil that starts a polymorphic variant literal.
pub const VARIANT_SIGIL: char = '`';

/// Encode an attribute value as a polymorphic variant literal.
///
/// `get`/`post` become `` `GET ``/`` `POST ``, `true`/`false` get a trailing
/// underscore so they don't read as boolean literals, and hyphens turn into
/// underscores since they can't appear in an identifier.
///
/// ```rust
/// use html2dream::encode_variant;
///
/// assert_eq!(encode_variant("post"), "`POST");
/// assert_eq!(encode_variant("false"), "`false_");
/// assert_eq!(encode_variant("no-referrer"), "`no_referrer");
/// ```
pub fn encode_variant(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push(VARIANT_SIGIL);
    match raw {
        "get" | "post" => out.push_str(&raw.to_ascii_uppercase()),
        "true" | "false" => {
            out.push_str(raw);
            out.push('_');
        }
        _ => out.extend(raw.chars().map(|c| if c == '-' { '_' } else { c })),
    }
    out
}

/// Encode text as a string literal.
///
/// Text without a double quote goes between plain double quotes, unescaped.
/// Text containing one uses a quoted-string literal `{id|...|id}`, with the
/// shortest `id` (empty, `x`, `xx`, ...) whose closing `|id}` does not occur
/// in the text, so the content never needs escaping.
///
/// ```rust
/// use html2dream::encode_string;
///
/// assert_eq!(encode_string("Red"), r#""Red""#);
/// assert_eq!(encode_string(r#"He said "hi""#), r#"{|He said "hi"|}"#);
/// assert_eq!(encode_string(r#""a|}b""#), r#"{x|"a|}b"|x}"#);
/// ```
pub fn encode_string(raw: &str) -> String {
    if !raw.contains('"') {
        let mut out = String::with_capacity(raw.len() + 2);
        out.push('"');
        out.push_str(raw);
        out.push('"');
        return out;
    }

    let id = quoted_string_id(raw);
    let mut out = String::with_capacity(raw.len() + 2 * id.len() + 4);
    out.push('{');
    out.push_str(&id);
    out.push('|');
    out.push_str(raw);
    out.push('|');
    out.push_str(&id);
    out.push('}');
    out
}

/// Shortest run of `x` that doesn't collide with a closing delimiter in `raw`.
fn quoted_string_id(raw: &str) -> String {
    let mut id = String::new();
    while raw.contains(&format!("|{id}}}")) {
        id.push('x');
    }
    id
}
