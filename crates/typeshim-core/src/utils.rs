//! Identifier helpers for the JavaScript/TypeScript host.

use std::borrow::Cow;

/// Whether `s` is a valid (ASCII) JavaScript identifier.
///
/// # Examples
/// ```
/// use typeshim_core::utils::is_identifier;
/// assert!(is_identifier("$$default"));
/// assert!(!is_identifier("foo-bar"));
/// assert!(!is_identifier("1st"));
/// ```
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Replace characters that cannot appear in a host identifier with `_`.
///
/// Origin identifiers may carry primes (`t'`) or start with a digit after
/// path joining; both are mapped to plain identifier characters.
///
/// # Examples
/// ```
/// use typeshim_core::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("t'"), "t_");
/// assert_eq!(sanitize_identifier("2d"), "_2d");
/// ```
pub fn sanitize_identifier(s: &str) -> Cow<'_, str> {
    if is_identifier(s) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 1);
    if s.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        out.push('_');
    }
    for c in s.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    Cow::Owned(out)
}

/// Render `s` as a double-quoted string literal.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render a property name for an object literal or type literal key.
///
/// # Examples
/// ```
/// use typeshim_core::utils::property_key;
/// assert_eq!(property_key("label"), "label");
/// assert_eq!(property_key("foo-bar"), "\"foo-bar\"");
/// ```
pub fn property_key(name: &str) -> Cow<'_, str> {
    if is_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(quote_string(name))
    }
}

/// Render a property read on `target`, using bracket syntax when needed.
///
/// # Examples
/// ```
/// use typeshim_core::utils::member_access;
/// assert_eq!(member_access("x", "label"), "x.label");
/// assert_eq!(member_access("x", "foo-bar"), "x[\"foo-bar\"]");
/// ```
pub fn member_access(target: &str, name: &str) -> String {
    if is_identifier(name) {
        format!("{target}.{name}")
    } else {
        format!("{target}[{}]", quote_string(name))
    }
}
