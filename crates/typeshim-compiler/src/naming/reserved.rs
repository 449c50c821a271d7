//! Host-reserved identifiers.

/// Prefix that turns a reserved word into a usable identifier.
pub const ESCAPE_PREFIX: &str = "$$";

/// JavaScript keywords, strict-mode reserved words, and literals.
const VALUE_RESERVED: &[&str] = &[
    "arguments",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "undefined",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Names TypeScript gives meaning to in type position.
const TYPE_RESERVED: &[&str] = &[
    "any", "bigint", "boolean", "never", "number", "object", "string", "symbol", "unknown",
];

pub fn is_reserved_value(name: &str) -> bool {
    VALUE_RESERVED.contains(&name)
}

pub fn is_reserved_type(name: &str) -> bool {
    VALUE_RESERVED.contains(&name) || TYPE_RESERVED.contains(&name)
}

/// `default` becomes `$$default`; anything else is returned unchanged.
pub fn escape_value(name: &str) -> String {
    if is_reserved_value(name) {
        format!("{ESCAPE_PREFIX}{name}")
    } else {
        name.to_string()
    }
}

pub fn escape_type(name: &str) -> String {
    if is_reserved_type(name) {
        format!("{ESCAPE_PREFIX}{name}")
    } else {
        name.to_string()
    }
}
