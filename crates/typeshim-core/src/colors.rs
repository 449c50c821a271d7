//! ANSI color codes for terminal output.
//!
//! Used when declarations or diagnostics are printed to a terminal. Files
//! written to disk are always rendered with `Colors::OFF`.

/// ANSI palette with one slot per syntactic role.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    /// Keywords and punctuation (`export`, `type`, `=`).
    pub keyword: &'static str,
    /// Declared names and type references.
    pub name: &'static str,
    /// String literals such as variant tags.
    pub literal: &'static str,
    /// Diagnostic severity labels.
    pub error: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        keyword: "\x1b[2m",
        name: "\x1b[34m",
        literal: "\x1b[32m",
        error: "\x1b[1;31m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        keyword: "",
        name: "",
        literal: "",
        error: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }
}
