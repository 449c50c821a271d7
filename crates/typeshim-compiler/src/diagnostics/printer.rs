//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use typeshim_core::Colors;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Renders diagnostics as
///
/// ```text
/// error: `Other.t` is not defined
///   --> Types.tree.left
///   = hint: ...
/// ```
pub struct DiagnosticsPrinter<'d> {
    diagnostics: &'d Diagnostics,
    colored: bool,
    show_class: bool,
}

impl<'d> DiagnosticsPrinter<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            colored: false,
            show_class: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// Append the error class (`model error`, `conversion gap`, ...) to the location line.
    pub fn show_class(mut self, value: bool) -> Self {
        self.show_class = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let c = Colors::new(self.colored);
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            self.format_one(w, diag, &c)?;
        }
        Ok(())
    }

    fn format_one(
        &self,
        w: &mut impl Write,
        diag: &DiagnosticMessage,
        c: &Colors,
    ) -> std::fmt::Result {
        let label_color = match diag.severity() {
            Severity::Error => c.error,
            Severity::Warning => c.literal,
        };
        writeln!(
            w,
            "{}{}{}: {}",
            label_color,
            diag.severity(),
            c.reset,
            diag.message
        )?;
        write!(w, "  {}-->{} {}", c.keyword, c.reset, diag.path)?;
        if self.show_class {
            write!(w, " ({})", diag.kind.class())?;
        }
        w.write_char('\n')?;
        for hint in &diag.hints {
            writeln!(w, "  {}={} hint: {}", c.keyword, c.reset, hint)?;
        }
        Ok(())
    }
}
