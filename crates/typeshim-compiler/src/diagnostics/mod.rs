//! Batch error reporting.
//!
//! Diagnostics are collected for the whole document and grouped by module.
//! A module with any error-severity diagnostic produces no output; the
//! remaining modules are generated normally.

mod message;
mod printer;


use indexmap::IndexSet;

pub use message::{DiagnosticKind, DiagnosticMessage, ErrorClass, Severity};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Create a diagnostic for `module` located at the dotted origin `path`.
    ///
    /// Uses the kind's default message. Call `.message()` on the builder to add detail.
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        module: &str,
        path: impl Into<String>,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::with_default_message(kind, module, path.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    /// Whether `module` has at least one error.
    pub fn module_has_errors(&self, module: &str) -> bool {
        self.messages
            .iter()
            .any(|d| d.is_error() && d.module == module)
    }

    /// Modules with at least one error, in first-reported order.
    pub fn failed_modules(&self) -> IndexSet<String> {
        self.messages
            .iter()
            .filter(|d| d.is_error())
            .map(|d| d.module.clone())
            .collect()
    }

    /// Diagnostics reported against `module` only.
    pub fn for_module(&self, module: &str) -> Diagnostics {
        Diagnostics {
            messages: self
                .messages
                .iter()
                .filter(|d| d.module == module)
                .cloned()
                .collect(),
        }
    }

    pub fn retain(&mut self, keep: impl FnMut(&DiagnosticMessage) -> bool) {
        self.messages.retain(keep);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_> {
        DiagnosticsPrinter::new(self)
    }

    pub fn render(&self) -> String {
        self.printer().render()
    }

    pub fn render_colored(&self, colored: bool) -> String {
        self.printer().colored(colored).render()
    }
}

impl<'a> DiagnosticBuilder<'a> {
    /// Provide custom detail for this diagnostic, rendered using the kind's template.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        let detail = msg.into();
        self.message.message = self.message.kind.message(Some(&detail));
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
