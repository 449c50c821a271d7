/// Errors raised while converting or calling values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("unknown variant tag {0}")]
    UnknownTag(String),

    #[error("no export named `{0}`")]
    UnknownExport(String),

    #[error("value is not callable: {0}")]
    NotCallable(String),

    /// Failure raised by a called function, passed through unchanged.
    #[error("uncaught exception: {0}")]
    Thrown(String),
}

impl RuntimeError {
    pub(crate) fn mismatch(expected: &'static str, found: &crate::Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.kind().to_string(),
        }
    }
}
