/// Diagnostic kinds, grouped by the stage that detects them.
///
/// Every kind belongs to one `ErrorClass`. Model errors come from lowering the
/// input document, conversion gaps from the planner, name collisions from the
/// namer's injectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Malformed or self-inconsistent type signatures
    UndefinedReference,
    DuplicateDeclaration,
    DuplicateExport,
    DuplicateField,
    DuplicateVariantTag,
    ConflictingVariantArity,
    HostTagCollision,
    GenericArityMismatch,
    FunctionArityMismatch,
    UnlabeledOptionalParam,
    UnboundTypeVariable,
    OpaqueOutsideDeclaration,
    InvalidComponent,
    EmptyVariant,
    InvalidAlias,
    CyclicAbbreviation,

    // Shapes with no conversion policy
    FunctionInVariantPayload,
    DeeplyNestedOption,
    PolymorphicRecursion,
    DependsOnInvalidType,

    // Namer invariant violations
    NameCollision,

    // Advisory
    UnusedTypeParameter,
}

/// The three failure families a module can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Model,
    ConversionGap,
    NameCollision,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::Model => write!(f, "model error"),
            ErrorClass::ConversionGap => write!(f, "conversion gap"),
            ErrorClass::NameCollision => write!(f, "name collision"),
        }
    }
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnusedTypeParameter => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::FunctionInVariantPayload
            | Self::DeeplyNestedOption
            | Self::PolymorphicRecursion
            | Self::DependsOnInvalidType => ErrorClass::ConversionGap,
            Self::NameCollision => ErrorClass::NameCollision,
            _ => ErrorClass::Model,
        }
    }

    /// Hint attached to every diagnostic of this kind.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::OpaqueOutsideDeclaration => {
                Some("declare `type t = opaque` and reference `t` instead")
            }
            Self::DeeplyNestedOption => Some("wrap the inner option in a record or a variant"),
            Self::FunctionInVariantPayload => {
                Some("move the function into a record field, or make it uncurried and unlabeled")
            }
            Self::PolymorphicRecursion => {
                Some("recursive references must use the declaration's own type parameters")
            }
            _ => None,
        }
    }

    /// Base message for this kind, used when no detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UndefinedReference => "undefined reference",
            Self::DuplicateDeclaration => "duplicate declaration",
            Self::DuplicateExport => "duplicate export",
            Self::DuplicateField => "duplicate record field",
            Self::DuplicateVariantTag => "duplicate variant tag",
            Self::ConflictingVariantArity => "conflicting variant payload arity",
            Self::HostTagCollision => "host tag collision",
            Self::GenericArityMismatch => "wrong number of type arguments",
            Self::FunctionArityMismatch => "function arity mismatch",
            Self::UnlabeledOptionalParam => "optional parameter must be labeled",
            Self::UnboundTypeVariable => "unbound type variable",
            Self::OpaqueOutsideDeclaration => "`opaque` is only allowed as a declaration body",
            Self::InvalidComponent => "invalid component",
            Self::EmptyVariant => "variant has no cases",
            Self::InvalidAlias => "invalid namespace alias",
            Self::CyclicAbbreviation => "cyclic type abbreviation",

            Self::FunctionInVariantPayload => "function payloads in variants are not supported",
            Self::DeeplyNestedOption => "options nested more than two levels are not supported",
            Self::PolymorphicRecursion => "polymorphic recursion is not supported",
            Self::DependsOnInvalidType => "depends on an invalid type",

            Self::NameCollision => "host name collision",

            Self::UnusedTypeParameter => "unused type parameter",
        }
    }

    /// Template for custom messages. `{}` is replaced by the caller's detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UndefinedReference => "`{}` is not defined".to_string(),
            Self::DuplicateDeclaration => "`{}` is already declared".to_string(),
            Self::DuplicateExport => "`{}` is already exported".to_string(),
            Self::DuplicateField => "field `{}` is declared twice".to_string(),
            Self::DuplicateVariantTag => "tag `{}` is declared twice".to_string(),
            Self::ConflictingVariantArity => {
                "tag `{}` is used with different payload arities".to_string()
            }
            Self::HostTagCollision => "host tag `{}` is used by more than one case".to_string(),
            Self::UnboundTypeVariable => {
                "type variable `'{}` is not a parameter of this declaration".to_string()
            }
            Self::InvalidAlias => "`{}` does not name a namespace".to_string(),
            Self::CyclicAbbreviation => "`{}` expands to itself".to_string(),
            Self::FunctionInVariantPayload => {
                "case `{}` carries a function that needs conversion".to_string()
            }
            Self::PolymorphicRecursion => {
                "`{}` is instantiated at a different type inside its own definition".to_string()
            }
            Self::DependsOnInvalidType => "depends on `{}`, which failed to generate".to_string(),
            Self::NameCollision => "host name `{}` is assigned twice".to_string(),
            Self::UnusedTypeParameter => "type parameter `'{}` is never used".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` returns `fallback_message()`
    /// - `Some(detail)` returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One reported problem, located by module and origin path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) module: String,
    /// Dotted origin path of the offending item, e.g. `Types.tree.left`.
    pub(crate) path: String,
    pub(crate) message: String,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, module: &str, path: String) -> Self {
        Self {
            kind,
            module: module.to_string(),
            path,
            message: kind.fallback_message().to_string(),
            hints: kind.default_hint().map(str::to_string).into_iter().collect(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.severity(), self.path, self.message)?;
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
