//! Conversion plans and their converters.
//!
//! A plan is a value, not code: the shim emitter renders it to JavaScript and
//! the runtime in `typeshim-vm` interprets it. Plans reference each other by
//! `PlanId`, which is how recursive types get finite plans.

use crate::model::DeclId;

/// Index into a `PlanTable`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PlanId(pub u32);

impl PlanId {
    /// Shared by every identity plan.
    pub const IDENTITY: PlanId = PlanId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_identity() {
            write!(f, "id")
        } else {
            write!(f, "p{}", self.0)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConversionPlan {
    pub converter: Converter,
    /// Set when the plan converts a named declaration (or one instantiation
    /// of a generic one). Named plans become hoisted shim helpers.
    pub named: Option<NamedPlan>,
}

impl ConversionPlan {
    pub fn identity() -> Self {
        Self {
            converter: Converter::Identity,
            named: None,
        }
    }

    /// Both directions are the identity map.
    pub fn is_identity(&self) -> bool {
        matches!(self.converter, Converter::Identity)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedPlan {
    pub decl: DeclId,
    /// 0 for the first instantiation of the declaration in this module.
    pub instance: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Converter {
    Identity,
    /// Slot reserved while the plan is under construction. Never present in a
    /// finished table.
    Pending,
    /// Absent values pass through. With `nested`, the origin's
    /// `Some(None)` marker maps to host `null`.
    Option { inner: PlanId, nested: bool },
    Array(PlanId),
    Tuple(Vec<PlanId>),
    Record(Vec<FieldPlan>),
    /// Zero-payload variant as a host string enumeration.
    Enum(EnumTable),
    Variant(VariantPlan),
    Function(FunctionPlan),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPlan {
    pub name: String,
    pub host_name: String,
    pub plan: PlanId,
    pub mutable: bool,
    pub optional: bool,
}

/// How the origin discriminates a variant case at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OriginTag {
    /// Constant case of an ordinary variant: its index among constant cases.
    Constant(u32),
    /// Payload case of an ordinary variant: `{TAG: n, _0, ...}` with `n` its
    /// index among payload cases.
    Block(u32),
    /// Polymorphic variant case: the tag hash, bare for constant cases and
    /// `{NAME: hash, VAL: payload}` otherwise.
    Hash(i32),
}

impl OriginTag {
    /// The integer the origin uses for this tag.
    pub fn discriminant(self) -> i64 {
        match self {
            OriginTag::Constant(n) | OriginTag::Block(n) => i64::from(n),
            OriginTag::Hash(h) => i64::from(h),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumEntry {
    pub origin: OriginTag,
    pub host: String,
}

/// Total bijection between origin discriminants and host tag strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumTable {
    pub entries: Vec<EnumEntry>,
}

impl EnumTable {
    pub fn to_host(&self, discriminant: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.origin.discriminant() == discriminant)
            .map(|e| e.host.as_str())
    }

    pub fn to_origin(&self, host: &str) -> Option<OriginTag> {
        self.entries
            .iter()
            .find(|e| e.host == host)
            .map(|e| e.origin)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantPlan {
    pub cases: Vec<CasePlan>,
    pub polymorphic: bool,
}

impl VariantPlan {
    pub fn by_host_tag(&self, tag: &str) -> Option<&CasePlan> {
        self.cases.iter().find(|c| c.host_tag == tag)
    }

    pub fn constant(&self, discriminant: i64) -> Option<&CasePlan> {
        self.cases
            .iter()
            .find(|c| c.is_constant() && c.origin.discriminant() == discriminant)
    }

    pub fn block(&self, discriminant: i64) -> Option<&CasePlan> {
        self.cases
            .iter()
            .find(|c| !c.is_constant() && c.origin.discriminant() == discriminant)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CasePlan {
    pub tag: String,
    pub origin: OriginTag,
    pub host_tag: String,
    pub payload: Vec<PlanId>,
}

impl CasePlan {
    pub fn is_constant(&self) -> bool {
        self.payload.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Convention {
    /// One call with every argument.
    Uncurried,
    /// The origin applies arguments one at a time; calls go through the
    /// currying runtime.
    Curried,
    /// Host component taking one props object.
    Component,
}

/// Where the host puts one origin parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgSlot {
    /// Host positional argument at this index.
    Positional(usize),
    /// Field of the trailing options object (props for components).
    Labeled { name: String, optional: bool },
    /// Trailing unit after labeled parameters. Not passed by the host.
    Unit,
}

/// Calling-convention adapter: one slot per origin parameter, in origin order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallAdapter {
    pub convention: Convention,
    pub slots: Vec<ArgSlot>,
}

impl CallAdapter {
    /// Number of host positional arguments.
    pub fn positional_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, ArgSlot::Positional(_)))
            .count()
    }

    pub fn has_labels(&self) -> bool {
        self.slots
            .iter()
            .any(|s| matches!(s, ArgSlot::Labeled { .. }))
    }

    /// Every labeled slot is optional, so the options object may be omitted.
    pub fn options_optional(&self) -> bool {
        self.slots.iter().all(|s| match s {
            ArgSlot::Labeled { optional, .. } => *optional,
            _ => true,
        })
    }

    /// Number of arguments on the host side.
    pub fn host_arity(&self) -> usize {
        match self.convention {
            Convention::Component => 1,
            _ => self.positional_count() + usize::from(self.has_labels()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionPlan {
    pub adapter: CallAdapter,
    /// Plan per origin parameter, parallel to `adapter.slots`.
    pub params: Vec<PlanId>,
    pub result: PlanId,
}
