//! Type descriptors.
//!
//! Shapes are interned in a `TypeArena` and addressed by `TypeId`. Named
//! declarations are addressed by `DeclId`; a shape never embeds another
//! declaration's body, it refers to it through `Ref` or `Applied`. That keeps
//! recursive and mutually recursive declarations finite.

use serde::Deserialize;
use typeshim_core::Symbol;

/// Interned type identifier. Index into the arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declaration identifier. Index into `Model::decls`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DeclId(pub u32);

impl DeclId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Exported value identifier. Index into `Model::exports`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ExportId(pub u32);

impl ExportId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Module identifier. Index into `Model::modules`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ModuleId(pub u32);

impl ModuleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Int,
    Float,
    String,
    Bool,
    Unit,
    Unknown,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Int,
        PrimitiveKind::Float,
        PrimitiveKind::String,
        PrimitiveKind::Bool,
        PrimitiveKind::Unit,
        PrimitiveKind::Unknown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::String => "string",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Unit => "unit",
            PrimitiveKind::Unknown => "unknown",
        }
    }
}

pub const TYPE_INT: TypeId = TypeId(0);
pub const TYPE_FLOAT: TypeId = TypeId(1);
pub const TYPE_STRING: TypeId = TypeId(2);
pub const TYPE_BOOL: TypeId = TypeId(3);
pub const TYPE_UNIT: TypeId = TypeId(4);
pub const TYPE_UNKNOWN: TypeId = TypeId(5);
/// Placeholder left behind after a reported model error.
pub const TYPE_UNRESOLVED: TypeId = TypeId(6);

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeShape {
    Primitive(PrimitiveKind),
    Option(TypeId),
    Array(TypeId),
    Tuple(Vec<TypeId>),
    Record(Vec<Field>),
    Variant(VariantShape),
    Function(FunctionShape),
    /// Body of an opaque declaration. Never appears nested inside another shape.
    Opaque(DeclId),
    /// Type parameter of the enclosing declaration, or a free variable of a
    /// polymorphic exported value.
    Var(Symbol),
    /// Instantiation of a generic declaration.
    Applied { head: DeclId, args: Vec<TypeId> },
    /// Reference to a non-generic declaration (possibly recursive).
    Ref(DeclId),
    Unresolved,
}

impl TypeShape {
    /// Whether values of this shape are structured (everything except
    /// primitives, variables, and opaque bodies).
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            TypeShape::Primitive(_) | TypeShape::Var(_) | TypeShape::Opaque(_)
        )
    }

    /// Visit the directly contained types. Declaration bodies behind `Ref`
    /// and `Applied` are not visited, only `Applied` arguments.
    pub fn for_each_child(&self, mut f: impl FnMut(TypeId)) {
        match self {
            TypeShape::Option(inner) | TypeShape::Array(inner) => f(*inner),
            TypeShape::Tuple(elements) => elements.iter().copied().for_each(f),
            TypeShape::Record(fields) => fields.iter().for_each(|field| f(field.ty)),
            TypeShape::Variant(variant) => {
                for case in &variant.cases {
                    case.payload.iter().copied().for_each(&mut f);
                }
            }
            TypeShape::Function(func) => {
                for param in &func.params {
                    f(param.ty);
                }
                f(func.result);
            }
            TypeShape::Applied { args, .. } => args.iter().copied().for_each(f),
            TypeShape::Primitive(_)
            | TypeShape::Opaque(_)
            | TypeShape::Var(_)
            | TypeShape::Ref(_)
            | TypeShape::Unresolved => {}
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Field {
    pub name: Symbol,
    /// Property name on the host side. Equal to `name` unless renamed.
    pub host_name: Symbol,
    pub ty: TypeId,
    pub mutable: bool,
    /// Field may be absent; its type is the type of the present value.
    pub optional: bool,
}

impl Field {
    pub fn is_renamed(&self) -> bool {
        self.name != self.host_name
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct VariantShape {
    pub cases: Vec<Case>,
    /// Polymorphic variants are discriminated by tag hash instead of case index.
    pub polymorphic: bool,
}

impl VariantShape {
    /// All cases are constant; the variant maps onto a host string enumeration.
    pub fn is_enum(&self) -> bool {
        self.cases.iter().all(Case::is_constant)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Case {
    pub tag: Symbol,
    pub host_tag: Symbol,
    pub payload: Vec<TypeId>,
}

impl Case {
    pub fn is_constant(&self) -> bool {
        self.payload.is_empty()
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FunctionShape {
    pub params: Vec<Param>,
    pub result: TypeId,
    pub curried: bool,
}

impl FunctionShape {
    /// Origin applies arguments one at a time; the host sees one n-ary call.
    pub fn is_effectively_curried(&self) -> bool {
        self.curried && self.params.len() >= 2
    }

    pub fn has_labels(&self) -> bool {
        self.params.iter().any(|p| p.label.is_some())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Param {
    pub label: Option<Symbol>,
    pub ty: TypeId,
    /// Only valid together with a label. The type is the present-value type.
    pub optional: bool,
}
