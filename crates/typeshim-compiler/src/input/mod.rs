//! Deserialization layer for the type-signature source.
//!
//! 1:1 mapping to the JSON interface document produced from the origin
//! compiler. Names are still textual here; `model::lower` resolves them.


use serde::Deserialize;

use crate::emit::ConfigSection;
use crate::model::PrimitiveKind;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDocument {
    #[serde(default)]
    pub config: ConfigSection,
    pub modules: Vec<ModuleInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInput {
    pub module_path: String,
    #[serde(default)]
    pub type_declarations: Vec<TypeDeclInput>,
    #[serde(default)]
    pub exported_values: Vec<ExportInput>,
    #[serde(default)]
    pub namespaces: Vec<NamespaceInput>,
    /// Host values the origin module binds to.
    #[serde(default)]
    pub imported_values: Vec<ImportInput>,
}

/// Nested module. With `aliasOf` set it re-exports another namespace and
/// carries no members of its own.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceInput {
    pub name: String,
    #[serde(default)]
    pub alias_of: Option<String>,
    #[serde(default)]
    pub type_declarations: Vec<TypeDeclInput>,
    #[serde(default)]
    pub exported_values: Vec<ExportInput>,
    #[serde(default)]
    pub namespaces: Vec<NamespaceInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeDeclInput {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    pub body: TypeExpr,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInput {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub is_component: bool,
}

/// A hand-written host value imported into the origin module. `type` is
/// the origin type it is bound at.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportInput {
    #[serde(flatten)]
    pub value: ExportInput,
    /// Host module specifier, e.g. `./MyMath`.
    pub from: String,
    /// Name exported by the host module; defaults to `name`.
    #[serde(default)]
    pub import_as: Option<String>,
}

impl ImportInput {
    pub fn imported_name(&self) -> &str {
        self.import_as.as_deref().unwrap_or(&self.value.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeExpr {
    Primitive {
        name: PrimitiveKind,
    },
    Option {
        inner: Box<TypeExpr>,
    },
    Array {
        inner: Box<TypeExpr>,
    },
    Tuple {
        elements: Vec<TypeExpr>,
    },
    Record {
        fields: Vec<FieldInput>,
    },
    Variant {
        cases: Vec<CaseInput>,
        #[serde(default)]
        polymorphic: bool,
    },
    Function {
        params: Vec<ParamInput>,
        result: Box<TypeExpr>,
        #[serde(default)]
        curried: bool,
        /// Runtime arity recorded by the origin compiler, when known.
        #[serde(default)]
        arity: Option<usize>,
    },
    Var {
        name: String,
    },
    Ref {
        name: String,
        #[serde(default)]
        args: Vec<TypeExpr>,
    },
    /// Only valid as a declaration body.
    Opaque,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldInput {
    pub name: String,
    /// Host property name, when it differs from the origin field name.
    #[serde(rename = "as", default)]
    pub host_name: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseInput {
    pub tag: String,
    /// Host tag string, when it differs from the origin tag.
    #[serde(rename = "as", default)]
    pub host_tag: Option<String>,
    /// `null`, absent, or empty for constant cases.
    #[serde(default)]
    pub payload: Option<Vec<TypeExpr>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamInput {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
}

/// Parse an interface document.
pub fn parse_document(json: &str) -> Result<InputDocument, serde_json::Error> {
    serde_json::from_str(json)
}
