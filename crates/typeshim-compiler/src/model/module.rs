//! Declarations, exported values, and the namespace tree of each module.

use typeshim_core::Symbol;

use super::types::{DeclId, ExportId, ModuleId, TypeId};

#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub id: DeclId,
    pub module: ModuleId,
    /// Namespace path inside the module, outermost first.
    pub path: Vec<Symbol>,
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub body: TypeId,
    pub opaque: bool,
    /// Set for declarations introduced by a namespace alias.
    pub alias_of: Option<DeclId>,
}

impl TypeDecl {
    pub fn is_generic(&self) -> bool {
        !self.params.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct ExportedValue {
    pub id: ExportId,
    pub module: ModuleId,
    pub path: Vec<Symbol>,
    pub name: Symbol,
    pub ty: TypeId,
    pub is_component: bool,
    /// Set for values re-exported through a namespace alias.
    pub alias_of: Option<ExportId>,
    /// Set for host values imported into the origin module.
    pub import: Option<HostImport>,
}

impl ExportedValue {
    pub fn is_import(&self) -> bool {
        self.import.is_some()
    }
}

/// Where an imported host value comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostImport {
    /// Module specifier, e.g. `./hookExample`.
    pub from: String,
    /// Name the host module exports the value under.
    pub name: String,
}

/// Namespace tree mirroring the origin module's nesting.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    /// `None` for the module root.
    pub name: Option<Symbol>,
    pub path: Vec<Symbol>,
    pub decls: Vec<DeclId>,
    pub exports: Vec<ExportId>,
    pub children: Vec<Namespace>,
    /// Dotted target path when this namespace aliases another one.
    pub alias_of: Option<String>,
}

impl Namespace {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: Symbol) -> Option<&Namespace> {
        self.children.iter().find(|c| c.name == Some(name))
    }

    pub fn find(&self, path: &[Symbol]) -> Option<&Namespace> {
        let mut ns = self;
        for &seg in path {
            ns = ns.child(seg)?;
        }
        Some(ns)
    }

    pub(crate) fn find_mut(&mut self, path: &[Symbol]) -> Option<&mut Namespace> {
        let mut ns = self;
        for &seg in path {
            ns = ns.children.iter_mut().find(|c| c.name == Some(seg))?;
        }
        Some(ns)
    }

    /// All declarations in this namespace and below, in document order.
    pub fn all_decls(&self) -> Vec<DeclId> {
        let mut out = Vec::new();
        self.collect(&mut out, &mut Vec::new());
        out
    }

    /// All exported values in this namespace and below, in document order.
    pub fn all_exports(&self) -> Vec<ExportId> {
        let mut out = Vec::new();
        self.collect(&mut Vec::new(), &mut out);
        out
    }

    fn collect(&self, decls: &mut Vec<DeclId>, exports: &mut Vec<ExportId>) {
        decls.extend(&self.decls);
        exports.extend(&self.exports);
        for child in &self.children {
            child.collect(decls, exports);
        }
    }
}

#[derive(Clone, Debug)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub root: Namespace,
}
