//! Type Representation Model.
//!
//! `lower` turns an `InputDocument` into a `Model`: one shared arena of
//! interned shapes, the declaration and export tables, and the namespace
//! tree of every module. The model is immutable after lowering.

mod arena;
mod lower;
mod module;
mod types;


use typeshim_core::{Interner, Symbol};

pub use arena::{DerivedArena, TypeArena};
pub use lower::lower;
pub use module::{ExportedValue, HostImport, Module, Namespace, TypeDecl};
pub use types::{
    Case, DeclId, ExportId, Field, FunctionShape, ModuleId, Param, PrimitiveKind, TYPE_BOOL,
    TYPE_FLOAT, TYPE_INT, TYPE_STRING, TYPE_UNIT, TYPE_UNKNOWN, TYPE_UNRESOLVED, TypeId,
    TypeShape, VariantShape,
};

#[derive(Clone, Debug, Default)]
pub struct Model {
    pub interner: Interner,
    pub arena: TypeArena,
    pub(crate) decls: Vec<TypeDecl>,
    pub(crate) exports: Vec<ExportedValue>,
    pub(crate) modules: Vec<Module>,
}

impl Model {
    pub fn decl(&self, id: DeclId) -> &TypeDecl {
        &self.decls[id.index()]
    }

    pub fn decls(&self) -> &[TypeDecl] {
        &self.decls
    }

    pub fn export(&self, id: ExportId) -> &ExportedValue {
        &self.exports[id.index()]
    }

    pub fn exports(&self) -> &[ExportedValue] {
        &self.exports
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    #[inline]
    pub fn shape(&self, id: TypeId) -> &TypeShape {
        self.arena.shape(id)
    }

    #[inline]
    pub fn name(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Dotted origin path of a declaration, e.g. `Types.Outer.Inner.innerT`.
    pub fn decl_path(&self, id: DeclId) -> String {
        let decl = self.decl(id);
        self.dotted(decl.module, &decl.path, decl.name)
    }

    /// Dotted origin path of an exported value.
    pub fn export_path(&self, id: ExportId) -> String {
        let export = self.export(id);
        self.dotted(export.module, &export.path, export.name)
    }

    fn dotted(&self, module: ModuleId, path: &[Symbol], name: Symbol) -> String {
        let mut out = self.module(module).name.clone();
        for &seg in path {
            out.push('.');
            out.push_str(self.name(seg));
        }
        out.push('.');
        out.push_str(self.name(name));
        out
    }
}
