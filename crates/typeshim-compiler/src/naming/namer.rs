//! Host identifiers for declarations and exported values.
//!
//! Names are assigned in document order, so the mapping is a pure function
//! of the input. Types and values are separate host namespaces.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use typeshim_core::Symbol;
use typeshim_core::utils::sanitize_identifier;

use super::reserved::{escape_type, escape_value, is_reserved_type, is_reserved_value};
use crate::analyze::collect_refs;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::{DeclId, ExportId, Model, Module, ModuleId};

/// A declaration of another module, imported by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeImport {
    pub decl: DeclId,
    /// Module the declaration lives in.
    pub module: String,
    /// Host name inside its own module.
    pub imported: String,
    /// Host name inside the importing module.
    pub local: String,
}

/// Shim-local bindings of an imported host value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostBinding {
    /// The raw import, e.g. `roundNotChecked`.
    pub unchecked: String,
    /// The same value under its declared host type, e.g. `roundTypeChecked`.
    pub checked: String,
}

/// Host names of one module.
#[derive(Clone, Debug)]
pub struct ModuleNames {
    module: ModuleId,
    origin_binding: String,
    types: IndexMap<DeclId, String>,
    imports: IndexMap<DeclId, TypeImport>,
    values: IndexMap<ExportId, String>,
    host_bindings: IndexMap<ExportId, HostBinding>,
}

impl ModuleNames {
    pub fn module(&self) -> ModuleId {
        self.module
    }

    /// Binding of the compiled origin module inside the shim, e.g. `TypesBS`.
    pub fn origin_binding(&self) -> &str {
        &self.origin_binding
    }

    /// Name of `decl` as seen from this module: its own name for local
    /// declarations, the import alias for foreign ones.
    pub fn type_name(&self, decl: DeclId) -> Option<&str> {
        self.types
            .get(&decl)
            .or_else(|| self.imports.get(&decl).map(|i| &i.local))
            .map(String::as_str)
    }

    pub fn local_types(&self) -> impl Iterator<Item = (DeclId, &str)> {
        self.types.iter().map(|(&d, n)| (d, n.as_str()))
    }

    pub fn imports(&self) -> impl Iterator<Item = &TypeImport> {
        self.imports.values()
    }

    pub fn value_name(&self, export: ExportId) -> Option<&str> {
        self.values.get(&export).map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = (ExportId, &str)> {
        self.values.iter().map(|(&e, n)| (e, n.as_str()))
    }

    /// Bindings of an imported host value; `None` for ordinary exports.
    pub fn host_binding(&self, export: ExportId) -> Option<&HostBinding> {
        self.host_bindings.get(&export)
    }
}

/// Host names of every module of a model.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    modules: Vec<ModuleNames>,
}

impl NameTable {
    pub fn module(&self, id: ModuleId) -> &ModuleNames {
        &self.modules[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleNames> {
        self.modules.iter()
    }
}

/// Assign host names for all modules. Violations of injectivity are
/// reported as `NameCollision`.
pub fn assign_names(model: &Model, diagnostics: &mut Diagnostics) -> NameTable {
    let mut modules: Vec<ModuleNames> = Vec::with_capacity(model.modules().len());
    let mut type_spaces = Vec::with_capacity(model.modules().len());

    for module in model.modules() {
        let mut namer = ModuleNamer::new(model, module, diagnostics);
        namer.assign_local_types();
        namer.assign_values();
        type_spaces.push(namer.types_used);
        modules.push(namer.names);
    }

    // Imports need the exporting module's local names
    for (index, module) in model.modules().iter().enumerate() {
        let foreign = foreign_decls(model, module);
        let mut imports = IndexMap::new();
        for decl in foreign {
            let owner = model.decl(decl).module;
            let Some(imported) = modules[owner.index()].types.get(&decl).cloned() else {
                continue;
            };
            let owner_name = &model.module(owner).name;
            let base = format!("{}_{}", sanitize_identifier(owner_name), imported);
            let local = claim(&mut type_spaces[index], &base, None);
            imports.insert(
                decl,
                TypeImport {
                    decl,
                    module: owner_name.clone(),
                    imported,
                    local,
                },
            );
        }
        modules[index].imports = imports;

        tracing::debug!(
            module = %module.name,
            types = modules[index].types.len(),
            imports = modules[index].imports.len(),
            values = modules[index].values.len(),
            "assigned host names"
        );
    }

    NameTable { modules }
}

/// Display name of a component wrapper: the qualified origin path, with a
/// trailing `make` or `default` dropped (`Hooks.Inner.make` is `Hooks_Inner`).
pub fn component_display_name(model: &Model, export: ExportId) -> String {
    let value = model.export(export);
    let mut segments = vec![sanitize_identifier(&model.module(value.module).name).into_owned()];
    segments.extend(
        value
            .path
            .iter()
            .map(|&s| sanitize_identifier(model.name(s)).into_owned()),
    );
    let name = model.name(value.name);
    if name != "make" && name != "default" {
        segments.push(sanitize_identifier(name).into_owned());
    }
    segments.join("_")
}

struct ModuleNamer<'a> {
    model: &'a Model,
    module: &'a Module,
    diagnostics: &'a mut Diagnostics,
    names: ModuleNames,
    types_used: HashSet<String>,
    values_used: HashSet<String>,
}

impl<'a> ModuleNamer<'a> {
    fn new(model: &'a Model, module: &'a Module, diagnostics: &'a mut Diagnostics) -> Self {
        let origin_binding = format!("{}BS", sanitize_identifier(&module.name));
        let values_used = [origin_binding.clone(), "Curry".into(), "React".into()]
            .into_iter()
            .collect();
        Self {
            model,
            module,
            diagnostics,
            names: ModuleNames {
                module: module.id,
                origin_binding,
                types: IndexMap::new(),
                imports: IndexMap::new(),
                values: IndexMap::new(),
                host_bindings: IndexMap::new(),
            },
            types_used: HashSet::new(),
            values_used,
        }
    }

    fn assign_local_types(&mut self) {
        for decl_id in self.module.root.all_decls() {
            let decl = self.model.decl(decl_id);
            let base = joined(self.model, &decl.path, decl.name);
            let name = if is_reserved_type(&base) {
                let escaped = escape_type(&base);
                if !self.types_used.insert(escaped.clone()) {
                    self.collision(self.model.decl_path(decl_id), &escaped);
                }
                escaped
            } else {
                claim(&mut self.types_used, &base, Some(&self.module.name))
            };
            self.names.types.insert(decl_id, name);
        }
    }

    fn assign_values(&mut self) {
        for export_id in self.module.root.all_exports() {
            let export = self.model.export(export_id);
            let base = joined(self.model, &export.path, export.name);
            let name = if is_reserved_value(&base) {
                let escaped = escape_value(&base);
                if !self.values_used.insert(escaped.clone()) {
                    self.collision(self.model.export_path(export_id), &escaped);
                }
                escaped
            } else {
                claim(&mut self.values_used, &base, Some(&self.module.name))
            };
            self.names.values.insert(export_id, name);
        }

        // Claimed after every value name, so exports keep their own names
        for (&export_id, name) in &self.names.values {
            if !self.model.export(export_id).is_import() {
                continue;
            }
            let binding = HostBinding {
                unchecked: claim(&mut self.values_used, &format!("{name}NotChecked"), None),
                checked: claim(&mut self.values_used, &format!("{name}TypeChecked"), None),
            };
            self.names.host_bindings.insert(export_id, binding);
        }
    }

    fn collision(&mut self, path: String, name: &str) {
        self.diagnostics
            .report(DiagnosticKind::NameCollision, &self.module.name, path)
            .message(name)
            .emit();
    }
}

/// Take `base` if free, else `{qualifier}_{base}`, else `base2`, `base3`, ...
fn claim(used: &mut HashSet<String>, base: &str, qualifier: Option<&str>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    if let Some(qualifier) = qualifier {
        let qualified = format!("{}_{}", sanitize_identifier(qualifier), base);
        if used.insert(qualified.clone()) {
            return qualified;
        }
    }
    let mut counter = 2;
    loop {
        let name = format!("{base}{counter}");
        if used.insert(name.clone()) {
            return name;
        }
        counter += 1;
    }
}

/// Namespace path and name joined with `_`.
fn joined(model: &Model, path: &[Symbol], name: Symbol) -> String {
    let mut out = String::new();
    for &seg in path {
        out.push_str(model.name(seg));
        out.push('_');
    }
    out.push_str(model.name(name));
    sanitize_identifier(&out).into_owned()
}

/// Declarations of other modules named from this module's declarations and
/// exported values, in first-use order.
fn foreign_decls(model: &Model, module: &Module) -> IndexSet<DeclId> {
    let roots = module
        .root
        .all_decls()
        .into_iter()
        .map(|d| model.decl(d).body)
        .chain(module.root.all_exports().into_iter().map(|e| model.export(e).ty));

    let mut out = IndexSet::new();
    for root in roots {
        for decl in collect_refs(model, root) {
            if model.decl(decl).module != module.id {
                out.insert(decl);
            }
        }
    }
    out
}
