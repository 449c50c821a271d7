//! Lowering from the textual input document to the interned model.
//!
//! Runs in phases so declarations can reference each other in any order:
//! 1. Register modules, namespaces, declarations, and exports (names only).
//! 2. Expand namespace aliases into alias declarations and exports.
//! 3. Lower declaration bodies, resolving references through the scope chain.
//! 4. Lower exported value types and validate components.
//! 5. Reject cyclic abbreviations, warn on unused type parameters.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use typeshim_core::Symbol;

use super::module::{ExportedValue, HostImport, Module, Namespace, TypeDecl};
use super::types::{
    Case, DeclId, ExportId, Field, FunctionShape, ModuleId, Param, TYPE_UNIT, TYPE_UNRESOLVED,
    TypeId, TypeShape, VariantShape,
};
use super::Model;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::input::{
    CaseInput, ExportInput, FieldInput, InputDocument, ModuleInput, NamespaceInput, ParamInput,
    TypeDeclInput, TypeExpr,
};

/// Lower `doc` into a model. Errors are reported, never fatal: the offending
/// type becomes `Unresolved` and its module is marked failed.
pub fn lower(doc: &InputDocument) -> (Model, Diagnostics) {
    let mut lowering = Lowering::default();
    lowering.run(doc);

    tracing::debug!(
        modules = lowering.model.modules.len(),
        decls = lowering.model.decls.len(),
        exports = lowering.model.exports.len(),
        types = lowering.model.arena.len(),
        "lowered input document"
    );

    (lowering.model, lowering.diagnostics)
}

type ScopeKey = (ModuleId, Vec<Symbol>);

#[derive(Clone, Debug, Default)]
struct Scope {
    decls: IndexMap<Symbol, DeclId>,
    exports: IndexMap<Symbol, ExportId>,
    children: IndexSet<Symbol>,
}

struct PendingAlias<'d> {
    module: ModuleId,
    path: Vec<Symbol>,
    target: &'d str,
}

/// Where a type expression is being lowered.
#[derive(Clone, Copy)]
struct TypeCtx<'a> {
    module: ModuleId,
    path: &'a [Symbol],
    /// Declaration parameters in scope. `None` for exported values, which may
    /// mention free variables.
    params: Option<&'a [Symbol]>,
    origin: &'a str,
}

#[derive(Default)]
struct Lowering<'d> {
    model: Model,
    diagnostics: Diagnostics,
    module_ids: HashMap<String, ModuleId>,
    scopes: HashMap<ScopeKey, Scope>,
    pending_decls: Vec<(DeclId, &'d TypeDeclInput)>,
    pending_exports: Vec<(ExportId, &'d ExportInput)>,
    alias_decls: Vec<DeclId>,
    alias_exports: Vec<ExportId>,
    aliases: Vec<PendingAlias<'d>>,
    /// Alias namespaces not expanded yet.
    unexpanded: HashSet<ScopeKey>,
    /// Payload arity of every polymorphic tag seen in a module.
    poly_arities: HashMap<(ModuleId, Symbol), usize>,
    /// Breadcrumbs below the current origin path.
    crumbs: Vec<String>,
}

impl<'d> Lowering<'d> {
    fn run(&mut self, doc: &'d InputDocument) {
        for module in &doc.modules {
            self.register_module(module);
        }
        self.expand_aliases();
        self.lower_decls();
        self.lower_exports();
        self.reject_cyclic_abbreviations();
        self.warn_unused_params();
    }

    fn report(&mut self, kind: DiagnosticKind, module: ModuleId, path: String, detail: Option<&str>) {
        let name = &self.model.modules[module.index()].name;
        let builder = self.diagnostics.report(kind, name, path);
        match detail {
            Some(detail) => builder.message(detail).emit(),
            None => builder.emit(),
        }
    }

    fn here(&self, ctx: &TypeCtx<'_>) -> String {
        let mut out = ctx.origin.to_string();
        for crumb in &self.crumbs {
            out.push('.');
            out.push_str(crumb);
        }
        out
    }

    fn dotted(&self, module: ModuleId, path: &[Symbol], name: &str) -> String {
        let mut out = self.model.modules[module.index()].name.clone();
        for &seg in path {
            out.push('.');
            out.push_str(self.model.interner.resolve(seg));
        }
        if !name.is_empty() {
            out.push('.');
            out.push_str(name);
        }
        out
    }

    // ---------------------------------------------------------------------
    // Phase 1: registration
    // ---------------------------------------------------------------------

    fn register_module(&mut self, input: &'d ModuleInput) {
        if self.module_ids.contains_key(&input.module_path) {
            self.diagnostics
                .report(
                    DiagnosticKind::DuplicateDeclaration,
                    &input.module_path,
                    input.module_path.clone(),
                )
                .message(format!("module {}", input.module_path))
                .emit();
            return;
        }

        let id = ModuleId(self.model.modules.len() as u32);
        self.model.modules.push(Module {
            id,
            name: input.module_path.clone(),
            root: Namespace::root(),
        });
        self.module_ids.insert(input.module_path.clone(), id);

        self.register_namespace(
            id,
            Vec::new(),
            &input.type_declarations,
            &input.exported_values,
            &input.namespaces,
        );

        for import in &input.imported_values {
            if let Some(export) = self.register_export(id, &[], &import.value) {
                self.model.exports[export.index()].import = Some(HostImport {
                    from: import.from.clone(),
                    name: import.imported_name().to_string(),
                });
            }
        }
    }

    fn register_namespace(
        &mut self,
        module: ModuleId,
        path: Vec<Symbol>,
        decls: &'d [TypeDeclInput],
        exports: &'d [ExportInput],
        namespaces: &'d [NamespaceInput],
    ) {
        self.scopes.entry((module, path.clone())).or_default();

        for decl in decls {
            self.register_decl(module, &path, decl);
        }
        for export in exports {
            self.register_export(module, &path, export);
        }
        for ns in namespaces {
            let name = self.model.interner.intern(&ns.name);
            let key = (module, path.clone());
            let fresh = self
                .scopes
                .get_mut(&key)
                .is_some_and(|scope| scope.children.insert(name));
            if !fresh {
                let origin = self.dotted(module, &path, &ns.name);
                let detail = format!("module {}", ns.name);
                self.report(DiagnosticKind::DuplicateDeclaration, module, origin, Some(&detail));
                continue;
            }

            let mut child_path = path.clone();
            child_path.push(name);
            self.attach_namespace(module, &path, name, ns.alias_of.clone());

            match &ns.alias_of {
                Some(target) => {
                    self.scopes.entry((module, child_path.clone())).or_default();
                    self.aliases.push(PendingAlias {
                        module,
                        path: child_path,
                        target,
                    });
                }
                None => self.register_namespace(
                    module,
                    child_path,
                    &ns.type_declarations,
                    &ns.exported_values,
                    &ns.namespaces,
                ),
            }
        }
    }

    fn attach_namespace(
        &mut self,
        module: ModuleId,
        parent: &[Symbol],
        name: Symbol,
        alias_of: Option<String>,
    ) {
        let mut path = parent.to_vec();
        path.push(name);
        if let Some(ns) = self.model.modules[module.index()].root.find_mut(parent) {
            ns.children.push(Namespace {
                name: Some(name),
                path,
                alias_of,
                ..Namespace::default()
            });
        }
    }

    fn register_decl(&mut self, module: ModuleId, path: &[Symbol], input: &'d TypeDeclInput) {
        let name = self.model.interner.intern(&input.name);
        let origin = self.dotted(module, path, &input.name);

        if self.scope(module, path).decls.contains_key(&name) {
            self.report(
                DiagnosticKind::DuplicateDeclaration,
                module,
                origin,
                Some(&input.name),
            );
            return;
        }

        let mut params = Vec::with_capacity(input.params.len());
        for param in &input.params {
            let sym = self.model.interner.intern(param);
            if params.contains(&sym) {
                let detail = format!("'{param}");
                self.report(
                    DiagnosticKind::DuplicateDeclaration,
                    module,
                    origin.clone(),
                    Some(&detail),
                );
            }
            params.push(sym);
        }

        let id = self.push_decl(TypeDecl {
            id: DeclId(0),
            module,
            path: path.to_vec(),
            name,
            params,
            body: TYPE_UNRESOLVED,
            opaque: matches!(input.body, TypeExpr::Opaque),
            alias_of: None,
        });
        self.pending_decls.push((id, input));
    }

    fn register_export(
        &mut self,
        module: ModuleId,
        path: &[Symbol],
        input: &'d ExportInput,
    ) -> Option<ExportId> {
        let name = self.model.interner.intern(&input.name);

        if self.scope(module, path).exports.contains_key(&name) {
            let origin = self.dotted(module, path, &input.name);
            self.report(DiagnosticKind::DuplicateExport, module, origin, Some(&input.name));
            return None;
        }

        let id = self.push_export(ExportedValue {
            id: ExportId(0),
            module,
            path: path.to_vec(),
            name,
            ty: TYPE_UNRESOLVED,
            is_component: input.is_component,
            alias_of: None,
            import: None,
        });
        self.pending_exports.push((id, input));
        Some(id)
    }

    fn push_decl(&mut self, mut decl: TypeDecl) -> DeclId {
        let id = DeclId(self.model.decls.len() as u32);
        decl.id = id;
        let key = (decl.module, decl.path.clone());
        let scope = self.scopes.entry(key).or_default();
        scope.decls.insert(decl.name, id);
        if let Some(ns) = self.model.modules[decl.module.index()]
            .root
            .find_mut(&decl.path)
        {
            ns.decls.push(id);
        }
        self.model.decls.push(decl);
        id
    }

    fn push_export(&mut self, mut export: ExportedValue) -> ExportId {
        let id = ExportId(self.model.exports.len() as u32);
        export.id = id;
        let key = (export.module, export.path.clone());
        let scope = self.scopes.entry(key).or_default();
        scope.exports.insert(export.name, id);
        if let Some(ns) = self.model.modules[export.module.index()]
            .root
            .find_mut(&export.path)
        {
            ns.exports.push(id);
        }
        self.model.exports.push(export);
        id
    }

    fn scope(&mut self, module: ModuleId, path: &[Symbol]) -> &Scope {
        self.scopes.entry((module, path.to_vec())).or_default()
    }

    // ---------------------------------------------------------------------
    // Phase 2: namespace aliases
    // ---------------------------------------------------------------------

    fn expand_aliases(&mut self) {
        let mut pending = std::mem::take(&mut self.aliases);
        self.unexpanded = pending
            .iter()
            .map(|alias| (alias.module, alias.path.clone()))
            .collect();

        // An alias may target another alias; expand targets first.
        loop {
            let before = pending.len();
            let mut waiting = Vec::new();
            for alias in pending {
                if self.try_expand(&alias) {
                    self.unexpanded.remove(&(alias.module, alias.path.clone()));
                } else {
                    waiting.push(alias);
                }
            }
            pending = waiting;
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        for alias in pending {
            let origin = self.dotted(alias.module, &alias.path, "");
            self.report(
                DiagnosticKind::InvalidAlias,
                alias.module,
                origin,
                Some(alias.target),
            );
        }
    }

    /// Returns false when the target may still appear once another alias
    /// is expanded.
    fn try_expand(&mut self, alias: &PendingAlias<'d>) -> bool {
        let own_key = (alias.module, alias.path.clone());
        let parent = &alias.path[..alias.path.len().saturating_sub(1)];

        let Some((target_module, target_path)) =
            self.resolve_namespace(alias.module, parent, alias.target)
        else {
            if self.unexpanded.iter().any(|key| *key != own_key) {
                return false;
            }
            let origin = self.dotted(alias.module, &alias.path, "");
            self.report(
                DiagnosticKind::InvalidAlias,
                alias.module,
                origin,
                Some(alias.target),
            );
            return true;
        };

        if target_module == alias.module && alias.path.starts_with(&target_path) {
            let origin = self.dotted(alias.module, &alias.path, "");
            self.report(
                DiagnosticKind::InvalidAlias,
                alias.module,
                origin,
                Some(alias.target),
            );
            return true;
        }

        let blocked = self.unexpanded.iter().any(|(module, path)| {
            *module == target_module && path.starts_with(&target_path) && (*module, path) != (own_key.0, &own_key.1)
        });
        if blocked {
            return false;
        }

        self.copy_namespace(target_module, &target_path, alias.module, &alias.path);
        true
    }

    fn copy_namespace(
        &mut self,
        from_module: ModuleId,
        from_path: &[Symbol],
        to_module: ModuleId,
        to_path: &[Symbol],
    ) {
        let Some(scope) = self.scopes.get(&(from_module, from_path.to_vec())).cloned() else {
            return;
        };

        for (&name, &target) in &scope.decls {
            let params = self.model.decls[target.index()].params.clone();
            let id = self.push_decl(TypeDecl {
                id: DeclId(0),
                module: to_module,
                path: to_path.to_vec(),
                name,
                params,
                body: TYPE_UNRESOLVED,
                opaque: false,
                alias_of: Some(target),
            });
            self.alias_decls.push(id);
        }

        for (&name, &target) in &scope.exports {
            let is_component = self.model.exports[target.index()].is_component;
            let id = self.push_export(ExportedValue {
                id: ExportId(0),
                module: to_module,
                path: to_path.to_vec(),
                name,
                ty: TYPE_UNRESOLVED,
                is_component,
                alias_of: Some(target),
                import: None,
            });
            self.alias_exports.push(id);
        }

        for &child in &scope.children {
            let alias_of = self.model.modules[from_module.index()]
                .root
                .find(from_path)
                .and_then(|ns| ns.child(child))
                .and_then(|ns| ns.alias_of.clone());
            self.attach_namespace(to_module, to_path, child, alias_of);
            if let Some(scope) = self.scopes.get_mut(&(to_module, to_path.to_vec())) {
                scope.children.insert(child);
            }

            let mut from_child = from_path.to_vec();
            from_child.push(child);
            let mut to_child = to_path.to_vec();
            to_child.push(child);
            self.scopes.entry((to_module, to_child.clone())).or_default();
            self.copy_namespace(from_module, &from_child, to_module, &to_child);
        }
    }

    // ---------------------------------------------------------------------
    // Name resolution
    // ---------------------------------------------------------------------

    fn symbols(&self, segments: &[&str]) -> Option<Vec<Symbol>> {
        segments
            .iter()
            .map(|seg| self.model.interner.get(seg))
            .collect()
    }

    /// Resolve a dotted namespace path relative to `from`, searching the
    /// enclosing namespaces outward, then other modules.
    fn resolve_namespace(
        &self,
        module: ModuleId,
        from: &[Symbol],
        dotted: &str,
    ) -> Option<ScopeKey> {
        let segments: Vec<&str> = dotted.split('.').collect();

        if let Some(syms) = self.symbols(&segments) {
            for depth in (0..=from.len()).rev() {
                let mut candidate = from[..depth].to_vec();
                candidate.extend(&syms);
                let key = (module, candidate);
                if self.scopes.contains_key(&key) {
                    return Some(key);
                }
            }
        }

        let (&head, rest) = segments.split_first()?;
        let &other = self.module_ids.get(head)?;
        let key = (other, self.symbols(rest)?);
        self.scopes.contains_key(&key).then_some(key)
    }

    fn resolve_decl(&self, module: ModuleId, from: &[Symbol], dotted: &str) -> Option<DeclId> {
        let segments: Vec<&str> = dotted.split('.').collect();
        let (&last, prefix) = segments.split_last()?;
        let name = self.model.interner.get(last)?;

        if let Some(prefix_syms) = self.symbols(prefix) {
            for depth in (0..=from.len()).rev() {
                let mut candidate = from[..depth].to_vec();
                candidate.extend(&prefix_syms);
                if let Some(&id) = self
                    .scopes
                    .get(&(module, candidate))
                    .and_then(|scope| scope.decls.get(&name))
                {
                    return Some(id);
                }
            }
        }

        let (&head, rest) = prefix.split_first()?;
        let &other = self.module_ids.get(head)?;
        let path = self.symbols(rest)?;
        self.scopes
            .get(&(other, path))
            .and_then(|scope| scope.decls.get(&name))
            .copied()
    }

    // ---------------------------------------------------------------------
    // Phase 3: declaration bodies
    // ---------------------------------------------------------------------

    fn lower_decls(&mut self) {
        let pending = std::mem::take(&mut self.pending_decls);
        for (id, input) in pending {
            let decl = &self.model.decls[id.index()];
            let module = decl.module;
            let path = decl.path.clone();
            let params = decl.params.clone();
            let origin = self.dotted(module, &path, &input.name);

            let body = match &input.body {
                TypeExpr::Opaque => self.model.arena.intern(TypeShape::Opaque(id)),
                expr => {
                    let ctx = TypeCtx {
                        module,
                        path: &path,
                        params: Some(&params),
                        origin: &origin,
                    };
                    self.lower_type(expr, &ctx)
                }
            };
            self.model.decls[id.index()].body = body;
        }

        for id in std::mem::take(&mut self.alias_decls) {
            let decl = &self.model.decls[id.index()];
            let Some(target) = decl.alias_of else {
                continue;
            };
            let shape = if decl.params.is_empty() {
                TypeShape::Ref(target)
            } else {
                let params = decl.params.clone();
                let args = params
                    .into_iter()
                    .map(|p| self.model.arena.intern(TypeShape::Var(p)))
                    .collect();
                TypeShape::Applied { head: target, args }
            };
            let body = self.model.arena.intern(shape);
            self.model.decls[id.index()].body = body;
        }
    }

    fn lower_type(&mut self, expr: &TypeExpr, ctx: &TypeCtx<'_>) -> TypeId {
        match expr {
            TypeExpr::Primitive { name } => self.model.arena.primitive(*name),
            TypeExpr::Option { inner } => {
                let inner = self.lower_type(inner, ctx);
                self.model.arena.intern(TypeShape::Option(inner))
            }
            TypeExpr::Array { inner } => {
                let inner = self.lower_type(inner, ctx);
                self.model.arena.intern(TypeShape::Array(inner))
            }
            TypeExpr::Tuple { elements } => {
                let mut lowered = Vec::with_capacity(elements.len());
                for (i, element) in elements.iter().enumerate() {
                    self.crumbs.push(i.to_string());
                    lowered.push(self.lower_type(element, ctx));
                    self.crumbs.pop();
                }
                self.model.arena.intern(TypeShape::Tuple(lowered))
            }
            TypeExpr::Record { fields } => self.lower_record(fields, ctx),
            TypeExpr::Variant { cases, polymorphic } => {
                self.lower_variant(cases, *polymorphic, ctx)
            }
            TypeExpr::Function {
                params,
                result,
                curried,
                arity,
            } => self.lower_function(params, result, *curried, *arity, ctx),
            TypeExpr::Var { name } => {
                let sym = self.model.interner.intern(name);
                if let Some(params) = ctx.params
                    && !params.contains(&sym)
                {
                    let origin = self.here(ctx);
                    self.report(
                        DiagnosticKind::UnboundTypeVariable,
                        ctx.module,
                        origin,
                        Some(name),
                    );
                    return TYPE_UNRESOLVED;
                }
                self.model.arena.intern(TypeShape::Var(sym))
            }
            TypeExpr::Ref { name, args } => self.lower_ref(name, args, ctx),
            TypeExpr::Opaque => {
                let origin = self.here(ctx);
                self.report(
                    DiagnosticKind::OpaqueOutsideDeclaration,
                    ctx.module,
                    origin,
                    None,
                );
                TYPE_UNRESOLVED
            }
        }
    }

    fn lower_record(&mut self, fields: &[FieldInput], ctx: &TypeCtx<'_>) -> TypeId {
        let mut names = HashSet::new();
        let mut host_names = HashSet::new();
        let mut lowered = Vec::with_capacity(fields.len());

        for field in fields {
            self.crumbs.push(field.name.clone());
            let ty = self.lower_type(&field.ty, ctx);
            let name = self.model.interner.intern(&field.name);
            let host_name = match &field.host_name {
                Some(host) => self.model.interner.intern(host),
                None => name,
            };

            if !names.insert(name) {
                let origin = self.here(ctx);
                self.report(DiagnosticKind::DuplicateField, ctx.module, origin, Some(&field.name));
            } else if !host_names.insert(host_name) {
                let origin = self.here(ctx);
                let host = self.model.interner.resolve(host_name).to_string();
                self.report(DiagnosticKind::DuplicateField, ctx.module, origin, Some(&host));
            } else {
                lowered.push(Field {
                    name,
                    host_name,
                    ty,
                    mutable: field.mutable,
                    optional: field.optional,
                });
            }
            self.crumbs.pop();
        }

        self.model.arena.intern(TypeShape::Record(lowered))
    }

    fn lower_variant(
        &mut self,
        cases: &[CaseInput],
        polymorphic: bool,
        ctx: &TypeCtx<'_>,
    ) -> TypeId {
        if cases.is_empty() {
            let origin = self.here(ctx);
            self.report(DiagnosticKind::EmptyVariant, ctx.module, origin, None);
            return TYPE_UNRESOLVED;
        }

        let mut arities: HashMap<Symbol, usize> = HashMap::new();
        let mut host_tags = HashSet::new();
        let mut lowered = Vec::with_capacity(cases.len());

        for case in cases {
            self.crumbs.push(case.tag.clone());
            let payload_input = case.payload.as_deref().unwrap_or_default();
            let mut payload = Vec::with_capacity(payload_input.len());
            for (i, ty) in payload_input.iter().enumerate() {
                self.crumbs.push(i.to_string());
                payload.push(self.lower_type(ty, ctx));
                self.crumbs.pop();
            }

            let tag = self.model.interner.intern(&case.tag);
            let host_tag = match &case.host_tag {
                Some(host) => self.model.interner.intern(host),
                None => tag,
            };
            let origin = self.here(ctx);
            self.crumbs.pop();

            if let Some(&arity) = arities.get(&tag) {
                let kind = if arity == payload.len() {
                    DiagnosticKind::DuplicateVariantTag
                } else {
                    DiagnosticKind::ConflictingVariantArity
                };
                self.report(kind, ctx.module, origin, Some(&case.tag));
                continue;
            }
            arities.insert(tag, payload.len());

            if polymorphic {
                let seen = *self
                    .poly_arities
                    .entry((ctx.module, tag))
                    .or_insert(payload.len());
                if seen != payload.len() {
                    self.report(
                        DiagnosticKind::ConflictingVariantArity,
                        ctx.module,
                        origin.clone(),
                        Some(&case.tag),
                    );
                }
            }

            if !host_tags.insert(host_tag) {
                let host = self.model.interner.resolve(host_tag).to_string();
                self.report(DiagnosticKind::HostTagCollision, ctx.module, origin, Some(&host));
                continue;
            }

            lowered.push(Case {
                tag,
                host_tag,
                payload,
            });
        }

        self.model.arena.intern(TypeShape::Variant(VariantShape {
            cases: lowered,
            polymorphic,
        }))
    }

    fn lower_function(
        &mut self,
        params: &[ParamInput],
        result: &TypeExpr,
        curried: bool,
        arity: Option<usize>,
        ctx: &TypeCtx<'_>,
    ) -> TypeId {
        if let Some(arity) = arity
            && arity != params.len()
        {
            let origin = self.here(ctx);
            let detail = format!(
                "runtime arity is {arity} but {} parameters are declared",
                params.len()
            );
            self.report(DiagnosticKind::FunctionArityMismatch, ctx.module, origin, Some(&detail));
        }
        if curried && params.is_empty() {
            let origin = self.here(ctx);
            self.report(
                DiagnosticKind::FunctionArityMismatch,
                ctx.module,
                origin,
                Some("a curried function takes at least one parameter"),
            );
        }

        let mut labels = HashSet::new();
        let mut lowered = Vec::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            let crumb = match &param.label {
                Some(label) => label.clone(),
                None => format!("arg{}", i + 1),
            };
            self.crumbs.push(crumb);
            let ty = self.lower_type(&param.ty, ctx);
            let label = param.label.as_deref().map(|l| self.model.interner.intern(l));

            if param.optional && label.is_none() {
                let origin = self.here(ctx);
                self.report(DiagnosticKind::UnlabeledOptionalParam, ctx.module, origin, None);
            }
            if let Some(label) = label
                && !labels.insert(label)
            {
                let origin = self.here(ctx);
                let name = self.model.interner.resolve(label).to_string();
                self.report(DiagnosticKind::DuplicateField, ctx.module, origin, Some(&name));
            }
            self.crumbs.pop();

            lowered.push(Param {
                label,
                ty,
                optional: param.optional && label.is_some(),
            });
        }

        self.crumbs.push("return".to_string());
        let result = self.lower_type(result, ctx);
        self.crumbs.pop();

        self.model.arena.intern(TypeShape::Function(FunctionShape {
            params: lowered,
            result,
            curried,
        }))
    }

    fn lower_ref(&mut self, name: &str, args: &[TypeExpr], ctx: &TypeCtx<'_>) -> TypeId {
        let lowered: Vec<TypeId> = args.iter().map(|arg| self.lower_type(arg, ctx)).collect();

        let Some(decl) = self.resolve_decl(ctx.module, ctx.path, name) else {
            let origin = self.here(ctx);
            self.report(DiagnosticKind::UndefinedReference, ctx.module, origin, Some(name));
            return TYPE_UNRESOLVED;
        };

        let expected = self.model.decls[decl.index()].params.len();
        if expected != lowered.len() {
            let origin = self.here(ctx);
            let detail = format!("`{name}` expects {expected}, found {}", lowered.len());
            self.report(DiagnosticKind::GenericArityMismatch, ctx.module, origin, Some(&detail));
            return TYPE_UNRESOLVED;
        }

        let shape = if expected == 0 {
            TypeShape::Ref(decl)
        } else {
            TypeShape::Applied {
                head: decl,
                args: lowered,
            }
        };
        self.model.arena.intern(shape)
    }

    // ---------------------------------------------------------------------
    // Phase 4: exports
    // ---------------------------------------------------------------------

    fn lower_exports(&mut self) {
        let pending = std::mem::take(&mut self.pending_exports);
        for (id, input) in pending {
            let export = &self.model.exports[id.index()];
            let module = export.module;
            let path = export.path.clone();
            let origin = self.dotted(module, &path, &input.name);
            let ctx = TypeCtx {
                module,
                path: &path,
                params: None,
                origin: &origin,
            };
            let ty = self.lower_type(&input.ty, &ctx);
            self.model.exports[id.index()].ty = ty;

            if input.is_component {
                self.validate_component(module, ty, origin);
            }
        }

        // Creation order puts every alias target before the aliases of it
        for id in std::mem::take(&mut self.alias_exports) {
            if let Some(target) = self.model.exports[id.index()].alias_of {
                self.model.exports[id.index()].ty = self.model.exports[target.index()].ty;
            }
        }
    }

    fn validate_component(&mut self, module: ModuleId, ty: TypeId, origin: String) {
        if ty == TYPE_UNRESOLVED {
            return;
        }
        let TypeShape::Function(func) = self.resolve_alias(ty) else {
            self.report(
                DiagnosticKind::InvalidComponent,
                module,
                origin,
                Some("a component must be a function"),
            );
            return;
        };

        let last = func.params.len().saturating_sub(1);
        let valid = if func.has_labels() {
            func.params
                .iter()
                .enumerate()
                .all(|(i, p)| p.label.is_some() || (p.ty == TYPE_UNIT && i == last))
        } else {
            func.params.len() == 1
                && matches!(self.resolve_alias(func.params[0].ty), TypeShape::Record(_))
        };

        if !valid {
            self.report(
                DiagnosticKind::InvalidComponent,
                module,
                origin,
                Some("props must be labeled parameters or a single record"),
            );
        }
    }

    /// Follow non-generic references to the shape they abbreviate.
    fn resolve_alias(&self, mut ty: TypeId) -> TypeShape {
        let mut seen = HashSet::new();
        while let TypeShape::Ref(decl) = self.model.arena.shape(ty) {
            if !seen.insert(*decl) {
                break;
            }
            ty = self.model.decls[decl.index()].body;
        }
        self.model.arena.shape(ty).clone()
    }

    // ---------------------------------------------------------------------
    // Phase 5: post checks
    // ---------------------------------------------------------------------

    fn reject_cyclic_abbreviations(&mut self) {
        let mut cyclic = Vec::new();

        for decl in &self.model.decls {
            let mut seen = HashSet::from([decl.id]);
            let mut current = decl.body;
            loop {
                let next = match self.model.arena.shape(current) {
                    TypeShape::Ref(target) | TypeShape::Applied { head: target, .. } => *target,
                    _ => break,
                };
                if next == decl.id {
                    cyclic.push(decl.id);
                    break;
                }
                if !seen.insert(next) {
                    break;
                }
                current = self.model.decls[next.index()].body;
            }
        }

        for id in cyclic {
            let decl = &self.model.decls[id.index()];
            let module = decl.module;
            let origin = self.model.decl_path(id);
            self.report(
                DiagnosticKind::CyclicAbbreviation,
                module,
                origin.clone(),
                Some(&origin),
            );
            self.model.decls[id.index()].body = TYPE_UNRESOLVED;
        }
    }

    fn warn_unused_params(&mut self) {
        let mut unused = Vec::new();
        for decl in &self.model.decls {
            if decl.opaque || decl.alias_of.is_some() || decl.body == TYPE_UNRESOLVED {
                continue;
            }
            let used = self.model.arena.free_vars(decl.body);
            for &param in &decl.params {
                if !used.contains(&param) {
                    unused.push((decl.id, param));
                }
            }
        }

        for (id, param) in unused {
            let module = self.model.decls[id.index()].module;
            let origin = self.model.decl_path(id);
            let name = self.model.interner.resolve(param).to_string();
            self.report(DiagnosticKind::UnusedTypeParameter, module, origin, Some(&name));
        }
    }
}
