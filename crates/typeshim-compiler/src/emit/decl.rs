//! Declaration tree: the host-side view of one module before rendering.
//!
//! Items are ordered imports first, then type declarations leaves first
//! (recursive groups kept together), then exported values.

use typeshim_core::Symbol;
use typeshim_core::utils::sanitize_identifier;

use crate::analyze::{DependencyAnalysis, TypeView};
use crate::model::{DeclId, FunctionShape, Model, PrimitiveKind, TYPE_UNIT, TypeId, TypeShape};
use crate::naming::ModuleNames;

#[derive(Clone, Debug, PartialEq)]
pub struct DeclTree {
    pub module: String,
    pub items: Vec<DeclItem>,
}

impl DeclTree {
    pub fn imports_react(&self) -> bool {
        self.items.iter().any(|i| matches!(i, DeclItem::ReactImport))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclItem {
    /// `import type {imported as local} from 'from';`
    Import {
        imported: String,
        local: String,
        from: String,
    },
    ReactImport,
    /// `export type name<params> = body;`
    Type {
        name: String,
        params: Vec<String>,
        body: HostType,
    },
    /// Nominal marker class for an opaque declaration.
    Opaque { name: String, params: Vec<String> },
    /// Mutually recursive declarations, or one self-recursive declaration.
    Group {
        forward: Vec<String>,
        members: Vec<DeclItem>,
    },
    /// `export declare const name: ty;`
    Value { name: String, ty: HostType },
    /// A host value imported into the origin module: `checked` carries the
    /// host type, `name` is the origin-facing wrapper.
    ImportedValue {
        name: String,
        checked: String,
        ty: HostType,
    },
    DefaultExport(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum HostType {
    Number,
    String,
    Boolean,
    Void,
    Unknown,
    Named {
        name: String,
        args: Vec<HostType>,
    },
    Var(String),
    /// `(undefined | T)`, or `(undefined | null | T)` when nested.
    Option {
        inner: Box<HostType>,
        nested: bool,
    },
    Array(Box<HostType>),
    Tuple(Vec<HostType>),
    Object(Vec<HostField>),
    StringUnion(Vec<String>),
    TaggedUnion(Vec<HostCase>),
    Function {
        type_params: Vec<String>,
        params: Vec<HostType>,
        /// The trailing options object may be omitted.
        options_optional: bool,
        result: Box<HostType>,
    },
    Component(Box<HostType>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct HostField {
    pub name: String,
    pub ty: HostType,
    pub readonly: bool,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HostCase {
    pub tag: String,
    pub value: Option<HostType>,
}

/// Build the declaration tree of the module `names` belongs to.
pub fn build_decl_tree(model: &Model, deps: &DependencyAnalysis, names: &ModuleNames) -> DeclTree {
    let module = model.module(names.module());
    let mut items = Vec::new();

    for import in names.imports() {
        items.push(DeclItem::Import {
            imported: import.imported.clone(),
            local: import.local.clone(),
            from: format!("./{}.gen", import.module),
        });
    }

    let exports = module.root.all_exports();
    if exports.iter().any(|&e| model.export(e).is_component) {
        items.push(DeclItem::ReactImport);
    }

    for scc in deps.module_sccs(model, module.id) {
        let members: Vec<DeclItem> = scc
            .iter()
            .map(|&decl| declaration(model, deps, names, decl))
            .collect();
        let recursive = scc.len() > 1 || scc.first().is_some_and(|&d| deps.is_recursive(d));
        if recursive {
            let forward = scc
                .iter()
                .filter_map(|&d| names.type_name(d))
                .map(str::to_string)
                .collect();
            items.push(DeclItem::Group { forward, members });
        } else {
            items.extend(members);
        }
    }

    let mut default_export = None;
    for id in exports {
        let export = model.export(id);
        let Some(name) = names.value_name(id) else {
            continue;
        };
        let ty = if export.is_component {
            HostTypes::new(model, deps, names, Vec::new()).component(export.ty)
        } else {
            let bound = model.arena.free_vars(export.ty);
            HostTypes::new(model, deps, names, bound).export(export.ty)
        };
        if export.path.is_empty() && model.name(export.name) == "default" {
            default_export = Some(name.to_string());
        }
        items.push(match names.host_binding(id) {
            Some(binding) => DeclItem::ImportedValue {
                name: name.to_string(),
                checked: binding.checked.clone(),
                ty,
            },
            None => DeclItem::Value {
                name: name.to_string(),
                ty,
            },
        });
    }
    if let Some(name) = default_export {
        items.push(DeclItem::DefaultExport(name));
    }

    DeclTree {
        module: module.name.clone(),
        items,
    }
}

fn declaration(
    model: &Model,
    deps: &DependencyAnalysis,
    names: &ModuleNames,
    id: DeclId,
) -> DeclItem {
    let decl = model.decl(id);
    let name = names.type_name(id).unwrap_or_default().to_string();
    let params = decl.params.iter().map(|&p| var_name(model, p)).collect();
    if decl.opaque {
        return DeclItem::Opaque { name, params };
    }
    let body = HostTypes::new(model, deps, names, decl.params.clone()).host(decl.body);
    DeclItem::Type { name, params, body }
}

fn var_name(model: &Model, sym: Symbol) -> String {
    sanitize_identifier(model.name(sym)).into_owned()
}

/// Host rendering of origin types, with a set of variables in scope.
///
/// Option layers are detected through the same `TypeView` the planner uses,
/// so a nested option hidden behind a generic alias is declared with `null`
/// exactly when the shim produces it.
struct HostTypes<'a> {
    model: &'a Model,
    view: TypeView<'a>,
    names: &'a ModuleNames,
    bound: Vec<Symbol>,
}

impl<'a> HostTypes<'a> {
    fn new(
        model: &'a Model,
        deps: &'a DependencyAnalysis,
        names: &'a ModuleNames,
        bound: Vec<Symbol>,
    ) -> Self {
        Self {
            model,
            view: TypeView::new(model, deps),
            names,
            bound,
        }
    }

    fn shape(&self, ty: TypeId) -> TypeShape {
        self.view.shape(ty).clone()
    }

    /// Top-level type of an exported value. Functions become generic over
    /// the value's free variables.
    fn export(&mut self, ty: TypeId) -> HostType {
        match self.shape(ty) {
            TypeShape::Function(func) => {
                let type_params = self.bound.iter().map(|&s| var_name(self.model, s)).collect();
                self.function(&func, type_params)
            }
            _ => self.host(ty),
        }
    }

    fn host(&mut self, ty: TypeId) -> HostType {
        match self.shape(ty) {
            TypeShape::Primitive(kind) => match kind {
                PrimitiveKind::Int | PrimitiveKind::Float => HostType::Number,
                PrimitiveKind::String => HostType::String,
                PrimitiveKind::Bool => HostType::Boolean,
                PrimitiveKind::Unit => HostType::Void,
                PrimitiveKind::Unknown => HostType::Unknown,
            },
            TypeShape::Option(inner) => match self.option_inner(inner) {
                Some(innermost) => HostType::Option {
                    inner: Box::new(self.host(innermost)),
                    nested: true,
                },
                None => HostType::Option {
                    inner: Box::new(self.host(inner)),
                    nested: false,
                },
            },
            TypeShape::Array(inner) => HostType::Array(Box::new(self.host(inner))),
            TypeShape::Tuple(elements) => {
                HostType::Tuple(elements.iter().map(|&e| self.host(e)).collect())
            }
            TypeShape::Record(fields) => HostType::Object(
                fields
                    .iter()
                    .map(|f| HostField {
                        name: self.model.name(f.host_name).to_string(),
                        ty: if f.optional {
                            self.optional_value(f.ty)
                        } else {
                            self.host(f.ty)
                        },
                        readonly: !f.mutable,
                        optional: f.optional,
                    })
                    .collect(),
            ),
            TypeShape::Variant(variant) if variant.is_enum() => HostType::StringUnion(
                variant
                    .cases
                    .iter()
                    .map(|c| self.model.name(c.host_tag).to_string())
                    .collect(),
            ),
            TypeShape::Variant(variant) => HostType::TaggedUnion(
                variant
                    .cases
                    .iter()
                    .map(|c| HostCase {
                        tag: self.model.name(c.host_tag).to_string(),
                        value: match c.payload.as_slice() {
                            [] => None,
                            [single] => Some(self.host(*single)),
                            many => Some(HostType::Tuple(
                                many.iter().map(|&p| self.host(p)).collect(),
                            )),
                        },
                    })
                    .collect(),
            ),
            TypeShape::Function(func) => self.function(&func, Vec::new()),
            TypeShape::Var(sym) if self.bound.contains(&sym) => {
                HostType::Var(var_name(self.model, sym))
            }
            TypeShape::Ref(decl) => self.named(decl, Vec::new()),
            TypeShape::Applied { head, args } => {
                let args = args.iter().map(|&a| self.host(a)).collect();
                self.named(head, args)
            }
            TypeShape::Var(_) | TypeShape::Opaque(_) | TypeShape::Unresolved => HostType::Unknown,
        }
    }

    fn named(&self, decl: DeclId, args: Vec<HostType>) -> HostType {
        match self.names.type_name(decl) {
            Some(name) => HostType::Named {
                name: name.to_string(),
                args,
            },
            None => HostType::Unknown,
        }
    }

    /// `Some(inner)` when `ty` is an option, looking through references and
    /// generic instantiations.
    fn option_inner(&mut self, ty: TypeId) -> Option<TypeId> {
        let resolved = self.view.resolve(ty);
        match self.view.shape(resolved) {
            TypeShape::Option(inner) => Some(*inner),
            _ => None,
        }
    }

    /// Type of an optional field or parameter whose present value is `ty`.
    /// `undefined` already means absent, so only a nested `null` is spelled out.
    fn optional_value(&mut self, ty: TypeId) -> HostType {
        match self.option_inner(ty) {
            Some(inner) => HostType::Option {
                inner: Box::new(self.host(inner)),
                nested: true,
            },
            None => self.host(ty),
        }
    }

    fn labeled_field(&mut self, label: Symbol, ty: TypeId, optional: bool) -> HostField {
        HostField {
            name: self.model.name(label).to_string(),
            ty: if optional {
                self.optional_value(ty)
            } else {
                self.host(ty)
            },
            readonly: true,
            optional,
        }
    }

    /// Positional parameters in order, then one options object holding the
    /// labeled ones. A trailing unit after labels is not exposed.
    fn function(&mut self, func: &FunctionShape, type_params: Vec<String>) -> HostType {
        let labeled = func.has_labels();
        let last = func.params.len().saturating_sub(1);
        let mut params = Vec::new();
        let mut options = Vec::new();

        for (i, param) in func.params.iter().enumerate() {
            match param.label {
                Some(label) => options.push(self.labeled_field(label, param.ty, param.optional)),
                None if labeled && i == last && param.ty == TYPE_UNIT => {}
                None => params.push(self.host(param.ty)),
            }
        }

        let options_optional = !options.is_empty() && options.iter().all(|f| f.optional);
        if labeled {
            params.push(HostType::Object(options));
        }

        HostType::Function {
            type_params,
            params,
            options_optional,
            result: Box::new(self.host(func.result)),
        }
    }

    /// `React.FC<Props>`: labeled parameters become the props object, a
    /// single record parameter is the props type itself.
    fn component(&mut self, ty: TypeId) -> HostType {
        let TypeShape::Function(func) = self.shape(ty) else {
            return self.host(ty);
        };
        let positional: Vec<_> = func
            .params
            .iter()
            .filter(|p| p.label.is_none() && p.ty != TYPE_UNIT)
            .collect();
        let props = match positional.as_slice() {
            [single] if !func.has_labels() => self.host(single.ty),
            _ => HostType::Object(
                func.params
                    .iter()
                    .filter_map(|p| {
                        p.label
                            .map(|label| self.labeled_field(label, p.ty, p.optional))
                    })
                    .collect(),
            ),
        };
        HostType::Component(Box::new(props))
    }
}
