//! Conversion Planner.
//!
//! Plans are built per module, for every type reachable from the module's
//! exported values. Identity is decided up front by `analyze_needs`, so a
//! recursive reference met while its declaration is still being planned can
//! return the reserved id without knowing the finished converter.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::converter::{
    ArgSlot, CallAdapter, CasePlan, ConversionPlan, Convention, Converter, EnumEntry, EnumTable,
    FieldPlan, FunctionPlan, NamedPlan, OriginTag, PlanId, VariantPlan,
};
use super::hash::variant_hash;
use crate::analyze::{ConversionNeeds, DependencyAnalysis, TypeView, analyze_needs};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::{
    DeclId, ExportId, FunctionShape, Model, ModuleId, TYPE_UNIT, TYPE_UNRESOLVED, TypeId,
    TypeShape, VariantShape,
};

/// Plans of one module. Slot 0 is the shared identity plan.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanTable {
    plans: Vec<ConversionPlan>,
}

impl Default for PlanTable {
    fn default() -> Self {
        Self {
            plans: vec![ConversionPlan::identity()],
        }
    }
}

impl PlanTable {
    pub fn get(&self, id: PlanId) -> Option<&ConversionPlan> {
        self.plans.get(id.index())
    }

    /// Converter of `id`. Unknown ids read as identity.
    pub fn converter(&self, id: PlanId) -> &Converter {
        self.plans
            .get(id.index())
            .map_or(&Converter::Identity, |plan| &plan.converter)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.len() <= 1
    }

    /// Non-identity plans in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (PlanId, &ConversionPlan)> {
        self.plans
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, plan)| (PlanId(i as u32), plan))
    }

    fn reserve(&mut self, named: Option<NamedPlan>) -> PlanId {
        let id = PlanId(self.plans.len() as u32);
        self.plans.push(ConversionPlan {
            converter: Converter::Pending,
            named,
        });
        id
    }

    fn fill(&mut self, id: PlanId, converter: Converter) {
        self.plans[id.index()].converter = converter;
    }
}

/// Result of planning one module.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModulePlans {
    pub table: PlanTable,
    /// Plan of every exported value of the module, in namespace order.
    pub exports: IndexMap<ExportId, PlanId>,
}

impl ModulePlans {
    pub fn export_plan(&self, id: ExportId) -> PlanId {
        self.exports.get(&id).copied().unwrap_or(PlanId::IDENTITY)
    }
}

/// Plan every exported value of `module`. Conversion gaps are reported into
/// `diagnostics`; the offending plan degrades to identity.
pub fn plan_module(
    model: &Model,
    deps: &DependencyAnalysis,
    module: ModuleId,
    diagnostics: &mut Diagnostics,
) -> ModulePlans {
    let module_ref = model.module(module);
    let exports = module_ref.root.all_exports();

    let mut view = TypeView::new(model, deps);
    let roots: Vec<TypeId> = exports.iter().map(|&e| model.export(e).ty).collect();
    let needs = analyze_needs(&mut view, roots);

    let mut planner = Planner {
        view,
        needs,
        table: PlanTable::default(),
        memo: HashMap::new(),
        instances: HashMap::new(),
        module_name: &module_ref.name,
        diagnostics,
        origin: String::new(),
        crumbs: Vec::new(),
    };

    let mut planned = IndexMap::new();
    for id in exports {
        let export = model.export(id);
        planner.origin = model.export_path(id);
        planner.crumbs.clear();
        let plan = if export.is_component {
            planner.plan_component(export.ty)
        } else {
            planner.plan(export.ty)
        };
        planned.insert(id, plan);
    }

    tracing::debug!(
        module = %module_ref.name,
        plans = planner.table.len() - 1,
        instances = planner.view.instance_count(),
        "planned conversions"
    );

    ModulePlans {
        table: planner.table,
        exports: planned,
    }
}

struct Planner<'m, 'd> {
    view: TypeView<'m>,
    needs: ConversionNeeds,
    table: PlanTable,
    memo: HashMap<TypeId, PlanId>,
    /// Instantiations planned so far per declaration.
    instances: HashMap<DeclId, u32>,
    module_name: &'m str,
    diagnostics: &'d mut Diagnostics,
    /// Origin path of the export being planned.
    origin: String,
    crumbs: Vec<String>,
}

impl<'m> Planner<'m, '_> {
    fn here(&self) -> String {
        let mut out = self.origin.clone();
        for crumb in &self.crumbs {
            out.push('.');
            out.push_str(crumb);
        }
        out
    }

    fn gap(&mut self, kind: DiagnosticKind, detail: Option<String>) {
        let path = self.here();
        let builder = self.diagnostics.report(kind, self.module_name, path);
        match detail {
            Some(detail) => builder.message(detail).emit(),
            None => builder.emit(),
        }
    }

    fn model(&self) -> &'m Model {
        self.view.model()
    }

    fn plan(&mut self, ty: TypeId) -> PlanId {
        if let Some(&id) = self.memo.get(&ty) {
            return id;
        }

        match self.view.shape(ty).clone() {
            TypeShape::Unresolved => {
                self.gap(DiagnosticKind::DependsOnInvalidType, None);
                self.memo.insert(ty, PlanId::IDENTITY);
                return PlanId::IDENTITY;
            }
            TypeShape::Applied { head, .. } if self.view.deps().is_non_regular(head) => {
                let path = self.model().decl_path(head);
                self.gap(DiagnosticKind::PolymorphicRecursion, Some(path));
                self.memo.insert(ty, PlanId::IDENTITY);
                return PlanId::IDENTITY;
            }
            _ => {}
        }

        if let Some(unfolded) = self.view.unfold(ty) {
            if unfolded.body == TYPE_UNRESOLVED {
                let path = self.model().decl_path(unfolded.decl);
                self.gap(DiagnosticKind::DependsOnInvalidType, Some(path));
                self.memo.insert(ty, PlanId::IDENTITY);
                return PlanId::IDENTITY;
            }
            if self.needs.is_identity(ty) {
                // Still walk the body once so gaps behind identity references surface
                self.memo.insert(ty, PlanId::IDENTITY);
                self.plan(unfolded.body);
                return PlanId::IDENTITY;
            }
            if matches!(
                self.view.shape(unfolded.body),
                TypeShape::Ref(_) | TypeShape::Applied { .. }
            ) {
                // Abbreviation: share the target's plan
                let id = self.plan(unfolded.body);
                self.memo.insert(ty, id);
                return id;
            }

            let instance = self.instances.entry(unfolded.decl).or_insert(0);
            let named = NamedPlan {
                decl: unfolded.decl,
                instance: *instance,
            };
            *instance += 1;

            // Keyed by the reference, never by the body: structurally equal
            // declarations keep separate plans.
            let id = self.table.reserve(Some(named));
            self.memo.insert(ty, id);
            let converter = self.build(unfolded.body);
            self.table.fill(id, converter);
            return id;
        }

        if self.needs.is_identity(ty) {
            self.memo.insert(ty, PlanId::IDENTITY);
            self.visit_identity(ty);
            return PlanId::IDENTITY;
        }

        let id = self.table.reserve(None);
        self.memo.insert(ty, id);
        let converter = self.build(ty);
        self.table.fill(id, converter);
        id
    }

    /// Identity types need no converter, but may still contain references to
    /// broken or non-regular declarations.
    fn visit_identity(&mut self, ty: TypeId) {
        let mut children = Vec::new();
        self.view
            .shape(ty)
            .for_each_child(|child| children.push(child));
        for child in children {
            self.plan(child);
        }
    }

    fn build(&mut self, ty: TypeId) -> Converter {
        match self.view.shape(ty).clone() {
            TypeShape::Option(inner) => self.build_option(inner),
            TypeShape::Array(inner) => Converter::Array(self.plan(inner)),
            TypeShape::Tuple(elements) => {
                let mut plans = Vec::with_capacity(elements.len());
                for (i, element) in elements.into_iter().enumerate() {
                    self.crumbs.push(i.to_string());
                    plans.push(self.plan(element));
                    self.crumbs.pop();
                }
                Converter::Tuple(plans)
            }
            TypeShape::Record(fields) => {
                let mut plans = Vec::with_capacity(fields.len());
                for field in fields {
                    let name = self.model().name(field.name).to_string();
                    let host_name = self.model().name(field.host_name).to_string();
                    let ty = if field.optional {
                        self.view.intern(TypeShape::Option(field.ty))
                    } else {
                        field.ty
                    };
                    self.crumbs.push(name.clone());
                    let plan = self.plan(ty);
                    self.crumbs.pop();
                    plans.push(FieldPlan {
                        name,
                        host_name,
                        plan,
                        mutable: field.mutable,
                        optional: field.optional,
                    });
                }
                Converter::Record(plans)
            }
            TypeShape::Variant(variant) if variant.is_enum() => {
                Converter::Enum(self.build_enum(&variant))
            }
            TypeShape::Variant(variant) => Converter::Variant(self.build_variant(&variant)),
            TypeShape::Function(func) => {
                let convention = if func.is_effectively_curried() {
                    Convention::Curried
                } else {
                    Convention::Uncurried
                };
                Converter::Function(self.build_function(&func, convention))
            }
            TypeShape::Primitive(_)
            | TypeShape::Var(_)
            | TypeShape::Opaque(_)
            | TypeShape::Ref(_)
            | TypeShape::Applied { .. }
            | TypeShape::Unresolved => Converter::Identity,
        }
    }

    fn build_option(&mut self, inner: TypeId) -> Converter {
        let resolved = self.view.resolve(inner);
        let TypeShape::Option(innermost) = self.view.shape(resolved).clone() else {
            return Converter::Option {
                inner: self.plan(inner),
                nested: false,
            };
        };

        let deepest = self.view.resolve(innermost);
        if matches!(self.view.shape(deepest), TypeShape::Option(_)) {
            self.gap(DiagnosticKind::DeeplyNestedOption, None);
            return Converter::Identity;
        }

        Converter::Option {
            inner: self.plan(innermost),
            nested: true,
        }
    }

    fn build_enum(&mut self, variant: &VariantShape) -> EnumTable {
        let entries = variant
            .cases
            .iter()
            .enumerate()
            .map(|(i, case)| EnumEntry {
                origin: if variant.polymorphic {
                    OriginTag::Hash(variant_hash(self.model().name(case.tag)))
                } else {
                    OriginTag::Constant(i as u32)
                },
                host: self.model().name(case.host_tag).to_string(),
            })
            .collect();
        EnumTable { entries }
    }

    fn build_variant(&mut self, variant: &VariantShape) -> VariantPlan {
        let mut constants = 0;
        let mut blocks = 0;
        let mut cases = Vec::with_capacity(variant.cases.len());

        for case in &variant.cases {
            let tag = self.model().name(case.tag).to_string();
            let origin = if variant.polymorphic {
                OriginTag::Hash(variant_hash(&tag))
            } else if case.is_constant() {
                constants += 1;
                OriginTag::Constant(constants - 1)
            } else {
                blocks += 1;
                OriginTag::Block(blocks - 1)
            };

            self.crumbs.push(tag.clone());
            let mut payload = Vec::with_capacity(case.payload.len());
            for &element in &case.payload {
                let plan = self.plan(element);
                let resolved = self.view.resolve(element);
                if !plan.is_identity() && matches!(self.view.shape(resolved), TypeShape::Function(_))
                {
                    self.gap(DiagnosticKind::FunctionInVariantPayload, Some(tag.clone()));
                }
                payload.push(plan);
            }
            self.crumbs.pop();

            cases.push(CasePlan {
                host_tag: self.model().name(case.host_tag).to_string(),
                tag,
                origin,
                payload,
            });
        }

        VariantPlan {
            cases,
            polymorphic: variant.polymorphic,
        }
    }

    fn build_function(&mut self, func: &FunctionShape, convention: Convention) -> FunctionPlan {
        let labeled = func.has_labels();
        let last = func.params.len().saturating_sub(1);
        let mut slots = Vec::with_capacity(func.params.len());
        let mut params = Vec::with_capacity(func.params.len());
        let mut positional = 0;

        for (i, param) in func.params.iter().enumerate() {
            let slot = match param.label {
                Some(label) => ArgSlot::Labeled {
                    name: self.model().name(label).to_string(),
                    optional: param.optional,
                },
                None if labeled && i == last && param.ty == TYPE_UNIT => ArgSlot::Unit,
                None => {
                    positional += 1;
                    ArgSlot::Positional(positional - 1)
                }
            };

            let crumb = match &slot {
                ArgSlot::Labeled { name, .. } => name.clone(),
                _ => format!("arg{}", i + 1),
            };
            self.crumbs.push(crumb);
            let plan = match slot {
                ArgSlot::Unit => PlanId::IDENTITY,
                _ if param.optional => {
                    let ty = self.view.intern(TypeShape::Option(param.ty));
                    self.plan(ty)
                }
                _ => self.plan(param.ty),
            };
            self.crumbs.pop();

            slots.push(slot);
            params.push(plan);
        }

        self.crumbs.push("return".to_string());
        let result = self.plan(func.result);
        self.crumbs.pop();

        FunctionPlan {
            adapter: CallAdapter { convention, slots },
            params,
            result,
        }
    }

    /// Components always get their own wrapper plan.
    fn plan_component(&mut self, ty: TypeId) -> PlanId {
        let resolved = self.view.resolve(ty);
        let TypeShape::Function(func) = self.view.shape(resolved).clone() else {
            return self.plan(ty);
        };
        let id = self.table.reserve(None);
        let plan = self.build_function(&func, Convention::Component);
        self.table.fill(id, Converter::Function(plan));
        id
    }
}
