//! Per-module view over the model that unfolds declaration references.
//!
//! `Applied` types are instantiated on demand into a `DerivedArena`, so the
//! shared model stays read-only. Each instantiation is memoized by the
//! `Applied` type id, which keeps recursive generic declarations finite.

use std::collections::{HashMap, HashSet};

use typeshim_core::Symbol;

use super::dependencies::DependencyAnalysis;
use crate::model::{
    Case, DeclId, DerivedArena, Field, FunctionShape, Model, Param, TypeId, TypeShape,
    VariantShape,
};

/// A reference expanded to the declaration it names.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Unfolded {
    pub decl: DeclId,
    /// The declaration body, with type arguments substituted.
    pub body: TypeId,
}

pub struct TypeView<'m> {
    model: &'m Model,
    deps: &'m DependencyAnalysis,
    arena: DerivedArena<'m>,
    instances: HashMap<TypeId, TypeId>,
}

impl<'m> TypeView<'m> {
    pub fn new(model: &'m Model, deps: &'m DependencyAnalysis) -> Self {
        Self {
            model,
            deps,
            arena: DerivedArena::new(&model.arena),
            instances: HashMap::new(),
        }
    }

    pub fn model(&self) -> &'m Model {
        self.model
    }

    pub fn deps(&self) -> &'m DependencyAnalysis {
        self.deps
    }

    #[inline]
    pub fn shape(&self, ty: TypeId) -> &TypeShape {
        self.arena.shape(ty)
    }

    pub fn intern(&mut self, shape: TypeShape) -> TypeId {
        self.arena.intern(shape)
    }

    /// Expand `Ref` and `Applied`; `None` for every other shape.
    pub fn unfold(&mut self, ty: TypeId) -> Option<Unfolded> {
        match self.shape(ty).clone() {
            TypeShape::Ref(decl) => Some(Unfolded {
                decl,
                body: self.model.decl(decl).body,
            }),
            TypeShape::Applied { head, args } => {
                if let Some(&body) = self.instances.get(&ty) {
                    return Some(Unfolded { decl: head, body });
                }
                let body = self.instantiate(head, &args);
                self.instances.insert(ty, body);
                Some(Unfolded { decl: head, body })
            }
            _ => None,
        }
    }

    /// Follow references until a non-reference type.
    pub fn resolve(&mut self, ty: TypeId) -> TypeId {
        let mut seen = HashSet::new();
        let mut current = ty;
        while let Some(unfolded) = self.unfold(current) {
            if !seen.insert(unfolded.decl) {
                break;
            }
            current = unfolded.body;
        }
        current
    }

    /// Number of instantiated generic bodies.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn instantiate(&mut self, decl: DeclId, args: &[TypeId]) -> TypeId {
        let decl = self.model.decl(decl);
        let subst: HashMap<Symbol, TypeId> = decl
            .params
            .iter()
            .copied()
            .zip(args.iter().copied())
            .collect();
        let mut memo = HashMap::new();
        self.substitute(decl.body, &subst, &mut memo)
    }

    fn substitute(
        &mut self,
        ty: TypeId,
        subst: &HashMap<Symbol, TypeId>,
        memo: &mut HashMap<TypeId, TypeId>,
    ) -> TypeId {
        if let Some(&done) = memo.get(&ty) {
            return done;
        }

        let shape = match self.shape(ty).clone() {
            TypeShape::Var(sym) => {
                let out = subst.get(&sym).copied().unwrap_or(ty);
                memo.insert(ty, out);
                return out;
            }
            TypeShape::Primitive(_)
            | TypeShape::Opaque(_)
            | TypeShape::Ref(_)
            | TypeShape::Unresolved => {
                memo.insert(ty, ty);
                return ty;
            }
            TypeShape::Option(inner) => TypeShape::Option(self.substitute(inner, subst, memo)),
            TypeShape::Array(inner) => TypeShape::Array(self.substitute(inner, subst, memo)),
            TypeShape::Tuple(elements) => TypeShape::Tuple(
                elements
                    .into_iter()
                    .map(|e| self.substitute(e, subst, memo))
                    .collect(),
            ),
            TypeShape::Record(fields) => TypeShape::Record(
                fields
                    .into_iter()
                    .map(|field| Field {
                        ty: self.substitute(field.ty, subst, memo),
                        ..field
                    })
                    .collect(),
            ),
            TypeShape::Variant(variant) => TypeShape::Variant(VariantShape {
                cases: variant
                    .cases
                    .into_iter()
                    .map(|case| Case {
                        payload: case
                            .payload
                            .iter()
                            .map(|&p| self.substitute(p, subst, memo))
                            .collect(),
                        ..case
                    })
                    .collect(),
                polymorphic: variant.polymorphic,
            }),
            TypeShape::Function(func) => TypeShape::Function(FunctionShape {
                params: func
                    .params
                    .iter()
                    .map(|param| Param {
                        ty: self.substitute(param.ty, subst, memo),
                        ..*param
                    })
                    .collect(),
                result: self.substitute(func.result, subst, memo),
                curried: func.curried,
            }),
            TypeShape::Applied { head, args } => TypeShape::Applied {
                head,
                args: args
                    .into_iter()
                    .map(|a| self.substitute(a, subst, memo))
                    .collect(),
            },
        };

        let out = self.arena.intern(shape);
        memo.insert(ty, out);
        out
    }
}
