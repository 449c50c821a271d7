//! Which types need a conversion at the boundary.
//!
//! A type needs conversion when its own shape does (variants, renamed
//! fields, curried or labeled functions, nested options) or when anything
//! it contains does. Recursive types make this a least fixed point: the
//! reachable graph is collected first, then need is propagated backwards
//! from the intrinsic nodes.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexSet;

use super::view::TypeView;
use crate::model::{TypeId, TypeShape};

#[derive(Clone, Debug, Default)]
pub struct ConversionNeeds {
    needs: HashSet<TypeId>,
    reachable: IndexSet<TypeId>,
}

impl ConversionNeeds {
    /// The representation is the same on both sides.
    pub fn is_identity(&self, ty: TypeId) -> bool {
        !self.needs.contains(&ty)
    }

    pub fn reachable(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.reachable.iter().copied()
    }

    pub fn needs_count(&self) -> usize {
        self.needs.len()
    }
}

/// Analyze every type reachable from `roots`.
pub fn analyze_needs(
    view: &mut TypeView<'_>,
    roots: impl IntoIterator<Item = TypeId>,
) -> ConversionNeeds {
    let mut reachable = IndexSet::new();
    let mut reverse: HashMap<TypeId, Vec<TypeId>> = HashMap::new();
    let mut needs = HashSet::new();
    let mut worklist = Vec::new();
    let mut queue: VecDeque<TypeId> = roots.into_iter().collect();

    while let Some(ty) = queue.pop_front() {
        if !reachable.insert(ty) {
            continue;
        }
        let (successors, intrinsic) = edges(view, ty);
        if intrinsic && needs.insert(ty) {
            worklist.push(ty);
        }
        for succ in successors {
            reverse.entry(succ).or_default().push(ty);
            queue.push_back(succ);
        }
    }

    while let Some(ty) = worklist.pop() {
        let Some(preds) = reverse.get(&ty) else {
            continue;
        };
        for &pred in preds {
            if needs.insert(pred) {
                worklist.push(pred);
            }
        }
    }

    tracing::trace!(
        reachable = reachable.len(),
        needs = needs.len(),
        "computed conversion needs"
    );

    ConversionNeeds { needs, reachable }
}

/// Successors of `ty` and whether its own shape needs conversion.
///
/// Optional fields and parameters contribute `Option(T)`, the type of the
/// value as the origin stores it.
pub(crate) fn edges(view: &mut TypeView<'_>, ty: TypeId) -> (Vec<TypeId>, bool) {
    match view.shape(ty).clone() {
        TypeShape::Primitive(_)
        | TypeShape::Var(_)
        | TypeShape::Opaque(_)
        | TypeShape::Unresolved => (Vec::new(), false),
        TypeShape::Applied { head, .. } if view.deps().is_non_regular(head) => (Vec::new(), false),
        TypeShape::Ref(_) | TypeShape::Applied { .. } => {
            let successors = view.unfold(ty).map(|u| u.body).into_iter().collect();
            (successors, false)
        }
        TypeShape::Option(inner) => {
            let resolved = view.resolve(inner);
            let nested = matches!(view.shape(resolved), TypeShape::Option(_));
            (vec![inner], nested)
        }
        TypeShape::Array(inner) => (vec![inner], false),
        TypeShape::Tuple(elements) => (elements, false),
        TypeShape::Record(fields) => {
            let renamed = fields.iter().any(|f| f.is_renamed());
            let successors = fields
                .iter()
                .map(|f| {
                    if f.optional {
                        view.intern(TypeShape::Option(f.ty))
                    } else {
                        f.ty
                    }
                })
                .collect();
            (successors, renamed)
        }
        TypeShape::Variant(variant) => {
            let successors = variant
                .cases
                .iter()
                .flat_map(|c| c.payload.iter().copied())
                .collect();
            (successors, true)
        }
        TypeShape::Function(func) => {
            let mut successors: Vec<TypeId> = func
                .params
                .iter()
                .map(|p| {
                    if p.optional {
                        view.intern(TypeShape::Option(p.ty))
                    } else {
                        p.ty
                    }
                })
                .collect();
            successors.push(func.result);
            (
                successors,
                func.is_effectively_curried() || func.has_labels(),
            )
        }
    }
}
