//! Interned storage for type shapes.
//!
//! Types are interned so equal anonymous shapes share one `TypeId`; that id is
//! the memoization key for planning. `DerivedArena` layers per-module derived
//! shapes (generic instantiations) on top of the shared, read-only arena.

use std::collections::{HashMap, HashSet};

use typeshim_core::Symbol;

use super::types::{
    PrimitiveKind, TYPE_BOOL, TYPE_FLOAT, TYPE_INT, TYPE_STRING, TYPE_UNIT, TYPE_UNKNOWN,
    TYPE_UNRESOLVED, TypeId, TypeShape,
};

#[derive(Clone, Debug)]
pub struct TypeArena {
    types: Vec<TypeShape>,
    type_map: HashMap<TypeShape, TypeId>,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        let mut arena = Self {
            types: Vec::new(),
            type_map: HashMap::new(),
        };

        // Pre-register builtins at their fixed ids
        for kind in PrimitiveKind::ALL {
            let id = arena.intern(TypeShape::Primitive(kind));
            debug_assert_eq!(id, arena.primitive(kind));
        }
        let unresolved = arena.intern(TypeShape::Unresolved);
        debug_assert_eq!(unresolved, TYPE_UNRESOLVED);

        arena
    }

    /// Intern a shape, returning its id. Identical shapes share one id.
    pub fn intern(&mut self, shape: TypeShape) -> TypeId {
        if let Some(&id) = self.type_map.get(&shape) {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(shape.clone());
        self.type_map.insert(shape, id);
        id
    }

    pub fn lookup(&self, shape: &TypeShape) -> Option<TypeId> {
        self.type_map.get(shape).copied()
    }

    /// Shape for `id`.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this arena.
    #[inline]
    pub fn shape(&self, id: TypeId) -> &TypeShape {
        &self.types[id.index()]
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> Option<&TypeShape> {
        self.types.get(id.index())
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        match kind {
            PrimitiveKind::Int => TYPE_INT,
            PrimitiveKind::Float => TYPE_FLOAT,
            PrimitiveKind::String => TYPE_STRING,
            PrimitiveKind::Bool => TYPE_BOOL,
            PrimitiveKind::Unit => TYPE_UNIT,
            PrimitiveKind::Unknown => TYPE_UNKNOWN,
        }
    }

    /// Type variables occurring in `id`, in order of first occurrence.
    pub fn free_vars(&self, id: TypeId) -> Vec<Symbol> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        let mut seen = HashSet::new();
        while let Some(ty) = stack.pop() {
            if !seen.insert(ty) {
                continue;
            }
            let shape = self.shape(ty);
            if let TypeShape::Var(sym) = shape
                && !out.contains(sym)
            {
                out.push(*sym);
            }
            let mut children = Vec::new();
            shape.for_each_child(|child| children.push(child));
            // Reverse so the leftmost child is visited first
            stack.extend(children.into_iter().rev());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Arena overlay owned by one module's planning pass.
///
/// Ids below `base.len()` live in the shared arena; ids above are local.
/// Interning consults the base first, so a derived shape that already exists
/// in the document keeps its document id.
#[derive(Debug)]
pub struct DerivedArena<'a> {
    base: &'a TypeArena,
    local: Vec<TypeShape>,
    local_map: HashMap<TypeShape, TypeId>,
}

impl<'a> DerivedArena<'a> {
    pub fn new(base: &'a TypeArena) -> Self {
        Self {
            base,
            local: Vec::new(),
            local_map: HashMap::new(),
        }
    }

    pub fn base(&self) -> &'a TypeArena {
        self.base
    }

    pub fn intern(&mut self, shape: TypeShape) -> TypeId {
        if let Some(id) = self.base.lookup(&shape) {
            return id;
        }
        if let Some(&id) = self.local_map.get(&shape) {
            return id;
        }

        let id = TypeId((self.base.len() + self.local.len()) as u32);
        self.local.push(shape.clone());
        self.local_map.insert(shape, id);
        id
    }

    #[inline]
    pub fn shape(&self, id: TypeId) -> &TypeShape {
        let index = id.index();
        if index < self.base.len() {
            self.base.shape(id)
        } else {
            &self.local[index - self.base.len()]
        }
    }

    /// Number of shapes derived beyond the shared arena.
    pub fn derived_len(&self) -> usize {
        self.local.len()
    }
}
