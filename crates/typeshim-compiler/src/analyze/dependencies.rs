//! Dependency analysis for type declarations.
//!
//! Computes the reference graph between declarations and its Strongly
//! Connected Components. SCCs are exposed in reverse topological order
//! (leaves first): emission and planning process dependencies before
//! dependents, and every SCC with more than one member is a mutually
//! recursive group.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};

use crate::model::{DeclId, Model, ModuleId, TypeId, TypeShape};

#[derive(Clone, Debug, Default)]
pub struct DependencyAnalysis {
    /// Strongly connected components in reverse topological order.
    ///
    /// - `sccs[0]` depends on nothing later in the list.
    /// - Declarations within an SCC are mutually recursive.
    /// - Every declaration of the model appears exactly once.
    pub sccs: Vec<Vec<DeclId>>,

    scc_of: HashMap<DeclId, usize>,

    /// In an SCC with more than one member, or referencing itself.
    recursive: HashSet<DeclId>,

    /// Recursive declarations that reference an SCC member at a type that
    /// grows with every unfolding (`'a t` mentioning `'a list t`).
    non_regular: HashSet<DeclId>,
}

impl DependencyAnalysis {
    pub fn is_recursive(&self, decl: DeclId) -> bool {
        self.recursive.contains(&decl)
    }

    pub fn is_non_regular(&self, decl: DeclId) -> bool {
        self.non_regular.contains(&decl)
    }

    pub fn scc_index(&self, decl: DeclId) -> Option<usize> {
        self.scc_of.get(&decl).copied()
    }

    pub fn same_scc(&self, a: DeclId, b: DeclId) -> bool {
        self.scc_index(a).is_some() && self.scc_index(a) == self.scc_index(b)
    }

    /// SCCs restricted to `module`, leaves first. Empty groups are dropped.
    pub fn module_sccs(&self, model: &Model, module: ModuleId) -> Vec<Vec<DeclId>> {
        self.sccs
            .iter()
            .map(|scc| {
                scc.iter()
                    .copied()
                    .filter(|&d| model.decl(d).module == module)
                    .collect::<Vec<_>>()
            })
            .filter(|scc| !scc.is_empty())
            .collect()
    }
}

/// Analyze dependencies between all declarations of the model.
pub fn analyze_dependencies(model: &Model) -> DependencyAnalysis {
    let sccs = SccFinder::find(model);

    let mut scc_of = HashMap::new();
    let mut recursive = HashSet::new();

    for (index, scc) in sccs.iter().enumerate() {
        for &decl in scc {
            scc_of.insert(decl, index);
        }

        if scc.len() > 1 {
            recursive.extend(scc.iter().copied());
        } else if let Some(&decl) = scc.first()
            && collect_refs(model, model.decl(decl).body).contains(&decl)
        {
            recursive.insert(decl);
        }
    }

    let mut analysis = DependencyAnalysis {
        sccs,
        scc_of,
        recursive,
        non_regular: HashSet::new(),
    };
    analysis.non_regular = find_non_regular(model, &analysis);

    tracing::debug!(
        sccs = analysis.sccs.len(),
        recursive = analysis.recursive.len(),
        non_regular = analysis.non_regular.len(),
        "analyzed declaration dependencies"
    );

    analysis
}

struct SccFinder<'m> {
    model: &'m Model,
    index: usize,
    stack: Vec<DeclId>,
    on_stack: IndexSet<DeclId>,
    indices: IndexMap<DeclId, usize>,
    lowlinks: IndexMap<DeclId, usize>,
    sccs: Vec<Vec<DeclId>>,
}

impl<'m> SccFinder<'m> {
    fn find(model: &'m Model) -> Vec<Vec<DeclId>> {
        let mut finder = Self {
            model,
            index: 0,
            stack: Vec::new(),
            on_stack: IndexSet::new(),
            indices: IndexMap::new(),
            lowlinks: IndexMap::new(),
            sccs: Vec::new(),
        };

        for decl in model.decls() {
            if !finder.indices.contains_key(&decl.id) {
                finder.strongconnect(decl.id);
            }
        }

        finder.sccs
    }

    fn strongconnect(&mut self, decl: DeclId) {
        self.indices.insert(decl, self.index);
        self.lowlinks.insert(decl, self.index);
        self.index += 1;
        self.stack.push(decl);
        self.on_stack.insert(decl);

        for target in collect_refs(self.model, self.model.decl(decl).body) {
            let candidate = if !self.indices.contains_key(&target) {
                self.strongconnect(target);
                self.lowlinks[&target]
            } else if self.on_stack.contains(&target) {
                self.indices[&target]
            } else {
                continue;
            };
            let lowlink = self.lowlinks[&decl].min(candidate);
            self.lowlinks.insert(decl, lowlink);
        }

        if self.lowlinks[&decl] == self.indices[&decl] {
            let mut scc = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack.swap_remove(&member);
                scc.push(member);
                if member == decl {
                    break;
                }
            }
            // Keep document order inside a group
            scc.sort();
            self.sccs.push(scc);
        }
    }
}

/// Declarations referenced from `ty`, without following their bodies.
pub fn collect_refs(model: &Model, ty: TypeId) -> IndexSet<DeclId> {
    let mut refs = IndexSet::new();
    let mut seen = HashSet::new();
    let mut stack = vec![ty];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        let shape = model.shape(current);
        match shape {
            TypeShape::Ref(decl) | TypeShape::Applied { head: decl, .. } => {
                refs.insert(*decl);
            }
            _ => {}
        }
        shape.for_each_child(|child| stack.push(child));
    }
    refs
}

/// A recursive reference is regular when every type argument is either a
/// bare variable or mentions no variable at all. Anything else produces an
/// unbounded family of instantiations.
fn find_non_regular(model: &Model, analysis: &DependencyAnalysis) -> HashSet<DeclId> {
    let mut out = HashSet::new();
    for decl in model.decls() {
        if !analysis.is_recursive(decl.id) {
            continue;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![decl.body];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let shape = model.shape(current);
            if let TypeShape::Applied { head, args } = shape
                && analysis.same_scc(decl.id, *head)
                && args.iter().any(|&arg| {
                    !matches!(model.shape(arg), TypeShape::Var(_))
                        && !model.arena.free_vars(arg).is_empty()
                })
            {
                out.insert(decl.id);
                break;
            }
            shape.for_each_child(|child| stack.push(child));
        }
    }
    out
}
