//! Interning of origin identifiers.
//!
//! Every name that appears in a type signature (declaration names, record
//! fields, variant tags, type variables, namespace segments) is stored once
//! and referenced by a `Symbol`. Type shapes hold symbols, so hashing and
//! comparing shapes never touches string data.

use std::collections::HashMap;

/// Handle to an interned identifier.
///
/// Symbols order by first insertion, which follows document order when the
/// interner is fed by a single lowering pass.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Symbol(u32);

/// Identifier table. Deduplicates strings and hands out `Symbol`s.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    map: HashMap<String, Symbol>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning the existing symbol if it was seen before.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        self.map.insert(s.to_owned(), sym);
        sym
    }

    /// Look a string up without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.map.get(s).copied()
    }

    /// Resolve a symbol back to its string.
    ///
    /// # Panics
    /// Panics if the symbol was not created by this interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    #[inline]
    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.0 as usize).map(|s| s.as_str())
    }

    /// Join a symbol path with `sep`, e.g. `["Outer", "Inner", "t"]` with `"."`.
    pub fn join(&self, path: &[Symbol], sep: &str) -> String {
        let mut out = String::new();
        for (i, &sym) in path.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(self.resolve(sym));
        }
        out
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (Symbol(i as u32), s.as_str()))
    }
}
