// src/frontend/intern.rs
//
// Flat name table for ASL. The language has one namespace for
// functions, parameters and variables, so a single table serves the
// whole pipeline. Two names matter before any source is read: `main`,
// which the entry-point check compares against, and `_result`, the
// return slot reserved in generated subroutines. Both are interned at
// construction so they have fixed handles.

use rustc_hash::FxHashMap;

use crate::frontend::ast::Symbol;

#[derive(Debug)]
pub struct Interner {
    ids: FxHashMap<Box<str>, Symbol>,
    names: Vec<Box<str>>,
}

impl Interner {
    /// The entry-point name, always `Symbol(0)`
    pub const MAIN: Symbol = Symbol(0);
    /// The return-slot name, always `Symbol(1)`
    pub const RESULT: Symbol = Symbol(1);

    pub fn new() -> Self {
        let mut interner = Self {
            ids: FxHashMap::default(),
            names: Vec::new(),
        };
        let main = interner.intern("main");
        let result = interner.intern("_result");
        debug_assert_eq!((main, result), (Self::MAIN, Self::RESULT));
        interner
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.ids.get(name) {
            return sym;
        }
        let sym = Symbol(self.names.len() as u32);
        let name: Box<str> = name.into();
        self.names.push(name.clone());
        self.ids.insert(name, sym);
        sym
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.names[sym.0 as usize]
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_have_fixed_handles() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern("main"), Interner::MAIN);
        assert_eq!(interner.intern("_result"), Interner::RESULT);
        assert_eq!(interner.resolve(Interner::RESULT), "_result");
    }

    #[test]
    fn interning_is_idempotent_and_resolvable() {
        let mut interner = Interner::new();
        let fact = interner.intern("factorial");
        let n = interner.intern("n");
        assert_eq!(interner.intern("factorial"), fact);
        assert_ne!(fact, n);
        assert_eq!(interner.resolve(fact), "factorial");
        assert_eq!(interner.resolve(n), "n");
    }
}
