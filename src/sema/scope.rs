// src/sema/scope.rs
//
// Scoped symbol table: a vector of named scopes plus an explicit stack of
// the scopes currently open. Scopes survive popping so later passes can
// re-enter them by id.

use rustc_hash::FxHashMap;

use crate::frontend::ast::Symbol;
use crate::frontend::Interner;
use crate::sema::type_arena::{TypeArena, TypeId};

/// Handle to a scope in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// What a name stands for inside its scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    LocalVar,
    Parameter,
    Function,
}

#[derive(Debug, Clone, Copy)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    pub ty: TypeId,
}

#[derive(Debug, Default)]
struct Scope {
    name: String,
    entries: FxHashMap<Symbol, SymbolInfo>,
}

/// The compilation unit's symbol table.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    /// Open scopes, innermost last; lookups walk it back to front
    stack: Vec<ScopeId>,
    /// Return type of the function currently being checked
    current_function_ret: Option<TypeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh scope and push it
    pub fn push_new_scope(&mut self, name: &str) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            name: name.to_string(),
            entries: FxHashMap::default(),
        });
        self.stack.push(id);
        id
    }

    /// Re-enter a scope recorded by an earlier pass
    pub fn push_scope(&mut self, id: ScopeId) {
        debug_assert!((id.0 as usize) < self.scopes.len());
        self.stack.push(id);
    }

    pub fn pop_scope(&mut self) {
        debug_assert!(!self.stack.is_empty(), "pop without a matching push");
        self.stack.pop();
    }

    pub fn scope_name(&self, id: ScopeId) -> &str {
        &self.scopes[id.0 as usize].name
    }

    fn top(&self) -> ScopeId {
        *self.stack.last().expect("no open scope")
    }

    fn entry(&self, name: Symbol) -> Option<&SymbolInfo> {
        self.stack
            .iter()
            .rev()
            .find_map(|&id| self.scopes[id.0 as usize].entries.get(&name))
    }

    /// True if `name` is declared in the innermost open scope
    pub fn find_in_current_scope(&self, name: Symbol) -> bool {
        self.scopes[self.top().0 as usize].entries.contains_key(&name)
    }

    /// Innermost open scope declaring `name`, if any
    pub fn find_in_stack(&self, name: Symbol) -> Option<ScopeId> {
        self.stack
            .iter()
            .rev()
            .find(|&&id| self.scopes[id.0 as usize].entries.contains_key(&name))
            .copied()
    }

    fn add(&mut self, name: Symbol, kind: SymbolKind, ty: TypeId) {
        let top = self.top();
        self.scopes[top.0 as usize]
            .entries
            .insert(name, SymbolInfo { kind, ty });
    }

    pub fn add_local_var(&mut self, name: Symbol, ty: TypeId) {
        self.add(name, SymbolKind::LocalVar, ty);
    }

    pub fn add_parameter(&mut self, name: Symbol, ty: TypeId) {
        self.add(name, SymbolKind::Parameter, ty);
    }

    pub fn add_function(&mut self, name: Symbol, ty: TypeId) {
        self.add(name, SymbolKind::Function, ty);
    }

    /// Type of `name`, resolved through the stack (innermost wins)
    pub fn get_type(&self, name: Symbol) -> Option<TypeId> {
        self.entry(name).map(|info| info.ty)
    }

    pub fn is_function_class(&self, name: Symbol) -> bool {
        matches!(self.entry(name), Some(info) if info.kind == SymbolKind::Function)
    }

    pub fn is_parameter_class(&self, name: Symbol) -> bool {
        matches!(self.entry(name), Some(info) if info.kind == SymbolKind::Parameter)
    }

    pub fn is_local_var_class(&self, name: Symbol) -> bool {
        matches!(self.entry(name), Some(info) if info.kind == SymbolKind::LocalVar)
    }

    pub fn set_current_function_ret(&mut self, ret: TypeId) {
        self.current_function_ret = Some(ret);
    }

    pub fn current_function_ret(&self) -> Option<TypeId> {
        self.current_function_ret
    }

    /// True unless a global `main` exists as a function with no
    /// parameters and no return value. `main` has a reserved handle, so
    /// this is a plain entry lookup.
    pub fn no_main_properly_declared(&self, types: &TypeArena) -> bool {
        let Some(global) = self.stack.first() else {
            return true;
        };
        let scope = &self.scopes[global.0 as usize];
        let Some(info) = scope.entries.get(&Interner::MAIN) else {
            return true;
        };
        if info.kind != SymbolKind::Function {
            return true;
        }
        !(types.num_params(info.ty) == Some(0) && types.is_void_function(info.ty))
    }
}
